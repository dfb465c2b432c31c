//! # Hex Coordinates
//!
//! Axial `(q, r)` coordinates over a `(2n-1) × (2n-1)` grid with the base-`n`
//! hexagon inscribed in it. Cube coordinates are used for rotation and
//! reflection.
//!
//! ## Board geometry
//!
//! A grid cell `(q, r)` lies on the board iff
//! `q + r >= n - 1` and `(4n - 4 - q - r) >= n - 1`.
//! The centre cell is `(n - 1, n - 1)`.
//!
//! ## Symmetry group
//!
//! The hexagon has the D6 dihedral group (order 12):
//! - 6 rotations by `k × 60°`: cube `(x, y, z) → (-z, -x, -y)` per step
//! - each optionally followed by a reflection: cube `(x, y, z) → (x, z, y)`

use smallvec::SmallVec;

/// Axial offsets of the six neighbours, in scan order.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Neighbour list; a hex cell has at most six, so this stays on the stack.
pub type NeighbourList = SmallVec<[(usize, usize); 6]>;

/// Side length `2n - 1` of the square grid holding a base-`n` board.
#[inline]
pub fn grid_width(size: usize) -> usize {
    2 * size - 1
}

/// Number of playable cells on a base-`n` board: `3n² - 3n + 1`.
#[inline]
pub fn cell_count(size: usize) -> usize {
    3 * size * size - 3 * size + 1
}

/// Hexagon membership test on signed coordinates (off-grid values allowed).
#[inline]
pub fn is_valid_signed(size: usize, q: i32, r: i32) -> bool {
    let width = grid_width(size) as i32;
    let n = size as i32;
    if q < 0 || r < 0 || q >= width || r >= width {
        return false;
    }
    q + r >= n - 1 && (4 * n - 4 - q - r) >= n - 1
}

/// Hexagon membership test.
#[inline]
pub fn is_valid_space(size: usize, q: usize, r: usize) -> bool {
    match (i32::try_from(q), i32::try_from(r)) {
        (Ok(q), Ok(r)) => is_valid_signed(size, q, r),
        _ => false,
    }
}

/// On-board neighbours of `(q, r)` in [`DIRECTIONS`] order.
pub fn neighbours(size: usize, q: usize, r: usize) -> NeighbourList {
    DIRECTIONS
        .iter()
        .filter_map(|&(dq, dr)| {
            let nq = q as i32 + dq;
            let nr = r as i32 + dr;
            if is_valid_signed(size, nq, nr) {
                Some((nq as usize, nr as usize))
            } else {
                None
            }
        })
        .collect()
}

// ============================================================================
// Cube coordinates
// ============================================================================

/// Axial `(q, r)` → cube `(x, y, z)` with `x + y + z = 0`.
#[inline]
pub fn axial_to_cube(q: i32, r: i32) -> (i32, i32, i32) {
    (q, -q - r, r)
}

/// Cube `(x, y, z)` → axial `(q, r)`.
#[inline]
pub fn cube_to_axial((x, _y, z): (i32, i32, i32)) -> (i32, i32) {
    (x, z)
}

/// Rotate a cube coordinate by `k × 60°` about the origin.
pub fn rotate60(cube: (i32, i32, i32), k: usize) -> (i32, i32, i32) {
    let mut c = cube;
    for _ in 0..k % 6 {
        let (x, y, z) = c;
        c = (-z, -x, -y);
    }
    c
}

/// Reflect a cube coordinate by swapping its `y` and `z` axes.
#[inline]
pub fn reflect((x, y, z): (i32, i32, i32)) -> (i32, i32, i32) {
    (x, z, y)
}

// ============================================================================
// Symmetries
// ============================================================================

/// One element of the hexagon's dihedral group: rotate, then optionally mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symmetry {
    /// Number of 60° steps, `0..6`.
    pub rotation: usize,
    pub mirror: bool,
}

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry {
        rotation: 0,
        mirror: false,
    };

    /// All twelve group elements, identity first.
    pub fn all() -> impl Iterator<Item = Symmetry> {
        [false, true].into_iter().flat_map(|mirror| {
            (0..6).map(move |rotation| Symmetry { rotation, mirror })
        })
    }

    /// Map a grid cell through this symmetry.
    ///
    /// Returns `None` only for cells that are not on the board; the hexagon is
    /// closed under the group so every valid cell maps to a valid cell.
    pub fn apply(self, size: usize, q: usize, r: usize) -> Option<(usize, usize)> {
        if !is_valid_space(size, q, r) {
            return None;
        }
        let centre = size as i32 - 1;
        let mut cube = axial_to_cube(q as i32 - centre, r as i32 - centre);
        cube = rotate60(cube, self.rotation);
        if self.mirror {
            cube = reflect(cube);
        }
        let (tq, tr) = cube_to_axial(cube);
        let (nq, nr) = (tq + centre, tr + centre);
        if is_valid_signed(size, nq, nr) {
            Some((nq as usize, nr as usize))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_corners_base4() {
        #[rustfmt::skip]
        let invalid = [
            (0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 0),
            (4, 6), (5, 5), (5, 6), (6, 4), (6, 5), (6, 6),
        ];
        for (q, r) in invalid {
            assert!(!is_valid_space(4, q, r), "({q}, {r}) should be off the board");
        }
        assert!(!is_valid_space(4, 7, 2));
        assert!(is_valid_space(4, 3, 3));
    }

    #[test]
    fn test_cell_count_matches_scan() {
        for size in 3..=6 {
            let w = grid_width(size);
            let scanned = (0..w)
                .flat_map(|r| (0..w).map(move |q| (q, r)))
                .filter(|&(q, r)| is_valid_space(size, q, r))
                .count();
            assert_eq!(scanned, cell_count(size));
        }
    }

    #[test]
    fn test_neighbours_centre() {
        let mut got: Vec<_> = neighbours(4, 3, 3).into_iter().collect();
        got.sort();
        let mut expected = vec![(3, 2), (4, 2), (4, 3), (3, 4), (2, 4), (2, 3)];
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_neighbours_edge() {
        let mut got: Vec<_> = neighbours(4, 4, 5).into_iter().collect();
        got.sort();
        let mut expected = vec![(3, 6), (3, 5), (4, 4), (5, 4)];
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_rotate60_full_cycle() {
        let cube = axial_to_cube(2, -1);
        assert_eq!(rotate60(cube, 6), cube);
        assert_ne!(rotate60(cube, 1), cube);
    }

    #[test]
    fn test_reflect_is_involution() {
        let cube = axial_to_cube(1, 2);
        assert_eq!(reflect(reflect(cube)), cube);
    }

    #[test]
    fn test_symmetries_are_distinct_bijections() {
        let size = 4;
        let w = grid_width(size);
        let cells: Vec<_> = (0..w)
            .flat_map(|r| (0..w).map(move |q| (q, r)))
            .filter(|&(q, r)| is_valid_space(size, q, r))
            .collect();

        let mut images = Vec::new();
        for sym in Symmetry::all() {
            let mapped: Vec<_> = cells
                .iter()
                .map(|&(q, r)| sym.apply(size, q, r).expect("board is closed under D6"))
                .collect();
            let mut sorted = mapped.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), cells.len(), "{sym:?} is not a bijection");
            images.push(mapped);
        }

        assert_eq!(images.len(), 12);
        for i in 0..images.len() {
            for j in (i + 1)..images.len() {
                assert_ne!(images[i], images[j], "symmetries {i} and {j} coincide");
            }
        }
    }

    #[test]
    fn test_centre_is_fixed() {
        for sym in Symmetry::all() {
            assert_eq!(sym.apply(5, 4, 4), Some((4, 4)));
        }
    }
}
