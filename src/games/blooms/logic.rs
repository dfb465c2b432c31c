//! # Game Logic Module
//!
//! Rules of Blooms as methods on [`Position`].
//!
//! ## Turn structure
//!
//! A move places one stone, or two stones of the mover's two different colours
//! on two different empty spaces. After the stones land, every bloom on the
//! board is checked:
//!
//! - a **bloom** is a maximal group of same-colour stones connected through
//!   hex adjacency
//! - a bloom is **fenced** when none of its stones touches an empty space
//!   (off-board neighbours do not count as empty)
//! - every fenced bloom is removed and its size is credited to the capture
//!   counter of the player who does *not* own the bloom's colour
//!
//! All fenced blooms are identified before any is removed, so removing one
//! bloom never frees another in the same resolution pass.

use ndarray::Array2;

use super::board::{BloomsError, Colour, Move, Placement, Position};
use super::hex;
use crate::game_trait::{GameOutcome, Player};

/// A maximal connected group of same-colour stones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bloom {
    pub colour: Colour,
    /// Member cells as `(q, r)`, in discovery order.
    pub cells: Vec<(usize, usize)>,
}

impl Bloom {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Position {
    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All empty on-board spaces, scanning rows `r` then columns `q`.
    ///
    /// The scan order fixes the move catalog order and therefore action ids.
    pub fn empty_spaces(&self) -> Vec<(usize, usize)> {
        let width = self.config().width();
        (0..width)
            .flat_map(|r| (0..width).map(move |q| (q, r)))
            .filter(|&(q, r)| self.is_empty_space(q, r))
            .collect()
    }

    /// True iff at least one on-board space is empty.
    pub fn has_legal_moves(&self) -> bool {
        let width = self.config().width();
        (0..width).any(|r| (0..width).any(|q| self.is_empty_space(q, r)))
    }

    /// Every legal move for `player`, in catalog order:
    /// singles of the first colour, singles of the second colour, then
    /// doubles over all ordered pairs of distinct empty spaces.
    ///
    /// Doubles `(a, c1) + (b, c2)` and `(b, c1) + (a, c2)` are both listed.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let (c1, c2) = Colour::pair(player);
        let empty = self.empty_spaces();
        let e = empty.len();
        let mut moves = Vec::with_capacity(2 * e + e * e.saturating_sub(1));

        for colour in [c1, c2] {
            moves.extend(
                empty
                    .iter()
                    .map(|&(q, r)| Move::Single(Placement::new(q, r, colour))),
            );
        }

        for (i, &(qa, ra)) in empty.iter().enumerate() {
            for (j, &(qb, rb)) in empty.iter().enumerate() {
                if i != j {
                    moves.push(Move::Double(
                        Placement::new(qa, ra, c1),
                        Placement::new(qb, rb, c2),
                    ));
                }
            }
        }

        moves
    }

    /// True iff every target is an empty space and, for a double, the two
    /// stones go to different spaces and are the two different colours of one
    /// player.
    pub fn is_legal_move(&self, mv: &Move) -> bool {
        match mv {
            Move::Single(p) => self.is_empty_space(p.q, p.r),
            Move::Double(a, b) => {
                a.colour != b.colour
                    && a.colour.owner() == b.colour.owner()
                    && (a.q, a.r) != (b.q, b.r)
                    && self.is_empty_space(a.q, a.r)
                    && self.is_empty_space(b.q, b.r)
            }
        }
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Copy-on-write move application: `self` is left untouched.
    ///
    /// # Errors
    /// [`BloomsError::IllegalMove`] when [`Position::is_legal_move`] is false.
    pub fn apply_move(&self, mv: &Move) -> Result<Position, BloomsError> {
        let mut next = self.clone();
        next.apply_move_in_place(mv)?;
        Ok(next)
    }

    /// Place the move's stones, then resolve blooms.
    ///
    /// Returns the stones captured by each player on this move.
    /// On error the position is unchanged.
    pub fn apply_move_in_place(&mut self, mv: &Move) -> Result<[u32; 2], BloomsError> {
        if !self.is_legal_move(mv) {
            return Err(BloomsError::IllegalMove { mv: *mv });
        }
        for p in mv.placements() {
            self.cells_mut()[[p.r, p.q]] = p.colour.value();
        }
        Ok(self.resolve_blooms())
    }

    // ========================================================================
    // BLOOMS
    // ========================================================================

    /// The bloom containing the stone at `(q, r)`, or `None` for an empty space.
    pub fn find_bloom(&self, q: usize, r: usize) -> Option<Bloom> {
        let colour = self.colour_at(q, r)?;
        let mut visited = Array2::from_elem(self.cells().raw_dim(), false);
        Some(self.flood_fill(q, r, colour, &mut visited))
    }

    /// Partition every stone on the board into blooms, scanning rows then
    /// columns for seeds.
    pub fn blooms(&self) -> Vec<Bloom> {
        let width = self.config().width();
        let mut visited = Array2::from_elem(self.cells().raw_dim(), false);
        let mut blooms = Vec::new();

        for r in 0..width {
            for q in 0..width {
                if visited[[r, q]] {
                    continue;
                }
                if let Some(colour) = self.colour_at(q, r) {
                    blooms.push(self.flood_fill(q, r, colour, &mut visited));
                }
            }
        }

        blooms
    }

    /// True iff no cell of `cells` has an empty neighbour.
    pub fn is_fenced(&self, cells: &[(usize, usize)]) -> bool {
        let size = self.config().size();
        cells.iter().all(|&(q, r)| {
            hex::neighbours(size, q, r)
                .iter()
                .all(|&(nq, nr)| !self.is_empty_space(nq, nr))
        })
    }

    /// Explicit-stack flood fill over same-colour neighbours.
    fn flood_fill(
        &self,
        q: usize,
        r: usize,
        colour: Colour,
        visited: &mut Array2<bool>,
    ) -> Bloom {
        let size = self.config().size();
        let mut cells = Vec::new();
        let mut stack = vec![(q, r)];
        visited[[r, q]] = true;

        while let Some((cq, cr)) = stack.pop() {
            cells.push((cq, cr));
            for (nq, nr) in hex::neighbours(size, cq, cr) {
                if !visited[[nr, nq]] && self.colour_at(nq, nr) == Some(colour) {
                    visited[[nr, nq]] = true;
                    stack.push((nq, nr));
                }
            }
        }

        Bloom { colour, cells }
    }

    /// Remove every fenced bloom and credit its size to the opponent of the
    /// bloom's owner. Returns the captures credited per player.
    pub(crate) fn resolve_blooms(&mut self) -> [u32; 2] {
        let fenced: Vec<Bloom> = self
            .blooms()
            .into_iter()
            .filter(|bloom| self.is_fenced(&bloom.cells))
            .collect();

        let mut gained = [0u32; 2];
        for bloom in fenced {
            let beneficiary = bloom.colour.owner().opponent();
            for &(q, r) in &bloom.cells {
                self.cells_mut()[[r, q]] = 0;
            }
            let size = bloom.len() as u32;
            self.add_captures(beneficiary, size);
            gained[beneficiary.index()] += size;
        }
        gained
    }

    // ========================================================================
    // GAME END
    // ========================================================================

    /// True iff `player` has reached the capture target.
    #[inline]
    pub fn is_win(&self, player: Player) -> bool {
        self.captures_of(player) >= self.config().score_target()
    }

    /// Result from `player`'s point of view.
    ///
    /// Both players reaching the target on the same move is a draw, as is a
    /// full board with no winner.
    pub fn outcome(&self, player: Player) -> GameOutcome {
        match (self.is_win(player), self.is_win(player.opponent())) {
            (true, false) => GameOutcome::Win,
            (false, true) => GameOutcome::Loss,
            (true, true) => GameOutcome::Draw,
            (false, false) if self.has_legal_moves() => GameOutcome::Ongoing,
            (false, false) => GameOutcome::Draw,
        }
    }
}

#[cfg(test)]
#[path = "logic_tests.rs"]
mod logic_tests;
