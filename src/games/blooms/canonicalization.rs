//! # Canonicalization Module
//!
//! Perspective relabeling and symmetry transforms for Blooms positions.
//!
//! ## Canonical form
//!
//! The search always sees the side to move as [`Player::One`]. For
//! [`Player::Two`] the canonical form swaps every stone with its counterpart
//! colour (1↔3, 2↔4) and swaps the two capture counters. Applying it twice
//! is the identity.
//!
//! ## Symmetries
//!
//! The twelve elements of [`Symmetry::all`] relabel cells. A policy vector
//! follows its moves: the probability of action `a` lands on the id that the
//! [`Player::One`] catalog assigns to `a`'s move with transformed coordinates.
//! Each transform is a bijection on the catalog, so probability mass is
//! preserved.

use log::warn;

use super::board::{Colour, Move, Position};
use super::catalog::MoveCatalog;
use super::hex::Symmetry;
use crate::game_trait::Player;

// ============================================================================
// PERSPECTIVE
// ============================================================================

/// Relabel `position` so that `player` appears as [`Player::One`].
pub fn canonical_form(position: &Position, player: Player) -> Position {
    match player {
        Player::One => position.clone(),
        Player::Two => swap_sides(position),
    }
}

/// Exchange every stone with its counterpart colour and swap captures.
pub fn swap_sides(position: &Position) -> Position {
    let mut swapped = position.clone();
    swapped.cells_mut().mapv_inplace(|cell| {
        Colour::from_cell(cell)
            .map(|c| c.counterpart().value())
            .unwrap_or(cell)
    });
    let [one, two] = position.captures();
    swapped.set_captures([two, one]);
    swapped
}

// ============================================================================
// SYMMETRY TRANSFORMS
// ============================================================================

/// Image of `position` under `symmetry`. Captures are unchanged.
pub fn transform_position(position: &Position, symmetry: Symmetry) -> Position {
    let size = position.config().size();
    let mut image = Position::new(*position.config());
    image.set_captures(position.captures());

    for ((r, q), &cell) in position.cells().indexed_iter() {
        if cell == 0 {
            continue;
        }
        if let Some((tq, tr)) = symmetry.apply(size, q, r) {
            image.cells_mut()[[tr, tq]] = cell;
        }
    }
    image
}

/// Image of `mv` under `symmetry`; `None` if a placement is off the board.
pub fn transform_move(mv: &Move, size: usize, symmetry: Symmetry) -> Option<Move> {
    mv.map_cells(|q, r| symmetry.apply(size, q, r))
}

/// Remap a policy vector indexed by `catalog` ids through `symmetry`.
///
/// Zero entries are skipped. Entries past the end of the catalog are ignored.
pub fn transform_policy(
    policy: &[f32],
    catalog: &MoveCatalog,
    size: usize,
    symmetry: Symmetry,
) -> Vec<f32> {
    let mut image = vec![0.0; catalog.len()];
    for (action, &p) in policy.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let target = catalog
            .move_at(action)
            .and_then(|mv| transform_move(mv, size, symmetry))
            .and_then(|mv| catalog.id_of(&mv));
        match target {
            Some(id) => image[id] += p,
            None => warn!("action {action} has no image under {symmetry:?}; dropped"),
        }
    }
    image
}

/// All twelve `(position, policy)` images, identity first.
///
/// `catalog` must be the [`Player::One`] catalog: the policy of a canonical
/// position is indexed by the canonical side's move ids.
pub fn symmetries(
    position: &Position,
    policy: &[f32],
    catalog: &MoveCatalog,
) -> Vec<(Position, Vec<f32>)> {
    let size = position.config().size();
    Symmetry::all()
        .map(|sym| {
            (
                transform_position(position, sym),
                transform_policy(policy, catalog, size, sym),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "canonicalization_tests.rs"]
mod canonicalization_tests;
