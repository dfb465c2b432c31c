//! # Blooms Board State
//!
//! Configuration, stone colours, moves and the [`Position`] value type.
//! Game rules operating on a position live in `logic.rs`.
//!
//! ## State Representation
//!
//! - **cells**: `Array2<u8>` of shape `(2n-1, 2n-1)`, indexed `[r, q]`
//!   - `0`: empty (or off-board)
//!   - `1..=4`: stone colour
//! - **captures**: `[u32; 2]`, captured-stone count per player

use std::fmt;

use ndarray::{Array2, Array3};
use thiserror::Error;

use super::hex;
use crate::game_trait::Player;

/// Smallest supported base size.
pub const MIN_SIZE: usize = 3;
/// Largest supported base size.
pub const MAX_SIZE: usize = 6;

/// Errors raised by the Blooms rules and adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BloomsError {
    #[error("unsupported board size {size}: expected 3..=6")]
    UnsupportedSize { size: usize },
    #[error("score target must be at least 1 (got {target})")]
    InvalidScoreTarget { target: u32 },
    #[error("({q}, {r}) is not a space on the board")]
    InvalidSpace { q: usize, r: usize },
    #[error("space ({q}, {r}) is already occupied")]
    Occupied { q: usize, r: usize },
    #[error("space ({q}, {r}) holds no stone")]
    NotOccupied { q: usize, r: usize },
    #[error("illegal move {mv}")]
    IllegalMove { mv: Move },
    #[error("move {mv} uses colours that do not belong to {player:?}")]
    WrongPlayer { mv: Move, player: Player },
    #[error("action {action} is outside the action space of size {action_size}")]
    UnknownAction { action: usize, action_size: usize },
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Board size and win threshold. Validated on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BloomsConfig {
    size: usize,
    score_target: u32,
}

impl BloomsConfig {
    /// # Errors
    /// [`BloomsError::UnsupportedSize`] outside `3..=6`,
    /// [`BloomsError::InvalidScoreTarget`] for a zero target.
    pub fn new(size: usize, score_target: u32) -> Result<Self, BloomsError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BloomsError::UnsupportedSize { size });
        }
        if score_target == 0 {
            return Err(BloomsError::InvalidScoreTarget {
                target: score_target,
            });
        }
        Ok(Self { size, score_target })
    }

    /// Config with the recommended capture target for `size`
    /// (base 3: 10, base 4: 15, base 5: 20, base 6: 25).
    pub fn recommended(size: usize) -> Result<Self, BloomsError> {
        let target = match size {
            3 => 10,
            4 => 15,
            5 => 20,
            6 => 25,
            _ => return Err(BloomsError::UnsupportedSize { size }),
        };
        Self::new(size, target)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn score_target(&self) -> u32 {
        self.score_target
    }

    /// Side of the square grid: `2n - 1`.
    #[inline]
    pub fn width(&self) -> usize {
        hex::grid_width(self.size)
    }

    /// Number of playable cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        hex::cell_count(self.size)
    }

    /// Action-space size `2E + E(E-1)` with `E` = [`Self::cell_count`].
    pub fn action_size(&self) -> usize {
        let e = self.cell_count();
        2 * e + e * (e - 1)
    }
}

impl Default for BloomsConfig {
    fn default() -> Self {
        Self {
            size: 4,
            score_target: 15,
        }
    }
}

// ============================================================================
// COLOURS AND MOVES
// ============================================================================

/// Stone colour. Each player owns two distinguishable colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Colour {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Colour {
    pub const ALL: [Colour; 4] = [Colour::One, Colour::Two, Colour::Three, Colour::Four];

    /// Decode a cell value; `None` for empty (0) or garbage.
    pub fn from_cell(value: u8) -> Option<Colour> {
        match value {
            1 => Some(Colour::One),
            2 => Some(Colour::Two),
            3 => Some(Colour::Three),
            4 => Some(Colour::Four),
            _ => None,
        }
    }

    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Feature-plane index in [`Position::to_planes`].
    #[inline]
    pub fn plane(self) -> usize {
        self as usize - 1
    }

    pub fn owner(self) -> Player {
        match self {
            Colour::One | Colour::Two => Player::One,
            Colour::Three | Colour::Four => Player::Two,
        }
    }

    /// Same-rank colour of the other player (1↔3, 2↔4).
    pub fn counterpart(self) -> Colour {
        match self {
            Colour::One => Colour::Three,
            Colour::Two => Colour::Four,
            Colour::Three => Colour::One,
            Colour::Four => Colour::Two,
        }
    }

    /// The two colours owned by `player`, in catalog order.
    pub fn pair(player: Player) -> (Colour, Colour) {
        match player {
            Player::One => (Colour::One, Colour::Two),
            Player::Two => (Colour::Three, Colour::Four),
        }
    }
}

/// A single stone placed at `(q, r)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub q: usize,
    pub r: usize,
    pub colour: Colour,
}

impl Placement {
    pub fn new(q: usize, r: usize, colour: Colour) -> Self {
        Self { q, r, colour }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})#{}", self.q, self.r, self.colour.value())
    }
}

/// One turn: one or two stones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Single(Placement),
    Double(Placement, Placement),
}

impl Move {
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        let (first, second) = match self {
            Move::Single(p) => (p, None),
            Move::Double(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }

    /// True iff every stone in the move belongs to `player`.
    pub fn belongs_to(&self, player: Player) -> bool {
        self.placements().all(|p| p.colour.owner() == player)
    }

    /// The same move with every coordinate passed through `f`.
    pub fn map_cells<F>(&self, mut f: F) -> Option<Move>
    where
        F: FnMut(usize, usize) -> Option<(usize, usize)>,
    {
        let mut remap = |p: &Placement| f(p.q, p.r).map(|(q, r)| Placement::new(q, r, p.colour));
        match self {
            Move::Single(p) => Some(Move::Single(remap(p)?)),
            Move::Double(a, b) => Some(Move::Double(remap(a)?, remap(b)?)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Single(p) => write!(f, "{p}"),
            Move::Double(a, b) => write!(f, "{a}+{b}"),
        }
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Owned board snapshot. Cloning yields a fully independent value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    config: BloomsConfig,
    cells: Array2<u8>,
    captures: [u32; 2],
}

impl Position {
    /// Empty board with zero captures.
    pub fn new(config: BloomsConfig) -> Self {
        let width = config.width();
        Self {
            config,
            cells: Array2::zeros((width, width)),
            captures: [0, 0],
        }
    }

    #[inline]
    pub fn config(&self) -> &BloomsConfig {
        &self.config
    }

    /// Raw grid, indexed `[r, q]`.
    #[inline]
    pub fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    #[inline]
    pub fn captures(&self) -> [u32; 2] {
        self.captures
    }

    #[inline]
    pub fn captures_of(&self, player: Player) -> u32 {
        self.captures[player.index()]
    }

    #[inline]
    pub fn is_valid_space(&self, q: usize, r: usize) -> bool {
        hex::is_valid_space(self.config.size(), q, r)
    }

    /// True for an on-board cell without a stone. Off-board cells are never empty.
    #[inline]
    pub fn is_empty_space(&self, q: usize, r: usize) -> bool {
        self.is_valid_space(q, r) && self.cells[[r, q]] == 0
    }

    /// Colour at `(q, r)`, or `None` if empty or off-board.
    pub fn colour_at(&self, q: usize, r: usize) -> Option<Colour> {
        if !self.is_valid_space(q, r) {
            return None;
        }
        Colour::from_cell(self.cells[[r, q]])
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Put a stone on an empty space without resolving blooms.
    ///
    /// Intended for building positions; moves go through `apply_move`.
    pub fn place_stone(&mut self, q: usize, r: usize, colour: Colour) -> Result<(), BloomsError> {
        if !self.is_valid_space(q, r) {
            return Err(BloomsError::InvalidSpace { q, r });
        }
        if self.cells[[r, q]] != 0 {
            return Err(BloomsError::Occupied { q, r });
        }
        self.cells[[r, q]] = colour.value();
        Ok(())
    }

    /// Take a stone off the board without touching capture counters.
    pub fn remove_stone(&mut self, q: usize, r: usize) -> Result<Colour, BloomsError> {
        if !self.is_valid_space(q, r) {
            return Err(BloomsError::InvalidSpace { q, r });
        }
        let colour =
            Colour::from_cell(self.cells[[r, q]]).ok_or(BloomsError::NotOccupied { q, r })?;
        self.cells[[r, q]] = 0;
        Ok(colour)
    }

    /// Overwrite capture counters (position setup).
    pub fn set_captures(&mut self, captures: [u32; 2]) {
        self.captures = captures;
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Array2<u8> {
        &mut self.cells
    }

    pub(crate) fn add_captures(&mut self, player: Player, count: u32) {
        self.captures[player.index()] += count;
    }

    /// One-hot planes `(4, 2n-1, 2n-1)`, plane `c - 1` marking colour `c`.
    ///
    /// This is the spatial input handed to a network evaluator.
    pub fn to_planes(&self) -> Array3<f32> {
        let width = self.config.width();
        let mut planes = Array3::zeros((Colour::ALL.len(), width, width));
        for ((r, q), &cell) in self.cells.indexed_iter() {
            if let Some(colour) = Colour::from_cell(cell) {
                planes[[colour.plane(), r, q]] = 1.0;
            }
        }
        planes
    }
}
