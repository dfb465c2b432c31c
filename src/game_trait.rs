//! # Game Trait
//!
//! Contract that a two-player, zero-sum game must satisfy to be searched by
//! [`crate::mcts::Mcts`] and driven by [`crate::arena::Arena`].
//!
//! The search engine treats actions as dense integer ids in `0..action_size()`.
//! It never inspects what an id means; decoding, legality and state
//! transitions are delegated to the game.
//!
//! ## Design Principles
//!
//! - **Fixed action space**: every position of one configuration shares the same
//!   action-id space, so evaluator outputs and visit vectors have a fixed width
//! - **Value semantics**: `next_state` returns a fresh position; earlier
//!   positions held by the search or by a game log are never invalidated
//! - **Canonical perspective**: the search only ever sees positions in canonical
//!   form, in which the side to move is [`Player::One`]

use std::fmt::Debug;

/// Small nonzero value reported for a finished game with no winner.
///
/// Distinguishable from `0.0` (game still running) and from `±1.0`.
pub const DRAW_VALUE: f32 = 1e-4;

/// One of the two sides of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    /// Moves first; the canonical side.
    One,
    /// Moves second.
    Two,
}

impl Player {
    /// Both players, in turn order.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Slot of this player in per-player arrays (capture counters, catalogs).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Result of a position from one player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Win,
    Loss,
    Draw,
}

impl GameOutcome {
    /// Scalar encoding used by the search: `0`, `1`, `-1`, or [`DRAW_VALUE`].
    pub fn value(self) -> f32 {
        match self {
            GameOutcome::Ongoing => 0.0,
            GameOutcome::Win => 1.0,
            GameOutcome::Loss => -1.0,
            GameOutcome::Draw => DRAW_VALUE,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::Ongoing
    }

    /// The same result seen by the other player.
    pub fn flipped(self) -> GameOutcome {
        match self {
            GameOutcome::Win => GameOutcome::Loss,
            GameOutcome::Loss => GameOutcome::Win,
            other => other,
        }
    }
}

/// Core trait that all searchable games implement.
///
/// ## Example Implementation
///
/// ```rust,ignore
/// impl Game for MyGame {
///     type Position = MyPosition;
///     type Error = MyError;
///
///     fn action_size(&self) -> usize { self.catalog.len() }
///
///     fn next_state(&self, position: &MyPosition, player: Player, action: usize)
///         -> Result<(MyPosition, Player), MyError>
///     {
///         let mv = self.decode(player, action)?;
///         Ok((position.apply(&mv)?, player.opponent()))
///     }
///     // ...
/// }
/// ```
pub trait Game: Send + Sync + 'static {
    /// Immutable snapshot of a game position.
    type Position: Clone + Debug + Send + Sync;

    /// Error raised when a caller asks for an illegal transition.
    type Error: std::error::Error + Send + Sync + 'static;

    // ========================================================================
    // SHAPE
    // ========================================================================

    /// Starting position of a new game.
    fn initial_position(&self) -> Self::Position;

    /// `(rows, columns)` of the board grid.
    fn board_shape(&self) -> (usize, usize);

    /// Number of action ids. Constant for one game configuration.
    fn action_size(&self) -> usize;

    // ========================================================================
    // RULES
    // ========================================================================

    /// Apply `action` for `player` and return the resulting position together
    /// with the player to move next.
    ///
    /// # Errors
    /// Rejects ids outside the action space and actions that are not legal in
    /// `position`. Never silently ignores an action.
    fn next_state(
        &self,
        position: &Self::Position,
        player: Player,
        action: usize,
    ) -> Result<(Self::Position, Player), Self::Error>;

    /// Bit vector of length [`Game::action_size`]; `true` marks a legal action.
    ///
    /// Must contain at least one `true` entry while the game is ongoing.
    fn valid_actions(&self, position: &Self::Position, player: Player) -> Vec<bool>;

    /// Result of `position` from `player`'s point of view.
    fn outcome(&self, position: &Self::Position, player: Player) -> GameOutcome;

    // ========================================================================
    // REPRESENTATION
    // ========================================================================

    /// Relabel `position` so that `player` appears as [`Player::One`].
    fn canonical_form(&self, position: &Self::Position, player: Player) -> Self::Position;

    /// Hashable key for search-node lookup.
    ///
    /// Must be a pure function of the position contents. Symmetric positions
    /// may hash differently.
    fn fingerprint(&self, position: &Self::Position) -> u64;

    /// Equivalent `(position, policy)` pairs under the board's symmetry group.
    ///
    /// Used for training-data augmentation only; the search never calls it.
    fn symmetries(
        &self,
        position: &Self::Position,
        policy: &[f32],
    ) -> Vec<(Self::Position, Vec<f32>)>;

    /// Human-readable game name (for logging).
    fn name(&self) -> &str;
}
