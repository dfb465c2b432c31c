//! # Blooms Game Implementation
//!
//! Blooms is a two-player placement game on a hexagonal board:
//! - Each player owns two stone colours
//! - A turn places one stone, or one stone of each of the mover's colours
//! - Connected same-colour groups ("blooms") with no empty neighbour are
//!   removed and credited to the player who does not own them
//! - The first player to capture `score_target` stones wins
//!
//! Submodules:
//! - `hex`: axial/cube coordinates and the 12 board symmetries
//! - `board`: configuration, colours, moves, and the `Position` value
//! - `logic`: move generation, legality, move application, bloom resolution
//! - `catalog`: action id ↔ move bijection per player
//! - `canonicalization`: perspective swap and symmetry transforms
//! - `zobrist`: position fingerprints for the node table
//! - `heuristic`: evaluator and scoring function without a trained model

pub mod board;
pub mod canonicalization;
pub mod catalog;
pub mod heuristic;
pub mod hex;
pub mod logic;
mod zobrist;


pub use board::{BloomsConfig, BloomsError, Colour, Move, Placement, Position};
pub use catalog::MoveCatalog;
pub use heuristic::{capture_gain, CaptureBalanceEvaluator};
pub use logic::Bloom;

use std::sync::Arc;

use crate::game_trait::{Game, GameOutcome, Player};
use zobrist::ZobristHasher;

/// Blooms adapter for the search engine.
///
/// Holds one immutable move catalog per player. Action ids are only
/// meaningful together with the player they were produced for.
#[derive(Clone, Debug)]
pub struct BloomsGame {
    config: BloomsConfig,
    catalogs: [Arc<MoveCatalog>; 2],
    zobrist: ZobristHasher,
}

impl BloomsGame {
    /// Build the catalogs and hash tables for `config`.
    ///
    /// # Arguments
    /// * `config` - Board size and capture target
    pub fn new(config: BloomsConfig) -> Self {
        let catalogs = [
            Arc::new(MoveCatalog::build(config, Player::One)),
            Arc::new(MoveCatalog::build(config, Player::Two)),
        ];
        Self {
            config,
            catalogs,
            zobrist: ZobristHasher::new(&config, zobrist::DEFAULT_SEED),
        }
    }

    /// Game on a base-`size` board with the recommended capture target.
    pub fn with_size(size: usize) -> Result<Self, BloomsError> {
        Ok(Self::new(BloomsConfig::recommended(size)?))
    }

    #[inline]
    pub fn config(&self) -> &BloomsConfig {
        &self.config
    }

    /// Move catalog of `player`.
    #[inline]
    pub fn catalog(&self, player: Player) -> &Arc<MoveCatalog> {
        &self.catalogs[player.index()]
    }

    /// Decode `action` for `player`.
    ///
    /// # Errors
    /// [`BloomsError::UnknownAction`] for ids outside the action space.
    pub fn move_for_action(&self, player: Player, action: usize) -> Result<Move, BloomsError> {
        self.catalog(player)
            .move_at(action)
            .copied()
            .ok_or(BloomsError::UnknownAction {
                action,
                action_size: self.config.action_size(),
            })
    }

    /// Encode `mv` as `player`'s action id.
    ///
    /// # Errors
    /// [`BloomsError::WrongPlayer`] when the move uses the other player's
    /// colours, [`BloomsError::IllegalMove`] when it is not in the catalog
    /// (off-board target, duplicate target, repeated colour).
    pub fn action_for_move(&self, player: Player, mv: &Move) -> Result<usize, BloomsError> {
        if !mv.belongs_to(player) {
            return Err(BloomsError::WrongPlayer { mv: *mv, player });
        }
        self.catalog(player)
            .id_of(mv)
            .ok_or(BloomsError::IllegalMove { mv: *mv })
    }

    /// Apply a structured move for `player`, checking colour ownership.
    pub fn apply_move(
        &self,
        position: &Position,
        player: Player,
        mv: &Move,
    ) -> Result<Position, BloomsError> {
        if !mv.belongs_to(player) {
            return Err(BloomsError::WrongPlayer { mv: *mv, player });
        }
        position.apply_move(mv)
    }
}

impl Default for BloomsGame {
    fn default() -> Self {
        Self::new(BloomsConfig::default())
    }
}

impl Game for BloomsGame {
    type Position = Position;
    type Error = BloomsError;

    fn initial_position(&self) -> Position {
        Position::new(self.config)
    }

    fn board_shape(&self) -> (usize, usize) {
        let width = self.config.width();
        (width, width)
    }

    fn action_size(&self) -> usize {
        self.config.action_size()
    }

    fn next_state(
        &self,
        position: &Position,
        player: Player,
        action: usize,
    ) -> Result<(Position, Player), BloomsError> {
        let mv = self.move_for_action(player, action)?;
        let next = position.apply_move(&mv)?;
        Ok((next, player.opponent()))
    }

    fn valid_actions(&self, position: &Position, player: Player) -> Vec<bool> {
        self.catalog(player)
            .iter()
            .map(|(_, mv)| position.is_legal_move(mv))
            .collect()
    }

    fn outcome(&self, position: &Position, player: Player) -> GameOutcome {
        position.outcome(player)
    }

    fn canonical_form(&self, position: &Position, player: Player) -> Position {
        canonicalization::canonical_form(position, player)
    }

    fn fingerprint(&self, position: &Position) -> u64 {
        self.zobrist.hash(position)
    }

    fn symmetries(&self, position: &Position, policy: &[f32]) -> Vec<(Position, Vec<f32>)> {
        canonicalization::symmetries(position, policy, self.catalog(Player::One))
    }

    fn name(&self) -> &str {
        "Blooms"
    }
}
