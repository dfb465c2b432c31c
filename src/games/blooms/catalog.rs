//! # Move Catalog
//!
//! Bijection between action ids and [`Move`]s for one player on one board
//! configuration.
//!
//! The catalog is the move list of the *empty* board for that player, so its
//! length equals [`BloomsConfig::action_size`] and ids are stable across every
//! position of the game. On a non-empty board the legal subset is obtained by
//! masking, never by renumbering.

use std::collections::HashMap;

use super::board::{BloomsConfig, Move, Position};
use crate::game_trait::Player;

#[derive(Clone, Debug)]
pub struct MoveCatalog {
    player: Player,
    moves: Vec<Move>,
    index: HashMap<Move, usize>,
}

impl MoveCatalog {
    /// Enumerate `player`'s moves on the empty board of `config`.
    pub fn build(config: BloomsConfig, player: Player) -> Self {
        let moves = Position::new(config).legal_moves(player);
        let index = moves
            .iter()
            .enumerate()
            .map(|(id, mv)| (*mv, id))
            .collect();
        Self {
            player,
            moves,
            index,
        }
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Move with id `action`, if in range.
    #[inline]
    pub fn move_at(&self, action: usize) -> Option<&Move> {
        self.moves.get(action)
    }

    /// Id of `mv`, if it is one of this player's moves on this board.
    #[inline]
    pub fn id_of(&self, mv: &Move) -> Option<usize> {
        self.index.get(mv).copied()
    }

    /// `(id, move)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Move)> {
        self.moves.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blooms::board::{Colour, Placement};

    #[test]
    fn test_catalog_size() {
        let config = BloomsConfig::recommended(4).unwrap();
        let catalog = MoveCatalog::build(config, Player::One);
        assert_eq!(catalog.len(), 1406);
        assert_eq!(catalog.len(), config.action_size());
    }

    #[test]
    fn test_catalog_is_bijective() {
        let config = BloomsConfig::recommended(3).unwrap();
        let catalog = MoveCatalog::build(config, Player::Two);
        for (id, mv) in catalog.iter() {
            assert_eq!(catalog.id_of(mv), Some(id));
        }
        assert!(catalog.move_at(catalog.len()).is_none());
    }

    #[test]
    fn test_catalog_rejects_other_players_move() {
        let config = BloomsConfig::recommended(3).unwrap();
        let catalog = MoveCatalog::build(config, Player::One);
        let theirs = Move::Single(Placement::new(2, 2, Colour::Three));
        assert_eq!(catalog.id_of(&theirs), None);
        let ours = Move::Single(Placement::new(2, 2, Colour::One));
        assert!(catalog.id_of(&ours).is_some());
    }
}
