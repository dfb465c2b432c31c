//! Hand-written evaluation for Blooms: useful as a search baseline and for
//! playing without a trained model.

use super::board::Position;
use super::BloomsGame;
use crate::evaluator::{Evaluation, Evaluator, EvaluatorError};
use crate::game_trait::{Game, Player};

/// Uniform priors and a value from the capture difference.
///
/// The value is `tanh((own - opponent) / score_target)` for the canonical
/// side ([`Player::One`]), so it stays inside `(-1, 1)`.
#[derive(Clone, Debug)]
pub struct CaptureBalanceEvaluator {
    action_size: usize,
}

impl CaptureBalanceEvaluator {
    pub fn new(game: &BloomsGame) -> Self {
        Self {
            action_size: game.action_size(),
        }
    }
}

impl Evaluator<Position> for CaptureBalanceEvaluator {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        let own = position.captures_of(Player::One) as f32;
        let opp = position.captures_of(Player::Two) as f32;
        let target = position.config().score_target() as f32;
        let value = ((own - opp) / target).tanh();
        Ok(Evaluation::new(vec![1.0; self.action_size], value))
    }
}

/// Net captures `player` earns by playing `action`: stones credited to
/// `player` minus stones credited to the opponent on that move.
///
/// Illegal or unknown actions score `f32::NEG_INFINITY`.
pub fn capture_gain(game: &BloomsGame, position: &Position, player: Player, action: usize) -> f32 {
    let Ok(mv) = game.move_for_action(player, action) else {
        return f32::NEG_INFINITY;
    };
    let mut next = position.clone();
    match next.apply_move_in_place(&mv) {
        Ok(gained) => {
            gained[player.index()] as f32 - gained[player.opponent().index()] as f32
        }
        Err(_) => f32::NEG_INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::blooms::board::{BloomsConfig, Colour, Move, Placement};

    #[test]
    fn test_capture_balance_value() {
        let game = BloomsGame::new(BloomsConfig::new(3, 10).unwrap());
        let eval = CaptureBalanceEvaluator::new(&game);

        let mut pos = game.initial_position();
        let even = eval.evaluate(&pos).unwrap();
        assert_eq!(even.value, 0.0);
        assert_eq!(even.priors.len(), game.action_size());

        pos.set_captures([5, 0]);
        let ahead = eval.evaluate(&pos).unwrap();
        assert!((ahead.value - 0.5f32.tanh()).abs() < 1e-6);

        pos.set_captures([0, 5]);
        assert!(eval.evaluate(&pos).unwrap().value < 0.0);
    }

    #[test]
    fn test_capture_gain_scores_capture() {
        let game = BloomsGame::with_size(3).unwrap();
        let mut pos = game.initial_position();
        pos.place_stone(4, 0, Colour::Three).unwrap();
        pos.place_stone(3, 0, Colour::One).unwrap();
        pos.place_stone(3, 1, Colour::One).unwrap();

        let capture = Move::Single(Placement::new(4, 1, Colour::Two));
        let action = game.action_for_move(Player::One, &capture).unwrap();
        assert_eq!(capture_gain(&game, &pos, Player::One, action), 1.0);

        let quiet = Move::Single(Placement::new(2, 2, Colour::One));
        let action = game.action_for_move(Player::One, &quiet).unwrap();
        assert_eq!(capture_gain(&game, &pos, Player::One, action), 0.0);
    }

    #[test]
    fn test_capture_gain_rejects_illegal() {
        let game = BloomsGame::with_size(3).unwrap();
        let mut pos = game.initial_position();
        pos.place_stone(2, 2, Colour::Three).unwrap();
        let mv = Move::Single(Placement::new(2, 2, Colour::One));
        let action = game.action_for_move(Player::One, &mv).unwrap();
        assert_eq!(capture_gain(&game, &pos, Player::One, action), f32::NEG_INFINITY);
        assert_eq!(
            capture_gain(&game, &pos, Player::One, game.action_size()),
            f32::NEG_INFINITY
        );
    }
}
