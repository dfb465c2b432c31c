//! # Arena
//!
//! Plays complete games between two [`Policy`] objects over any [`Game`] and
//! tallies the results.
//!
//! Policies always see the canonical position (side to move is
//! [`Player::One`]) and answer with an action id in the canonical side's
//! numbering. The arena checks every chosen id against the valid-action mask
//! before applying it for the real side to move; an invalid choice ends the
//! match with [`ArenaError::IllegalAction`].
//!
//! ## Baseline policies
//!
//! - [`RandomPolicy`]: uniform over valid actions, driven by an injected RNG
//! - [`GreedyPolicy`]: highest score from an injected scoring function
//! - [`MctsPolicy`]: most visited root action of a fresh search

use std::error::Error;
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::evaluator::Evaluator;
use crate::game_trait::{Game, GameOutcome, Player};
use crate::mcts::{Mcts, SearchError};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("{policy} chose action {action}, which is not valid in the current position")]
    IllegalAction { policy: String, action: usize },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("game rejected a validated action: {0}")]
    Game(#[source] Box<dyn Error + Send + Sync + 'static>),
}

/// A player: maps a canonical position to an action id.
pub trait Policy<G: Game> {
    fn choose_action(&mut self, game: &G, position: &G::Position) -> Result<usize, ArenaError>;

    /// Label used in logs and errors.
    fn name(&self) -> &str;
}

/// Valid action ids of the canonical side, ascending.
fn valid_ids<G: Game>(game: &G, position: &G::Position) -> Vec<usize> {
    game.valid_actions(position, Player::One)
        .iter()
        .enumerate()
        .filter_map(|(action, &ok)| ok.then_some(action))
        .collect()
}

// ============================================================================
// POLICIES
// ============================================================================

/// Uniformly random valid action. Reproducible for a seeded `rng`.
pub struct RandomPolicy<R> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: Game, R: Rng> Policy<G> for RandomPolicy<R> {
    fn choose_action(&mut self, game: &G, position: &G::Position) -> Result<usize, ArenaError> {
        let valid = valid_ids(game, position);
        if valid.is_empty() {
            return Err(SearchError::NoValidActions.into());
        }
        Ok(valid[self.rng.random_range(0..valid.len())])
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Highest-scoring valid action under `score(game, position, player, action)`;
/// ties go to the lowest id.
pub struct GreedyPolicy<F> {
    score: F,
}

impl<F> GreedyPolicy<F> {
    pub fn new(score: F) -> Self {
        Self { score }
    }
}

impl<G, F> Policy<G> for GreedyPolicy<F>
where
    G: Game,
    F: FnMut(&G, &G::Position, Player, usize) -> f32,
{
    fn choose_action(&mut self, game: &G, position: &G::Position) -> Result<usize, ArenaError> {
        let mut best: Option<(usize, f32)> = None;
        for action in valid_ids(game, position) {
            let score = (self.score)(game, position, Player::One, action);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
            .ok_or_else(|| SearchError::NoValidActions.into())
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

/// Plays the most visited action of a temperature-0 search.
pub struct MctsPolicy<G: Game, E> {
    mcts: Mcts<G, E>,
}

impl<G, E> MctsPolicy<G, E>
where
    G: Game,
    E: Evaluator<G::Position>,
{
    pub fn new(mcts: Mcts<G, E>) -> Self {
        Self { mcts }
    }

    pub fn mcts(&self) -> &Mcts<G, E> {
        &self.mcts
    }
}

impl<G, E> Policy<G> for MctsPolicy<G, E>
where
    G: Game,
    E: Evaluator<G::Position>,
{
    fn choose_action(&mut self, _game: &G, position: &G::Position) -> Result<usize, ArenaError> {
        let probs = self.mcts.get_action_probabilities(position, 0.0)?;
        probs
            .iter()
            .position(|&p| p > 0.0)
            .ok_or_else(|| SearchError::NoValidActions.into())
    }

    fn name(&self) -> &str {
        "mcts"
    }
}

// ============================================================================
// ARENA
// ============================================================================

/// One finished game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    /// Result for the policy that moved first.
    pub outcome: GameOutcome,
    /// Canonical action ids in play order.
    pub actions: Vec<usize>,
}

/// Win/loss/draw tally of a match, from the first policy's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaResult {
    pub one_won: usize,
    pub two_won: usize,
    pub draws: usize,
}

impl ArenaResult {
    pub fn total(&self) -> usize {
        self.one_won + self.two_won + self.draws
    }

    /// Count one finished game, `outcome` seen by the first policy.
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win => self.one_won += 1,
            GameOutcome::Loss => self.two_won += 1,
            _ => self.draws += 1,
        }
    }
}

pub struct Arena<G> {
    game: Arc<G>,
}

impl<G: Game> Arena<G> {
    pub fn new(game: Arc<G>) -> Self {
        Self { game }
    }

    /// Play one game, `first` moving as [`Player::One`].
    pub fn play_game(
        &self,
        first: &mut dyn Policy<G>,
        second: &mut dyn Policy<G>,
    ) -> Result<GameRecord, ArenaError> {
        let game = self.game.as_ref();
        let mut position = game.initial_position();
        let mut player = Player::One;
        let mut actions = Vec::new();

        loop {
            let outcome = game.outcome(&position, Player::One);
            if outcome.is_terminal() {
                debug!("{} finished after {} moves: {:?}", game.name(), actions.len(), outcome);
                return Ok(GameRecord { outcome, actions });
            }

            let policy: &mut dyn Policy<G> = match player {
                Player::One => &mut *first,
                Player::Two => &mut *second,
            };
            let canonical = game.canonical_form(&position, player);
            let action = policy.choose_action(game, &canonical)?;

            let valid = game.valid_actions(&canonical, Player::One);
            if !valid.get(action).copied().unwrap_or(false) {
                log::error!(
                    "{} chose invalid action {} at move {}",
                    policy.name(),
                    action,
                    actions.len()
                );
                return Err(ArenaError::IllegalAction {
                    policy: policy.name().to_string(),
                    action,
                });
            }

            let (next, to_move) = game
                .next_state(&position, player, action)
                .map_err(|e| ArenaError::Game(Box::new(e)))?;
            actions.push(action);
            position = next;
            player = to_move;
        }
    }

    /// Play `num_games / 2` games with each policy moving first.
    pub fn play_games(
        &self,
        num_games: usize,
        one: &mut dyn Policy<G>,
        two: &mut dyn Policy<G>,
    ) -> Result<ArenaResult, ArenaError> {
        let half = num_games / 2;
        let mut result = ArenaResult::default();

        for i in 0..half {
            let record = self.play_game(one, two)?;
            result.record(record.outcome);
            info!("game {}/{}: {} first, {:?}", i + 1, 2 * half, one.name(), record.outcome);
        }

        for i in 0..half {
            let record = self.play_game(two, one)?;
            result.record(record.outcome.flipped());
            info!(
                "game {}/{}: {} first, {:?}",
                half + i + 1,
                2 * half,
                two.name(),
                record.outcome
            );
        }

        info!(
            "{} vs {}: {} - {} ({} draws)",
            one.name(),
            two.name(),
            result.one_won,
            result.two_won,
            result.draws
        );
        Ok(result)
    }
}
