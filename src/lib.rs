//! Blooms hex-board rules and a PUCT tree search driven by a pluggable
//! position evaluator.
//!
//! - [`game_trait`]: the contract a game implements to be searched
//! - [`mcts`]: the search engine, generic over game and [`evaluator::Evaluator`]
//! - [`games::blooms`]: the Blooms rules and its adapter [`BloomsGame`]
//! - [`arena`]: plays whole games between policies

// Generic search infrastructure
pub mod evaluator;     // Evaluator contract
pub mod game_trait;    // Game trait abstraction
pub mod mcts;          // PUCT search
#[cfg(feature = "metrics")]
pub mod metrics;       // Search counters
pub mod node;          // Per-position statistics
pub mod transposition; // Fingerprint → node table

pub mod arena;         // Game driver and baseline policies

#[cfg(test)]
mod transposition_tests;

// Game implementations
pub mod games;

pub use arena::{
    Arena, ArenaError, ArenaResult, GameRecord, GreedyPolicy, MctsPolicy, Policy, RandomPolicy,
};
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, UniformEvaluator};
pub use game_trait::{Game, GameOutcome, Player, DRAW_VALUE};
pub use games::blooms::{BloomsConfig, BloomsError, BloomsGame};
pub use mcts::{Mcts, MctsConfig, SearchError};
