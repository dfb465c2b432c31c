//! # Monte Carlo Tree Search (PUCT)
//!
//! Evaluator-guided tree search over any [`Game`]:
//! - Serial and parallel (rayon) search modes
//! - Node table keyed by position fingerprint
//! - PUCT child selection with lowest-id tie-breaking
//! - Virtual loss for parallel descents
//!
//! ## Architecture
//!
//! The engine delegates ALL game logic to the [`Game`] implementation and all
//! position judgement to the [`Evaluator`]. It only ever handles canonical
//! positions, in which the side to move is [`Player::One`], so every stored
//! value is from the mover's own perspective.
//!
//! ## Simulation
//!
//! 1. **Select**: from the root, follow the valid edge maximizing
//!    `Q(s,a) + c·P(s,a)·sqrt(ΣN(s,·)) / (1 + N(s,a))` until reaching a node
//!    that is unexpanded or terminal
//! 2. **Expand**: a terminal node yields its exact outcome; otherwise the
//!    evaluator is called once, priors are masked to valid actions and
//!    renormalized (uniform if the masked mass vanishes), and the evaluator's
//!    value is the leaf value
//! 3. **Backup**: walking the path back, each edge gets `N += 1`, `W += v`,
//!    with `v` negated at every ply
//!
//! The root is expanded before the first simulation, so after a search
//! `Σ N(root, ·)` equals the number of simulations.
//!
//! ## Thread Safety
//!
//! - **Per-node mutex**: selection, expansion and backup each lock one node
//!   at a time; the first descent to lock an unexpanded node expands it and
//!   later arrivals block, then see the expanded node
//! - **Virtual Loss**: added to the chosen edge during parallel descents,
//!   removed at backup, so concurrent descents spread over siblings
//! - **Node table**: `DashMap`, see [`NodeTable`]

use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::evaluator::{Evaluator, EvaluatorError};
use crate::game_trait::{Game, Player};
#[cfg(feature = "metrics")]
use crate::metrics::SearchMetrics;
use crate::node::{Expansion, NodeState, SearchNode};
use crate::transposition::NodeTable;

/// Failure of a search call.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search configuration: {msg}")]
    InvalidConfig { msg: String },

    #[error("cannot search from a finished game")]
    TerminalRoot,

    #[error("non-terminal position has no valid actions")]
    NoValidActions,

    #[error("evaluator failed: {0}")]
    Evaluator(#[source] EvaluatorError),

    #[error("evaluator returned {actual} priors for an action space of {expected}")]
    PriorLength { expected: usize, actual: usize },

    #[error("game rejected an action during search: {0}")]
    Game(#[source] Box<dyn Error + Send + Sync + 'static>),
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Simulations per decision.
    pub num_simulations: usize,
    /// Exploration constant `c` of the PUCT rule.
    pub c_puct: f32,
    /// `1` searches on the calling thread; more uses a dedicated rayon pool.
    pub num_threads: usize,
    /// Value charged per in-flight descent (parallel mode only).
    pub virtual_loss: f32,
    /// Keep the node table between calls. Only safe while every searched
    /// position belongs to the same game.
    pub reuse_tree: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 25,
            c_puct: 1.0,
            num_threads: 1,
            virtual_loss: 1.0,
            reuse_tree: false,
        }
    }
}

impl MctsConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |msg: &str| {
            Err(SearchError::InvalidConfig {
                msg: msg.to_string(),
            })
        };
        if self.num_simulations == 0 {
            return invalid("num_simulations must be at least 1");
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return invalid("c_puct must be finite and non-negative");
        }
        if self.num_threads == 0 {
            return invalid("num_threads must be at least 1");
        }
        if !self.virtual_loss.is_finite() || self.virtual_loss < 0.0 {
            return invalid("virtual_loss must be finite and non-negative");
        }
        Ok(())
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// What the descent found at the current node.
enum Step {
    /// Stop here and back up this value (mover's perspective).
    Leaf(f32),
    /// Follow edge `index`, which plays `action`.
    Descend { index: usize, action: usize },
}

/// PUCT search engine over game `G` guided by evaluator `E`.
pub struct Mcts<G: Game, E> {
    game: Arc<G>,
    evaluator: E,
    config: MctsConfig,
    table: NodeTable,
    pool: Option<rayon::ThreadPool>,
    #[cfg(feature = "metrics")]
    metrics: SearchMetrics,
}

impl<G, E> Mcts<G, E>
where
    G: Game,
    E: Evaluator<G::Position>,
{
    /// Create an engine.
    ///
    /// # Arguments
    /// * `game` - Rules shared with the caller
    /// * `evaluator` - Prior/value oracle for canonical positions
    /// * `config` - Search parameters, validated here
    ///
    /// # Errors
    /// [`SearchError::InvalidConfig`] for rejected parameters or a thread
    /// pool that cannot be built.
    pub fn new(game: Arc<G>, evaluator: E, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let pool = if config.num_threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .build()
                .map_err(|e| SearchError::InvalidConfig { msg: e.to_string() })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            game,
            evaluator,
            config,
            table: NodeTable::new(),
            pool,
            #[cfg(feature = "metrics")]
            metrics: SearchMetrics::new(),
        })
    }

    pub fn game(&self) -> &Arc<G> {
        &self.game
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Drop every stored node.
    pub fn clear(&self) {
        self.table.clear();
    }

    /// Number of positions in the node table.
    pub fn node_count(&self) -> usize {
        self.table.len()
    }

    /// Run `num_simulations` simulations from `position` (canonical form).
    ///
    /// Clears the node table first unless `reuse_tree` is set.
    ///
    /// # Errors
    /// [`SearchError::TerminalRoot`] if the game is already over;
    /// evaluator and adapter failures propagate unchanged.
    pub fn search(&self, position: &G::Position) -> Result<(), SearchError> {
        if !self.config.reuse_tree {
            self.table.clear();
        }
        if self.game.outcome(position, Player::One).is_terminal() {
            return Err(SearchError::TerminalRoot);
        }

        let start = Instant::now();
        let (root, _) = self.table.get_or_insert(self.game.fingerprint(position));
        {
            let mut state = root.lock();
            if matches!(*state, NodeState::Terminal(_)) {
                return Err(SearchError::TerminalRoot);
            }
            if matches!(*state, NodeState::Unexpanded) {
                self.expand(position, &mut state)?;
            }
        }

        let sims = self.config.num_simulations;
        match &self.pool {
            None => {
                for _ in 0..sims {
                    self.simulate(position, &root)?;
                }
            }
            Some(pool) => {
                pool.install(|| {
                    (0..sims)
                        .into_par_iter()
                        .try_for_each(|_| self.simulate(position, &root))
                })?;
            }
        }

        let elapsed = start.elapsed();
        #[cfg(feature = "metrics")]
        self.metrics.record_duration(elapsed);

        if log::log_enabled!(log::Level::Debug) {
            let value = match &*root.lock() {
                NodeState::Expanded(exp) => exp.mean_value(),
                _ => 0.0,
            };
            debug!(
                "{} search: {} simulations in {:.3}s ({:.0} sim/s), root value={:.3}, {} nodes",
                self.game.name(),
                sims,
                elapsed.as_secs_f32(),
                sims as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
                value,
                self.table.len()
            );
        }

        Ok(())
    }

    /// Root visit counts `N(root, ·)` over the full action space; all zero if
    /// `position` has not been searched.
    pub fn visit_counts(&self, position: &G::Position) -> Vec<u32> {
        let action_size = self.game.action_size();
        match self.table.get(self.game.fingerprint(position)) {
            Some(node) => match &*node.lock() {
                NodeState::Expanded(exp) => exp.visit_counts(action_size),
                _ => vec![0; action_size],
            },
            None => vec![0; action_size],
        }
    }

    /// Search `position` (canonical form) and turn root visit counts into a
    /// probability vector.
    ///
    /// `temperature = 0` gives a one-hot vector on the most visited action
    /// (lowest id on ties); otherwise `N^(1/temperature)`, normalized.
    pub fn get_action_probabilities(
        &self,
        position: &G::Position,
        temperature: f32,
    ) -> Result<Vec<f32>, SearchError> {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SearchError::InvalidConfig {
                msg: format!("temperature must be finite and non-negative (got {temperature})"),
            });
        }
        self.search(position)?;
        let counts = self.visit_counts(position);
        Ok(probabilities_from_counts(&counts, temperature))
    }

    // ========================================================================
    // SIMULATION
    // ========================================================================

    /// One descent from the root, then backup.
    fn simulate(
        &self,
        root_position: &G::Position,
        root: &Arc<SearchNode>,
    ) -> Result<(), SearchError> {
        let use_virtual_loss = self.pool.is_some();
        let mut path: Vec<(Arc<SearchNode>, usize)> = Vec::new();

        match self.descend(root_position, root, use_virtual_loss, &mut path) {
            Ok(leaf_value) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_simulation(path.len());

                let mut value = leaf_value;
                for (node, index) in path.iter().rev() {
                    value = -value;
                    if let NodeState::Expanded(exp) = &mut *node.lock() {
                        exp.record(*index, value, use_virtual_loss);
                    }
                }
                Ok(())
            }
            Err(err) => {
                if use_virtual_loss {
                    for (node, index) in &path {
                        if let NodeState::Expanded(exp) = &mut *node.lock() {
                            exp.revert_virtual_loss(*index);
                        }
                    }
                }
                Err(err)
            }
        }
    }

    /// Select down to a leaf, recording `(node, edge)` pairs in `path`.
    /// Returns the leaf value from the leaf mover's perspective.
    fn descend(
        &self,
        root_position: &G::Position,
        root: &Arc<SearchNode>,
        use_virtual_loss: bool,
        path: &mut Vec<(Arc<SearchNode>, usize)>,
    ) -> Result<f32, SearchError> {
        let mut position = root_position.clone();
        let mut node = Arc::clone(root);

        loop {
            let step = {
                let mut state = node.lock();
                let visited = match &mut *state {
                    NodeState::Unexpanded => None,
                    NodeState::Terminal(value) => {
                        #[cfg(feature = "metrics")]
                        self.metrics.record_terminal();
                        Some(Step::Leaf(*value))
                    }
                    NodeState::Expanded(exp) => {
                        let index = exp
                            .select(self.config.c_puct, self.config.virtual_loss)
                            .ok_or(SearchError::NoValidActions)?;
                        if use_virtual_loss {
                            exp.add_virtual_loss(index);
                        }
                        Some(Step::Descend {
                            index,
                            action: exp.edges()[index].action,
                        })
                    }
                };
                match visited {
                    Some(step) => step,
                    None => Step::Leaf(self.expand(&position, &mut state)?),
                }
            };

            match step {
                Step::Leaf(value) => return Ok(value),
                Step::Descend { index, action } => {
                    path.push((Arc::clone(&node), index));
                    let (next, to_move) = self
                        .game
                        .next_state(&position, Player::One, action)
                        .map_err(|e| SearchError::Game(Box::new(e)))?;
                    position = self.game.canonical_form(&next, to_move);

                    let (child, _hit) = self.table.get_or_insert(self.game.fingerprint(&position));
                    #[cfg(feature = "metrics")]
                    self.metrics.record_table_lookup(_hit);
                    node = child;
                }
            }
        }
    }

    /// Fill an unexpanded node in place. Called with the node lock held, so a
    /// position is evaluated at most once.
    ///
    /// Returns the leaf value. On error the node stays unexpanded.
    fn expand(&self, position: &G::Position, state: &mut NodeState) -> Result<f32, SearchError> {
        let outcome = self.game.outcome(position, Player::One);
        if outcome.is_terminal() {
            let value = outcome.value();
            *state = NodeState::Terminal(value);
            #[cfg(feature = "metrics")]
            self.metrics.record_terminal();
            return Ok(value);
        }

        let evaluation = self
            .evaluator
            .evaluate(position)
            .map_err(SearchError::Evaluator)?;

        let action_size = self.game.action_size();
        if evaluation.priors.len() != action_size {
            return Err(SearchError::PriorLength {
                expected: action_size,
                actual: evaluation.priors.len(),
            });
        }

        let valid = self.game.valid_actions(position, Player::One);
        let (expansion, fallback) = Expansion::from_priors(&valid, &evaluation.priors);
        if expansion.edges().is_empty() {
            return Err(SearchError::NoValidActions);
        }
        if fallback {
            warn!(
                "no prior mass on valid actions; uniform priors over {} actions",
                expansion.edges().len()
            );
        }
        trace!(
            "expanded node: {} valid actions, value={:.3}",
            expansion.edges().len(),
            evaluation.value
        );

        #[cfg(feature = "metrics")]
        self.metrics.record_expansion(fallback);

        *state = NodeState::Expanded(expansion);
        Ok(evaluation.value)
    }
}

/// Visit counts → action probabilities.
///
/// `temperature = 0` is a one-hot on the highest count, lowest index on ties.
/// Otherwise `(N / max N)^(1/temperature)`, normalized; scaling by the maximum
/// first keeps small temperatures from overflowing. All-zero counts give an
/// all-zero vector.
pub fn probabilities_from_counts(counts: &[u32], temperature: f32) -> Vec<f32> {
    let mut probs = vec![0.0; counts.len()];
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return probs;
    }

    if temperature == 0.0 {
        if let Some(best) = counts.iter().position(|&c| c == max) {
            probs[best] = 1.0;
        }
        return probs;
    }

    let exponent = 1.0 / temperature as f64;
    let scaled: Vec<f64> = counts
        .iter()
        .map(|&c| (c as f64 / max as f64).powf(exponent))
        .collect();
    let total: f64 = scaled.iter().sum();
    for (p, s) in probs.iter_mut().zip(scaled) {
        *p = (s / total) as f32;
    }
    probs
}
