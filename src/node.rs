//! # Search Node
//!
//! Per-position statistics for the PUCT search.
//!
//! A node is created empty when a descent first reaches its fingerprint and is
//! filled in exactly once, under its mutex, by whichever descent gets there
//! first. Afterwards every descent through the node locks it for the short
//! select/backup critical sections only; evaluator calls happen outside any
//! node lock except during the one-time expansion.
//!
//! ## Edge statistics
//!
//! Only valid actions get an [`Edge`]. Edges are kept in ascending action-id
//! order, so a left-to-right scan with strict `>` breaks ties toward the
//! lowest id.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Smallest prior mass accepted before falling back to uniform priors.
const MIN_PRIOR_MASS: f32 = 1e-8;

/// Statistics of one (position, action) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub action: usize,
    /// Masked, normalized prior `P(s, a)`.
    pub prior: f32,
    /// Completed visits `N(s, a)`.
    pub visits: u32,
    /// Sum of backed-up values `W(s, a)`, from the mover's perspective.
    pub value_sum: f32,
    /// Descents currently below this edge (virtual loss count).
    pub in_flight: u32,
}

impl Edge {
    fn new(action: usize, prior: f32) -> Self {
        Self {
            action,
            prior,
            visits: 0,
            value_sum: 0.0,
            in_flight: 0,
        }
    }

    /// Mean value `Q(s, a)`; `0` for an unvisited edge.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f32
        }
    }
}

/// Statistics of an expanded, non-terminal position.
#[derive(Clone, Debug)]
pub struct Expansion {
    edges: Vec<Edge>,
    total_visits: u32,
    total_in_flight: u32,
}

impl Expansion {
    /// Build edges for every `true` entry of `valid`, with priors masked to
    /// valid actions and renormalized.
    ///
    /// Returns the expansion and whether the uniform fallback was used (masked
    /// prior mass was zero or not finite).
    ///
    /// # Arguments
    /// * `valid` - Valid-action mask, one entry per action id
    /// * `priors` - Raw evaluator priors, same length as `valid`
    pub fn from_priors(valid: &[bool], priors: &[f32]) -> (Self, bool) {
        let masked: Vec<(usize, f32)> = valid
            .iter()
            .zip(priors)
            .enumerate()
            .filter(|(_, (&ok, _))| ok)
            .map(|(action, (_, &p))| (action, if p.is_finite() { p.max(0.0) } else { 0.0 }))
            .collect();

        let mass: f32 = masked.iter().map(|&(_, p)| p).sum();
        let fallback = !(mass > MIN_PRIOR_MASS && mass.is_finite());
        let uniform = 1.0 / masked.len().max(1) as f32;

        let edges = masked
            .into_iter()
            .map(|(action, p)| {
                let prior = if fallback { uniform } else { p / mass };
                Edge::new(action, prior)
            })
            .collect();

        (
            Self {
                edges,
                total_visits: 0,
                total_in_flight: 0,
            },
            fallback,
        )
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// `ΣN(s, ·)` over completed visits.
    #[inline]
    pub fn total_visits(&self) -> u32 {
        self.total_visits
    }

    /// Pick the edge maximizing `Q + c·P·sqrt(ΣN) / (1 + N)`.
    ///
    /// Virtual loss counts each in-flight descent as a visit that returned
    /// `-virtual_loss`. With no visits every score is `0`, so the first edge
    /// (lowest action id) is taken. Returns the edge index, `None` if there
    /// are no edges.
    pub fn select(&self, c_puct: f32, virtual_loss: f32) -> Option<usize> {
        let sum_n = (self.total_visits + self.total_in_flight) as f32;
        let sqrt_n = sum_n.sqrt();

        let mut best: Option<usize> = None;
        let mut best_score = f32::NEG_INFINITY;

        for (i, edge) in self.edges.iter().enumerate() {
            let n = edge.visits + edge.in_flight;
            let q = if n == 0 {
                0.0
            } else {
                (edge.value_sum - virtual_loss * edge.in_flight as f32) / n as f32
            };
            let score = q + c_puct * edge.prior * sqrt_n / (1.0 + n as f32);
            if best.is_none() || score > best_score {
                best = Some(i);
                best_score = score;
            }
        }

        best
    }

    /// Mark a descent as passing through edge `index`.
    pub fn add_virtual_loss(&mut self, index: usize) {
        if let Some(edge) = self.edges.get_mut(index) {
            edge.in_flight += 1;
            self.total_in_flight += 1;
        }
    }

    /// Undo [`Self::add_virtual_loss`] for a descent that was abandoned.
    pub fn revert_virtual_loss(&mut self, index: usize) {
        if let Some(edge) = self.edges.get_mut(index) {
            if edge.in_flight > 0 {
                edge.in_flight -= 1;
                self.total_in_flight -= 1;
            }
        }
    }

    /// Record a completed descent through edge `index`.
    ///
    /// Clears one unit of virtual loss when `had_virtual_loss` is set.
    pub fn record(&mut self, index: usize, value: f32, had_virtual_loss: bool) {
        if let Some(edge) = self.edges.get_mut(index) {
            if had_virtual_loss && edge.in_flight > 0 {
                edge.in_flight -= 1;
                self.total_in_flight -= 1;
            }
            edge.visits += 1;
            edge.value_sum += value;
            self.total_visits += 1;
        }
    }

    /// Visit counts spread over the full action space.
    pub fn visit_counts(&self, action_size: usize) -> Vec<u32> {
        let mut counts = vec![0; action_size];
        for edge in &self.edges {
            if let Some(slot) = counts.get_mut(edge.action) {
                *slot = edge.visits;
            }
        }
        counts
    }

    /// Valid-action mask over the full action space.
    pub fn valid_mask(&self, action_size: usize) -> Vec<bool> {
        let mut mask = vec![false; action_size];
        for edge in &self.edges {
            if let Some(slot) = mask.get_mut(edge.action) {
                *slot = true;
            }
        }
        mask
    }

    /// Visit-weighted mean of edge values, from the mover's perspective.
    pub fn mean_value(&self) -> f32 {
        if self.total_visits == 0 {
            return 0.0;
        }
        let total: f32 = self.edges.iter().map(|e| e.value_sum).sum();
        total / self.total_visits as f32
    }
}

/// Lifecycle of a search node.
#[derive(Clone, Debug)]
pub enum NodeState {
    /// Allocated in the table, not yet evaluated.
    Unexpanded,
    /// Game over; exact value from the mover's perspective.
    Terminal(f32),
    Expanded(Expansion),
}

/// A node in the shared table.
#[derive(Debug)]
pub struct SearchNode {
    state: Mutex<NodeState>,
}

impl SearchNode {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(NodeState::Unexpanded),
        }
    }

    /// Lock the node. A poisoned lock is recovered: every critical section
    /// writes a complete update.
    pub fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_expanded(&self) -> bool {
        !matches!(*self.lock(), NodeState::Unexpanded)
    }

    /// Completed visits through this node's edges; `0` unless expanded.
    pub fn total_visits(&self) -> u32 {
        match &*self.lock() {
            NodeState::Expanded(exp) => exp.total_visits(),
            _ => 0,
        }
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::new()
    }
}
