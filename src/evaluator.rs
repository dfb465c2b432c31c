//! # Position Evaluator
//!
//! The search engine consults an evaluator once per newly expanded position.
//! An evaluator maps a canonical position to a prior distribution over the full
//! action space and a scalar value estimate in `[-1, 1]` from the side to move.
//!
//! How the evaluator is computed (trained network, heuristic, lookup) is
//! outside this crate's concern.

use std::error::Error;

/// Failure reported by an evaluator. Propagated to the search caller unchanged.
pub type EvaluatorError = Box<dyn Error + Send + Sync + 'static>;

/// Output of a single evaluator call.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// One entry per action id. Need not be normalized or masked.
    pub priors: Vec<f32>,
    /// Expected result for the side to move, in `[-1, 1]`.
    pub value: f32,
}

impl Evaluation {
    pub fn new(priors: Vec<f32>, value: f32) -> Self {
        Self { priors, value }
    }
}

/// Maps a canonical position to `(priors, value)`.
pub trait Evaluator<P>: Send + Sync {
    fn evaluate(&self, position: &P) -> Result<Evaluation, EvaluatorError>;
}

impl<P, F> Evaluator<P> for F
where
    F: Fn(&P) -> Result<Evaluation, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, position: &P) -> Result<Evaluation, EvaluatorError> {
        self(position)
    }
}

/// Flat priors and a neutral value.
///
/// Turns the search into plain visit-count PUCT; useful as a baseline and in
/// tests.
#[derive(Clone, Debug)]
pub struct UniformEvaluator {
    action_size: usize,
}

impl UniformEvaluator {
    pub fn new(action_size: usize) -> Self {
        Self { action_size }
    }
}

impl<P> Evaluator<P> for UniformEvaluator {
    fn evaluate(&self, _position: &P) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation::new(vec![1.0; self.action_size], 0.0))
    }
}
