//! Quality adjustment — the re-scoring pass between collection and sampling.

use crate::reply::Candidate;

/// Re-weights a merged candidate pool given the user's statement.
///
/// The selector treats the returned pool as the new pool of record; it may
/// differ in length and order from the input.
pub trait QualityAdjustor: Send + Sync {
    fn update_replies(&self, pool: Vec<Candidate>, statement: &str) -> Vec<Candidate>;
}

/// The identity adjustor: returns the pool untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl QualityAdjustor for PassThrough {
    fn update_replies(&self, pool: Vec<Candidate>, _statement: &str) -> Vec<Candidate> {
        pool
    }
}
