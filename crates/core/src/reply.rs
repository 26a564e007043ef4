//! Reply shapes and the normalizer that canonicalizes them.
//!
//! Skills may answer with a bare text, a scored text, or any nesting of
//! those. [`normalize`] flattens every shape into a pool of [`Candidate`]s
//! sorted by descending score, which is the only form the selector reads.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score given to replies that carry no confidence of their own.
///
/// Strictly positive so an unscored reply can still be sampled.
pub const EPSILON: f64 = 1e-10;

/// Raw output of a skill, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Unscored text
    Text(String),
    /// Text with an explicit confidence score
    Scored(f64, String),
    /// Any mixture of the above
    Many(Vec<Reply>),
}

impl Reply {
    /// The empty reply: this skill has nothing to say.
    pub fn none() -> Self {
        Reply::Many(Vec::new())
    }

    /// Create a scored reply.
    pub fn scored(score: f64, text: impl Into<String>) -> Self {
        Reply::Scored(score, text.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Reply::Text(_) | Reply::Scored(..) => false,
            Reply::Many(items) => items.iter().all(Reply::is_empty),
        }
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl<S: Into<String>> From<(f64, S)> for Reply {
    fn from((score, text): (f64, S)) -> Self {
        Reply::Scored(score, text.into())
    }
}

impl From<Candidate> for Reply {
    fn from(candidate: Candidate) -> Self {
        Reply::Scored(candidate.score, candidate.text)
    }
}

impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(items: Vec<T>) -> Self {
        Reply::Many(items.into_iter().map(Into::into).collect())
    }
}

/// A single scored reply in the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Confidence score (typically 0..1, not clamped)
    pub score: f64,

    /// Reply text, never empty
    pub text: String,
}

impl Candidate {
    pub fn new(score: f64, text: impl Into<String>) -> Self {
        Self {
            score,
            text: text.into(),
        }
    }
}

/// Flatten any reply shape into a candidate pool sorted by descending score.
///
/// Ties are ordered by ascending text. Candidates with empty text or a NaN
/// score are dropped.
pub fn normalize(raw: impl Into<Reply>) -> Vec<Candidate> {
    let mut pool = Vec::new();
    flatten(raw.into(), &mut pool);
    sort_candidates(&mut pool);
    pool
}

fn flatten(reply: Reply, out: &mut Vec<Candidate>) {
    match reply {
        Reply::Text(text) => push(out, EPSILON, text),
        Reply::Scored(score, text) => push(out, score, text),
        Reply::Many(items) => {
            for item in items {
                flatten(item, out);
            }
        }
    }
}

fn push(out: &mut Vec<Candidate>, score: f64, text: String) {
    if text.is_empty() {
        return;
    }
    if score.is_nan() {
        tracing::debug!(text = %text, "Dropping candidate with NaN score");
        return;
    }
    out.push(Candidate { score, text });
}

/// Sort a pool in place: descending score, then ascending text.
pub fn sort_candidates(pool: &mut [Candidate]) {
    pool.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.text.cmp(&b.text),
        other => other,
    });
}
