//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley reply
//! aggregator. This crate has no runtime dependencies beyond serde and
//! tracing; it defines the model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the reply selector is a trait here:
//! - [`Skill`] produces candidate replies for a statement
//! - [`QualityAdjustor`] re-weights a candidate pool
//! - [`ConversationLog`] persists each exchange
//!
//! Implementations live in their respective crates, so tests can swap in
//! scripted skills and in-memory logs.

pub mod error;
pub mod history;
pub mod quality;
pub mod reply;
pub mod skill;

// Re-export key types at crate root for ergonomics
pub use error::{Error, HistoryError, Result, SkillError};
pub use history::{ConversationLog, Speaker, TurnRecord};
pub use quality::{PassThrough, QualityAdjustor};
pub use reply::{Candidate, EPSILON, Reply, normalize, sort_candidates};
pub use skill::{Replier, Skill, SkillOptions};
