//! Reply selection for Parley.
//!
//! A [`ReplySelector`] owns the loaded repliers, a quality adjustor, and the
//! conversation log, and turns each user statement into exactly one reply.

pub mod quality;
pub mod random;
pub mod selector;

pub use quality::QualityScore;
pub use random::{FixedDraw, RandomSource, SeededRandom, ThreadRandom};
pub use selector::{
    FALLBACK_REPLY, MAX_TOP_REPLIES, MIN_TOP_REPLIES, ReplySelector, clamp_top_replies, pick_weighted,
};
