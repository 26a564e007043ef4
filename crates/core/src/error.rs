//! Error types for the Parley domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Parley operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Skill errors ---
    #[error("Skill error: {0}")]
    Skill(#[from] SkillError),

    // --- Conversation history errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum SkillError {
    #[error("Skill not found: {0}")]
    NotFound(String),

    #[error("Failed to load skill {skill}: {reason}")]
    LoadFailed { skill: String, reason: String },

    #[error("Invalid options for skill {skill}: {reason}")]
    InvalidOptions { skill: String, reason: String },

    #[error("Skill {skill} failed to reply: {reason}")]
    ReplyFailed { skill: String, reason: String },

    #[error("Skill {skill} timed out after {timeout_secs}s")]
    Timeout { skill: String, timeout_secs: u64 },

    #[error("Skill {0} has no fallback calling convention")]
    NoFallback(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to write history at {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to read history at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("History at {path} is not a valid turn log: {reason}")]
    Decode { path: PathBuf, reason: String },
}
