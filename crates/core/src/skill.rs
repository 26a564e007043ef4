//! Skill trait — the abstraction over reply-producing components.
//!
//! A skill looks at the user's statement and proposes zero or more candidate
//! replies. Skills keep whatever state they like between calls (learned
//! weights, counters); the selector never inspects it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::error::SkillError;
use crate::reply::Reply;

/// The core Skill trait.
///
/// Every component a skill factory produces implements this trait. The
/// selector calls `reply()` for every registered component on every turn.
///
/// Skills must report failure by returning `Err`, never by panicking. An
/// `Err` costs only that skill's candidates for the turn; a panic is not
/// caught and ends the process (release builds abort on panic).
#[async_trait]
pub trait Skill: Send + Sync {
    /// A human-readable name for this component (e.g., "pattern", "echo").
    fn name(&self) -> &str;

    /// Propose candidate replies for a statement.
    async fn reply(&self, statement: &str) -> std::result::Result<Reply, SkillError>;

    /// Alternate calling convention, tried once when `reply()` fails.
    ///
    /// Default implementation reports that no fallback exists.
    async fn reply_fallback(&self, _statement: &str) -> std::result::Result<Reply, SkillError> {
        Err(SkillError::NoFallback(self.name().to_string()))
    }
}

/// Signature of a bare reply function registered without a component.
pub type ReplyFn = dyn Fn(&str) -> std::result::Result<Reply, SkillError> + Send + Sync;

/// A handle the selector can invoke: a stateful component or a bare function.
#[derive(Clone)]
pub enum Replier {
    Component(Arc<dyn Skill>),
    Function { name: String, f: Arc<ReplyFn> },
}

impl Replier {
    /// Wrap a skill component.
    pub fn component(skill: impl Skill + 'static) -> Self {
        Replier::Component(Arc::new(skill))
    }

    /// Wrap a bare reply function.
    pub fn function<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Reply, SkillError> + Send + Sync + 'static,
    {
        Replier::Function {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Replier::Component(skill) => skill.name(),
            Replier::Function { name, .. } => name,
        }
    }

    /// Invoke the primary calling convention.
    pub async fn call(&self, statement: &str) -> std::result::Result<Reply, SkillError> {
        match self {
            Replier::Component(skill) => skill.reply(statement).await,
            Replier::Function { f, .. } => f(statement),
        }
    }

    /// Invoke the alternate calling convention. Bare functions have none.
    pub async fn call_fallback(&self, statement: &str) -> std::result::Result<Reply, SkillError> {
        match self {
            Replier::Component(skill) => skill.reply_fallback(statement).await,
            Replier::Function { name, .. } => Err(SkillError::NoFallback(name.clone())),
        }
    }
}

impl std::fmt::Debug for Replier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replier::Component(skill) => write!(f, "Component({})", skill.name()),
            Replier::Function { name, .. } => write!(f, "Function({name})"),
        }
    }
}

/// Per-skill options from configuration (an arbitrary key/value table).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillOptions(pub serde_json::Map<String, serde_json::Value>);

impl SkillOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic setup.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a numeric option, rejecting values of the wrong type.
    pub fn f64_or(&self, skill: &str, key: &str, default: f64) -> std::result::Result<f64, SkillError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(v) => v.as_f64().ok_or_else(|| SkillError::InvalidOptions {
                skill: skill.to_string(),
                reason: format!("`{key}` must be a number, got {v}"),
            }),
        }
    }

    /// Read a string option, rejecting values of the wrong type.
    pub fn str_or(&self, skill: &str, key: &str, default: &str) -> std::result::Result<String, SkillError> {
        match self.0.get(key) {
            None => Ok(default.to_string()),
            Some(v) => v.as_str().map(str::to_string).ok_or_else(|| SkillError::InvalidOptions {
                skill: skill.to_string(),
                reason: format!("`{key}` must be a string, got {v}"),
            }),
        }
    }
}
