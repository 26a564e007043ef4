//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use parley_core::skill::SkillOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Skills to load at startup, in reply-collection order
    #[serde(default = "default_bots")]
    pub bots: Vec<String>,

    /// How many of the best-scored candidates enter the weighted draw
    #[serde(default = "default_num_top_replies")]
    pub num_top_replies: usize,

    /// Upper bound on a single skill invocation
    #[serde(default = "default_skill_timeout_secs")]
    pub skill_timeout_secs: u64,

    /// Conversation log location (defaults to `~/.parley/history.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,

    /// Name printed before each reply in the terminal
    #[serde(default = "default_nickname")]
    pub nickname: String,

    /// Maximum turns in one interactive session
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Statements that end an interactive session
    #[serde(default = "default_exit_commands")]
    pub exit_commands: Vec<String>,

    /// Quality scoring weights (passed through to the adjustor)
    #[serde(default)]
    pub quality: QualityConfig,

    /// Per-skill options, keyed by skill name
    #[serde(default)]
    pub skills: HashMap<String, SkillOptions>,
}

fn default_bots() -> Vec<String> {
    vec!["pattern".into(), "echo".into()]
}
fn default_num_top_replies() -> usize {
    10
}
fn default_skill_timeout_secs() -> u64 {
    30
}
fn default_nickname() -> String {
    "bot".into()
}
fn default_max_turns() -> usize {
    1000
}
fn default_exit_commands() -> Vec<String> {
    ["exit", "quit", "bye", "goodbye", "cya"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Weights for the default quality scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Word-overlap relevance between statement and reply
    #[serde(default = "default_semantics")]
    pub semantics: f64,

    /// Preference for positively-worded replies
    #[serde(default)]
    pub sentiment: f64,

    /// Spelling quality (accepted, not yet scored)
    #[serde(default)]
    pub spell: f64,
}

fn default_semantics() -> f64 {
    1.0
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            semantics: default_semantics(),
            sentiment: 0.0,
            spell: 0.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.parley/config.toml).
    ///
    /// Environment variables override file values:
    /// - `PARLEY_BOTS` (comma-separated skill names)
    /// - `PARLEY_NUM_TOP_REPLIES`
    /// - `PARLEY_HISTORY_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bots) = lookup("PARLEY_BOTS") {
            self.bots = parse_bot_list(&bots);
        }

        if let Some(n) = lookup("PARLEY_NUM_TOP_REPLIES") {
            self.num_top_replies = n.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PARLEY_NUM_TOP_REPLIES must be a non-negative integer, got {n:?}"
                ))
            })?;
        }

        if let Some(path) = lookup("PARLEY_HISTORY_PATH") {
            self.history_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// Resolved conversation log path.
    pub fn history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("history.json"))
    }

    /// Options for a skill, empty if none are configured.
    ///
    /// Tables keyed with the legacy `_bots` suffix (`[skills.pattern_bots]`)
    /// are found under the plain name too.
    pub fn skill_options(&self, name: &str) -> SkillOptions {
        let name = name.trim();
        let plain = name.strip_suffix(LEGACY_BOT_SUFFIX).unwrap_or(name);
        self.skills
            .get(plain)
            .or_else(|| self.skills.get(&format!("{plain}{LEGACY_BOT_SUFFIX}")))
            .cloned()
            .unwrap_or_default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bots.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one bot must be configured".into(),
            ));
        }

        for (name, weight) in [
            ("semantics", self.quality.semantics),
            ("sentiment", self.quality.sentiment),
            ("spell", self.quality.spell),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "quality.{name} must be a finite number >= 0"
                )));
            }
        }

        if self.skill_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "skill_timeout_secs must be > 0".into(),
            ));
        }

        if self.max_turns == 0 {
            return Err(ConfigError::ValidationError("max_turns must be > 0".into()));
        }

        Ok(())
    }

    /// Whether a statement should end an interactive session.
    pub fn is_exit_command(&self, statement: &str) -> bool {
        let s = statement.trim().to_lowercase();
        self.exit_commands.iter().any(|c| c.to_lowercase() == s)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bots: default_bots(),
            num_top_replies: default_num_top_replies(),
            skill_timeout_secs: default_skill_timeout_secs(),
            history_path: None,
            nickname: default_nickname(),
            max_turns: default_max_turns(),
            exit_commands: default_exit_commands(),
            quality: QualityConfig::default(),
            skills: HashMap::new(),
        }
    }
}

/// Legacy suffix on bot names and skill option tables.
const LEGACY_BOT_SUFFIX: &str = "_bots";

/// Split a comma-separated bot list, dropping blanks.
pub fn parse_bot_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(String::from)
        .collect()
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
