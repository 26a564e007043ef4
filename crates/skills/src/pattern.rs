//! Pattern skill — canned replies for statements matching regex rules.
//!
//! Covers small talk (greetings, thanks, farewells). Extra rules can be
//! supplied through the `rules` option as a table of pattern → reply.

use async_trait::async_trait;
use parley_core::error::SkillError;
use parley_core::reply::Reply;
use parley_core::skill::{Replier, Skill, SkillOptions};
use regex_lite::Regex;
use tracing::debug;

const NAME: &str = "pattern";

/// Built-in small-talk rules: (pattern, reply).
const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        r"(?i)^\s*(hi|hello|hey|howdy|hiya|greetings|good\s+(morning|afternoon|evening))\b",
        "Hello!",
    ),
    (r"(?i)\bhow\s+(are|r)\s+(you|u)\b", "I'm doing well, thanks for asking!"),
    (r"(?i)\b(thanks|thank\s+you|thx)\b", "You're welcome!"),
    (r"(?i)\b(bye|goodbye|see\s+you|cya)\b", "Goodbye!"),
    (r"(?i)\bwhat('s|\s+is)\s+your\s+name\b", "I'm Parley, a bot made of many skills."),
];

struct Rule {
    pattern: Regex,
    reply: String,
}

/// Rule-based replier: every matching rule proposes its reply at a fixed score.
pub struct PatternBot {
    rules: Vec<Rule>,
    score: f64,
}

impl PatternBot {
    /// Build from options: `score` (number, default 0.5), `rules` (table).
    pub fn new(options: &SkillOptions) -> Result<Self, SkillError> {
        let score = options.f64_or(NAME, "score", 0.5)?;
        if !score.is_finite() || score < 0.0 {
            return Err(SkillError::InvalidOptions {
                skill: NAME.into(),
                reason: format!("`score` must be a finite number >= 0, got {score}"),
            });
        }

        let mut rules = Vec::with_capacity(DEFAULT_RULES.len());
        for (pattern, reply) in DEFAULT_RULES {
            let pattern = Regex::new(pattern).map_err(|e| SkillError::LoadFailed {
                skill: NAME.into(),
                reason: e.to_string(),
            })?;
            rules.push(Rule { pattern, reply: (*reply).to_string() });
        }

        if let Some(extra) = options.get("rules") {
            let table = extra.as_object().ok_or_else(|| SkillError::InvalidOptions {
                skill: NAME.into(),
                reason: "`rules` must be a table of pattern = reply".into(),
            })?;
            for (pattern, reply) in table {
                let reply = reply.as_str().ok_or_else(|| SkillError::InvalidOptions {
                    skill: NAME.into(),
                    reason: format!("reply for rule {pattern:?} must be a string"),
                })?;
                let compiled = Regex::new(pattern).map_err(|e| SkillError::InvalidOptions {
                    skill: NAME.into(),
                    reason: format!("bad rule pattern {pattern:?}: {e}"),
                })?;
                rules.push(Rule { pattern: compiled, reply: reply.to_string() });
            }
        }

        Ok(Self { rules, score })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[async_trait]
impl Skill for PatternBot {
    fn name(&self) -> &str {
        NAME
    }

    async fn reply(&self, statement: &str) -> Result<Reply, SkillError> {
        let replies: Vec<Reply> = self
            .rules
            .iter()
            .filter(|rule| rule.pattern.is_match(statement))
            .map(|rule| Reply::scored(self.score, rule.reply.clone()))
            .collect();
        debug!(matches = replies.len(), "Pattern rules matched");
        Ok(Reply::Many(replies))
    }
}

/// Catalog factory.
pub fn factory(options: &SkillOptions) -> Result<Vec<Replier>, SkillError> {
    Ok(vec![Replier::component(PatternBot::new(options)?)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::reply::{Candidate, normalize};

    #[tokio::test]
    async fn greets_back() {
        let bot = PatternBot::new(&SkillOptions::new()).unwrap();
        let pool = normalize(bot.reply("Hi").await.unwrap());
        assert_eq!(pool, vec![Candidate::new(0.5, "Hello!")]);
    }

    #[tokio::test]
    async fn no_match_is_empty() {
        let bot = PatternBot::new(&SkillOptions::new()).unwrap();
        let reply = bot.reply("The mitochondria is the powerhouse").await.unwrap();
        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn multiple_rules_can_match() {
        let bot = PatternBot::new(&SkillOptions::new()).unwrap();
        let pool = normalize(bot.reply("hey, thanks! bye").await.unwrap());
        let texts: Vec<&str> = pool.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Goodbye!", "Hello!", "You're welcome!"]);
    }

    #[tokio::test]
    async fn score_option_applies() {
        let bot = PatternBot::new(&SkillOptions::new().with("score", 0.9)).unwrap();
        let pool = normalize(bot.reply("hello there").await.unwrap());
        assert_eq!(pool[0].score, 0.9);
    }

    #[tokio::test]
    async fn custom_rules_are_added() {
        let rules = serde_json::json!({ "(?i)weather": "I can't see outside." });
        let bot = PatternBot::new(&SkillOptions::new().with("rules", rules)).unwrap();
        assert_eq!(bot.rule_count(), DEFAULT_RULES.len() + 1);
        let pool = normalize(bot.reply("How's the WEATHER?").await.unwrap());
        assert_eq!(pool[0].text, "I can't see outside.");
    }

    #[test]
    fn bad_custom_rule_is_rejected() {
        let rules = serde_json::json!({ "(unclosed": "never" });
        let err = PatternBot::new(&SkillOptions::new().with("rules", rules)).err().unwrap();
        assert!(matches!(err, SkillError::InvalidOptions { .. }));
    }

    #[test]
    fn negative_score_is_rejected() {
        let result = PatternBot::new(&SkillOptions::new().with("score", -1.0));
        assert!(result.is_err());
    }
}
