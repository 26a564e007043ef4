//! Default quality scorer.
//!
//! Each candidate's score is multiplied by one factor per enabled weight:
//!
//! - `semantics`: `1 + w * jaccard(statement words, reply words)`
//! - `sentiment`: `1 + w * mood(reply)`, mood in `[-0.5, 0.5]`
//!
//! Factors are floored at zero so a large sentiment weight cannot flip a
//! score's sign. `spell` is accepted but has no scorer yet.

use std::collections::HashSet;

use parley_config::QualityConfig;
use parley_core::quality::QualityAdjustor;
use parley_core::reply::{Candidate, sort_candidates};
use tracing::debug;

const POSITIVE: &[&str] = &[
    "good", "great", "glad", "happy", "welcome", "thanks", "thank", "love", "nice", "well",
    "awesome", "excellent", "hello", "sure", "yes", "fun", "enjoy",
];

const NEGATIVE: &[&str] = &[
    "bad", "sad", "sorry", "hate", "wrong", "no", "not", "never", "terrible", "awful", "angry",
    "fail", "boring",
];

/// Weighted re-scoring of candidates against the user's statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScore {
    pub semantics: f64,
    pub sentiment: f64,
    pub spell: f64,
}

impl Default for QualityScore {
    fn default() -> Self {
        Self::from_config(&QualityConfig::default())
    }
}

impl QualityScore {
    pub fn new(semantics: f64, sentiment: f64, spell: f64) -> Self {
        Self { semantics, sentiment, spell }
    }

    pub fn from_config(config: &QualityConfig) -> Self {
        Self::new(config.semantics, config.sentiment, config.spell)
    }

    fn is_neutral(&self) -> bool {
        self.semantics == 0.0 && self.sentiment == 0.0
    }

    fn adjust(&self, score: f64, statement_words: &HashSet<String>, text: &str) -> f64 {
        let reply_words = words(text);
        let mut score = score;
        if self.semantics != 0.0 {
            score *= (1.0 + self.semantics * jaccard(statement_words, &reply_words)).max(0.0);
        }
        if self.sentiment != 0.0 {
            score *= (1.0 + self.sentiment * mood(text)).max(0.0);
        }
        score
    }
}

impl QualityAdjustor for QualityScore {
    fn update_replies(&self, pool: Vec<Candidate>, statement: &str) -> Vec<Candidate> {
        if self.spell != 0.0 {
            debug!(weight = self.spell, "Spell weight set but no spell scorer is available");
        }
        if self.is_neutral() {
            return pool;
        }

        let statement_words = words(statement);
        let mut pool: Vec<Candidate> = pool
            .into_iter()
            .map(|c| Candidate {
                score: self.adjust(c.score, &statement_words, &c.text),
                text: c.text,
            })
            .collect();
        sort_candidates(&mut pool);
        pool
    }
}

/// Lower-cased alphanumeric words.
fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Lexicon polarity: (positive hits - negative hits) / words, halved.
fn mood(text: &str) -> f64 {
    let mut total = 0usize;
    let mut balance = 0i64;
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        total += 1;
        let word = word.to_lowercase();
        if POSITIVE.contains(&word.as_str()) {
            balance += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            balance -= 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    (balance as f64 / total as f64 / 2.0).clamp(-0.5, 0.5)
}
