//! Echo skill — repeats the statement back, unscored.

use async_trait::async_trait;
use parley_core::error::SkillError;
use parley_core::reply::Reply;
use parley_core::skill::{Replier, Skill, SkillOptions};

const NAME: &str = "echo";

/// Parrots the user. Its replies carry no score, so they only win the draw
/// when nothing better is on offer.
pub struct EchoBot {
    prefix: String,
}

impl EchoBot {
    pub fn new(options: &SkillOptions) -> Result<Self, SkillError> {
        Ok(Self {
            prefix: options.str_or(NAME, "prefix", "")?,
        })
    }
}

#[async_trait]
impl Skill for EchoBot {
    fn name(&self) -> &str {
        NAME
    }

    async fn reply(&self, statement: &str) -> Result<Reply, SkillError> {
        let statement = statement.trim();
        if statement.is_empty() {
            return Ok(Reply::none());
        }
        Ok(Reply::Text(format!("{}{}", self.prefix, statement)))
    }
}

/// Catalog factory.
pub fn factory(options: &SkillOptions) -> Result<Vec<Replier>, SkillError> {
    Ok(vec![Replier::component(EchoBot::new(options)?)])
}
