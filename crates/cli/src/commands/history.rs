//! `parley history` — Print the conversation log.

use std::path::Path;

use parley_core::history::{ConversationLog, Speaker};
use parley_memory::JsonHistoryLog;

pub async fn run(config_path: Option<&Path>, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let log = JsonHistoryLog::new(config.history_path());
    let records = log.history().await?;

    if records.is_empty() {
        println!("No conversation logged at {}", log.path().display());
        return Ok(());
    }

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    for record in &records[skip..] {
        let who = match record.speaker() {
            Speaker::User => "YOU",
            Speaker::Bot => config.nickname.as_str(),
        };
        println!("{who}: {}", record.text());
    }
    Ok(())
}
