//! `parley skills` — List catalog skills and mark the configured ones.

use std::path::Path;

use parley_skills::{canonical_name, default_catalog};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let catalog = default_catalog();
    let configured: Vec<&str> = config.bots.iter().map(|b| canonical_name(b)).collect();

    println!("Available skills:");
    for name in catalog.names() {
        let marker = if configured.contains(&name) { "*" } else { " " };
        println!("  {marker} {name}");
    }

    let unknown: Vec<&str> = configured
        .iter()
        .copied()
        .filter(|b| !catalog.contains(b))
        .collect();
    if !unknown.is_empty() {
        println!();
        println!("Configured but unknown: {}", unknown.join(", "));
    }

    println!();
    println!("* = loaded by `parley chat` (order: {})", configured.join(", "));
    Ok(())
}
