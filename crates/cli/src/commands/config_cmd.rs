//! `parley config` — Configuration management commands.

use std::path::Path;

use parley_agent::clamp_top_replies;
use parley_skills::default_catalog;

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating {}", super::config_file(config_path).display());

    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("  error: {e}");
            return Err(e.into());
        }
    };
    println!("  ok: config parsed");

    let mut warnings = Vec::new();
    let catalog = default_catalog();
    for bot in &config.bots {
        if !catalog.contains(bot) {
            warnings.push(format!("unknown skill {bot:?}"));
        }
    }
    if clamp_top_replies(config.num_top_replies) != config.num_top_replies {
        warnings.push(format!(
            "num_top_replies = {} will be clamped to {}",
            config.num_top_replies,
            clamp_top_replies(config.num_top_replies)
        ));
    }
    if config.quality.spell > 0.0 {
        warnings.push("quality.spell is set but not scored yet".to_string());
    }

    if warnings.is_empty() {
        println!("  ok: all checks passed");
    } else {
        for w in &warnings {
            println!("  warning: {w}");
        }
    }

    println!();
    println!("  Bots:     {}", config.bots.join(", "));
    println!("  Top N:    {}", config.num_top_replies);
    println!("  History:  {}", config.history_path().display());
    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", super::config_file(config_path).display());
    Ok(())
}
