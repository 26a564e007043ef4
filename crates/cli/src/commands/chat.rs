//! `parley chat` — single-statement or interactive chat.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use parley_agent::{ReplySelector, SeededRandom};
use parley_config::{AppConfig, ConfigError, parse_bot_list};
use parley_memory::JsonHistoryLog;
use parley_skills::{SkillRegistry, default_catalog};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

/// Flags that override configuration for one chat session.
#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Statement to reply to (joined with spaces)
    pub words: Vec<String>,

    /// Comma-separated skills to load, in order
    #[arg(short, long)]
    pub bots: Option<String>,

    /// How many of the best candidates to sample from (1 to 10000)
    #[arg(short = 'n', long)]
    pub num_top_replies: Option<usize>,

    /// Keep chatting after replying to WORDS
    #[arg(short, long)]
    pub persist: bool,

    /// Name printed before each reply
    #[arg(long)]
    pub nickname: Option<String>,

    /// Weight of word overlap between statement and reply
    #[arg(long)]
    pub semantics: Option<f64>,

    /// Weight of reply sentiment
    #[arg(long)]
    pub sentiment: Option<f64>,

    /// Weight of reply spelling
    #[arg(long)]
    pub spell: Option<f64>,

    /// Conversation log file
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Seed the reply sampler for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ChatArgs {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(bots) = &self.bots {
            config.bots = parse_bot_list(bots);
        }
        if let Some(n) = self.num_top_replies {
            config.num_top_replies = n;
        }
        if let Some(nickname) = &self.nickname {
            config.nickname = nickname.clone();
        }
        if let Some(w) = self.semantics {
            config.quality.semantics = w;
        }
        if let Some(w) = self.sentiment {
            config.quality.sentiment = w;
        }
        if let Some(w) = self.spell {
            config.quality.spell = w;
        }
        if let Some(path) = &self.history {
            config.history_path = Some(path.clone());
        }
        config.validate()
    }

    fn statement(&self) -> Option<String> {
        let statement = self.words.join(" ");
        let statement = statement.trim();
        (!statement.is_empty()).then(|| statement.to_string())
    }
}

pub async fn run(config_path: Option<&Path>, args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;
    args.apply(&mut config)?;

    let mut selector = build_selector(&config, args.seed)?;
    let mut stdout = std::io::stdout();

    let interactive = match args.statement() {
        Some(statement) => {
            let reply = selector.select(&statement).await?;
            writeln!(stdout, "{}: {reply}", config.nickname)?;
            args.persist
        }
        None => true,
    };

    if interactive {
        eprintln!("Type {} to end the conversation...", exit_hint(&config));
        let stdin = BufReader::new(tokio::io::stdin());
        let turns = run_session(&mut selector, &config, stdin, &mut stdout).await?;
        info!(turns, "Chat session ended");
    }
    Ok(())
}

/// `"quit" or "exit"` style list of the configured exit commands.
fn exit_hint(config: &AppConfig) -> String {
    let quoted: Vec<String> = config.exit_commands.iter().map(|c| format!("{c:?}")).collect();
    match quoted.split_last() {
        None => "Ctrl+D".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Load the configured skills and wire them to the JSON conversation log.
pub fn build_selector(config: &AppConfig, seed: Option<u64>) -> Result<ReplySelector, Box<dyn std::error::Error>> {
    let registry = SkillRegistry::from_bots(default_catalog(), &config.bots, |name| {
        config.skill_options(name)
    })?;
    let log = Arc::new(JsonHistoryLog::new(config.history_path()));
    let selector = ReplySelector::from_config(config, registry, log);
    Ok(match seed {
        Some(seed) => selector.with_random(SeededRandom::new(seed)),
        None => selector,
    })
}

/// Prompt, read, reply until an exit command, end of input, or `max_turns`.
/// Blank lines are skipped without a reply.
///
/// Returns the number of turns answered.
pub async fn run_session<R, W>(
    selector: &mut ReplySelector,
    config: &AppConfig,
    input: R,
    output: &mut W,
) -> Result<usize, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut turns = 0;

    while turns < config.max_turns {
        write!(output, "YOU: ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };
        let statement = line.trim();
        if config.is_exit_command(statement) {
            break;
        }
        if statement.is_empty() {
            continue;
        }

        let reply = selector.select(statement).await?;
        writeln!(output, "{}: {reply}", config.nickname)?;
        turns += 1;
    }

    Ok(turns)
}
