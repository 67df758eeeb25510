use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codeblock_guard::model::{IncomingMessage, MessageEdit};
use codeblock_guard::{
    Collaborators, Guard, GuardConfig, GuardState, StaticDirectory, TokenPatternScanner,
};
use codeblock_inspector::{
    scan, Advisory, AdvisoryComposer, Classification, CodeClassifier, Extraction, FencedBlock,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod console;

use console::ConsoleMessenger;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "codeblock-guard")]
#[command(about = "Spot badly formatted code pastes and explain how to fix them", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one paste and print the advisory it would get
    Check(CheckArgs),

    /// Feed a JSON-lines file of message and edit events through the guard
    Replay(ReplayArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// File holding the message text (stdin when omitted)
    path: Option<PathBuf>,

    /// Print a JSON report instead of the advisory text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReplayArgs {
    /// Events, one JSON object per line
    events: PathBuf,

    /// Guard configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore channel cooldowns
    #[arg(long)]
    debug: bool,
}

/// Everything `check --json` knows about a paste
#[derive(Debug, Serialize)]
struct CheckReport {
    well_formed: bool,
    blocks: Vec<FencedBlock>,
    classification: Classification,
    advisory: Option<Advisory>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ReplayEvent {
    Message(IncomingMessage),
    Edit(MessageEdit),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Replay(args) => run_replay(args).await,
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read stdin")?;
            Ok(buf)
        }
    }
}

fn run_check(args: CheckArgs) -> Result<()> {
    let text = read_input(args.path.as_ref())?;
    let extraction = scan(&text);
    let advisory = AdvisoryComposer::default().compose_extraction(&text, &extraction);

    if args.json {
        let report = CheckReport {
            well_formed: extraction == Extraction::WellFormed,
            blocks: extraction.into_blocks(),
            classification: CodeClassifier::default().classify(&text),
            advisory,
        };
        return print_stdout(&serde_json::to_string_pretty(&report)?);
    }

    match advisory {
        Some(advisory) => print_stdout(&advisory.text),
        None => {
            log::info!("No formatting issues found");
            Ok(())
        }
    }
}

async fn run_replay(args: ReplayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GuardConfig::load(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => {
            let mut config = GuardConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if args.debug {
        config.debug_mode = true;
    }

    let raw = fs::read_to_string(&args.events)
        .with_context(|| format!("Cannot read {}", args.events.display()))?;

    let collaborators = Collaborators {
        messenger: Arc::new(ConsoleMessenger::default()),
        directory: Arc::new(StaticDirectory::new(&config)),
        scanner: Arc::new(TokenPatternScanner),
    };
    let mut guard = Guard::new(config, GuardState::new(), collaborators);

    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: ReplayEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", index + 1))?;
        match event {
            ReplayEvent::Message(message) => guard.on_new_message(&message).await,
            ReplayEvent::Edit(edit) => guard.on_message_edited(&edit).await,
        }
    }

    log::info!(
        "Replay finished: {} advisories outstanding",
        guard.state().corrections.len()
    );
    Ok(())
}
