#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for checking, normalising and transferring
//! SpaceCells submissions.

mod logging;

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use spacecells_core::{Command, Event};
use spacecells_engine::LevelText;
use spacecells_session::Envelope;
use spacecells_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Check, format and transfer SpaceCells submissions.
#[derive(Debug, Parser)]
#[command(name = "spacecells", version)]
struct Cli {
    /// Raise log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Parse a submission against a level and report what it holds.
    Check {
        /// Level text file.
        level: PathBuf,
        /// Submission text file, or `-` for stdin.
        submission: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical form of a submission.
    Format {
        /// Level text file.
        level: PathBuf,
        /// Submission text file, or `-` for stdin.
        submission: PathBuf,
    },
    /// Wrap a submission in an export envelope.
    Export {
        /// Level text file.
        level: PathBuf,
        /// Submission text file, or `-` for stdin.
        submission: PathBuf,
        /// Position of the level in the level list.
        #[arg(long)]
        number: u32,
        /// Display name of the level.
        #[arg(long)]
        name: String,
        /// Emit pretty JSON instead of the single-line clipboard form.
        #[arg(long)]
        json: bool,
    },
    /// Unwrap an export envelope after checking it targets the named level.
    Import {
        /// Envelope file in JSON or clipboard-line form, or `-` for stdin.
        envelope: PathBuf,
        /// Display name of the level being imported into.
        #[arg(long)]
        name: String,
        /// Level text file used to canonicalise the submission.
        #[arg(long)]
        level: Option<PathBuf>,
    },
}

/// Summary printed by `check`.
#[derive(Debug, Serialize)]
struct CheckReport {
    rows: u32,
    columns: u32,
    bots: u32,
    symbols: u32,
    discarded: u32,
    by_group: BTreeMap<String, usize>,
}

/// Board rebuilt from level and submission text.
struct LoadedBoard {
    level: LevelText,
    world: World,
    symbols: u32,
    discarded: u32,
}

/// Entry point for the SpaceCells command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        CliCommand::Check {
            level,
            submission,
            json,
        } => check(&level, &submission, json),
        CliCommand::Format { level, submission } => {
            let board = load_board(&level, &submission)?;
            println!("{}", query::submission_text(&board.world));
            Ok(())
        }
        CliCommand::Export {
            level,
            submission,
            number,
            name,
            json,
        } => {
            let board = load_board(&level, &submission)?;
            let envelope = Envelope {
                level_number: number,
                level_name: name,
                submission_text: query::submission_text(&board.world),
            };
            let output = if json {
                envelope.to_json()?
            } else {
                envelope.encode_line()?
            };
            println!("{output}");
            Ok(())
        }
        CliCommand::Import {
            envelope,
            name,
            level,
        } => import(&envelope, &name, level.as_deref()),
    }
}

fn check(level: &Path, submission: &Path, json: bool) -> Result<()> {
    let board = load_board(level, submission)?;
    let dimensions = board.level.dimensions();
    let mut by_group = BTreeMap::new();
    for entry in query::submission(&board.world).entries() {
        *by_group.entry(entry.slot.to_string()).or_insert(0) += 1;
    }
    let report = CheckReport {
        rows: dimensions.rows(),
        columns: dimensions.columns(),
        bots: board.level.bot_count(),
        symbols: board.symbols,
        discarded: board.discarded,
        by_group,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode check report")?
        );
    } else {
        println!("level {}x{} with {} bots", report.rows, report.columns, report.bots);
        println!("{} symbols placed, {} discarded", report.symbols, report.discarded);
        for (group, count) in &report.by_group {
            println!("  {group}: {count}");
        }
    }
    Ok(())
}

fn import(path: &Path, name: &str, level: Option<&Path>) -> Result<()> {
    let text = read_input(path)?;
    let envelope = Envelope::decode(&text).context("failed to decode envelope")?;
    if let Err(error) = envelope.check_level(name) {
        warn!(%error, "import rejected");
        return Err(error.into());
    }
    info!(
        level = envelope.level_number,
        name = %envelope.level_name,
        "envelope accepted"
    );

    let submission = match level {
        Some(level) => {
            let level = parse_level(level)?;
            let board = rebuild(level, envelope.submission_text)?;
            query::submission_text(&board.world)
        }
        None => envelope.submission_text,
    };
    println!("{submission}");
    Ok(())
}

fn load_board(level: &Path, submission: &Path) -> Result<LoadedBoard> {
    let level = parse_level(level)?;
    let text = read_input(submission)?;
    rebuild(level, text).with_context(|| format!("in submission {}", submission.display()))
}

fn parse_level(path: &Path) -> Result<LevelText> {
    let text = read_input(path)?;
    let level = LevelText::parse(&text)
        .with_context(|| format!("failed to parse level {}", path.display()))?;
    debug!(dimensions = %level.dimensions(), "level parsed");
    Ok(level)
}

fn rebuild(level: LevelText, text: String) -> Result<LoadedBoard> {
    let mut world = World::with_terrain(level.terrain());
    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadSubmission { text }, &mut events);

    for event in events {
        match event {
            Event::SubmissionRejected { error } => {
                warn!(%error, "submission rejected");
                return Err(error).context("submission does not fit the level");
            }
            Event::SubmissionLoaded { symbols, discarded } => {
                if discarded > 0 {
                    warn!(discarded, "symbols on forbidden squares were dropped");
                }
                return Ok(LoadedBoard {
                    level,
                    world,
                    symbols,
                    discarded,
                });
            }
            _ => {}
        }
    }
    bail!("submission produced no load result")
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        let _ = io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
