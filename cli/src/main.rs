use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minesweeper_core::leaderboard::{DEFAULT_SCORES_PATH, LeaderboardError};
use minesweeper_core::{Board, Difficulty, PendingName, ScoreStore};

use command::{Command, HELP};
use session::{Session, Step};

mod command;
mod render;
mod session;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Difficulty of the first game
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// High score file
    #[arg(long, default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,

    /// Print the board as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();
    log::debug!("seed: {:?}", args.seed);

    let board = match args.seed {
        Some(seed) => Board::with_seed(args.difficulty.config(), seed)?,
        None => Board::from_difficulty(args.difficulty),
    };
    let store = ScoreStore::open(&args.scores);
    let mut session = Session::new(board, store);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    writeln!(out, "{}", HELP)?;
    show_board(&mut out, &session, args.json)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_line(&mut input)? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{:#}", err)?;
                continue;
            }
        };

        match session.apply(command, Instant::now()) {
            Ok(Step::Board) => show_board(&mut out, &session, args.json)?,
            Ok(Step::Scores) => write!(out, "{}", session.store().leaderboard())?,
            Ok(Step::Help) => writeln!(out, "{}", HELP)?,
            Ok(Step::NameWanted(pending)) => {
                show_board(&mut out, &session, args.json)?;
                prompt_name(&mut input, &mut out, &mut session, pending)?;
            }
            Ok(Step::Quit) => break,
            Err(err) => writeln!(out, "{}", err)?,
        }
    }

    log::debug!("Bye");
    Ok(())
}

fn read_line(input: &mut impl BufRead) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading command")?;
    Ok((read > 0).then_some(line))
}

fn show_board(out: &mut impl Write, session: &Session, json: bool) -> anyhow::Result<()> {
    let snapshot = session.board().snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        write!(out, "{}", render::board_text(&snapshot))?;
    }
    Ok(())
}

/// Asks until the name is accepted. Leaving the prompt keeps the score without a name.
fn prompt_name(
    input: &mut impl BufRead,
    out: &mut impl Write,
    session: &mut Session,
    pending: PendingName,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "Congrats! You just set a new high score (#{} on {}).",
        pending.rank, pending.difficulty
    )?;
    loop {
        write!(out, "Please enter your name to record your score: ")?;
        out.flush()?;
        let Some(name) = read_line(input)? else {
            log::warn!("No name given, score stays unnamed");
            return Ok(());
        };

        match session.assign_name(pending, &name) {
            Ok(()) => return Ok(()),
            Err(err @ LeaderboardError::InvalidName(_)) => writeln!(out, "{}", err)?,
            Err(err) => return Err(err).context("recording high score"),
        }
    }
}
