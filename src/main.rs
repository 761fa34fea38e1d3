use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use term_snake::config::Args;
use term_snake::term::{Screen, TermManager};
use term_snake::{input, runtime, FoodCatalog, GameState};

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("unable to open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut term = TermManager::new();
    let board = term.board().context("unable to read terminal size")?;
    let mut game = GameState::new(&board, FoodCatalog::standard(), args.game_config(), args.rng());

    let (heading_tx, heading_rx) = watch::channel(None);
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();

    term.setup().context("unable to prepare terminal")?;
    if let Err(e) = input::spawn_listener(heading_tx, signal_tx.clone()) {
        term.restore()?;
        return Err(e).context("unable to start input listener");
    }
    runtime::spawn_interrupt_handler(signal_tx);

    // The terminal comes back even when the game loop fails.
    let res = runtime::run(&mut game, &mut term, heading_rx, signal_rx, &args.run_config()).await;
    term.restore().context("unable to restore terminal")?;

    let over = res?;
    println!("game over. score: {}", over.score);
    Ok(())
}
