use std::{
    path::PathBuf,
    sync::{Arc, mpsc::Receiver},
};

use anyhow::Context;
use clap::Parser;
use gamedata::Catalog;
use simulator::{
    Autopilot, DispatchableEvent, DungeonRun, OutcomeTally, RunConfig, RunOutcome, SaveStore,
};
use tracing_subscriber::EnvFilter;

/// Plays dungeon runs headlessly with the autopilot
#[derive(Parser, Debug)]
#[command(name = "runner")]
#[command(version)]
struct Cli {
    /// Run config (TOML); defaults apply to anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory, overriding the config and the bundled pack
    #[arg(long)]
    content: Option<PathBuf>,

    /// Save directory, overriding the config
    #[arg(long)]
    saves: Option<PathBuf>,

    /// Give up after this many ticks per run
    #[arg(long, default_value_t = 5_000_000)]
    max_ticks: u64,

    /// Abandon each save instead of playing it
    #[arg(long)]
    abandon: bool,

    /// Print dispatched run events to stderr
    #[arg(long)]
    verbose: bool,

    /// Save names to play; each resumes from disk if it exists
    #[arg(default_value = "autopilot")]
    saves_to_play: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    tracing::info!("launch");

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = cli.content.clone() {
        config.content_dir = Some(dir);
    }
    if let Some(dir) = cli.saves.clone() {
        config.save_dir = dir;
    }

    let catalog = Arc::new(match &config.content_dir {
        Some(dir) => Catalog::load(dir)?,
        None => Catalog::load_bundled()?,
    });
    let store = SaveStore::new(config.save_dir.clone());
    tracing::info!(saves = ?store.list()?, dir = %store.dir().display(), "save store ready");

    let mut outcomes: Vec<RunOutcome> = Vec::with_capacity(cli.saves_to_play.len());
    for name in &cli.saves_to_play {
        let save = store.load_or_create(name, &catalog, &config)?;
        let (tx, rx) = std::sync::mpsc::channel();
        let mut run = DungeonRun::new(Arc::clone(&catalog), config.clone(), save)
            .with_store(store.clone())
            .with_channel(tx);
        if cli.verbose {
            run = run.with_stdout();
        }

        let outcome = play_save(name, &mut run, &rx, cli.abandon, cli.max_ticks)?;
        print!("{outcome}");
        outcomes.push(outcome);
    }

    if outcomes.len() > 1 {
        println!("{}", OutcomeTally::from(&outcomes));
    }
    Ok(())
}

/// Plays or abandons one save. Dispatched events are logged even when the run
/// fails, so the failing tick's error reaches the log before it propagates.
fn play_save(
    name: &str,
    run: &mut DungeonRun,
    rx: &Receiver<DispatchableEvent>,
    abandon: bool,
    max_ticks: u64,
) -> anyhow::Result<RunOutcome> {
    let result = if abandon {
        run.abandon()
    } else {
        Autopilot
            .play_to_end(run, max_ticks)
            .with_context(|| format!("while playing save {name:?}"))
    };
    log_events(name, rx);
    result
}

fn log_events(name: &str, rx: &Receiver<DispatchableEvent>) {
    for event in rx.try_iter() {
        match event {
            DispatchableEvent::Error(msg) => tracing::error!(save = %name, "{msg}"),
            DispatchableEvent::Warning(msg) => tracing::warn!(save = %name, "{msg}"),
            DispatchableEvent::Log(msg) => tracing::debug!(save = %name, "{msg}"),
            other => tracing::trace!(save = %name, event = ?other),
        }
    }
}
