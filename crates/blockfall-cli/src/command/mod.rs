use std::path::PathBuf;

use blockfall_engine::{GameConfig, SpawnSeed};
use clap::{Parser, Subcommand};
use rand::Rng as _;

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with random input and print a JSON summary
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Game settings shared by every mode.
///
/// Settings are layered: built-in defaults, then the `--config` file, then
/// the individual flags.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Game configuration file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of rows on the board
    #[clap(long)]
    rows: Option<usize>,
    /// Number of columns on the board
    #[clap(long)]
    columns: Option<usize>,
    /// Seconds between two gravity steps
    #[clap(long)]
    fall_interval: Option<f64>,
    /// Seed for the piece sequence (32 hex digits)
    #[clap(long)]
    seed: Option<SpawnSeed>,
}

impl GameArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("game config", path)?,
            None => GameConfig::default(),
        };
        if let Some(rows) = self.rows {
            config = config.with_rows(rows);
        }
        if let Some(columns) = self.columns {
            config = config.with_columns(columns);
        }
        if let Some(secs) = self.fall_interval {
            config = config.with_fall_interval_secs(secs);
        }
        Ok(config)
    }

    pub(crate) fn seed(&self) -> SpawnSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
