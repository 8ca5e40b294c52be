use std::path::PathBuf;

use anyhow::Context;
use blockfall_engine::Game;

use self::app::PlayApp;
use crate::{command::GameArg, tui::Runtime, util};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) game: GameArg,
    /// Write log output to this file (the terminal is used by the game)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { game, log_file } = arg;

    if let Some(path) = log_file {
        util::init_file_logging(path)?;
    }

    let config = game.load_config()?;
    let seed = game.seed();
    let game = Game::with_seed(config, seed).context("Invalid game configuration")?;
    tracing::info!(%seed, "starting game");

    let mut app = PlayApp::new(game);
    Runtime::new()
        .run(&mut app)
        .context("Failed to run terminal UI")?;

    let stats = app.game().stats();
    tracing::info!(
        completed_pieces = stats.completed_pieces(),
        cleared_rows = stats.cleared_rows(),
        "session ended"
    );
    Ok(())
}
