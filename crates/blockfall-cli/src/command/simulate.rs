use std::io::{self, Write as _};

use anyhow::Context;
use blockfall_engine::{ConfigError, Game, GameConfig, Intent, SpawnSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::GameArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) game: GameArg,
    /// Maximum number of gravity steps to run
    #[clap(long, default_value_t = 1000)]
    steps: usize,
    /// Random intents applied before each gravity step
    #[clap(long, default_value_t = 2)]
    intents_per_step: usize,
}

/// Result of a headless run, printed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SimulationSummary {
    seed: SpawnSeed,
    steps: usize,
    completed_pieces: usize,
    cleared_rows: usize,
    game_over: bool,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    util::init_stderr_logging()?;

    let config = arg.game.load_config()?;
    let seed = arg.game.seed();
    let summary = simulate(config, seed, arg.steps, arg.intents_per_step)
        .context("Invalid game configuration")?;
    tracing::info!(
        steps = summary.steps,
        game_over = summary.game_over,
        "simulation finished"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary)
        .context("Failed to write simulation summary")?;
    writeln!(stdout).context("Failed to write simulation summary")?;
    Ok(())
}

/// Plays a game with random intents until it is over or `max_steps` gravity
/// steps have run.
///
/// Intents are drawn from a generator seeded with the byte-reversed spawn
/// seed, so a seed reproduces the whole run.
pub(crate) fn simulate(
    config: GameConfig,
    seed: SpawnSeed,
    max_steps: usize,
    intents_per_step: usize,
) -> Result<SimulationSummary, ConfigError> {
    let mut game = Game::with_seed(config, seed)?;
    let mut input_rng = Pcg32::from_seed(seed.to_u128().to_le_bytes());

    let mut steps = 0;
    while steps < max_steps && !game.is_game_over() {
        for _ in 0..intents_per_step {
            let intent = Intent::ALL[input_rng.random_range(0..Intent::ALL.len())];
            game.apply_intent(intent);
        }
        game.step_gravity();
        steps += 1;
    }

    Ok(SimulationSummary {
        seed,
        steps,
        completed_pieces: game.stats().completed_pieces(),
        cleared_rows: game.stats().cleared_rows(),
        game_over: game.is_game_over(),
    })
}
