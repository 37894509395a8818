use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use agent::{
    client::Client,
    strategy::{MirrorOpponent, RandomMove},
};
use anyhow::{bail, Context};
use common::model::{game::PlayerId, history::History};
use tracing::{debug, error, info};

use crate::service::{
    engine::{EngineError, RoundEngine},
    history_sink::{pretty, JsonFileSink},
};

pub const DEFAULT_ROUNDS: u32 = 100;
pub const DEFAULT_OUTPUT: &str = "rps.json";
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub rounds: u32,
    pub output: PathBuf,
    // Wall-clock seed when unset
    pub seed: Option<u64>,
    pub move_timeout: Duration,
    pub print: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            rounds: DEFAULT_ROUNDS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
            print: false,
        }
    }
}

pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Spawn both players, play every round, and stop the workers.
pub async fn play(rounds: u32, seed: u64, move_timeout: Duration) -> Result<History, EngineError> {
    let player_one = Client::new(PlayerId::Player1, Box::new(RandomMove::seeded(seed))).spawn();
    let player_two = Client::new(PlayerId::Player2, Box::new(MirrorOpponent::default())).spawn();
    let engine = RoundEngine::new(player_one, player_two, move_timeout);

    let result = engine.run(rounds).await;
    engine.shutdown().await;
    result
}

/// Run a full simulation and hand the history to the sink. A sink failure is
/// logged and the history is still returned.
pub async fn run(config: SimulationConfig) -> anyhow::Result<History> {
    let seed = config.seed.unwrap_or_else(seed_from_clock);
    info!("Simulating {} rounds with seed {}", config.rounds, seed);

    let history = play(config.rounds, seed, config.move_timeout)
        .await
        .context("Simulation aborted")?;
    let tally = history.tally();
    info!(
        "Player1 won {}, Player2 won {}, {} ties",
        tally.player_1_wins, tally.player_2_wins, tally.ties
    );

    match pretty(&history) {
        Ok(text) => {
            debug!("History:\n{}", text);
            if config.print {
                println!("{}", text);
            }
        }
        Err(e) => error!("{}", e),
    }

    match JsonFileSink::new(&config.output).and_then(|sink| {
        sink.write(&history)?;
        Ok(sink)
    }) {
        Ok(sink) => info!("Game history saved to {}", sink.path().display()),
        Err(e) => error!("Failed to save game history: {}", e),
    }

    Ok(history)
}

/// Load a saved history and make sure it is well formed.
pub fn check(path: &Path, expected_rounds: Option<u32>) -> anyhow::Result<History> {
    let sink = JsonFileSink::new(path)?;
    let history = sink.load()?;
    history
        .validate()
        .with_context(|| format!("{} is not a valid history", sink.path().display()))?;
    if let Some(expected) = expected_rounds {
        if history.len() != expected as usize {
            bail!(
                "{} has {} rounds, expected {}",
                sink.path().display(),
                history.len(),
                expected
            );
        }
    }
    let tally = history.tally();
    info!(
        "{}: {} rounds, Player1 won {}, Player2 won {}, {} ties",
        sink.path().display(),
        history.len(),
        tally.player_1_wins,
        tally.player_2_wins,
        tally.ties
    );
    Ok(history)
}
