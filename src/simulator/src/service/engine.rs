use std::{sync::Arc, time::Duration};

use agent::{
    client::{PlayerError, PlayerHandle},
    strategy::Strategy,
};
use common::model::history::History;
use derive_more::{Display, Error};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("round {round}: {source}")]
pub struct EngineError {
    pub round: u32,
    pub source: PlayerError,
}

/// Play `num_rounds` rounds between two in-process strategies.
///
/// Player one is always asked first, and both players see only the rounds
/// committed before the current one.
pub fn simulate<A, B>(player_one: &mut A, player_two: &mut B, num_rounds: u32) -> History
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
{
    let mut history = History::with_capacity(num_rounds as usize);
    for _ in 0..num_rounds {
        let p1_move = player_one.make_move(&history);
        let p2_move = player_two.make_move(&history);
        history.record(p1_move, p2_move);
    }
    history
}

// Same loop as `simulate`, but each player lives on its own worker task.
pub struct RoundEngine {
    player_one: PlayerHandle,
    player_two: PlayerHandle,
    move_timeout: Duration,
}

impl RoundEngine {
    pub fn new(player_one: PlayerHandle, player_two: PlayerHandle, move_timeout: Duration) -> Self {
        RoundEngine {
            player_one,
            player_two,
            move_timeout,
        }
    }

    pub async fn run(&self, num_rounds: u32) -> Result<History, EngineError> {
        // Workers drop their snapshot before replying, so by the time both
        // moves are in the engine holds the only reference and can append in place.
        let mut history = Arc::new(History::with_capacity(num_rounds as usize));
        for round in 1..=num_rounds {
            let p1_move = self
                .player_one
                .request_move(round, Arc::clone(&history), self.move_timeout)
                .await
                .map_err(|source| EngineError { round, source })?;
            let p2_move = self
                .player_two
                .request_move(round, Arc::clone(&history), self.move_timeout)
                .await
                .map_err(|source| EngineError { round, source })?;

            let record = Arc::make_mut(&mut history).record(p1_move, p2_move);
            debug!(
                "Round {}: {} vs {} -> {}",
                record.round, p1_move, p2_move, record.winner
            );
        }
        let history = Arc::try_unwrap(history).unwrap_or_else(|shared| (*shared).clone());
        info!("Played {} rounds", history.len());
        Ok(history)
    }

    /// Stop both workers. Each gets one move timeout to wind down before it
    /// is aborted.
    pub async fn shutdown(self) {
        self.player_one.shutdown(self.move_timeout).await;
        self.player_two.shutdown(self.move_timeout).await;
    }
}
