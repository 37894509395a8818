use derive_more::{Display, Error};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::game::{decide_outcome, Move, Outcome, PlayerId};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundInputs {
    #[serde(rename = "Player1")]
    pub player_1: Move,
    #[serde(rename = "Player2")]
    pub player_2: Move,
}
impl RoundInputs {
    pub fn get(&self, player: PlayerId) -> Move {
        match player {
            PlayerId::Player1 => self.player_1,
            PlayerId::Player2 => self.player_2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    #[serde(rename = "Round")]
    pub round: u32,
    #[serde(rename = "Winner")]
    pub winner: Outcome,
    #[serde(rename = "Inputs")]
    pub inputs: RoundInputs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub player_1_wins: usize,
    pub player_2_wins: usize,
    pub ties: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum HistoryError {
    #[display("record {index} has round {found}, expected {expected}")]
    RoundOutOfSequence {
        index: usize,
        expected: u32,
        found: u32,
    },
    #[display("round {round}: {player} played an unplayable move")]
    UnplayableMove { round: u32, player: PlayerId },
    #[display("round {round}: recorded winner {recorded} but the moves give {expected}")]
    WinnerMismatch {
        round: u32,
        recorded: Outcome,
        expected: Outcome,
    },
}

/// Append-only record of a game, in round order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct History(Vec<RoundRecord>);

impl History {
    pub fn new() -> Self {
        History(Vec::new())
    }

    pub fn with_capacity(rounds: usize) -> Self {
        History(Vec::with_capacity(rounds))
    }

    /// Commit the next round. The round number and winner are derived here so
    /// callers can't break the sequence.
    pub fn record(&mut self, player_1: Move, player_2: Move) -> &RoundRecord {
        let round = self.0.len() as u32 + 1;
        self.0.push(RoundRecord {
            round,
            winner: decide_outcome(player_1, player_2),
            inputs: RoundInputs { player_1, player_2 },
        });
        &self.0[self.0.len() - 1]
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoundRecord> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tally(&self) -> Tally {
        let counts = self.0.iter().map(|record| record.winner).counts();
        Tally {
            player_1_wins: counts.get(&Outcome::Player1).copied().unwrap_or(0),
            player_2_wins: counts.get(&Outcome::Player2).copied().unwrap_or(0),
            ties: counts.get(&Outcome::Tie).copied().unwrap_or(0),
        }
    }

    /// Check a history that came from outside the engine (e.g. read from disk).
    pub fn validate(&self) -> Result<(), HistoryError> {
        for (index, record) in self.0.iter().enumerate() {
            let expected = index as u32 + 1;
            if record.round != expected {
                return Err(HistoryError::RoundOutOfSequence {
                    index,
                    expected,
                    found: record.round,
                });
            }
            for player in [PlayerId::Player1, PlayerId::Player2] {
                if !record.inputs.get(player).is_playable() {
                    return Err(HistoryError::UnplayableMove {
                        round: record.round,
                        player,
                    });
                }
            }
            let outcome = decide_outcome(record.inputs.player_1, record.inputs.player_2);
            if outcome != record.winner {
                return Err(HistoryError::WinnerMismatch {
                    round: record.round,
                    recorded: record.winner,
                    expected: outcome,
                });
            }
        }
        Ok(())
    }
}
