use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerId {
    Player1,
    Player2,
}
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Player1 => write!(f, "Player1"),
            PlayerId::Player2 => write!(f, "Player2"),
        }
    }
}

/// Result of a single round, named after the winning seat.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Tie,
    Player1,
    Player2,
}
impl Outcome {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Tie => None,
            Outcome::Player1 => Some(PlayerId::Player1),
            Outcome::Player2 => Some(PlayerId::Player2),
        }
    }

    /// Exchange the two player labels, as if the seats were swapped.
    pub fn swapped(self) -> Outcome {
        match self {
            Outcome::Tie => Outcome::Tie,
            Outcome::Player1 => Outcome::Player2,
            Outcome::Player2 => Outcome::Player1,
        }
    }
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Tie => write!(f, "Tie"),
            Outcome::Player1 => write!(f, "Player1"),
            Outcome::Player2 => write!(f, "Player2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    // Anything we could not parse
    Unknown,
}
impl Move {
    pub const PLAYABLE: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Unknown => "unknown",
        }
    }

    /// Case-insensitive lookup. Never fails: unrecognised names become `Unknown`.
    pub fn from_name(name: &str) -> Move {
        match name.to_ascii_lowercase().as_str() {
            "rock" => Move::Rock,
            "paper" => Move::Paper,
            "scissors" => Move::Scissors,
            _ => Move::Unknown,
        }
    }

    pub fn is_playable(&self) -> bool {
        !matches!(self, Move::Unknown)
    }

    pub fn beats(&self, other: &Move) -> Option<bool> {
        if self == other || !self.is_playable() || !other.is_playable() {
            None
        } else {
            Some(matches!(
                (self, other),
                (Move::Rock, Move::Scissors)
                    | (Move::Scissors, Move::Paper)
                    | (Move::Paper, Move::Rock)
            ))
        }
    }
}
impl From<&str> for Move {
    fn from(name: &str) -> Self {
        Move::from_name(name)
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Move::from_name(&name))
    }
}

/// Rule table for a single round. Total: any draw, including one involving
/// `Unknown`, is a tie.
pub fn decide_outcome(player_1: Move, player_2: Move) -> Outcome {
    match player_1.beats(&player_2) {
        Some(true) => Outcome::Player1,
        Some(false) => Outcome::Player2,
        None => Outcome::Tie,
    }
}
