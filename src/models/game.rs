//! Match (game), team pairs, team sides and the match history record.

use crate::models::session::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of the court won the match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[serde(alias = "A")]
    A,
    #[serde(alias = "B")]
    B,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl FromStr for TeamSide {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(TeamSide::A),
            "B" | "b" => Ok(TeamSide::B),
            other => Err(SessionError::UnknownTeam(other.to_string())),
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

/// Two distinct player names, stored sorted so equal pairs compare equal
/// regardless of the order they were drawn in.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TeamPair([String; 2]);

impl TeamPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self([a, b])
        } else {
            Self([b, a])
        }
    }

    pub fn names(&self) -> &[String; 2] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

impl std::fmt::Display for TeamPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} & {}", self.0[0], self.0[1])
    }
}

/// The match in progress: two teams of two, four distinct players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Session-wide sequence number of this match (starts at 1).
    pub number: u32,
    pub team_a: TeamPair,
    pub team_b: TeamPair,
    /// Set when the anti-repeat-winner split search ran out of attempts.
    pub fairness_degraded: bool,
}

impl GameMatch {
    pub fn new(number: u32, team_a: TeamPair, team_b: TeamPair) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            team_a,
            team_b,
            fairness_degraded: false,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamPair {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    /// All four participants, team A first.
    pub fn players(&self) -> impl Iterator<Item = &String> {
        self.team_a.names().iter().chain(self.team_b.names().iter())
    }

    pub fn involves(&self, name: &str) -> bool {
        self.team_a.contains(name) || self.team_b.contains(name)
    }
}

/// A finished match. Appended to the history and never changed afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub number: u32,
    pub team_a: TeamPair,
    pub team_b: TeamPair,
    pub winner: TeamSide,
    pub winning_team: TeamPair,
    pub losing_team: TeamPair,
    pub played_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn from_match(m: &GameMatch, winner: TeamSide) -> Self {
        Self {
            id: m.id,
            number: m.number,
            team_a: m.team_a.clone(),
            team_b: m.team_b.clone(),
            winner,
            winning_team: m.team(winner).clone(),
            losing_team: m.team(winner.other()).clone(),
            played_at: Utc::now(),
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.team_a.contains(name) || self.team_b.contains(name)
    }
}

/// Consecutive wins by one exact pair. Any other pair winning starts a new streak.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WinStreak {
    pub pair: TeamPair,
    pub count: u32,
    /// Set once the pair has been rotated out for hitting the limit; cleared on their next win.
    pub rotated_out: bool,
}
