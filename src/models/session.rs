//! Session: roster, current match, history and rotation state.

use crate::config::SessionConfig;
use crate::models::game::{GameMatch, MatchRecord, WinStreak};
use crate::models::player::{Player, PlayerStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Errors that can occur during session operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// A result was submitted while no match is in progress.
    NoCurrentMatch,
    /// A team label other than A or B.
    UnknownTeam(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoCurrentMatch => write!(f, "No match in progress"),
            SessionError::UnknownTeam(label) => {
                write!(f, "Unknown team '{}' (expected A or B)", label)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Non-fatal conditions reported by the last operation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Fewer than 4 eligible players; no match was started.
    InsufficientPlayers { eligible: usize },
    /// The previous winners would stay on, but fewer than 2 players are waiting to join them.
    NotEnoughWaiting { waiting: usize },
    /// Full rotation needs 4 eligible players outside the previous winning pair.
    NotEnoughForRotation { eligible: usize },
    /// No split avoiding the previous winning pair was found; teams were used anyway.
    FairnessDegraded { attempts: u32 },
    /// `start_match` was called while match `number` is still being played.
    MatchInProgress { number: u32 },
    /// The match in progress lost a player to removal and was dropped.
    MatchInvalidated { removed: Vec<String> },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::InsufficientPlayers { eligible } => {
                write!(f, "Not enough eligible players (min 4, have {})", eligible)
            }
            Warning::NotEnoughWaiting { waiting } => write!(
                f,
                "Not enough waiting players to complete a match with the winning pair (have {})",
                waiting
            ),
            Warning::NotEnoughForRotation { eligible } => write!(
                f,
                "Not enough eligible players for a full rotation (need 4, have {})",
                eligible
            ),
            Warning::FairnessDegraded { attempts } => write!(
                f,
                "Could not avoid the previous winning team after {} attempts; proceeding anyway",
                attempts
            ),
            Warning::MatchInProgress { number } => {
                write!(f, "Match {} is still in progress; submit its result first", number)
            }
            Warning::MatchInvalidated { removed } => write!(
                f,
                "Current match dropped, removed players: {}",
                removed.join(", ")
            ),
        }
    }
}

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Full session state. One instance per logical session; every operation
/// takes it by `&mut` and runs to completion.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub config: SessionConfig,
    #[serde(skip)]
    pub(crate) rng: StdRng,
    /// Every player ever added, in insertion order (removed ones included).
    pub players: Vec<Player>,
    pub current_match: Option<GameMatch>,
    /// Eligible players not in the current match.
    pub waiting: Vec<String>,
    pub history: Vec<MatchRecord>,
    pub win_streak: Option<WinStreak>,
    /// Number the next match will get; starts at 1.
    pub next_match_number: u32,
    /// Warnings produced by the last operation.
    pub warnings: Vec<Warning>,
}

impl Session {
    /// Create an empty session with an entropy-seeded random source.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, fresh_rng())
    }

    /// Create an empty session whose selections are reproducible for a given seed.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            players: Vec::new(),
            current_match: None,
            waiting: Vec::new(),
            history: Vec::new(),
            win_streak: None,
            next_match_number: 1,
            warnings: Vec::new(),
        }
    }

    /// Drop all players, matches and counters. Config and random source are kept.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        *self = Self::with_rng(config, rng);
        log::info!("Session reset");
    }

    /// Player by name, removed ones included.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.player(name).is_some()
    }

    /// Players that have not been removed.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.removed)
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Removed players with their frozen stats.
    pub fn removed_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.removed)
    }

    /// Active players currently resting.
    pub fn cooldown_players(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(|p| !p.removed && p.cooldown_remaining > 0)
    }

    /// Active, not resting.
    pub fn eligible_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_eligible())
    }

    pub fn current_match(&self) -> Option<&GameMatch> {
        self.current_match.as_ref()
    }

    pub fn waiting_players(&self) -> &[String] {
        &self.waiting
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Report rows for every player ever added, in insertion order.
    pub fn player_stats(&self) -> Vec<PlayerStats> {
        self.players.iter().map(Player::stats).collect()
    }

    /// Rebuild the waiting list: eligible players outside the current match, roster order.
    pub(crate) fn refresh_waiting(&mut self) {
        let current = self.current_match.as_ref();
        self.waiting = self
            .players
            .iter()
            .filter(|p| p.is_eligible())
            .filter(|p| current.map_or(true, |m| !m.involves(&p.name)))
            .map(|p| p.name.clone())
            .collect();
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
