//! Session configuration: rotation tunables and the auto-start switch.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the very first match of a session picks its four players.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMatchStrategy {
    /// Uniform random sample of the eligible players.
    #[default]
    Random,
    /// The first four eligible players in the order they were added.
    EntryOrder,
}

impl FromStr for FirstMatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(FirstMatchStrategy::Random),
            "entry_order" | "entry-order" => Ok(FirstMatchStrategy::EntryOrder),
            other => Err(format!("unknown first match strategy '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start a match from `add_players` when none is running and 4 players are eligible.
    pub auto_start: bool,
    pub first_match: FirstMatchStrategy,
    /// Random splits tried before giving up on avoiding the previous winning pair.
    pub max_split_attempts: u32,
    /// Wins in a row after which a pool of 7+ rotates everyone out.
    pub win_streak_limit: u32,
    /// Participations before a newly-joined player is sent to rest.
    pub newcomer_matches_before_cooldown: u32,
    /// Selections a newly-joined player sits out once the threshold is hit.
    pub newcomer_cooldown: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            first_match: FirstMatchStrategy::Random,
            max_split_attempts: 100,
            win_streak_limit: 2,
            newcomer_matches_before_cooldown: 2,
            newcomer_cooldown: 2,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `SHUFFLER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "SHUFFLER_AUTO_START") {
            config.auto_start = v;
        }
        if let Some(v) = parse_var(&lookup, "SHUFFLER_FIRST_MATCH") {
            config.first_match = v;
        }
        if let Some(v) = parse_var(&lookup, "SHUFFLER_MAX_SPLIT_ATTEMPTS") {
            config.max_split_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "SHUFFLER_WIN_STREAK_LIMIT") {
            config.win_streak_limit = v;
        }
        if let Some(v) = parse_var(&lookup, "SHUFFLER_NEWCOMER_MATCHES") {
            config.newcomer_matches_before_cooldown = v;
        }
        if let Some(v) = parse_var(&lookup, "SHUFFLER_NEWCOMER_COOLDOWN") {
            config.newcomer_cooldown = v;
        }
        config
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
