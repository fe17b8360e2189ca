//! Player and PlayerStats data structures.

use serde::{Deserialize, Serialize};

/// Where a player currently stands in the rotation (for the stats report).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Cooldown,
    Removed,
}

/// Statistics view of a player (for API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub cooldown_remaining: u32,
    pub status: PlayerStatus,
}

impl PlayerStats {
    pub fn from_player(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            matches_played: p.matches_played,
            wins: p.wins,
            cooldown_remaining: p.cooldown_remaining,
            status: p.status(),
        }
    }
}

/// A player in the session, keyed by name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    /// Number of the last match this player took part in; None if never played.
    pub last_played_at: Option<u32>,
    /// Number of the match in progress (or next to be played) when the player was added.
    pub joined_at_match: u32,
    /// Upcoming selections this player sits out.
    pub cooldown_remaining: u32,
    /// Participations counted while still tracked as newly joined.
    pub newcomer_matches: Option<u32>,
    /// Removed players keep their stats but are never selected again.
    pub removed: bool,
}

impl Player {
    /// Create a new player with the given name. Counters start at zero.
    pub fn new(name: impl Into<String>, joined_at_match: u32) -> Self {
        Self {
            name: name.into(),
            matches_played: 0,
            wins: 0,
            last_played_at: None,
            joined_at_match,
            cooldown_remaining: 0,
            newcomer_matches: None,
            removed: false,
        }
    }

    /// Same as [`Player::new`], but tagged for the newly-joined cooldown rule.
    pub fn newcomer(name: impl Into<String>, joined_at_match: u32) -> Self {
        Self {
            newcomer_matches: Some(0),
            ..Self::new(name, joined_at_match)
        }
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> PlayerStats {
        PlayerStats::from_player(self)
    }

    pub fn status(&self) -> PlayerStatus {
        if self.removed {
            PlayerStatus::Removed
        } else if self.cooldown_remaining > 0 {
            PlayerStatus::Cooldown
        } else {
            PlayerStatus::Active
        }
    }

    /// Not removed and not resting.
    pub fn is_eligible(&self) -> bool {
        !self.removed && self.cooldown_remaining == 0
    }

    /// Still inside the newly-joined fast-track.
    pub fn is_newcomer(&self) -> bool {
        self.newcomer_matches.is_some()
    }

    /// Record participation in match number `number`.
    pub fn record_played(&mut self, number: u32) {
        self.matches_played += 1;
        self.last_played_at = Some(number);
    }

    /// Record a win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Count one participation towards the newly-joined rule. Returns true when
    /// the player has just reached `threshold` and now rests for `cooldown` selections.
    pub fn advance_newcomer(&mut self, threshold: u32, cooldown: u32) -> bool {
        let Some(count) = self.newcomer_matches.as_mut() else {
            return false;
        };
        *count += 1;
        if *count < threshold {
            return false;
        }
        self.newcomer_matches = None;
        self.cooldown_remaining = cooldown;
        true
    }

    /// One selection attempt has passed. Returns true if this ended the cooldown.
    pub fn tick_cooldown(&mut self) -> bool {
        if self.cooldown_remaining == 0 {
            return false;
        }
        self.cooldown_remaining -= 1;
        self.cooldown_remaining == 0
    }

    /// Mark the player as removed. Stats are frozen from here on.
    pub fn remove(&mut self) {
        self.removed = true;
    }
}
