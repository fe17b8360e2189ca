//! Roster changes: adding and removing players mid-session.

use crate::logic::selection::select_next;
use crate::models::{Player, Session, Warning};
use serde::Serialize;

/// Names accepted and names turned away by [`add_players`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AddOutcome {
    pub added: Vec<String>,
    /// Already present, previously removed, or repeated within the same call.
    pub skipped: Vec<String>,
}

/// Split a comma-separated entry into trimmed, non-empty names.
pub fn split_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add players by name. Whitespace is trimmed and empty entries dropped.
///
/// Players joining once the session is underway (a match has been started)
/// are tagged newly joined. With `auto_start` on, a match is started when
/// none is in progress and at least 4 players are eligible.
pub fn add_players<S: AsRef<str>>(session: &mut Session, names: &[S]) -> AddOutcome {
    session.warnings.clear();
    let underway = session.current_match.is_some() || !session.history.is_empty();
    let joined_at = session.next_match_number;

    let mut outcome = AddOutcome::default();
    for name in names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()) {
        if session.contains(name) {
            outcome.skipped.push(name.to_string());
            continue;
        }
        let player = if underway {
            Player::newcomer(name, joined_at)
        } else {
            Player::new(name, joined_at)
        };
        session.players.push(player);
        outcome.added.push(name.to_string());
    }

    if !outcome.added.is_empty() {
        log::info!("Added players: {}", outcome.added.join(", "));
    }
    if !outcome.skipped.is_empty() {
        log::info!("Already present or removed: {}", outcome.skipped.join(", "));
    }
    session.refresh_waiting();

    let eligible = session.eligible_players().count();
    if session.config.auto_start
        && !outcome.added.is_empty()
        && session.current_match.is_none()
        && eligible >= 4
    {
        log::debug!("Auto-starting a match with {} eligible players", eligible);
        let _ = select_next(session);
    }
    outcome
}

/// Flag players as removed. Unknown or already removed names are ignored.
///
/// Removing anyone from the match in progress drops that match; the caller
/// is expected to start a new one. Returns the names actually removed.
pub fn remove_players<S: AsRef<str>>(session: &mut Session, names: &[S]) -> Vec<String> {
    session.warnings.clear();
    let mut removed = Vec::new();
    for name in names.iter().map(|n| n.as_ref().trim()) {
        match session.get_player_mut(name) {
            Some(p) if !p.removed => {
                p.remove();
                removed.push(name.to_string());
            }
            Some(_) => log::debug!("{} is already removed", name),
            None => log::debug!("{} is not in the roster", name),
        }
    }
    if removed.is_empty() {
        return removed;
    }
    log::info!("Removed players: {}", removed.join(", "));

    let hit: Vec<String> = match &session.current_match {
        Some(m) => removed.iter().filter(|n| m.involves(n)).cloned().collect(),
        None => Vec::new(),
    };
    if !hit.is_empty() {
        session.current_match = None;
        session.warn(Warning::MatchInvalidated { removed: hit });
    }
    session.refresh_waiting();
    removed
}
