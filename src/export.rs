//! CSV reports: match history and per-player stats.

use crate::models::{PlayerStatus, Session};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct HistoryRow<'a> {
    number: u32,
    team_a: String,
    team_b: String,
    winner: String,
    winning_team: String,
    played_at: &'a str,
}

#[derive(Serialize)]
struct StatsRow<'a> {
    name: &'a str,
    matches_played: u32,
    wins: u32,
    cooldown_remaining: u32,
    status: &'static str,
}

fn status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Active => "active",
        PlayerStatus::Cooldown => "cooldown",
        PlayerStatus::Removed => "removed",
    }
}

/// One row per finished match, oldest first.
pub fn write_history_csv<W: Write>(session: &Session, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in session.history() {
        let played_at = record.played_at.to_rfc3339();
        wtr.serialize(HistoryRow {
            number: record.number,
            team_a: record.team_a.to_string(),
            team_b: record.team_b.to_string(),
            winner: record.winner.to_string(),
            winning_team: record.winning_team.to_string(),
            played_at: &played_at,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per player ever added, removed players included.
pub fn write_player_stats_csv<W: Write>(session: &Session, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for p in &session.players {
        wtr.serialize(StatsRow {
            name: &p.name,
            matches_played: p.matches_played,
            wins: p.wins,
            cooldown_remaining: p.cooldown_remaining,
            status: status_label(p.status()),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
