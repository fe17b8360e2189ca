//! Result processing: stats, win streak, newcomer cooldown, history, next match.

use crate::logic::selection::select_next;
use crate::models::{MatchRecord, Session, SessionError, TeamSide, WinStreak};

/// Record the outcome of the current match and select the next one.
///
/// Participants removed since the match started are skipped when updating
/// stats. Fails with [`SessionError::NoCurrentMatch`] and changes nothing if
/// no match is in progress. Warnings from the follow-up selection are left in
/// [`Session::warnings`].
pub fn submit_result(
    session: &mut Session,
    winner: TeamSide,
) -> Result<MatchRecord, SessionError> {
    session.warnings.clear();
    let current = session
        .current_match
        .take()
        .ok_or(SessionError::NoCurrentMatch)?;
    let record = MatchRecord::from_match(&current, winner);

    for name in current.players() {
        if let Some(p) = session.get_player_mut(name).filter(|p| !p.removed) {
            p.record_played(current.number);
        }
    }
    for name in record.winning_team.names() {
        if let Some(p) = session.get_player_mut(name).filter(|p| !p.removed) {
            p.add_win();
        }
    }

    let streak = match session.win_streak.take() {
        Some(mut s) if s.pair == record.winning_team => {
            s.count += 1;
            s.rotated_out = false;
            s
        }
        _ => WinStreak {
            pair: record.winning_team.clone(),
            count: 1,
            rotated_out: false,
        },
    };
    log::debug!("{} win streak: {}", streak.pair, streak.count);
    session.win_streak = Some(streak);

    let threshold = session.config.newcomer_matches_before_cooldown;
    let cooldown = session.config.newcomer_cooldown;
    for name in current.players() {
        if let Some(p) = session.get_player_mut(name).filter(|p| !p.removed) {
            if p.advance_newcomer(threshold, cooldown) {
                log::info!("{} rests for {} matches after joining", p.name, cooldown);
            }
        }
    }

    log::info!(
        "Match {} won by team {} ({})",
        record.number,
        winner,
        record.winning_team
    );
    session.history.push(record.clone());

    session.next_match_number += 1;
    let _ = select_next(session);
    Ok(record)
}
