//! Next-match selection: cooldown bookkeeping, then one of four strategies
//! picked by the size of the active pool.
//!
//! 1. First match of the session: sample (or take in entry order) any 4 eligible players.
//! 2. Exactly 4 active: the same 4 play again, teams reshuffled.
//! 3. 5 or 6 active: the 4 least-played, longest-waiting players; teams split
//!    so the previous winning pair is not kept together.
//! 4. 7 or more active: winners stay on against 2 waiting players until their
//!    streak hits the limit, then 4 fresh players rotate in.
//!
//! Newly joined players are drawn ahead of everyone else whenever a draw is random.

use crate::config::FirstMatchStrategy;
use crate::models::{GameMatch, MatchRecord, Player, Session, TeamPair, Warning};
use rand::seq::SliceRandom;
use rand::Rng;

/// Select the next match from the eligible pool.
///
/// On success the match becomes the session's current match. `Err` is the
/// no-match outcome: the current match is cleared and the reason is also
/// kept in [`Session::warnings`]. Cooldowns tick down regardless of outcome.
///
/// While a match is in progress nothing is selected: the call fails with
/// [`Warning::MatchInProgress`] and leaves the session as it was.
pub fn start_match(session: &mut Session) -> Result<GameMatch, Warning> {
    session.warnings.clear();
    if let Some(m) = &session.current_match {
        let w = Warning::MatchInProgress { number: m.number };
        session.warn(w.clone());
        return Err(w);
    }
    select_next(session)
}

/// [`start_match`] without clearing warnings, for operations that chain into it.
pub(crate) fn select_next(session: &mut Session) -> Result<GameMatch, Warning> {
    tick_cooldowns(session);

    let result = pick_match(session);
    match &result {
        Ok(m) => {
            log::info!("Match {}: {} vs {}", m.number, m.team_a, m.team_b);
            session.current_match = Some(m.clone());
        }
        Err(w) => {
            session.current_match = None;
            session.warn(w.clone());
        }
    }
    session.refresh_waiting();
    result
}

fn tick_cooldowns(session: &mut Session) {
    for p in session.players.iter_mut().filter(|p| !p.removed) {
        if p.tick_cooldown() {
            log::debug!("{} is back from cooldown", p.name);
        }
    }
}

fn pick_match(session: &mut Session) -> Result<GameMatch, Warning> {
    let eligible: Vec<String> = session
        .eligible_players()
        .map(|p| p.name.clone())
        .collect();
    if eligible.len() < 4 {
        return Err(Warning::InsufficientPlayers {
            eligible: eligible.len(),
        });
    }

    let number = session.next_match_number;
    let Some(last) = session.history.last().cloned() else {
        let four: Vec<String> = match session.config.first_match {
            FirstMatchStrategy::Random => eligible
                .choose_multiple(&mut session.rng, 4)
                .cloned()
                .collect(),
            FirstMatchStrategy::EntryOrder => eligible[..4].to_vec(),
        };
        log::debug!("First match of the session: {}", four.join(", "));
        return Ok(shuffled_match(session, number, four));
    };

    match session.active_count() {
        4 => {
            log::debug!("Four active players, reshuffling teams");
            Ok(shuffled_match(session, number, eligible))
        }
        5 | 6 => Ok(fair_match(session, number, &last.winning_team)),
        _ => rotation_match(session, number, &eligible, &last),
    }
}

/// Random 2-2 split of exactly four players.
fn shuffled_match(session: &mut Session, number: u32, mut four: Vec<String>) -> GameMatch {
    four.shuffle(&mut session.rng);
    let (team_a, team_b) = split(&four);
    GameMatch::new(number, team_a, team_b)
}

fn split(four: &[String]) -> (TeamPair, TeamPair) {
    (
        TeamPair::new(four[0].as_str(), four[1].as_str()),
        TeamPair::new(four[2].as_str(), four[3].as_str()),
    )
}

/// Draw `k` names from `pool`, newly joined players first, random within each group.
fn draw_preferring_newcomers(session: &mut Session, pool: &[String], k: usize) -> Vec<String> {
    let (mut drawn, mut rest): (Vec<String>, Vec<String>) = pool
        .iter()
        .cloned()
        .partition(|n| session.player(n).map_or(false, Player::is_newcomer));
    drawn.shuffle(&mut session.rng);
    rest.shuffle(&mut session.rng);
    drawn.extend(rest);
    drawn.truncate(k);
    drawn
}

/// The 4 eligible players with the fewest matches, longest wait first.
/// Never-played players sort ahead of everyone, then newcomers; remaining ties are random.
fn pick_fair_four(session: &mut Session) -> Vec<String> {
    let rng = &mut session.rng;
    let mut ranked: Vec<(&Player, u32)> = session
        .players
        .iter()
        .filter(|p| p.is_eligible())
        .map(|p| (p, rng.gen::<u32>()))
        .collect();
    ranked.sort_by_key(|(p, t)| (p.matches_played, p.last_played_at, !p.is_newcomer(), *t));
    ranked
        .into_iter()
        .take(4)
        .map(|(p, _)| p.name.clone())
        .collect()
}

fn fair_match(session: &mut Session, number: u32, previous_winners: &TeamPair) -> GameMatch {
    let mut four = pick_fair_four(session);
    let attempts = session.config.max_split_attempts;

    for _ in 0..attempts {
        four.shuffle(&mut session.rng);
        let (team_a, team_b) = split(&four);
        if team_a != *previous_winners && team_b != *previous_winners {
            return GameMatch::new(number, team_a, team_b);
        }
    }

    // Out of attempts: keep the last split tried.
    let (team_a, team_b) = split(&four);
    if team_a != *previous_winners && team_b != *previous_winners {
        return GameMatch::new(number, team_a, team_b);
    }
    let mut m = GameMatch::new(number, team_a, team_b);
    m.fairness_degraded = true;
    session.warn(Warning::FairnessDegraded { attempts });
    m
}

fn rotation_match(
    session: &mut Session,
    number: u32,
    eligible: &[String],
    last: &MatchRecord,
) -> Result<GameMatch, Warning> {
    let winners = &last.winning_team;
    let limit = session.config.win_streak_limit;
    let (streak, rotated_out) = session
        .win_streak
        .as_ref()
        .filter(|s| s.pair == *winners)
        .map_or((0, false), |s| (s.count, s.rotated_out));
    let winners_available = winners
        .names()
        .iter()
        .all(|n| eligible.contains(n));

    if winners_available && streak < limit && !rotated_out {
        let waiting: Vec<String> = eligible
            .iter()
            .filter(|n| !last.involves(n))
            .cloned()
            .collect();
        if waiting.len() < 2 {
            return Err(Warning::NotEnoughWaiting {
                waiting: waiting.len(),
            });
        }
        let joining = draw_preferring_newcomers(session, &waiting, 2);
        log::debug!("{} stay on (streak {})", winners, streak);
        return Ok(GameMatch::new(
            number,
            winners.clone(),
            TeamPair::new(joining[0].as_str(), joining[1].as_str()),
        ));
    }

    if streak >= limit {
        log::info!("{} won {} in a row, rotating everyone out", winners, streak);
        if let Some(s) = session.win_streak.as_mut() {
            s.count = 0;
            s.rotated_out = true;
        }
    }

    let pool: Vec<String> = eligible
        .iter()
        .filter(|n| !winners.contains(n))
        .cloned()
        .collect();
    if pool.len() < 4 {
        return Err(Warning::NotEnoughForRotation {
            eligible: pool.len(),
        });
    }
    let four = draw_preferring_newcomers(session, &pool, 4);
    Ok(shuffled_match(session, number, four))
}
