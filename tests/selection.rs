//! Integration tests for match selection across pool sizes.

use badminton_shuffler::{
    add_players, remove_players, start_match, submit_result, FirstMatchStrategy, GameMatch,
    Session, SessionConfig, TeamSide, Warning,
};
use std::collections::BTreeSet;

fn manual_config() -> SessionConfig {
    SessionConfig {
        auto_start: false,
        ..SessionConfig::default()
    }
}

fn session_of(n: usize, config: SessionConfig, seed: u64) -> Session {
    let names: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
    let mut s = Session::with_seed(config, seed);
    add_players(&mut s, &names);
    s
}

fn players_of(m: &GameMatch) -> BTreeSet<String> {
    m.players().cloned().collect()
}

fn current(s: &Session) -> GameMatch {
    s.current_match().cloned().expect("a match should be in progress")
}

#[test]
fn fewer_than_four_is_a_warning_not_an_error() {
    let mut s = session_of(3, manual_config(), 1);
    let result = start_match(&mut s);
    assert_eq!(result, Err(Warning::InsufficientPlayers { eligible: 3 }));
    assert!(s.current_match().is_none());
    assert_eq!(s.warnings(), &[Warning::InsufficientPlayers { eligible: 3 }]);
    assert_eq!(s.waiting_players().len(), 3);
}

#[test]
fn first_match_entry_order_takes_first_four() {
    let config = SessionConfig {
        first_match: FirstMatchStrategy::EntryOrder,
        ..manual_config()
    };
    let mut s = session_of(6, config, 2);
    let m = start_match(&mut s).unwrap();
    let expected: BTreeSet<String> = ["P0", "P1", "P2", "P3"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(players_of(&m), expected);
    assert_eq!(s.waiting_players(), &["P4", "P5"]);
}

#[test]
fn first_match_random_picks_four_distinct_players() {
    for seed in 0..20 {
        let mut s = session_of(9, manual_config(), seed);
        let m = start_match(&mut s).unwrap();
        let picked = players_of(&m);
        assert_eq!(picked.len(), 4);
        assert_ne!(m.team_a, m.team_b);
        assert_eq!(s.waiting_players().len(), 5);
        assert!(s.waiting_players().iter().all(|w| !picked.contains(w)));
        assert_eq!(m.number, 1);
    }
}

#[test]
fn pool_of_four_always_plays_the_same_four() {
    let mut s = session_of(4, manual_config(), 11);
    let first = players_of(&start_match(&mut s).unwrap());
    for round in 0..12 {
        let side = if round % 3 == 0 { TeamSide::B } else { TeamSide::A };
        submit_result(&mut s, side).unwrap();
        assert_eq!(players_of(&current(&s)), first);
    }
    assert_eq!(s.history().len(), 12);
}

#[test]
fn pool_of_five_prefers_the_player_who_sat_out() {
    for seed in 0..10 {
        let mut s = session_of(5, manual_config(), seed);
        start_match(&mut s).unwrap();
        let sat_out = s.waiting_players()[0].clone();
        assert_eq!(s.player(&sat_out).unwrap().matches_played, 0);

        submit_result(&mut s, TeamSide::A).unwrap();
        assert!(current(&s).involves(&sat_out));
    }
}

#[test]
fn pool_of_six_never_reunites_the_previous_winners() {
    let mut s = session_of(6, manual_config(), 5);
    start_match(&mut s).unwrap();
    for round in 0..40 {
        let side = if round % 2 == 0 { TeamSide::A } else { TeamSide::B };
        let record = submit_result(&mut s, side).unwrap();
        let next = current(&s);
        if !next.fairness_degraded {
            assert_ne!(next.team_a, record.winning_team);
            assert_ne!(next.team_b, record.winning_team);
        }
    }
}

#[test]
fn pool_of_six_keeps_play_counts_level() {
    let mut s = session_of(6, manual_config(), 8);
    start_match(&mut s).unwrap();
    for _ in 0..30 {
        submit_result(&mut s, TeamSide::A).unwrap();
        let counts: Vec<u32> = s.active_players().map(|p| p.matches_played).collect();
        let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
        assert!(spread <= 1, "play counts drifted apart: {:?}", counts);
    }
}

/// Clear the match in progress and rig play counts so `front` sort first.
fn rig_fair_four(s: &mut Session, front: &[&str]) {
    s.current_match = None;
    for p in s.players.iter_mut() {
        p.matches_played = if front.contains(&p.name.as_str()) { 0 } else { 5 };
    }
}

#[test]
fn exhausted_split_search_degrades_fairness() {
    let config = SessionConfig {
        max_split_attempts: 0,
        ..manual_config()
    };
    let mut s = session_of(5, config, 4);
    start_match(&mut s).unwrap();
    let record = submit_result(&mut s, TeamSide::A).unwrap();
    let [w1, w2] = record.winning_team.names().clone();
    rig_fair_four(&mut s, &[w1.as_str(), w2.as_str()]);

    let m = start_match(&mut s).unwrap();
    assert!(m.fairness_degraded);
    assert_eq!(m.team_a, record.winning_team);
    assert_eq!(s.warnings(), &[Warning::FairnessDegraded { attempts: 0 }]);
}

#[test]
fn zero_attempts_keeps_an_acceptable_split() {
    let config = SessionConfig {
        max_split_attempts: 0,
        ..manual_config()
    };
    let mut s = session_of(5, config, 4);
    start_match(&mut s).unwrap();
    let record = submit_result(&mut s, TeamSide::A).unwrap();
    let winner = record.winning_team.names()[0].clone();
    let other = record.losing_team.names()[0].clone();
    rig_fair_four(&mut s, &[winner.as_str(), other.as_str()]);

    let m = start_match(&mut s).unwrap();
    assert!(!m.fairness_degraded);
    assert_ne!(m.team_a, record.winning_team);
    assert_ne!(m.team_b, record.winning_team);
    assert!(s.warnings().is_empty());
}

#[test]
fn large_pool_keeps_winners_on_with_waiting_players() {
    let mut s = session_of(8, manual_config(), 21);
    let first = start_match(&mut s).unwrap();
    let record = submit_result(&mut s, TeamSide::A).unwrap();
    assert_eq!(record.winning_team, first.team_a);

    let next = current(&s);
    assert_eq!(next.team_a, first.team_a);
    for name in next.team_b.names() {
        assert!(!first.involves(name), "{name} played the previous match");
    }
}

#[test]
fn large_pool_rotates_everyone_after_two_wins() {
    let mut s = session_of(8, manual_config(), 22);
    let first = start_match(&mut s).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();

    let next = current(&s);
    for name in first.team_a.names() {
        assert!(!next.involves(name), "{name} should have been rotated out");
    }
    let streak = s.win_streak.as_ref().unwrap();
    assert_eq!(streak.pair, first.team_a);
    assert_eq!(streak.count, 0);
    assert!(streak.rotated_out);
}

#[test]
fn reselecting_after_a_rotation_keeps_the_winners_out() {
    let mut s = session_of(8, manual_config(), 22);
    let first = start_match(&mut s).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();

    let dropped = current(&s).team_a.names()[0].clone();
    remove_players(&mut s, &[dropped.as_str()]);
    assert!(s.current_match().is_none());

    let next = start_match(&mut s).unwrap();
    for name in first.team_a.names() {
        assert!(!next.involves(name), "{name} came back after being rotated out");
    }
    assert!(s.win_streak.as_ref().unwrap().rotated_out);
}

#[test]
fn rotated_out_pair_can_start_a_new_streak() {
    let mut s = session_of(8, manual_config(), 22);
    let first = start_match(&mut s).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();
    submit_result(&mut s, TeamSide::A).unwrap();
    assert!(s.win_streak.as_ref().unwrap().rotated_out);

    // Put the rotated-out pair back on court together and let them win again.
    let mut rigged = current(&s);
    rigged.team_a = first.team_a.clone();
    s.current_match = Some(rigged);
    submit_result(&mut s, TeamSide::A).unwrap();

    let streak = s.win_streak.as_ref().unwrap();
    assert_eq!(streak.pair, first.team_a);
    assert_eq!(streak.count, 1);
    assert!(!streak.rotated_out);
    assert_eq!(current(&s).team_a, first.team_a);
}

#[test]
fn newcomer_joining_a_large_pool_plays_next() {
    for seed in 0..10 {
        let mut s = session_of(9, manual_config(), seed);
        start_match(&mut s).unwrap();
        add_players(&mut s, &["Newbie"]);
        assert!(s.player("Newbie").unwrap().is_newcomer());

        submit_result(&mut s, TeamSide::A).unwrap();
        assert!(current(&s).involves("Newbie"), "seed {seed}");
    }
}

#[test]
fn newcomer_is_drawn_first_when_everyone_rotates() {
    for seed in 0..10 {
        let config = SessionConfig {
            win_streak_limit: 1,
            ..manual_config()
        };
        let mut s = session_of(9, config, seed);
        start_match(&mut s).unwrap();
        add_players(&mut s, &["Newbie"]);

        submit_result(&mut s, TeamSide::B).unwrap();
        assert!(current(&s).involves("Newbie"), "seed {seed}");
    }
}

#[test]
fn large_pool_streak_never_passes_the_limit() {
    for seed in 0..5 {
        let mut s = session_of(9, manual_config(), seed);
        start_match(&mut s).unwrap();
        for _ in 0..40 {
            let record = submit_result(&mut s, TeamSide::A).unwrap();
            let streak = s.win_streak.as_ref().unwrap();
            assert!(streak.count <= 2);
            assert!(s.current_match().is_some());
            if streak.pair == record.winning_team && streak.count == 2 {
                panic!("winners kept on at the streak limit");
            }
        }
    }
}

#[test]
fn large_pool_reports_too_few_waiting() {
    let mut s = session_of(7, manual_config(), 9);
    start_match(&mut s).unwrap();
    let resting: Vec<String> = s.waiting_players()[..2].to_vec();
    for name in &resting {
        s.get_player_mut(name).unwrap().cooldown_remaining = 5;
    }

    submit_result(&mut s, TeamSide::A).unwrap();
    assert!(s.current_match().is_none());
    assert_eq!(s.warnings(), &[Warning::NotEnoughWaiting { waiting: 1 }]);
}

#[test]
fn large_pool_reports_too_few_for_rotation() {
    let config = SessionConfig {
        win_streak_limit: 1,
        ..manual_config()
    };
    let mut s = session_of(7, config, 10);
    start_match(&mut s).unwrap();
    let resting: Vec<String> = s.waiting_players()[..2].to_vec();
    for name in &resting {
        s.get_player_mut(name).unwrap().cooldown_remaining = 5;
    }

    submit_result(&mut s, TeamSide::B).unwrap();
    assert!(s.current_match().is_none());
    assert_eq!(s.warnings(), &[Warning::NotEnoughForRotation { eligible: 3 }]);
    assert_eq!(s.win_streak.as_ref().unwrap().count, 0);
}

#[test]
fn cooldown_ticks_once_per_selection_attempt() {
    let mut s = session_of(5, manual_config(), 12);
    s.get_player_mut("P4").unwrap().cooldown_remaining = 2;

    let m = start_match(&mut s).unwrap();
    assert!(!m.involves("P4"));
    assert_eq!(s.player("P4").unwrap().cooldown_remaining, 1);
    let resting: Vec<_> = s.cooldown_players().map(|p| p.name.as_str()).collect();
    assert_eq!(resting, vec!["P4"]);
    assert!(s.waiting_players().is_empty());

    s.current_match = None;
    start_match(&mut s).unwrap();
    assert_eq!(s.player("P4").unwrap().cooldown_remaining, 0);
    assert_eq!(s.cooldown_players().count(), 0);
    let m = current(&s);
    assert!(m.involves("P4") || s.waiting_players().contains(&"P4".to_string()));
}

#[test]
fn start_during_a_match_is_refused_and_changes_nothing() {
    let mut s = session_of(5, manual_config(), 14);
    s.get_player_mut("P4").unwrap().cooldown_remaining = 2;
    let m = start_match(&mut s).unwrap();
    let waiting = s.waiting_players().to_vec();

    assert_eq!(
        start_match(&mut s),
        Err(Warning::MatchInProgress { number: 1 })
    );
    assert_eq!(s.current_match(), Some(&m));
    assert_eq!(s.player("P4").unwrap().cooldown_remaining, 1);
    assert_eq!(s.waiting_players(), waiting.as_slice());
    assert_eq!(s.warnings(), &[Warning::MatchInProgress { number: 1 }]);
    assert_eq!(s.next_match_number, 1);
}

#[test]
fn everyone_resting_means_no_match() {
    let mut s = session_of(4, manual_config(), 13);
    for p in s.players.iter_mut() {
        p.cooldown_remaining = 3;
    }
    assert_eq!(
        start_match(&mut s),
        Err(Warning::InsufficientPlayers { eligible: 0 })
    );
    assert!(s.players.iter().all(|p| p.cooldown_remaining == 2));
}
