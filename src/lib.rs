//! Badminton doubles shuffler: library with the rotation engine and its models.

pub mod config;
pub mod export;
pub mod logic;
pub mod models;

pub use config::{FirstMatchStrategy, SessionConfig};
pub use export::{write_history_csv, write_player_stats_csv};
pub use logic::{add_players, remove_players, split_names, start_match, submit_result, AddOutcome};
pub use models::{
    GameMatch, MatchId, MatchRecord, Player, PlayerStats, PlayerStatus, Session, SessionError,
    TeamPair, TeamSide, Warning, WinStreak,
};
