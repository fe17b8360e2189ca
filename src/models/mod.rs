//! Data structures for the shuffler: players, matches, session state.

mod game;
mod player;
mod session;

pub use game::{GameMatch, MatchId, MatchRecord, TeamPair, TeamSide, WinStreak};
pub use player::{Player, PlayerStats, PlayerStatus};
pub use session::{Session, SessionError, Warning};
