//! Rotation logic: roster changes, match selection and result processing.

mod results;
mod roster;
mod selection;

pub use results::submit_result;
pub use roster::{add_players, remove_players, split_names, AddOutcome};
pub use selection::start_match;
