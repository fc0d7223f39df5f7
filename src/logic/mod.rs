//! Business logic: balancing, roster mutations, optimistic edits and player import.

mod balance;
mod import;
mod pending;
mod roster;

pub use balance::{balance, team_id, team_name};
pub use import::import_players_csv;
pub use pending::{EditState, PendingEdit};
pub use roster::{move_to_team, swap_players};
