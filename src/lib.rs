//! Team balancer web app: library with models, balancing logic and the session store.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    balance, import_players_csv, move_to_team, swap_players, team_id, team_name, EditState,
    PendingEdit,
};
pub use models::{Player, Ranking, SaveOutcome, Session, Team, TeamPlayer, TeamsError};
pub use store::{
    Clock, JsonFileStore, ManualClock, MemoryStore, RecordStore, SessionPatch, SessionStore,
    SystemClock,
};
