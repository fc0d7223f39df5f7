//! Data structures for the team balancer: players, teams, sessions and errors.

mod error;
mod player;
mod session;
mod team;

pub use error::TeamsError;
pub use player::{Player, Ranking};
pub use session::{SaveOutcome, Session};
pub use team::{Team, TeamPlayer};
