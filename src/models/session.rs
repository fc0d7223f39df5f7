//! Session: one persisted, shareable team partition for a calendar day.

use crate::models::team::Team;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted session. At most one session per calendar day is "today's";
/// older ones are history and only see `paid` updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque URL-safe identifier, never reused.
    pub slug: String,
    /// Calendar day (UTC), serialized as YYYY-MM-DD.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Write counter, bumped by the store on every write.
    #[serde(default)]
    pub revision: u64,
    pub teams: Vec<Team>,
}

impl Session {
    pub fn new(slug: impl Into<String>, created_at: DateTime<Utc>, teams: Vec<Team>) -> Self {
        Self {
            slug: slug.into(),
            date: created_at.date_naive(),
            created_at,
            revision: 1,
            teams,
        }
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|t| t.players.len()).sum()
    }
}

/// Result of saving today's teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub slug: String,
    /// True when today's existing session was overwritten in place.
    pub replaced: bool,
}
