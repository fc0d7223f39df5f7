//! The persistence medium: a keyed record store of sessions.

use crate::models::{Session, Team, TeamsError};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// Partial update of one session record. Unset fields are left alone.
#[derive(Clone, Debug, Default)]
pub struct SessionPatch {
    pub teams: Option<Vec<Team>>,
    pub created_at: Option<DateTime<Utc>>,
    /// When set, the write only happens if the stored revision matches.
    pub expected_revision: Option<u64>,
}

impl SessionPatch {
    pub fn teams(teams: Vec<Team>) -> Self {
        Self {
            teams: Some(teams),
            ..Self::default()
        }
    }
}

/// Keyed record store. Every write replaces a whole record atomically, so
/// readers see either the old or the new value.
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Returns false (and writes nothing) if the slug is taken.
    fn insert(&self, session: Session) -> Result<bool, TeamsError>;

    /// Point lookup by slug.
    fn get(&self, slug: &str) -> Result<Option<Session>, TeamsError>;

    /// Lookup by calendar day. If several records share the day, the newest wins.
    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Session>, TeamsError>;

    /// Records whose date is not `date`, newest `created_at` first, at most `limit`.
    fn list_excluding_date(
        &self,
        date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Session>, TeamsError>;

    /// Apply `patch` to the record at `slug` and bump its revision.
    /// Returns the updated record, or `None` if there is no such slug.
    fn update(&self, slug: &str, patch: SessionPatch) -> Result<Option<Session>, TeamsError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn insert(&self, session: Session) -> Result<bool, TeamsError> {
        (**self).insert(session)
    }

    fn get(&self, slug: &str) -> Result<Option<Session>, TeamsError> {
        (**self).get(slug)
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Session>, TeamsError> {
        (**self).find_by_date(date)
    }

    fn list_excluding_date(
        &self,
        date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Session>, TeamsError> {
        (**self).list_excluding_date(date, limit)
    }

    fn update(&self, slug: &str, patch: SessionPatch) -> Result<Option<Session>, TeamsError> {
        (**self).update(slug, patch)
    }
}

/// Sessions keyed by slug; shared by the in-memory and file backends.
pub(crate) type SessionMap = HashMap<String, Session>;

pub(crate) fn insert_into(map: &mut SessionMap, session: Session) -> bool {
    if map.contains_key(&session.slug) {
        return false;
    }
    map.insert(session.slug.clone(), session);
    true
}

pub(crate) fn find_by_date_in(map: &SessionMap, date: NaiveDate) -> Option<Session> {
    map.values()
        .filter(|s| s.date == date)
        .max_by_key(|s| s.created_at)
        .cloned()
}

pub(crate) fn list_excluding_date_in(
    map: &SessionMap,
    date: NaiveDate,
    limit: usize,
) -> Vec<Session> {
    let mut sessions: Vec<Session> = map.values().filter(|s| s.date != date).cloned().collect();
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sessions.truncate(limit);
    sessions
}

pub(crate) fn update_in(
    map: &mut SessionMap,
    slug: &str,
    patch: SessionPatch,
) -> Result<Option<Session>, TeamsError> {
    let session = match map.get_mut(slug) {
        Some(s) => s,
        None => return Ok(None),
    };
    if let Some(expected) = patch.expected_revision {
        if expected != session.revision {
            return Err(TeamsError::Conflict {
                expected,
                actual: session.revision,
            });
        }
    }
    if let Some(teams) = patch.teams {
        session.teams = teams;
    }
    if let Some(created_at) = patch.created_at {
        session.created_at = created_at;
    }
    session.revision += 1;
    Ok(Some(session.clone()))
}
