//! In-memory record store.

use crate::models::{Session, TeamsError};
use crate::store::records::{self, RecordStore, SessionMap, SessionPatch};
use chrono::NaiveDate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Sessions held in a `RwLock<HashMap>`; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<SessionMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_sessions(sessions: SessionMap) -> Self {
        Self {
            sessions: RwLock::new(sessions),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, SessionMap>, TeamsError> {
        self.sessions
            .read()
            .map_err(|_| TeamsError::StoreUnavailable("lock error".to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, SessionMap>, TeamsError> {
        self.sessions
            .write()
            .map_err(|_| TeamsError::StoreUnavailable("lock error".to_string()))
    }

    pub fn len(&self) -> usize {
        self.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, session: Session) -> Result<bool, TeamsError> {
        let mut g = self.write()?;
        Ok(records::insert_into(&mut g, session))
    }

    fn get(&self, slug: &str) -> Result<Option<Session>, TeamsError> {
        Ok(self.read()?.get(slug).cloned())
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Session>, TeamsError> {
        Ok(records::find_by_date_in(&*self.read()?, date))
    }

    fn list_excluding_date(
        &self,
        date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Session>, TeamsError> {
        Ok(records::list_excluding_date_in(&*self.read()?, date, limit))
    }

    fn update(&self, slug: &str, patch: SessionPatch) -> Result<Option<Session>, TeamsError> {
        let mut g = self.write()?;
        records::update_in(&mut g, slug, patch)
    }
}
