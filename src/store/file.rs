//! JSON-file record store: an in-memory map snapshotted to disk on every write.

use crate::models::{Session, TeamsError};
use crate::store::memory::MemoryStore;
use crate::store::records::{self, RecordStore, SessionMap, SessionPatch};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Sessions persisted as one JSON array. A write is applied to a copy of the
/// map, written to a temp file and renamed over the snapshot, and only then
/// becomes visible; a failed disk write leaves memory and file unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TeamsError> {
        let path = path.into();
        let sessions: SessionMap = match std::fs::read(&path) {
            Ok(bytes) => {
                let list: Vec<Session> = serde_json::from_slice(&bytes).map_err(|e| {
                    log::error!("Failed to parse session file {}: {}", path.display(), e);
                    TeamsError::from(e)
                })?;
                list.into_iter().map(|s| (s.slug.clone(), s)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionMap::new(),
            Err(e) => {
                log::error!("Failed to read session file {}: {}", path.display(), e);
                return Err(e.into());
            }
        };
        log::info!("Loaded {} session(s) from {}", sessions.len(), path.display());
        Ok(Self {
            path,
            inner: MemoryStore::with_sessions(sessions),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, sessions: &SessionMap) -> Result<(), TeamsError> {
        let mut list: Vec<&Session> = sessions.values().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let json = serde_json::to_vec_pretty(&list)?;
        let tmp = self.path.with_extension("json.tmp");
        let result = std::fs::write(&tmp, &json).and_then(|_| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            log::error!("Failed to write session file {}: {}", self.path.display(), e);
            return Err(e.into());
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn insert(&self, session: Session) -> Result<bool, TeamsError> {
        let mut g = self.inner.write()?;
        let mut next = g.clone();
        if !records::insert_into(&mut next, session) {
            return Ok(false);
        }
        self.persist(&next)?;
        *g = next;
        Ok(true)
    }

    fn get(&self, slug: &str) -> Result<Option<Session>, TeamsError> {
        self.inner.get(slug)
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Session>, TeamsError> {
        self.inner.find_by_date(date)
    }

    fn list_excluding_date(
        &self,
        date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Session>, TeamsError> {
        self.inner.list_excluding_date(date, limit)
    }

    fn update(&self, slug: &str, patch: SessionPatch) -> Result<Option<Session>, TeamsError> {
        let mut g = self.inner.write()?;
        let mut next = g.clone();
        let updated = records::update_in(&mut next, slug, patch)?;
        if updated.is_some() {
            self.persist(&next)?;
            *g = next;
        }
        Ok(updated)
    }
}
