//! Optimistic roster edits: show the tentative partition right away, then
//! keep it once persisted or fall back to the last known-good one.

use crate::models::{Team, TeamsError};
use crate::store::{Clock, RecordStore, SessionStore};

/// Lifecycle of one edit: `Pending -> Committed` or `Pending -> RolledBack`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditState {
    Pending,
    Committed,
    RolledBack,
}

/// A staged roster change awaiting persistence.
#[derive(Clone, Debug)]
pub struct PendingEdit {
    known_good: Vec<Team>,
    tentative: Vec<Team>,
    state: EditState,
}

impl PendingEdit {
    /// Stage `tentative` on top of the last persisted `known_good` partition.
    pub fn begin(known_good: Vec<Team>, tentative: Vec<Team>) -> Self {
        Self {
            known_good,
            tentative,
            state: EditState::Pending,
        }
    }

    /// Stage the result of a roster operation (e.g. `swap_players`) applied to `known_good`.
    pub fn apply<F>(known_good: &[Team], op: F) -> Result<Self, TeamsError>
    where
        F: FnOnce(&[Team]) -> Result<Vec<Team>, TeamsError>,
    {
        let tentative = op(known_good)?;
        Ok(Self::begin(known_good.to_vec(), tentative))
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Partition to display: the tentative one unless the edit was rolled back.
    pub fn teams(&self) -> &[Team] {
        match self.state {
            EditState::Pending | EditState::Committed => &self.tentative,
            EditState::RolledBack => &self.known_good,
        }
    }

    pub fn into_teams(self) -> Vec<Team> {
        match self.state {
            EditState::Pending | EditState::Committed => self.tentative,
            EditState::RolledBack => self.known_good,
        }
    }

    /// Settle the edit with the outcome of its persistence call.
    /// A failed outcome rolls back and is handed back to the caller.
    pub fn resolve(&mut self, outcome: Result<(), TeamsError>) -> Result<(), TeamsError> {
        if self.state != EditState::Pending {
            return Err(TeamsError::invalid("edit is already resolved"));
        }
        match outcome {
            Ok(()) => {
                self.state = EditState::Committed;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rolling back roster edit: {}", e);
                self.state = EditState::RolledBack;
                Err(e)
            }
        }
    }

    /// Persist the tentative partition to session `slug` and settle the edit.
    /// Full-team replacement, so retrying after a failure is safe.
    pub fn commit<R: RecordStore, C: Clock>(
        &mut self,
        store: &SessionStore<R, C>,
        slug: &str,
    ) -> Result<(), TeamsError> {
        if self.state != EditState::Pending {
            return Err(TeamsError::invalid("edit is already resolved"));
        }
        let outcome = store.replace_teams(slug, self.tentative.clone());
        self.resolve(outcome)
    }
}
