//! Session store: today's create-or-replace, lookups, history and patches.

use crate::models::{SaveOutcome, Session, Team, TeamsError};
use crate::store::clock::{Clock, SystemClock};
use crate::store::records::{RecordStore, SessionPatch};
use crate::store::slug::new_slug;

/// Attempts at minting an unused slug before giving up.
const SLUG_ATTEMPTS: usize = 5;

/// Sessions on top of a record store. "Today" is the record whose date is the
/// clock's current day; there is no other notion of an active session.
pub struct SessionStore<R, C = SystemClock> {
    records: R,
    clock: C,
}

impl<R: RecordStore> SessionStore<R, SystemClock> {
    pub fn new(records: R) -> Self {
        Self::with_clock(records, SystemClock)
    }
}

impl<R: RecordStore, C: Clock> SessionStore<R, C> {
    pub fn with_clock(records: R, clock: C) -> Self {
        Self { records, clock }
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Save `teams` as today's session.
    ///
    /// If today already has a session its teams are overwritten, `created_at` is
    /// refreshed and the same slug is returned with `replaced = true`. Otherwise a
    /// new session with a fresh slug is inserted.
    pub fn save_or_replace_today(&self, teams: Vec<Team>) -> Result<SaveOutcome, TeamsError> {
        let now = self.clock.now();
        let today = self.clock.today();

        if let Some(existing) = self.records.find_by_date(today)? {
            let patch = SessionPatch {
                teams: Some(teams.clone()),
                created_at: Some(now),
                expected_revision: None,
            };
            if self.records.update(&existing.slug, patch)?.is_some() {
                log::info!("Replaced today's session {} ({})", existing.slug, today);
                return Ok(SaveOutcome {
                    slug: existing.slug,
                    replaced: true,
                });
            }
        }

        for _ in 0..SLUG_ATTEMPTS {
            let mut session = Session::new(new_slug(), now, teams.clone());
            session.date = today;
            let slug = session.slug.clone();
            let players = session.player_count();
            if self.records.insert(session)? {
                log::info!("Created session {} for {} ({} players)", slug, today, players);
                return Ok(SaveOutcome {
                    slug,
                    replaced: false,
                });
            }
            log::warn!("Slug collision on {}, retrying", slug);
        }
        Err(TeamsError::StoreUnavailable(
            "could not allocate a unique slug".to_string(),
        ))
    }

    /// Today's session, if one was generated.
    pub fn get_today(&self) -> Result<Option<Session>, TeamsError> {
        self.records.find_by_date(self.clock.today())
    }

    /// Exact lookup; a miss is `Ok(None)`, not an error.
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<Session>, TeamsError> {
        self.records.get(slug)
    }

    /// Past sessions (never today's), newest first, at most `limit`.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Session>, TeamsError> {
        self.records.list_excluding_date(self.clock.today(), limit)
    }

    /// Overwrite the teams of today's session. Team totals are recomputed
    /// from the member points before writing. Past sessions are history and
    /// only accept `set_paid`.
    pub fn replace_teams(&self, slug: &str, teams: Vec<Team>) -> Result<(), TeamsError> {
        self.write_teams(slug, teams, None).map(|_| ())
    }

    /// Like `replace_teams`, but only if the stored revision is `expected_revision`.
    /// Returns the new revision.
    pub fn replace_teams_checked(
        &self,
        slug: &str,
        teams: Vec<Team>,
        expected_revision: u64,
    ) -> Result<u64, TeamsError> {
        self.write_teams(slug, teams, Some(expected_revision))
    }

    fn write_teams(
        &self,
        slug: &str,
        mut teams: Vec<Team>,
        expected_revision: Option<u64>,
    ) -> Result<u64, TeamsError> {
        let current = self
            .records
            .get(slug)?
            .ok_or_else(|| TeamsError::not_found(slug))?;
        if current.date != self.clock.today() {
            log::debug!("Refusing team rewrite of past session {} ({})", slug, current.date);
            return Err(TeamsError::HistoryLocked {
                slug: slug.to_string(),
            });
        }
        for team in &mut teams {
            team.recompute_total();
        }
        let patch = SessionPatch {
            teams: Some(teams),
            created_at: None,
            expected_revision,
        };
        let updated = self
            .records
            .update(slug, patch)?
            .ok_or_else(|| TeamsError::not_found(slug))?;
        log::debug!("Updated teams of session {} (revision {})", slug, updated.revision);
        Ok(updated.revision)
    }

    /// Set the paid flag of one player in one team.
    ///
    /// A missing session is `NotFound`; a team or player id that matches nothing
    /// is a silent no-op and nothing is written.
    pub fn set_paid(
        &self,
        slug: &str,
        team_id: &str,
        player_id: &str,
        paid: bool,
    ) -> Result<(), TeamsError> {
        let session = self
            .records
            .get(slug)?
            .ok_or_else(|| TeamsError::not_found(slug))?;

        let mut teams = session.teams;
        let player = teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .and_then(|t| t.get_player_mut(player_id));
        match player {
            Some(p) => p.paid = paid,
            None => {
                log::debug!(
                    "No player {} in team {} of session {}; paid unchanged",
                    player_id,
                    team_id,
                    slug
                );
                return Ok(());
            }
        }

        self.records
            .update(slug, SessionPatch::teams(teams))?
            .ok_or_else(|| TeamsError::not_found(slug))?;
        log::debug!("Set paid={} for {} in session {}", paid, player_id, slug);
        Ok(())
    }
}
