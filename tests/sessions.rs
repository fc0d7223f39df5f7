//! Integration tests for the session store: daily replace, history, patches.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use team_balancer_web::{
    balance, move_to_team, Clock, JsonFileStore, ManualClock, MemoryStore, Player, Ranking, RecordStore, SessionStore,
    Team, TeamsError,
};

fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn store() -> (SessionStore<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(morning()));
    (SessionStore::with_clock(MemoryStore::new(), clock.clone()), clock)
}

fn teams(n: usize) -> Vec<Team> {
    use Ranking::*;
    let roster: Vec<Player> = [S, A, B, C, A, B]
        .iter()
        .enumerate()
        .map(|(i, r)| Player::new(format!("p-{}", i + 1), format!("Player {}", i + 1), *r))
        .collect();
    balance(&roster, n).unwrap()
}

#[test]
fn first_save_creates_session() {
    let (store, _) = store();
    let outcome = store.save_or_replace_today(teams(2)).unwrap();
    assert!(!outcome.replaced);
    assert_eq!(outcome.slug.len(), 10);

    let session = store.get_by_slug(&outcome.slug).unwrap().unwrap();
    assert_eq!(session.date.to_string(), "2026-10-18");
    assert_eq!(session.created_at, morning());
    assert_eq!(session.teams, teams(2));
}

#[test]
fn saving_twice_same_day_replaces_in_place() {
    let (store, clock) = store();
    let first = store.save_or_replace_today(teams(2)).unwrap();
    clock.advance(Duration::hours(3));
    let second = store.save_or_replace_today(teams(3)).unwrap();

    assert_eq!(first.slug, second.slug);
    assert!(second.replaced);
    let session = store.get_today().unwrap().unwrap();
    assert_eq!(session.slug, first.slug);
    assert_eq!(session.teams.len(), 3);
    assert_eq!(session.created_at, morning() + Duration::hours(3));
    assert_eq!(store.records().len(), 1);
}

#[test]
fn new_day_creates_new_session_and_keeps_history() {
    let (store, clock) = store();
    let yesterday = store.save_or_replace_today(teams(2)).unwrap();
    clock.advance(Duration::days(1));
    let today = store.save_or_replace_today(teams(3)).unwrap();

    assert_ne!(yesterday.slug, today.slug);
    assert!(!today.replaced);
    let old = store.get_by_slug(&yesterday.slug).unwrap().unwrap();
    assert_eq!(old.teams, teams(2));
    assert_eq!(old.created_at, morning());
}

#[test]
fn get_today_is_none_before_generation_and_after_rollover() {
    let (store, clock) = store();
    assert!(store.get_today().unwrap().is_none());
    store.save_or_replace_today(teams(2)).unwrap();
    assert!(store.get_today().unwrap().is_some());
    clock.advance(Duration::days(1));
    assert!(store.get_today().unwrap().is_none());
}

#[test]
fn unknown_slug_reads_as_none() {
    let (store, _) = store();
    assert_eq!(store.get_by_slug("missing123").unwrap(), None);
}

#[test]
fn list_recent_excludes_today_and_orders_newest_first() {
    let (store, clock) = store();
    let mut slugs = Vec::new();
    for _ in 0..4 {
        slugs.push(store.save_or_replace_today(teams(2)).unwrap().slug);
        clock.advance(Duration::days(1));
    }
    clock.advance(Duration::days(-1));
    // the last slug is today's and has the newest created_at
    let recent: Vec<String> = store.list_recent(10).unwrap().into_iter().map(|s| s.slug).collect();
    assert_eq!(recent, vec![slugs[2].clone(), slugs[1].clone(), slugs[0].clone()]);

    let capped = store.list_recent(2).unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].slug, slugs[2]);
}

#[test]
fn replace_teams_overwrites_and_recomputes_totals() {
    let (store, _) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;

    let mut edited = teams(2);
    let moved = edited[0].players.remove(0);
    edited[1].players.push(moved);
    store.replace_teams(&slug, edited.clone()).unwrap();

    let session = store.get_by_slug(&slug).unwrap().unwrap();
    for (stored, sent) in session.teams.iter().zip(&edited) {
        assert_eq!(stored.players, sent.players);
        assert_eq!(stored.total_points, stored.point_sum());
    }
}

#[test]
fn replace_teams_on_unknown_slug_is_not_found() {
    let (store, _) = store();
    assert_eq!(
        store.replace_teams("missing123", teams(2)),
        Err(TeamsError::NotFound {
            slug: "missing123".to_string()
        })
    );
}

#[test]
fn past_sessions_reject_team_rewrites() {
    let (store, clock) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    let before = store.get_by_slug(&slug).unwrap().unwrap();
    clock.set(morning() + Duration::days(1));
    assert_eq!(store.clock().today().to_string(), "2026-10-19");

    let moved = move_to_team(&before.teams, "p-1", "team-2").unwrap();
    let err = store.replace_teams(&slug, moved.clone()).unwrap_err();
    assert_eq!(err, TeamsError::HistoryLocked { slug: slug.clone() });
    assert!(!err.is_retryable());
    assert!(matches!(
        store.replace_teams_checked(&slug, moved, before.revision),
        Err(TeamsError::HistoryLocked { .. })
    ));

    let after = store.get_by_slug(&slug).unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(after.teams[0].players.len(), 3);
}

#[test]
fn todays_session_still_accepts_rewrites_late_in_the_day() {
    let (store, clock) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    clock.set(Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 0).unwrap());
    store.replace_teams(&slug, teams(3)).unwrap();
    assert_eq!(store.get_by_slug(&slug).unwrap().unwrap().teams.len(), 3);
}

#[test]
fn checked_replace_rejects_stale_revision() {
    let (store, _) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    let revision = store.get_by_slug(&slug).unwrap().unwrap().revision;

    let next = store.replace_teams_checked(&slug, teams(2), revision).unwrap();
    assert_eq!(next, revision + 1);

    let err = store.replace_teams_checked(&slug, teams(3), revision).unwrap_err();
    assert_eq!(
        err,
        TeamsError::Conflict {
            expected: revision,
            actual: revision + 1
        }
    );
    assert_eq!(store.get_by_slug(&slug).unwrap().unwrap().teams.len(), 2);
}

#[test]
fn set_paid_marks_only_that_player() {
    let (store, _) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    let player_id = teams(2)[1].players[0].id.clone();

    store.set_paid(&slug, "team-2", &player_id, true).unwrap();
    let session = store.get_by_slug(&slug).unwrap().unwrap();
    let paid: Vec<&str> = session
        .teams
        .iter()
        .flat_map(|t| t.players.iter())
        .filter(|p| p.paid)
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(paid, vec![player_id.as_str()]);

    store.set_paid(&slug, "team-2", &player_id, false).unwrap();
    let session = store.get_by_slug(&slug).unwrap().unwrap();
    assert!(session.teams.iter().flat_map(|t| t.players.iter()).all(|p| !p.paid));
}

#[test]
fn set_paid_with_unknown_player_or_team_is_a_no_op() {
    let (store, _) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    let before = store.get_by_slug(&slug).unwrap().unwrap();

    store.set_paid(&slug, "team-1", "nobody", true).unwrap();
    let player_id = before.teams[0].players[0].id.clone();
    store.set_paid(&slug, "team-9", &player_id, true).unwrap();
    // player exists, but in another team
    store.set_paid(&slug, "team-2", &player_id, true).unwrap();

    let after = store.get_by_slug(&slug).unwrap().unwrap();
    assert_eq!(after, before);
}

#[test]
fn set_paid_on_unknown_slug_is_not_found() {
    let (store, _) = store();
    assert!(matches!(
        store.set_paid("missing123", "team-1", "p-1", true),
        Err(TeamsError::NotFound { .. })
    ));
}

#[test]
fn set_paid_works_on_history() {
    let (store, clock) = store();
    let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
    clock.advance(Duration::days(2));
    store.set_paid(&slug, "team-1", "p-1", true).unwrap();
    let session = store.get_by_slug(&slug).unwrap().unwrap();
    assert!(session.teams[0].players[0].paid);
    assert_eq!(session.created_at, morning());
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "team-balancer-{}-{}.json",
        name,
        team_balancer_web::store::new_slug()
    ))
}

#[test]
fn file_store_survives_reopen() {
    let path = temp_path("reopen");
    let clock = Arc::new(ManualClock::new(morning()));
    let slug = {
        let store = SessionStore::with_clock(JsonFileStore::open(&path).unwrap(), clock.clone());
        assert_eq!(store.records().path(), path.as_path());
        let slug = store.save_or_replace_today(teams(2)).unwrap().slug;
        store.set_paid(&slug, "team-1", "p-1", true).unwrap();
        slug
    };

    let reopened = SessionStore::with_clock(JsonFileStore::open(&path).unwrap(), clock);
    let session = reopened.get_today().unwrap().unwrap();
    assert_eq!(session.slug, slug);
    assert!(session.teams[0].players[0].paid);
    assert!(reopened.save_or_replace_today(teams(3)).unwrap().replaced);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn file_store_write_failure_is_store_unavailable_and_changes_nothing() {
    let path = std::env::temp_dir()
        .join(format!("team-balancer-missing-{}", team_balancer_web::store::new_slug()))
        .join("sessions.json");
    let records = JsonFileStore::open(&path).unwrap();
    let store = SessionStore::with_clock(records, ManualClock::new(morning()));

    let err = store.save_or_replace_today(teams(2)).unwrap_err();
    assert!(matches!(err, TeamsError::StoreUnavailable(_)));
    assert!(err.is_retryable());
    assert!(store.get_today().unwrap().is_none());
    assert!(store.records().list_excluding_date(morning().date_naive(), 10).unwrap().is_empty());
}
