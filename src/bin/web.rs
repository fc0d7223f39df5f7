//! Single binary web server: HTML page embedded from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `Config` for the environment variables
//! (HOST, PORT, ADMIN_PASSWORD, DATA_FILE, ...).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session as CookieSession, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, patch, post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use team_balancer_web::{
    balance, config::parse_team_count, import_players_csv, move_to_team, swap_players, Config,
    JsonFileStore, MemoryStore, Player, RecordStore, SessionStore, Team, TeamsError,
};

/// Shared state: the session store over whichever backend DATA_FILE selects.
struct AppState {
    store: SessionStore<Box<dyn RecordStore>>,
    config: Config,
}

type AppData = Data<AppState>;

/// Cookie-session key marking an admin browser.
const ADMIN_KEY: &str = "admin";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct VerifyBody {
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    players: Vec<Player>,
    /// Number or numeric string; anything else falls back to the default.
    #[serde(default)]
    num_teams: serde_json::Value,
}

#[derive(Deserialize)]
struct ReplaceTeamsBody {
    teams: Vec<Team>,
    /// When present, the write is rejected if the session changed meanwhile.
    #[serde(default)]
    revision: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaidBody {
    team_id: String,
    player_id: String,
    paid: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapBody {
    player_id: String,
    target_player_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    player_id: String,
    team_id: String,
}

/// Path segment: session slug (e.g. /api/teams/{slug})
#[derive(Deserialize)]
struct SlugPath {
    slug: String,
}

fn error_response(e: &TeamsError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TeamsError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
        TeamsError::NotFound { .. } => HttpResponse::NotFound().json(body),
        TeamsError::Conflict { .. } | TeamsError::HistoryLocked { .. } => {
            HttpResponse::Conflict().json(body)
        }
        TeamsError::StoreUnavailable(_) => {
            log::error!("{}", e);
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}

/// Run a store call on the blocking pool.
async fn run<T, F>(f: F) -> Result<T, TeamsError>
where
    F: FnOnce() -> Result<T, TeamsError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| TeamsError::StoreUnavailable(e.to_string()))?
}

/// Admin routes are open when no ADMIN_PASSWORD is configured.
fn require_admin(state: &AppState, session: &CookieSession) -> Result<(), HttpResponse> {
    if state.config.admin_password.is_none() {
        return Ok(());
    }
    match session.get::<bool>(ADMIN_KEY) {
        Ok(Some(true)) => Ok(()),
        _ => Err(HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Admin mode required" }))),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-balancer-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Check the shared admin password and mark this browser as admin.
#[post("/api/admin/verify")]
async fn api_admin_verify(state: AppData, session: CookieSession, body: Json<VerifyBody>) -> HttpResponse {
    if state.config.admin_password.is_none() {
        return HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "ADMIN_PASSWORD not configured on server" }));
    }
    if !state.config.check_admin_password(&body.password) {
        return HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Wrong password" }));
    }
    if let Err(e) = session.insert(ADMIN_KEY, true) {
        log::error!("Failed to store admin flag: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": "session error" }));
    }
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

#[get("/api/admin/status")]
async fn api_admin_status(state: AppData, session: CookieSession) -> HttpResponse {
    let admin = require_admin(&state, &session).is_ok();
    HttpResponse::Ok().json(serde_json::json!({ "admin": admin }))
}

#[post("/api/admin/logout")]
async fn api_admin_logout(session: CookieSession) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

/// Normalize pasted CSV rows (Name, Rank, Image columns) into players.
#[post("/api/players/import")]
async fn api_import_players(body: String) -> HttpResponse {
    match import_players_csv(body.as_bytes()) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&e),
    }
}

/// Balance players into teams and save them as today's session (replacing it if present).
#[post("/api/teams")]
async fn api_generate_teams(state: AppData, session: CookieSession, body: Json<GenerateBody>) -> HttpResponse {
    if let Err(resp) = require_admin(&state, &session) {
        return resp;
    }
    let body = body.into_inner();
    let num_teams = state.config.clamp_team_count(parse_team_count(&body.num_teams));
    let teams = match balance(&body.players, num_teams) {
        Ok(teams) => teams,
        Err(e) => return error_response(&e),
    };
    let s = state.clone();
    let to_save = teams.clone();
    match run(move || s.store.save_or_replace_today(to_save)).await {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "teams": teams,
            "slug": outcome.slug,
            "replaced": outcome.replaced,
        })),
        Err(e) => error_response(&e),
    }
}

/// Today's session, or null.
#[get("/api/sessions/today")]
async fn api_today(state: AppData) -> HttpResponse {
    let s = state.clone();
    match run(move || s.store.get_today()).await {
        Ok(today) => HttpResponse::Ok().json(today),
        Err(e) => error_response(&e),
    }
}

/// Past sessions, newest first.
#[get("/api/sessions")]
async fn api_history(state: AppData) -> HttpResponse {
    let s = state.clone();
    let limit = state.config.history_limit;
    match run(move || s.store.list_recent(limit)).await {
        Ok(sessions) => HttpResponse::Ok().json(sessions),
        Err(e) => error_response(&e),
    }
}

/// Get a session by slug (shared URL).
#[get("/api/teams/{slug}")]
async fn api_get_session(state: AppData, path: Path<SlugPath>) -> HttpResponse {
    let s = state.clone();
    let slug = path.into_inner().slug;
    match run(move || s.store.get_by_slug(&slug)).await {
        Ok(Some(session)) => HttpResponse::Ok().json(session),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "Session not found" })),
        Err(e) => error_response(&e),
    }
}

/// Replace all teams after a client-side reorder.
#[patch("/api/teams/{slug}/players")]
async fn api_replace_teams(
    state: AppData,
    session: CookieSession,
    path: Path<SlugPath>,
    body: Json<ReplaceTeamsBody>,
) -> HttpResponse {
    if let Err(resp) = require_admin(&state, &session) {
        return resp;
    }
    let s = state.clone();
    let slug = path.into_inner().slug;
    let ReplaceTeamsBody { teams, revision } = body.into_inner();
    let result = run(move || match revision {
        Some(expected) => s.store.replace_teams_checked(&slug, teams, expected).map(Some),
        None => s.store.replace_teams(&slug, teams).map(|_| None),
    })
    .await;
    match result {
        Ok(revision) => HttpResponse::Ok().json(serde_json::json!({ "ok": true, "revision": revision })),
        Err(e) => error_response(&e),
    }
}

/// Update the paid flag of one player.
#[patch("/api/teams/{slug}/paid")]
async fn api_set_paid(
    state: AppData,
    session: CookieSession,
    path: Path<SlugPath>,
    body: Json<PaidBody>,
) -> HttpResponse {
    if let Err(resp) = require_admin(&state, &session) {
        return resp;
    }
    let PaidBody { team_id, player_id, paid } = body.into_inner();
    if team_id.is_empty() || player_id.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "teamId, playerId and paid (boolean) required" }));
    }
    let s = state.clone();
    let slug = path.into_inner().slug;
    match run(move || s.store.set_paid(&slug, &team_id, &player_id, paid)).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => error_response(&e),
    }
}

/// Load a session, apply a roster operation, and write it back if nobody else wrote in between.
async fn mutate_roster<F>(state: AppData, slug: String, op: F) -> HttpResponse
where
    F: FnOnce(&[Team]) -> Result<Vec<Team>, TeamsError> + Send + 'static,
{
    let result = run(move || {
        let current = state
            .store
            .get_by_slug(&slug)?
            .ok_or_else(|| TeamsError::not_found(slug.as_str()))?;
        let teams = op(&current.teams)?;
        let revision = state
            .store
            .replace_teams_checked(&slug, teams.clone(), current.revision)?;
        Ok((teams, revision))
    })
    .await;
    match result {
        Ok((teams, revision)) => {
            HttpResponse::Ok().json(serde_json::json!({ "teams": teams, "revision": revision }))
        }
        Err(e) => error_response(&e),
    }
}

/// Drop a player onto another player (reorder within a team, or swap across teams).
#[post("/api/teams/{slug}/swap")]
async fn api_swap(
    state: AppData,
    session: CookieSession,
    path: Path<SlugPath>,
    body: Json<SwapBody>,
) -> HttpResponse {
    if let Err(resp) = require_admin(&state, &session) {
        return resp;
    }
    let SwapBody { player_id, target_player_id } = body.into_inner();
    mutate_roster(state, path.into_inner().slug, move |teams| {
        swap_players(teams, &player_id, &target_player_id)
    })
    .await
}

/// Drop a player onto a team (appended; team sizes change).
#[post("/api/teams/{slug}/move")]
async fn api_move(
    state: AppData,
    session: CookieSession,
    path: Path<SlugPath>,
    body: Json<MoveBody>,
) -> HttpResponse {
    if let Err(resp) = require_admin(&state, &session) {
        return resp;
    }
    let MoveBody { player_id, team_id } = body.into_inner();
    mutate_roster(state, path.into_inner().slug, move |teams| {
        move_to_team(teams, &player_id, &team_id)
    })
    .await
}

fn open_records(config: &Config) -> std::io::Result<Box<dyn RecordStore>> {
    match &config.data_file {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            Ok(Box::new(store))
        }
        None => {
            log::warn!("DATA_FILE not set; sessions are kept in memory only");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if config.admin_password.is_none() {
        log::warn!("ADMIN_PASSWORD not set; admin routes are open");
    }
    let key = match &config.session_key {
        Some(bytes) => Key::from(&bytes[..]),
        None => Key::generate(),
    };
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let records = open_records(&config)?;
    let state = Data::new(AppState {
        store: SessionStore::new(records),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .route("/t/{slug}", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_admin_verify)
            .service(api_admin_status)
            .service(api_admin_logout)
            .service(api_import_players)
            .service(api_generate_teams)
            .service(api_today)
            .service(api_history)
            .service(api_get_session)
            .service(api_replace_teams)
            .service(api_set_paid)
            .service(api_swap)
            .service(api_move)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
