//! Single binary web server: JSON API over one in-memory shuffler session.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080); rotation tunables via SHUFFLER_*.

use actix_web::{
    get, post,
    web::{Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use badminton_shuffler::{
    add_players, remove_players, split_names, start_match, submit_result, write_history_csv,
    write_player_stats_csv, GameMatch, MatchRecord, PlayerStats, Session, SessionConfig, TeamSide,
    Warning, WinStreak,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// In-memory state: the one session this server drives.
type AppState = Data<RwLock<Session>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Everything the presentation layer renders after a call.
#[derive(Serialize)]
struct SessionView<'a> {
    current_match: Option<&'a GameMatch>,
    waiting: &'a [String],
    cooldown: Vec<&'a str>,
    removed: Vec<&'a str>,
    players: Vec<PlayerStats>,
    history: &'a [MatchRecord],
    win_streak: Option<&'a WinStreak>,
    warnings: &'a [Warning],
    messages: Vec<String>,
}

impl<'a> SessionView<'a> {
    fn from_session(s: &'a Session) -> Self {
        Self {
            current_match: s.current_match(),
            waiting: s.waiting_players(),
            cooldown: s.cooldown_players().map(|p| p.name.as_str()).collect(),
            removed: s.removed_players().map(|p| p.name.as_str()).collect(),
            players: s.player_stats(),
            history: s.history(),
            win_streak: s.win_streak.as_ref(),
            warnings: s.warnings(),
            messages: s.warnings().iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
struct NamesBody {
    #[serde(default)]
    names: Vec<String>,
    /// Comma-separated alternative to `names`.
    #[serde(default)]
    input: Option<String>,
}

impl NamesBody {
    fn into_names(self) -> Vec<String> {
        let mut names = self.names;
        if let Some(input) = self.input {
            names.extend(split_names(&input));
        }
        names
    }
}

#[derive(Deserialize)]
struct ResultBody {
    winner: TeamSide,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-shuffler",
    })
}

/// Current session state.
#[get("/api/session")]
async fn api_get_session(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(SessionView::from_session(&g))
}

/// Add players; returns added/skipped names plus the new state.
#[post("/api/session/players")]
async fn api_add_players(state: AppState, body: Json<NamesBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let names = body.into_inner().into_names();
    let outcome = add_players(&mut g, &names);
    HttpResponse::Ok().json(serde_json::json!({
        "added": outcome.added,
        "skipped": outcome.skipped,
        "session": SessionView::from_session(&g),
    }))
}

/// Remove players; a match losing a participant is dropped.
#[post("/api/session/players/remove")]
async fn api_remove_players(state: AppState, body: Json<NamesBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let names = body.into_inner().into_names();
    let removed = remove_players(&mut g, &names);
    HttpResponse::Ok().json(serde_json::json!({
        "removed": removed,
        "session": SessionView::from_session(&g),
    }))
}

/// Select the next match. A no-match outcome is still 200, reported in `warnings`.
#[post("/api/session/matches/start")]
async fn api_start_match(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(w) = start_match(&mut g) {
        log::debug!("No match started: {}", w);
    }
    HttpResponse::Ok().json(SessionView::from_session(&g))
}

/// Submit the winner of the current match (`{"winner": "a"}` or `"b"`).
#[post("/api/session/matches/result")]
async fn api_submit_result(state: AppState, body: Json<ResultBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match submit_result(&mut g, body.winner) {
        Ok(_) => HttpResponse::Ok().json(SessionView::from_session(&g)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Reset everything back to an empty session.
#[post("/api/session/reset")]
async fn api_reset(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.reset();
    HttpResponse::Ok().json(SessionView::from_session(&g))
}

#[get("/api/session/history.csv")]
async fn api_history_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut buf = Vec::new();
    match write_history_csv(&g, &mut buf) {
        Ok(()) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(buf),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("/api/session/players.csv")]
async fn api_players_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut buf = Vec::new();
    match write_player_stats_csv(&g, &mut buf) {
        Ok(()) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(buf),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let config = SessionConfig::from_env();
    log::info!("Session config: {:?}", config);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(Session::new(config)));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_session)
            .service(api_add_players)
            .service(api_remove_players)
            .service(api_start_match)
            .service(api_submit_result)
            .service(api_reset)
            .service(api_history_csv)
            .service(api_players_csv)
    })
    .bind(bind)?
    .run()
    .await
}
