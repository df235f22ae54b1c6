//! Single binary web server: a thin JSON shell around the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Scoring rules come from the TOML file named by SCORING_CONFIG, if set.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use uuid::Uuid;
use wargame_tournament::{
    advance_round, clear_round, generate_round, import_roster, set_match_confirmation, standings,
    standings_csv, start_tournament, submit_match_result, ErrorKind, Participant, RawScores,
    ScoringRules, ServerConfig, Tournament, TournamentError, TournamentId,
};

/// In-memory tournaments. Each one sits behind its own mutex so writes to a tournament
/// are serialized while different tournaments proceed independently.
struct AppState {
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<Tournament>>>>,
    rules: ScoringRules,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default = "default_max_rounds")]
    max_rounds: u32,
    /// Present for team format: one era per team slot.
    #[serde(default)]
    eras: Option<Vec<String>>,
    #[serde(default)]
    point_budget: u32,
}

fn default_max_rounds() -> u32 {
    3
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
    #[serde(default)]
    era: Option<String>,
    #[serde(default)]
    settled: bool,
}

#[derive(Deserialize)]
struct SettledBody {
    settled: bool,
}

#[derive(Deserialize)]
struct CreateTeamBody {
    name: String,
    #[serde(default)]
    members: Vec<Uuid>,
    #[serde(default)]
    captain: Option<Uuid>,
}

#[derive(Deserialize)]
struct ScenarioBody {
    label: String,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    scores: RawScores,
    #[serde(default)]
    first_mover: Option<Uuid>,
}

#[derive(Deserialize)]
struct ConfirmBody {
    confirmed: bool,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct ParticipantPath {
    id: TournamentId,
    participant_id: Uuid,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: Uuid,
}

#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round: u32,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let mut builder = match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest(),
        ErrorKind::State => HttpResponse::Conflict(),
        ErrorKind::Precondition => HttpResponse::PreconditionFailed(),
        ErrorKind::Pairing => HttpResponse::UnprocessableEntity(),
        ErrorKind::Scoring => HttpResponse::InternalServerError(),
        ErrorKind::NotFound => HttpResponse::NotFound(),
    };
    builder.json(serde_json::json!({
        "kind": e.kind(),
        "error": e.to_string(),
        "details": e.details(),
    }))
}

fn lookup(state: &AppState, id: TournamentId) -> Result<Arc<Mutex<Tournament>>, TournamentError> {
    let g = state
        .tournaments
        .read()
        .map_err(|_| TournamentError::state("tournament registry is unavailable"))?;
    g.get(&id).cloned().ok_or(TournamentError::NotFound {
        kind: "tournament",
        id,
    })
}

/// Run one operation against a tournament while holding its lock.
async fn with_tournament<T, F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut Tournament) -> Result<T, TournamentError>,
{
    let entry = match lookup(state, id) {
        Ok(entry) => entry,
        Err(e) => return error_response(&e),
    };
    let mut t = entry.lock().await;
    match op(&mut *t) {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::warn!("Tournament {} operation failed: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "wargame-tournament",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let created = match body.eras {
        Some(eras) => Tournament::new_team(body.name, body.max_rounds, eras),
        None => Tournament::new(body.name, body.max_rounds),
    };
    let tournament = match created {
        Ok(t) => t
            .with_rules(state.rules.clone())
            .with_point_budget(body.point_budget),
        Err(e) => return error_response(&e),
    };

    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    g.insert(tournament.id, Arc::new(Mutex::new(tournament)));
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(t.clone())).await
}

/// Register a participant (tournament must be pending).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: State,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, move |t| {
        let mut p = Participant::new(body.name);
        p.era = body.era;
        p.settled = body.settled;
        t.add_participant(p)?;
        Ok(t.clone())
    })
    .await
}

#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: State, path: Path<ParticipantPath>) -> HttpResponse {
    let pid = path.participant_id;
    with_tournament(&state, path.id, |t| {
        t.remove_participant(pid)?;
        Ok(t.clone())
    })
    .await
}

/// Mark a registration as paid (or not).
#[put("/api/tournaments/{id}/participants/{participant_id}/settled")]
async fn api_set_settled(
    state: State,
    path: Path<ParticipantPath>,
    body: Json<SettledBody>,
) -> HttpResponse {
    let pid = path.participant_id;
    with_tournament(&state, path.id, |t| {
        t.set_settled(pid, body.settled)?;
        Ok(t.clone())
    })
    .await
}

/// Import a CSV roster (`name,era,team,captain,settled`).
#[post("/api/tournaments/{id}/roster")]
async fn api_import_roster(state: State, path: Path<TournamentPath>, body: Bytes) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        import_roster(t, body.as_ref())?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/teams")]
async fn api_create_team(
    state: State,
    path: Path<TournamentPath>,
    body: Json<CreateTeamBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, move |t| {
        t.create_team(body.name, &body.members, body.captain)?;
        Ok(t.clone())
    })
    .await
}

#[put("/api/tournaments/{id}/scenarios/{round}")]
async fn api_set_scenario(
    state: State,
    path: Path<RoundPath>,
    body: Json<ScenarioBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let round = path.round;
    with_tournament(&state, path.id, move |t| {
        t.set_scenario(round, body.label)?;
        Ok(t.clone())
    })
    .await
}

/// Start the tournament (Pending -> InProgress).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        start_tournament(t)?;
        Ok(t.clone())
    })
    .await
}

/// Pair the current round; returns the new matches.
#[post("/api/tournaments/{id}/rounds")]
async fn api_generate_round(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| generate_round(t, &mut rand::thread_rng())).await
}

#[post("/api/tournaments/{id}/rounds/clear")]
async fn api_clear_round(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        clear_round(t)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/rounds/advance")]
async fn api_advance_round(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        advance_round(t)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_submit_result(
    state: State,
    path: Path<MatchPath>,
    body: Json<SubmitResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let match_id = path.match_id;
    with_tournament(&state, path.id, move |t| {
        submit_match_result(t, match_id, body.scores, body.first_mover).cloned()
    })
    .await
}

/// Confirm (`{"confirmed": true}`) or unconfirm (`false`) a result.
#[post("/api/tournaments/{id}/matches/{match_id}/confirm")]
async fn api_confirm_match(
    state: State,
    path: Path<MatchPath>,
    body: Json<ConfirmBody>,
) -> HttpResponse {
    let match_id = path.match_id;
    with_tournament(&state, path.id, |t| {
        set_match_confirmation(t, match_id, body.confirmed).cloned()
    })
    .await
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: State, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(standings(t))).await
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match lookup(&state, path.id) {
        Ok(entry) => entry,
        Err(e) => return error_response(&e),
    };
    let t = entry.lock().await;
    match standings_csv(&standings(&t)) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => error_response(&e),
    }
}

fn app_state(rules: ScoringRules) -> Data<AppState> {
    Data::new(AppState {
        tournaments: RwLock::new(HashMap::new()),
        rules,
    })
}

macro_rules! app {
    ($state:expr) => {
        App::new()
            .app_data($state)
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_participant)
            .service(api_remove_participant)
            .service(api_set_settled)
            .service(api_import_roster)
            .service(api_create_team)
            .service(api_set_scenario)
            .service(api_start_tournament)
            .service(api_generate_round)
            .service(api_clear_round)
            .service(api_advance_round)
            .service(api_submit_result)
            .service(api_confirm_match)
            .service(api_standings_csv)
            .service(api_standings)
    };
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let rules = ScoringRules::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = app_state(rules);
    HttpServer::new(move || app!(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
