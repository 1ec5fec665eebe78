//! Single binary web server: JSON API over the score keeper.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; scoreboards are kept in scoreboards.json.
//! Override with env: HOST, PORT, SCOREKEEPER_DATA, SCOREKEEPER_K_FACTOR, SCOREKEEPER_TOP_N.

use actix_web::{
    delete, get, http::StatusCode, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use scorekeeper::{
    EngineConfig, GameType, JsonFilePersistence, ScoreKeeper, Scoreboard, ScoreboardError,
    ScoreboardStore, ServerConfig, View,
};
use serde::Deserialize;

type AppState = Data<ScoreKeeper>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateScoreboardBody {
    name: String,
    #[serde(rename = "type")]
    game_type: GameType,
    owner: String,
}

#[derive(Deserialize)]
struct RequesterBody {
    requester: String,
}

#[derive(Deserialize)]
struct AddPlayersBody {
    players: Vec<String>,
}

#[derive(Deserialize)]
struct RenamePlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct MarkScoreBody {
    expression: String,
}

#[derive(Deserialize)]
struct StandingsQuery {
    /// Show every player instead of the capped view.
    #[serde(default)]
    full: bool,
    /// Rows in the capped view; configured default when absent.
    top: Option<usize>,
}

impl StandingsQuery {
    fn view(&self) -> View {
        if self.full {
            View::Full
        } else {
            View::Top(self.top.unwrap_or(0))
        }
    }
}

/// Path segment: scoreboard name (e.g. /api/scoreboards/{name})
#[derive(Deserialize)]
struct BoardPath {
    name: String,
}

/// Path segments: scoreboard name and player name
#[derive(Deserialize)]
struct BoardPlayerPath {
    name: String,
    player: String,
}

/// Map a domain error to a status code and JSON body.
fn error_response(e: ScoreboardError) -> HttpResponse {
    let status = match e {
        ScoreboardError::NotFound(_) | ScoreboardError::PlayerNotFound { .. } => StatusCode::NOT_FOUND,
        ScoreboardError::AlreadyExists(_) | ScoreboardError::AlreadyOnBoard { .. } => StatusCode::CONFLICT,
        ScoreboardError::NotOwner { .. } => StatusCode::FORBIDDEN,
        ScoreboardError::ArchivedBoard(_) => StatusCode::LOCKED,
        ScoreboardError::InvalidScoreExpression { .. }
        | ScoreboardError::InvalidName
        | ScoreboardError::UnknownGameType(_) => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status).json(serde_json::json!({ "error": e.to_string() }))
}

/// Run a mutating engine call on the blocking pool; saves hit the disk.
async fn blocking<T, F>(f: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> Result<T, ScoreboardError> + Send + 'static,
    T: Send + 'static,
{
    match web::block(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(e)),
        Err(e) => {
            log::error!("Blocking task failed: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({ "error": "internal error" })))
        }
    }
}

/// 200 with the board after `f` ran, or the error.
async fn board_response<F>(state: &AppState, name: String, f: F) -> HttpResponse
where
    F: FnOnce(&ScoreKeeper, &str) -> Result<(), ScoreboardError> + Send + 'static,
{
    let keeper = state.clone();
    let result = blocking(move || -> Result<Scoreboard, ScoreboardError> {
        f(keeper.get_ref(), &name)?;
        keeper.scoreboard(&name)
    })
    .await;
    match result {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(resp) => resp,
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "scorekeeper",
    })
}

/// List all scoreboards.
#[get("/api/scoreboards")]
async fn api_list_scoreboards(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.scoreboards())
}

#[post("/api/scoreboards")]
async fn api_create_scoreboard(state: AppState, body: Json<CreateScoreboardBody>) -> HttpResponse {
    let body = body.into_inner();
    let keeper = state.clone();
    match blocking(move || keeper.create_scoreboard(&body.name, body.game_type, &body.owner)).await {
        Ok(board) => HttpResponse::Created().json(board),
        Err(resp) => resp,
    }
}

#[get("/api/scoreboards/{name}")]
async fn api_get_scoreboard(state: AppState, path: Path<BoardPath>) -> HttpResponse {
    match state.scoreboard(&path.name) {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(e) => error_response(e),
    }
}

/// Delete a scoreboard (owner only).
#[delete("/api/scoreboards/{name}")]
async fn api_delete_scoreboard(state: AppState, path: Path<BoardPath>, body: Json<RequesterBody>) -> HttpResponse {
    let name = path.into_inner().name;
    let requester = body.into_inner().requester;
    let keeper = state.clone();
    match blocking(move || keeper.delete_scoreboard(&name, &requester)).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(resp) => resp,
    }
}

#[post("/api/scoreboards/{name}/archive")]
async fn api_archive_scoreboard(state: AppState, path: Path<BoardPath>, body: Json<RequesterBody>) -> HttpResponse {
    let requester = body.into_inner().requester;
    board_response(&state, path.into_inner().name, move |k, name| k.archive_scoreboard(name, &requester)).await
}

#[post("/api/scoreboards/{name}/unarchive")]
async fn api_unarchive_scoreboard(state: AppState, path: Path<BoardPath>, body: Json<RequesterBody>) -> HttpResponse {
    let requester = body.into_inner().requester;
    board_response(&state, path.into_inner().name, move |k, name| k.unarchive_scoreboard(name, &requester)).await
}

/// Add players; names already on the board are skipped and reported back.
#[post("/api/scoreboards/{name}/players")]
async fn api_add_players(state: AppState, path: Path<BoardPath>, body: Json<AddPlayersBody>) -> HttpResponse {
    let name = path.into_inner().name;
    let players = body.into_inner().players;
    let keeper = state.clone();
    let result = blocking(move || {
        let players: Vec<&str> = players
            .iter()
            .map(|p| p.strip_prefix('@').unwrap_or(p.as_str()))
            .collect();
        keeper.add_players(&name, &players)
    })
    .await;
    match result {
        Ok(added) => HttpResponse::Ok().json(serde_json::json!({ "added": added })),
        Err(resp) => resp,
    }
}

#[put("/api/scoreboards/{name}/players/{player}")]
async fn api_rename_player(
    state: AppState,
    path: Path<BoardPlayerPath>,
    body: Json<RenamePlayerBody>,
) -> HttpResponse {
    let BoardPlayerPath { name, player } = path.into_inner();
    let new_name = body.into_inner().name;
    board_response(&state, name, move |k, board| k.rename_player(board, &player, &new_name)).await
}

#[delete("/api/scoreboards/{name}/players/{player}")]
async fn api_remove_player(state: AppState, path: Path<BoardPlayerPath>) -> HttpResponse {
    let BoardPlayerPath { name, player } = path.into_inner();
    board_response(&state, name, move |k, board| k.remove_player(board, &player)).await
}

/// Mark a score expression, e.g. "win ann loss bob" or "+3".
#[post("/api/scoreboards/{name}/scores")]
async fn api_mark_score(state: AppState, path: Path<BoardPath>, body: Json<MarkScoreBody>) -> HttpResponse {
    let name = path.into_inner().name;
    let expression = body.into_inner().expression;
    let keeper = state.clone();
    match blocking(move || keeper.mark_score(&name, &expression)).await {
        Ok(marked) => HttpResponse::Ok().json(marked),
        Err(resp) => resp,
    }
}

#[get("/api/scoreboards/{name}/standings")]
async fn api_standings(state: AppState, path: Path<BoardPath>, query: Query<StandingsQuery>) -> HttpResponse {
    match state.standings(&path.name, query.view(), &[]) {
        Ok(standings) => HttpResponse::Ok().json(standings),
        Err(e) => error_response(e),
    }
}

/// Plain-text table of the standings.
#[get("/api/scoreboards/{name}/standings.txt")]
async fn api_standings_text(state: AppState, path: Path<BoardPath>, query: Query<StandingsQuery>) -> HttpResponse {
    match state.standings(&path.name, query.view(), &[]) {
        Ok(standings) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(standings.to_string()),
        Err(e) => error_response(e),
    }
}

/// Full standings as CSV.
#[get("/api/scoreboards/{name}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<BoardPath>) -> HttpResponse {
    let standings = match state.standings(&path.name, View::Full, &[]) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };
    let mut buf = Vec::new();
    if let Err(e) = standings.write_csv(&mut buf) {
        log::error!("CSV export of {} failed: {}", path.name, e);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": "CSV export failed" }));
    }
    HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(buf)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let engine = EngineConfig::from_env();
    log::info!(
        "Using {} (K={}, top {})",
        server.data_path.display(),
        engine.k_factor,
        engine.top_n
    );

    let store = ScoreboardStore::open(JsonFilePersistence::new(&server.data_path))?;
    let state = Data::new(ScoreKeeper::new(store, engine));

    let bind = (server.host.as_str(), server.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_scoreboards)
            .service(api_create_scoreboard)
            .service(api_standings_csv)
            .service(api_standings_text)
            .service(api_standings)
            .service(api_get_scoreboard)
            .service(api_delete_scoreboard)
            .service(api_archive_scoreboard)
            .service(api_unarchive_scoreboard)
            .service(api_add_players)
            .service(api_rename_player)
            .service(api_remove_player)
            .service(api_mark_score)
    })
    .bind(bind)?
    .run()
    .await
}
