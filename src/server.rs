// HTTP surface: axum router and handlers over the list service and the
// upstream players pipeline. Cross-origin access is open to all origins so
// the browser frontend can talk to a locally-running backend.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::lists::{ListError, ListKind, ListService};
use crate::players::fetch::PlayersClient;
use crate::players::filter::filter_players;
use crate::players::normalize::PlayerRecord;
use crate::store::{PickRecord, Storage};

/// List service as wired into the running server: any storage backend.
pub type SharedService = ListService<Box<dyn Storage>>;

/// Shared handler state.
pub struct AppState {
    pub service: SharedService,
    pub players: PlayersClient,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let status = match &self {
            ListError::Duplicate { .. } | ListError::MissingId => StatusCode::BAD_REQUEST,
            ListError::Store(e) => {
                error!("storage failure: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/data", get(get_data))
        .route("/players", get(get_players))
        .route("/ideal_picks", get(list_ideal_picks).post(add_ideal_pick))
        .route("/ideal_picks/{id}", delete(remove_ideal_pick))
        .route(
            "/drafted_players",
            get(list_drafted_players)
                .post(draft_player)
                .delete(clear_drafted_players),
        )
        .route("/drafted_players/{id}", delete(remove_drafted_player))
        .route(
            "/priority_list",
            get(list_priority).post(replace_priority),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve the API until the process exits.
pub async fn run(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Player data handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PlayersQuery {
    pub position: Option<String>,
    pub sort: Option<String>,
}

async fn get_data(State(state): State<Arc<AppState>>) -> Json<Vec<PlayerRecord>> {
    Json(state.players.fetch_players().await)
}

async fn get_players(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayersQuery>,
) -> Json<Vec<PlayerRecord>> {
    let players = state.players.fetch_players().await;
    Json(filter_players(
        players,
        query.position.as_deref(),
        query.sort.as_deref(),
    ))
}

// ---------------------------------------------------------------------------
// Ideal picks handlers
// ---------------------------------------------------------------------------

async fn list_ideal_picks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PickRecord>>, ListError> {
    Ok(Json(state.service.list(ListKind::IdealPicks)?))
}

async fn add_ideal_pick(
    State(state): State<Arc<AppState>>,
    Json(record): Json<PickRecord>,
) -> Result<impl IntoResponse, ListError> {
    state.service.add(ListKind::IdealPicks, record)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Player added to ideal picks" })),
    ))
}

async fn remove_ideal_pick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ListError> {
    state.service.remove(ListKind::IdealPicks, &path_id(&id))?;
    Ok(Json(json!({ "message": "Player removed from ideal picks" })))
}

// ---------------------------------------------------------------------------
// Drafted players handlers
// ---------------------------------------------------------------------------

async fn list_drafted_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PickRecord>>, ListError> {
    Ok(Json(state.service.list(ListKind::DraftedPlayers)?))
}

/// Drafting is a move: the record lands in `drafted_players` and leaves
/// `ideal_picks` in the same write. Returns the drafted record so the
/// frontend can append it directly.
async fn draft_player(
    State(state): State<Arc<AppState>>,
    Json(record): Json<PickRecord>,
) -> Result<impl IntoResponse, ListError> {
    let drafted = state.service.draft_player(record)?;
    Ok((StatusCode::CREATED, Json(drafted)))
}

async fn clear_drafted_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ListError> {
    state.service.clear(ListKind::DraftedPlayers)?;
    Ok(Json(json!({ "message": "Drafted players cleared" })))
}

async fn remove_drafted_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ListError> {
    state
        .service
        .remove(ListKind::DraftedPlayers, &path_id(&id))?;
    Ok(Json(json!({ "message": "Player removed from drafted players" })))
}

// ---------------------------------------------------------------------------
// Priority list handlers
// ---------------------------------------------------------------------------

async fn list_priority(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PickRecord>>, ListError> {
    Ok(Json(state.service.list(ListKind::PriorityList)?))
}

async fn replace_priority(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<PickRecord>>,
) -> Result<impl IntoResponse, ListError> {
    state.service.replace_priority(records)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Priority list saved" })),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Interpret a path identifier: matched numerically when it parses as an
/// integer, else as a raw string. Stored identifiers are JSON values, so
/// `DELETE /ideal_picks/12` must match a record whose `player_id` is the
/// number 12.
fn path_id(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
