//! The session protocol: HTTP/JSON endpoints over the store and the
//! rules library. Handlers hold the store's write lock for the whole
//! read-modify-write, so each request mutates its session atomically.

mod error;
mod models;

pub use error::ApiError;
pub use models::*;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::selector;
use crate::session::{GameSession, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
}

pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/new_game", post(new_game))
        .route("/api/make_move", post(make_move))
        .route("/api/get_ai_move", post(get_ai_move))
        .route("/api/set_difficulty", post(set_difficulty))
        .route("/api/reset_game", post(reset_game))
        .route("/api/get_game_state", get(get_game_state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn validate_rating(rating: u32) -> Result<(), ApiError> {
    if (selector::MIN_RATING..=selector::MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::InvalidDifficulty(rating))
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        engine: "shakmaty",
    })
}

/// POST /api/new_game - create or overwrite a session at the start position.
async fn new_game(
    State(app): State<AppState>,
    Json(req): Json<NewGameRequest>,
) -> Result<Json<NewGameResponse>, ApiError> {
    validate_rating(req.rating)?;

    let human_color: shakmaty::Color = req.human_color.into();
    let session = GameSession::new(human_color, req.rating);
    let response = NewGameResponse {
        success: true,
        game_id: req.game_id.clone(),
        board_fen: session.fen(),
        legal_moves: session.legal_moves_uci(),
        game_over: session.game_over(),
    };

    info!(
        "[{}] new game (rating {}, human plays {:?})",
        req.game_id, req.rating, human_color
    );
    app.store.insert(req.game_id, session).await;

    Ok(Json(response))
}

/// POST /api/make_move - apply a client move after the rules library
/// confirms it is in the current legal set.
async fn make_move(
    State(app): State<AppState>,
    Json(req): Json<MakeMoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let outcome = app.store
        .with_session(&req.game_id, |session| {
            session
                .apply_uci(&req.uci)
                .map_err(|_| ApiError::IllegalMove(req.uci.clone()))?;

            info!("[{}] played {}", req.game_id, req.uci);
            Ok(Json(MoveResponse {
                success: true,
                board_fen: session.fen(),
                legal_moves: session.legal_moves_uci(),
                game_over: session.game_over(),
                result: session.result(),
            }))
        })
        .await;
    outcome.ok_or_else(|| ApiError::UnknownSession(req.game_id))?
}

/// POST /api/get_ai_move - let the move selector answer for the AI side.
async fn get_ai_move(
    State(app): State<AppState>,
    Json(req): Json<GameIdRequest>,
) -> Result<Json<AiMoveResponse>, ApiError> {
    let outcome = app.store
        .with_session(&req.game_id, |session| {
            if session.turn() != session.ai_color() {
                return Err(ApiError::NotAiTurn);
            }
            let chosen = selector::select_move(session.position(), session.rating())
                .ok_or(ApiError::GameAlreadyOver)?;
            let uci = session.apply_move(chosen);

            info!(
                "[{}] AI replied {uci} (rating {})",
                req.game_id,
                session.rating()
            );
            Ok(Json(AiMoveResponse {
                success: true,
                ai_move: uci,
                board_fen: session.fen(),
                legal_moves: session.legal_moves_uci(),
                game_over: session.game_over(),
                result: session.result(),
            }))
        })
        .await;
    outcome.ok_or_else(|| ApiError::UnknownSession(req.game_id))?
}

/// POST /api/set_difficulty - retune the selector band, position untouched.
async fn set_difficulty(
    State(app): State<AppState>,
    Json(req): Json<SetDifficultyRequest>,
) -> Result<Json<SetDifficultyResponse>, ApiError> {
    validate_rating(req.rating)?;

    let outcome = app.store
        .with_session(&req.game_id, |session| {
            session.set_rating(req.rating);
            info!("[{}] difficulty set to {}", req.game_id, req.rating);
            Json(SetDifficultyResponse {
                success: true,
                rating: req.rating,
            })
        })
        .await;
    outcome.ok_or_else(|| ApiError::UnknownSession(req.game_id))
}

/// POST /api/reset_game - back to the start position, settings preserved.
async fn reset_game(
    State(app): State<AppState>,
    Json(req): Json<GameIdRequest>,
) -> Result<Json<ResetResponse>, ApiError> {
    let outcome = app.store
        .with_session(&req.game_id, |session| {
            session.reset();
            info!("[{}] reset to the starting position", req.game_id);
            Json(ResetResponse {
                success: true,
                board_fen: session.fen(),
                legal_moves: session.legal_moves_uci(),
            })
        })
        .await;
    outcome.ok_or_else(|| ApiError::UnknownSession(req.game_id))
}

/// GET /api/get_game_state - full snapshot for a reconnecting client.
async fn get_game_state(
    State(app): State<AppState>,
    Query(query): Query<GameStateQuery>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let outcome = app.store
        .with_session(&query.game_id, |session| {
            Json(GameStateResponse {
                success: true,
                board_fen: session.fen(),
                legal_moves: session.legal_moves_uci(),
                game_over: session.game_over(),
                result: session.result(),
                human_color: session.human_color().into(),
                rating: session.rating(),
                move_history: session.history().to_vec(),
            })
        })
        .await;
    outcome.ok_or_else(|| ApiError::UnknownSession(query.game_id))
}
