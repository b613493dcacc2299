use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Every way a session operation can fail. Each variant is surfaced to the
/// caller as a structured `success: false` body, never silently dropped.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no game with id `{0}`")]
    UnknownSession(String),
    #[error("`{0}` is not a legal move in the current position")]
    IllegalMove(String),
    #[error("difficulty rating {0} is outside the supported range 400-3000")]
    InvalidDifficulty(u32),
    #[error("it is not the AI's turn to move")]
    NotAiTurn,
    #[error("the game is already over")]
    GameAlreadyOver,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::UnknownSession(_) => "unknown_session",
            ApiError::IllegalMove(_) => "illegal_move",
            ApiError::InvalidDifficulty(_) => "invalid_difficulty",
            ApiError::NotAiTurn => "not_ai_turn",
            ApiError::GameAlreadyOver => "game_already_over",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownSession(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
