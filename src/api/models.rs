//! Request and response bodies for the session endpoints.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::session::GameResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[default]
    White,
    Black,
}

impl From<PlayerColor> for Color {
    fn from(color: PlayerColor) -> Color {
        match color {
            PlayerColor::White => Color::White,
            PlayerColor::Black => Color::Black,
        }
    }
}

impl From<Color> for PlayerColor {
    fn from(color: Color) -> PlayerColor {
        match color {
            Color::White => PlayerColor::White,
            Color::Black => PlayerColor::Black,
        }
    }
}

fn default_game_id() -> String {
    "default".to_string()
}

fn default_rating() -> u32 {
    1500
}

#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    #[serde(default = "default_game_id")]
    pub game_id: String,
    #[serde(default = "default_rating")]
    pub rating: u32,
    #[serde(default)]
    pub human_color: PlayerColor,
}

#[derive(Debug, Deserialize)]
pub struct MakeMoveRequest {
    #[serde(default = "default_game_id")]
    pub game_id: String,
    #[serde(rename = "move")]
    pub uci: String,
}

#[derive(Debug, Deserialize)]
pub struct GameIdRequest {
    #[serde(default = "default_game_id")]
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDifficultyRequest {
    #[serde(default = "default_game_id")]
    pub game_id: String,
    pub rating: u32,
}

#[derive(Debug, Deserialize)]
pub struct GameStateQuery {
    #[serde(default = "default_game_id")]
    pub game_id: String,
}

#[derive(Debug, Serialize)]
pub struct NewGameResponse {
    pub success: bool,
    pub game_id: String,
    pub board_fen: String,
    pub legal_moves: Vec<String>,
    pub game_over: bool,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub board_fen: String,
    pub legal_moves: Vec<String>,
    pub game_over: bool,
    pub result: Option<GameResult>,
}

#[derive(Debug, Serialize)]
pub struct AiMoveResponse {
    pub success: bool,
    pub ai_move: String,
    pub board_fen: String,
    pub legal_moves: Vec<String>,
    pub game_over: bool,
    pub result: Option<GameResult>,
}

#[derive(Debug, Serialize)]
pub struct SetDifficultyResponse {
    pub success: bool,
    pub rating: u32,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub board_fen: String,
    pub legal_moves: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub success: bool,
    pub board_fen: String,
    pub legal_moves: Vec<String>,
    pub game_over: bool,
    pub result: Option<GameResult>,
    pub human_color: PlayerColor,
    pub rating: u32,
    pub move_history: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine: &'static str,
}
