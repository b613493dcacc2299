//! End-to-end tests for the session protocol, driving the router the same
//! way the browser client does.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use rusty_chess_server::api::{self, AppState};
use rusty_chess_server::session::{SessionStore, StoreConfig};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn app() -> Router {
    let store = Arc::new(SessionStore::new(StoreConfig::default()));
    api::router(AppState { store }, "static")
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn legal_moves(body: &Value) -> Vec<String> {
    body["legal_moves"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn new_game_starts_at_the_standard_position() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/new_game",
        json!({"game_id": "g1", "rating": 1500, "human_color": "white"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["game_id"], json!("g1"));
    assert_eq!(body["board_fen"], json!(START_FEN));
    assert_eq!(body["game_over"], json!(false));
    let moves = legal_moves(&body);
    assert_eq!(moves.len(), 20);
    assert!(moves.contains(&"e2e4".to_string()));
}

#[tokio::test]
async fn human_move_then_ai_reply() {
    let app = app();
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "t1", "rating": 400, "human_color": "white"}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/api/make_move",
        json!({"game_id": "t1", "move": "e2e4"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let fen = body["board_fen"].as_str().unwrap();
    assert_eq!(fen.split(' ').nth(1), Some("b"), "black to move after e2e4");
    let black_replies = legal_moves(&body);

    let (status, body) = post(&app, "/api/get_ai_move", json!({"game_id": "t1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let ai_move = body["ai_move"].as_str().unwrap().to_string();
    assert!(
        black_replies.contains(&ai_move),
        "{ai_move} not in the post-e2e4 legal set"
    );
    let fen = body["board_fen"].as_str().unwrap();
    assert_eq!(fen.split(' ').nth(1), Some("w"), "white to move again");
}

#[tokio::test]
async fn ai_reply_is_legal_in_every_band() {
    for rating in [400, 1200, 2000, 2800] {
        let app = app();
        let (_, body) = post(
            &app,
            "/api/new_game",
            json!({"game_id": "band", "rating": rating, "human_color": "black"}),
        )
        .await;
        let openings = legal_moves(&body);

        let (status, body) = post(&app, "/api/get_ai_move", json!({"game_id": "band"})).await;
        assert_eq!(status, StatusCode::OK, "rating {rating}");
        let ai_move = body["ai_move"].as_str().unwrap().to_string();
        assert!(openings.contains(&ai_move), "{ai_move} illegal at {rating}");
    }
}

#[tokio::test]
async fn illegal_move_is_rejected_and_leaves_the_position() {
    let app = app();
    post(&app, "/api/new_game", json!({"game_id": "g"})).await;

    let (status, body) = post(
        &app,
        "/api/make_move",
        json!({"game_id": "g", "move": "e2e5"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("illegal_move"));

    let (_, body) = post(
        &app,
        "/api/make_move",
        json!({"game_id": "g", "move": "not-a-move"}),
    )
    .await;
    assert_eq!(body["error"], json!("illegal_move"));

    let (_, body) = get(&app, "/api/get_game_state?game_id=g").await;
    assert_eq!(body["board_fen"], json!(START_FEN));
    assert_eq!(body["move_history"], json!([]));
}

#[tokio::test]
async fn unknown_sessions_are_404s() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/make_move",
        json!({"game_id": "ghost", "move": "e2e4"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("unknown_session"));

    for path in ["/api/get_ai_move", "/api/reset_game"] {
        let (status, body) = post(&app, path, json!({"game_id": "ghost"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["error"], json!("unknown_session"), "{path}");
    }

    let (status, body) = post(
        &app,
        "/api/set_difficulty",
        json!({"game_id": "ghost", "rating": 1500}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("unknown_session"));

    let (status, _) = get(&app, "/api/get_game_state?game_id=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_range_ratings_are_rejected() {
    let app = app();
    for rating in [0, 399, 3001] {
        let (status, body) = post(
            &app,
            "/api/new_game",
            json!({"game_id": "r", "rating": rating}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rating {rating}");
        assert_eq!(body["error"], json!("invalid_difficulty"));
    }

    post(&app, "/api/new_game", json!({"game_id": "r"})).await;
    let (status, body) = post(
        &app,
        "/api/set_difficulty",
        json!({"game_id": "r", "rating": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_difficulty"));
}

#[tokio::test]
async fn set_difficulty_never_touches_the_position() {
    let app = app();
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "d", "rating": 1500}),
    )
    .await;
    post(
        &app,
        "/api/make_move",
        json!({"game_id": "d", "move": "e2e4"}),
    )
    .await;

    for rating in [400, 2200, 3000] {
        let (status, body) = post(
            &app,
            "/api/set_difficulty",
            json!({"game_id": "d", "rating": rating}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating"], json!(rating));
    }

    let (_, body) = get(&app, "/api/get_game_state?game_id=d").await;
    assert_eq!(body["move_history"], json!(["e2e4"]));
    assert_eq!(body["rating"], json!(3000));
    let fen = body["board_fen"].as_str().unwrap();
    assert_eq!(fen.split(' ').nth(1), Some("b"));
}

#[tokio::test]
async fn reset_restores_the_start_and_keeps_settings() {
    let app = app();
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "x", "rating": 2000, "human_color": "black"}),
    )
    .await;
    post(
        &app,
        "/api/make_move",
        json!({"game_id": "x", "move": "e2e4"}),
    )
    .await;

    let (status, body) = post(&app, "/api/reset_game", json!({"game_id": "x"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["board_fen"], json!(START_FEN));
    assert_eq!(legal_moves(&body).len(), 20);

    let (_, body) = get(&app, "/api/get_game_state?game_id=x").await;
    assert_eq!(body["rating"], json!(2000));
    assert_eq!(body["human_color"], json!("black"));
    assert_eq!(body["move_history"], json!([]));
}

#[tokio::test]
async fn fools_mate_ends_with_a_black_win() {
    let app = app();
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "m", "human_color": "white"}),
    )
    .await;

    let mut last = Value::Null;
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        let (status, body) = post(
            &app,
            "/api/make_move",
            json!({"game_id": "m", "move": mv}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "move {mv}");
        last = body;
    }
    assert_eq!(last["game_over"], json!(true));
    assert_eq!(last["result"], json!("black_wins"));
    assert!(legal_moves(&last).is_empty());

    // Terminal position has an empty legal set, so any further move is illegal.
    let (status, body) = post(
        &app,
        "/api/make_move",
        json!({"game_id": "m", "move": "e1f2"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("illegal_move"));
}

#[tokio::test]
async fn ai_only_moves_on_its_own_turn() {
    let app = app();
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "n", "human_color": "white"}),
    )
    .await;
    let (status, body) = post(&app, "/api/get_ai_move", json!({"game_id": "n"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("not_ai_turn"));
}

#[tokio::test]
async fn finished_game_refuses_further_ai_moves() {
    let app = app();
    // Human plays black, so after the mate it is white's (the AI's) turn.
    post(
        &app,
        "/api/new_game",
        json!({"game_id": "o", "human_color": "black"}),
    )
    .await;
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        post(&app, "/api/make_move", json!({"game_id": "o", "move": mv})).await;
    }

    let (status, body) = post(&app, "/api/get_ai_move", json!({"game_id": "o"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("game_already_over"));
}

#[tokio::test]
async fn omitted_fields_fall_back_to_defaults() {
    let app = app();
    let (status, body) = post(&app, "/api/new_game", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_id"], json!("default"));

    let (_, body) = get(&app, "/api/get_game_state?game_id=default").await;
    assert_eq!(body["rating"], json!(1500));
    assert_eq!(body["human_color"], json!("white"));
}

#[tokio::test]
async fn health_reports_the_rules_engine() {
    let app = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["engine"], json!("shakmaty"));
}
