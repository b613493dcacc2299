//! Per-game session state and the in-memory store that owns it.
//!
//! A session wraps a `shakmaty` position; every rules question (legality,
//! check, mate, draws) is answered by the library, never locally.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;
use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};
use tokio::sync::RwLock;

use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

/// One in-progress game, keyed in the store by a client-supplied id.
#[derive(Debug, Clone)]
pub struct GameSession {
    position: Chess,
    human_color: Color,
    rating: u32,
    history: Vec<String>,
    last_active: Instant,
}

impl GameSession {
    pub fn new(human_color: Color, rating: u32) -> GameSession {
        GameSession {
            position: Chess::new(),
            human_color,
            rating,
            history: Vec::new(),
            last_active: Instant::now(),
        }
    }

    /// Back to the starting position, keeping rating and color assignment.
    pub fn reset(&mut self) {
        self.position = Chess::new();
        self.history.clear();
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    pub fn legal_moves_uci(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// Resolve a UCI move string against the current position and play it.
    /// Fails (leaving the position untouched) unless the string names a
    /// member of the current legal-move set.
    pub fn apply_uci(&mut self, uci: &str) -> Result<Move> {
        let parsed = util::parse_uci_move(uci)?;
        let valid_move = parsed.to_move(&self.position)?;
        self.apply_move(valid_move.clone());
        Ok(valid_move)
    }

    /// Play a move that is already known to be legal (selector output).
    pub fn apply_move(&mut self, m: Move) -> String {
        let uci = m.to_uci(CastlingMode::Standard).to_string();
        self.history.push(uci.clone());
        self.position.play_unchecked(m);
        uci
    }

    pub fn status(&self) -> GameStatus {
        if self.position.is_checkmate() {
            GameStatus::Checkmate
        } else if self.position.is_stalemate() {
            GameStatus::Stalemate
        } else if self.position.is_game_over() {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn game_over(&self) -> bool {
        self.status() != GameStatus::Ongoing
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.status() {
            GameStatus::Ongoing => None,
            // The mated side is the one to move, so the winner is the other.
            GameStatus::Checkmate => Some(match self.position.turn() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }),
            GameStatus::Stalemate | GameStatus::Draw => Some(GameResult::Draw),
        }
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn human_color(&self) -> Color {
        self.human_color
    }

    pub fn ai_color(&self) -> Color {
        self.human_color.other()
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: u32) {
        self.rating = rating;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.last_active.elapsed() > ttl
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Sessions beyond this count push out the least-recently-active one.
    pub capacity: usize,
    /// Sessions idle longer than this are dropped.
    pub ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            capacity: 1024,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Process-wide map of session id to game state. Lifetime = process; the
/// only bounds are the capacity/TTL eviction applied inline with requests.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, GameSession>>,
    config: StoreConfig,
}

impl SessionStore {
    pub fn new(config: StoreConfig) -> SessionStore {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Create or overwrite a session, evicting expired entries first and
    /// the least-recently-active entry if the store is still full.
    pub async fn insert(&self, id: String, session: GameSession) {
        let mut sessions = self.sessions.write().await;

        let ttl = self.config.ttl;
        sessions.retain(|stale_id, s| {
            let keep = !s.expired(ttl);
            if !keep {
                debug!("[{stale_id}] session expired, dropping");
            }
            keep
        });

        while sessions.len() >= self.config.capacity && !sessions.contains_key(&id) {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_active)
                .map(|(evict_id, _)| evict_id.clone());
            match oldest {
                Some(evict_id) => {
                    debug!("[{evict_id}] store full, evicting least-recently-active session");
                    sessions.remove(&evict_id);
                }
                None => break,
            }
        }

        sessions.insert(id, session);
    }

    /// Run `f` against the named session under the write lock, refreshing
    /// its activity timestamp. `None` when the id is absent or expired.
    pub async fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        if sessions.get(id).is_some_and(|s| s.expired(self.config.ttl)) {
            debug!("[{id}] session expired, dropping");
            sessions.remove(id);
            return None;
        }
        let session = sessions.get_mut(id)?;
        let result = f(session);
        session.touch();
        Some(result)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
