//! Difficulty-banded move selection over the legal-move set.
//!
//! This is deliberately not a search. Each rating band only biases which
//! legal move gets picked; the bands are cosmetic tiers, not a calibrated
//! playing-strength guarantee.

use log::debug;
use rand::{Rng, rng};
use shakmaty::{CastlingMode, Chess, Color, Move, MoveList, Position, Rank, Role, Square};

use crate::util::role_value;

pub const MIN_RATING: u32 = 400;
pub const MAX_RATING: u32 = 3000;

const MATE_SCORE: i32 = 100_000;

/// Pick one move from the current legal set, or `None` when the position
/// is terminal and there is nothing to pick.
pub fn select_move(position: &Chess, rating: u32) -> Option<Move> {
    let legals = position.legal_moves();
    if legals.is_empty() {
        return None;
    }

    let chosen = match rating {
        ..=800 => random_move(&legals),
        801..=1500 => casual_move(position, &legals),
        1501..=2200 => club_move(position, &legals),
        _ => tactical_move(position, &legals),
    };
    debug!(
        "selector picked {} at rating {rating} ({} candidates)",
        chosen.to_uci(CastlingMode::Standard),
        legals.len()
    );
    Some(chosen)
}

fn random_move(legals: &MoveList) -> Move {
    let index = rng().random_range(0..legals.len());
    legals[index].clone()
}

fn pick(moves: &[Move]) -> Move {
    let index = rng().random_range(0..moves.len());
    moves[index].clone()
}

/// 801-1500: mild bias. Mostly takes a capture when one is on the board,
/// occasionally a check, otherwise plays anything.
fn casual_move(position: &Chess, legals: &MoveList) -> Move {
    let captures: Vec<Move> = legals.iter().filter(|m| m.is_capture()).cloned().collect();
    if !captures.is_empty() && rng().random_bool(0.7) {
        return pick(&captures);
    }

    let checks: Vec<Move> = legals
        .iter()
        .filter(|m| gives_check(position, m))
        .cloned()
        .collect();
    if !checks.is_empty() && rng().random_bool(0.3) {
        return pick(&checks);
    }

    random_move(legals)
}

/// 1501-2200: stronger bias. Takes a mate in one when present, then
/// material-winning captures, then checks, then development, then anything.
fn club_move(position: &Chess, legals: &MoveList) -> Move {
    if let Some(mate) = legals.iter().find(|m| gives_checkmate(position, m)) {
        return mate.clone();
    }

    let winning_captures: Vec<Move> = legals
        .iter()
        .filter(|m| {
            m.capture()
                .is_some_and(|victim| role_value(victim) >= role_value(m.role()))
        })
        .cloned()
        .collect();
    if !winning_captures.is_empty() {
        return pick(&winning_captures);
    }

    let checks: Vec<Move> = legals
        .iter()
        .filter(|m| gives_check(position, m))
        .cloned()
        .collect();
    if !checks.is_empty() {
        return pick(&checks);
    }

    let developing: Vec<Move> = legals
        .iter()
        .filter(|m| is_developing(position.turn(), m))
        .cloned()
        .collect();
    if !developing.is_empty() {
        return pick(&developing);
    }

    random_move(legals)
}

/// 2201+: near-deterministic. Every legal move gets a static score and the
/// best one wins; ties break on UCI ordering so repeated calls agree.
fn tactical_move(position: &Chess, legals: &MoveList) -> Move {
    let mut best: Option<(i32, String, Move)> = None;
    for m in legals.iter() {
        let score = score_move(position, m);
        let uci = m.to_uci(CastlingMode::Standard).to_string();
        let better = match &best {
            None => true,
            Some((best_score, best_uci, _)) => {
                score > *best_score || (score == *best_score && uci < *best_uci)
            }
        };
        if better {
            best = Some((score, uci, m.clone()));
        }
    }
    let (_, _, chosen) = best.expect("caller guarantees a non-empty move list");
    chosen
}

fn score_move(position: &Chess, m: &Move) -> i32 {
    let mut after = position.clone();
    after.play_unchecked(m.clone());
    if after.is_checkmate() {
        return MATE_SCORE;
    }

    let mut score = 0;
    if let Some(victim) = m.capture() {
        score += role_value(victim) * 10 - role_value(m.role());
    }
    if let Some(promotion) = m.promotion() {
        score += role_value(promotion);
    }
    if after.is_check() {
        score += 50;
    }
    if is_central(m.to()) {
        score += 15;
    }
    score
}

fn gives_check(position: &Chess, m: &Move) -> bool {
    let mut after = position.clone();
    after.play_unchecked(m.clone());
    after.is_check()
}

fn gives_checkmate(position: &Chess, m: &Move) -> bool {
    let mut after = position.clone();
    after.play_unchecked(m.clone());
    after.is_checkmate()
}

fn is_central(square: Square) -> bool {
    matches!(square, Square::D4 | Square::E4 | Square::D5 | Square::E5)
}

/// A minor piece leaving its home rank, or a pawn claiming the center.
fn is_developing(turn: Color, m: &Move) -> bool {
    let home_rank = match turn {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    match m.role() {
        Role::Knight | Role::Bishop => m.from().is_some_and(|sq| sq.rank() == home_rank),
        Role::Pawn => is_central(m.to()),
        _ => false,
    }
}
