use std::str::FromStr;

use anyhow::Result;
use shakmaty::Role;
use shakmaty::uci::UciMove;

pub fn parse_uci_move(move_str: &str) -> Result<UciMove> {
    let uci_move = UciMove::from_str(move_str.trim())?;

    Ok(uci_move)
}

/// Material value in centipawns. The king is worth nothing here because it
/// can never be captured.
pub fn role_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 100,
        Role::Knight => 300,
        Role::Bishop => 300,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 0,
    }
}
