//! Browser-playable chess server. Rules questions are delegated wholesale
//! to `shakmaty`; the AI is a set of rating-banded selection heuristics.

pub mod api;
pub mod selector;
pub mod session;
pub mod util;
