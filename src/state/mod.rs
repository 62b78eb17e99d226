//! Match state: per-player zones, shared zones, and the match context.

pub mod context;
pub mod player;
pub mod shared;

pub use context::MatchContext;
pub use player::{PlayerState, TURN_DURATION_SECS};
pub use shared::{PowerOp, SharedState};
