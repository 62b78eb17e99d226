//! Core types: participants, RNG, match events.

pub mod events;
pub mod participant;
pub mod rng;

pub use events::{EventBus, MatchEvent};
pub use participant::ParticipantId;
pub use rng::MatchRng;
