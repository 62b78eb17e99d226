//! # cardtable
//!
//! Authoritative state synchronization and turn sequencing for a
//! multiplayer deck-building card game.
//!
//! ## Design Principles
//!
//! 1. **Apply locally, then broadcast**: the authoritative process for a
//!    piece of state mutates its copy first and sends a compact delta.
//!    Mirrors only change through the single decode-and-apply path.
//!
//! 2. **Degrade, don't desync loudly**: unknown ids, stale requests, and
//!    authority violations are logged and dropped, never fatal. Only
//!    startup misconfiguration is an error.
//!
//! 3. **Explicit context**: everything a match needs (catalog, zones,
//!    players, RNG, observers) lives in one `MatchContext` handed to the
//!    engine. No globals; several matches can coexist in one process.
//!
//! ## Architecture
//!
//! - **Ownership split**: each player's private zones belong to their own
//!   process; shared zones and turn advancement belong to the master.
//!
//! - **Identifiers on the wire**: deltas carry definition ids (plus full
//!   id sequences for bulk syncs), never card objects. Instance handles
//!   are minted per process and rebound on receive.
//!
//! ## Modules
//!
//! - `cards`: Definitions, the catalog, per-process instance handles
//! - `zones`: Ordered card containers and full-sequence rebuild
//! - `state`: Player state, shared state, the match context
//! - `turn`: Turn-order and phase state machine
//! - `sync`: Wire messages, the transport contract, the replication engine
//! - `core`: Participants, events, RNG

pub mod cards;
pub mod core;
pub mod error;
pub mod state;
pub mod sync;
pub mod turn;
pub mod zones;

// Re-export commonly used types
pub use crate::cards::{
    CardCatalog, CardDefinition, CardId, CardInstance, CardKind, InstanceAllocator, InstanceId,
};

pub use crate::core::{EventBus, MatchEvent, MatchRng, ParticipantId};

pub use crate::error::SetupError;

pub use crate::state::{MatchContext, PlayerState, PowerOp, SharedState, TURN_DURATION_SECS};

pub use crate::turn::{StartTurn, TurnPhase, TurnSequencer};

pub use crate::sync::{
    Delivery, LocalEndpoint, LocalHub, ReplicationEngine, SyncMessage, Target, Transport,
    LINEUP_SIZE, STARTING_HAND_SIZE, SUPER_VILLAINS_REVEALED,
};

pub use crate::zones::{Zone, ZoneTag};
