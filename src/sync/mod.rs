//! State replication: wire messages, the transport contract, and the
//! engine that applies the authority model.

pub mod engine;
pub mod message;
pub mod transport;

pub use engine::{
    ReplicationEngine, LINEUP_SIZE, STARTING_HAND_SIZE, SUPER_VILLAINS_REVEALED,
};
pub use message::{SyncMessage, Target};
pub use transport::{Delivery, LocalHub, LocalEndpoint, Transport};
