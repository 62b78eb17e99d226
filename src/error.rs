//! Setup errors.
//!
//! Runtime degrade paths (unknown ids, authority violations, stale turn
//! requests) never surface as errors - they log and drop, keeping the
//! match running. Only configuration failures at startup are fatal: a
//! match must not begin in a partially configured state.

use thiserror::Error;

use crate::core::participant::ParticipantId;

/// Fatal-to-startup configuration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("card catalog is empty")]
    EmptyCatalog,

    #[error("the {0} deck has no cards")]
    EmptyDeck(&'static str),

    #[error("{0} has an empty starting deck")]
    EmptyPlayerDeck(ParticipantId),

    #[error("{0} is already registered")]
    DuplicateParticipant(ParticipantId),

    #[error("match has no participants")]
    NoParticipants,
}
