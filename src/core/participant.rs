//! Participant identification.
//!
//! A participant is one connected process in a match. Identifiers are
//! assigned by the transport layer (the relay's actor numbers) and are
//! stable for the lifetime of a connection.

use serde::{Deserialize, Serialize};

/// Stable identifier for one connected participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    /// Create a new participant ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Participant {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_basics() {
        let p = ParticipantId::new(3);
        assert_eq!(p.raw(), 3);
        assert_eq!(format!("{}", p), "Participant 3");
    }

    #[test]
    fn test_participant_id_serialization() {
        let p = ParticipantId::new(7);
        let json = serde_json::to_string(&p).unwrap();
        let deserialized: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }
}
