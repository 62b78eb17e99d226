//! Card instances - runtime handles for cards in play.
//!
//! A `CardInstance` pairs a locally-assigned handle with the definition id
//! it refers to. Instance handles are minted per process; the wire protocol
//! carries definition ids, and each peer binds them to its own handles.

use serde::{Deserialize, Serialize};

use super::definition::CardId;

/// Locally-assigned handle for one physical card in a match.
///
/// Handles are only meaningful within the process that minted them. Two
/// peers may use different handles for the same physical card; deltas that
/// cannot be matched by handle fall back to matching by definition id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// One physical card in a match: handle plus definition reference.
///
/// A card instance lives in exactly one zone at any time. "Moving" a card
/// is removal from one zone and insertion into another, never a copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Locally-assigned handle.
    pub id: InstanceId,
    /// The definition this instance refers to.
    pub card: CardId,
}

/// Mints instance handles for one process.
#[derive(Clone, Debug, Default)]
pub struct InstanceAllocator {
    next: u32,
}

impl InstanceAllocator {
    /// Create a fresh allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new instance for the given definition.
    pub fn mint(&mut self, card: CardId) -> CardInstance {
        let id = InstanceId(self.next);
        self.next += 1;
        CardInstance { id, card }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_unique_handles() {
        let mut alloc = InstanceAllocator::new();
        let a = alloc.mint(CardId::new(301));
        let b = alloc.mint(CardId::new(301));

        assert_eq!(a.card, b.card);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_instance_display() {
        let mut alloc = InstanceAllocator::new();
        let a = alloc.mint(CardId::new(301));
        assert_eq!(format!("{}", a.id), "Instance(0)");
    }

    #[test]
    fn test_instance_serialization() {
        let mut alloc = InstanceAllocator::new();
        let a = alloc.mint(CardId::new(301));

        let json = serde_json::to_string(&a).unwrap();
        let deserialized: CardInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(a, deserialized);
    }
}
