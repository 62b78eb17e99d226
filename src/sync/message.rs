//! Wire messages for state replication.
//!
//! A closed message-kind enumeration with typed payloads, dispatched
//! through the replication engine's single decode-and-apply path. Deltas
//! carry identifiers, never whole card objects: fine-grained moves carry
//! one definition id (plus the sender's instance handle as a matching
//! hint), full-zone syncs carry the complete id sequence.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, InstanceId};
use crate::core::participant::ParticipantId;
use crate::zones::ZoneTag;

/// Addressing for an outgoing message.
///
/// Buffered targets ask the transport to replay the message to late
/// joiners; buffering itself is the transport's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Every other participant.
    Others,
    /// Every other participant, replayed to late joiners.
    OthersBuffered,
    /// The master only.
    Master,
    /// One specific participant.
    One(ParticipantId),
}

/// One replication delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SyncMessage {
    // === Turn sequencing ===
    /// Canonical turn order, from the master at match start.
    SetTurnOrder { order: Vec<ParticipantId> },
    /// A turn began for `actor`, from the master.
    StartTurn { actor: ParticipantId },
    /// A non-master actor asks the master to end their turn.
    RequestEndTurn { actor: ParticipantId },
    /// `actor`'s turn ended, from the master.
    TurnEnded { actor: ParticipantId },

    // === Player-owned zones ===
    /// One card moved from `participant`'s deck to their hand.
    Draw {
        participant: ParticipantId,
        card: CardId,
    },
    /// `participant`'s deck in its post-shuffle order. Mirrors replace
    /// their copy verbatim; they never re-shuffle locally.
    Shuffle {
        participant: ParticipantId,
        deck: Vec<CardId>,
    },
    /// `participant`'s deck rebuilt from their discard pile. Receivers
    /// infer the discard clear.
    Refill {
        participant: ParticipantId,
        deck: Vec<CardId>,
    },
    /// `participant`'s discard pile after discarding their hand.
    DiscardHand {
        participant: ParticipantId,
        discard: Vec<CardId>,
    },
    /// `participant`'s discard pile after collecting the shared played
    /// zone. Receivers infer the played-zone clear.
    DiscardPlayed {
        participant: ParticipantId,
        discard: Vec<CardId>,
    },
    /// A card left `participant`'s hand for `to`. `instance` is the
    /// sender's handle, a matching hint; receivers fall back to the
    /// definition id.
    Move {
        participant: ParticipantId,
        instance: InstanceId,
        card: CardId,
        to: ZoneTag,
    },

    // === Shared zones (master-owned) ===
    /// A card moved from the main deck to the line-up.
    DealLineup { card: CardId },
    /// A card was revealed from the super-villain deck into the row.
    RevealSuperVillain { card: CardId },
    /// `participant` took a card out of a shared row into their discard
    /// pile. Matched by definition id; `from` is `Lineup` or
    /// `SuperVillain`.
    TakeShared {
        participant: ParticipantId,
        card: CardId,
        from: ZoneTag,
    },

    // === Characters ===
    /// The master assigned the receiving participant this character.
    AssignCharacter { card: CardId },
    /// `participant` bound their character; mirrors record it and drop
    /// the definition from their character-deck mirror.
    SyncCharacter {
        participant: ParticipantId,
        card: CardId,
    },
}

impl SyncMessage {
    /// Encode for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode from the wire.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<SyncMessage> {
        vec![
            SyncMessage::SetTurnOrder {
                order: vec![ParticipantId::new(2), ParticipantId::new(1)],
            },
            SyncMessage::StartTurn {
                actor: ParticipantId::new(2),
            },
            SyncMessage::Draw {
                participant: ParticipantId::new(1),
                card: CardId::new(301),
            },
            SyncMessage::Shuffle {
                participant: ParticipantId::new(1),
                deck: vec![CardId::new(301), CardId::new(302)],
            },
            SyncMessage::Move {
                participant: ParticipantId::new(1),
                instance: InstanceId(4),
                card: CardId::new(301),
                to: ZoneTag::Played,
            },
            SyncMessage::TakeShared {
                participant: ParticipantId::new(1),
                card: CardId::new(201),
                from: ZoneTag::SuperVillain,
            },
        ]
    }

    #[test]
    fn test_bincode_round_trip() {
        for msg in samples() {
            let bytes = msg.encode().unwrap();
            let decoded = SyncMessage::decode(&bytes).unwrap();
            assert_eq!(msg, decoded);
        }
    }

    #[test]
    fn test_json_round_trip() {
        for msg in samples() {
            let json = serde_json::to_string(&msg).unwrap();
            let decoded: SyncMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(msg, decoded);
        }
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(SyncMessage::decode(&[0xFF; 3]).is_err());
    }

    #[test]
    fn test_deltas_are_compact() {
        // A draw delta is two identifiers, not a card object.
        let msg = SyncMessage::Draw {
            participant: ParticipantId::new(1),
            card: CardId::new(301),
        };
        assert!(msg.encode().unwrap().len() <= 16);
    }
}
