//! Match events and synchronous observer dispatch.
//!
//! The replication engine announces confirmed state changes through an
//! explicit observer list. Handlers run to completion, in subscription
//! order, before the triggering operation returns - matching the
//! single-threaded mutation model. Observers are how a UI layer hears
//! about mirrored state without ever mutating it.

use crate::cards::{CardId, CardInstance};
use crate::core::participant::ParticipantId;
use crate::zones::ZoneTag;

/// A confirmed state change, announced after it has been applied locally.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchEvent {
    /// A turn began for `actor`.
    TurnStarted { actor: ParticipantId },
    /// `actor` entered their main phase.
    MainPhaseStarted { actor: ParticipantId },
    /// `actor`'s turn ended.
    TurnEnded { actor: ParticipantId },
    /// A card moved from `participant`'s deck to their hand.
    CardDrawn {
        participant: ParticipantId,
        card: CardInstance,
    },
    /// A card moved out of `participant`'s hand into a play zone.
    CardPlayed {
        participant: ParticipantId,
        card: CardInstance,
        to: ZoneTag,
    },
    /// `participant`'s deck was reordered.
    DeckShuffled { participant: ParticipantId },
    /// `participant`'s discard pile was folded back into their deck.
    DeckRefilled { participant: ParticipantId },
    /// `participant`'s hand was moved to their discard pile.
    HandDiscarded { participant: ParticipantId },
    /// The shared played zone was moved to `participant`'s discard pile.
    PlayedCardsDiscarded { participant: ParticipantId },
    /// A card was dealt from the main deck to the line-up.
    LineupDealt { card: CardId },
    /// A card was revealed from the super-villain deck into the row.
    SuperVillainRevealed { card: CardId },
    /// A card left a shared zone for `participant`'s discard pile.
    SharedCardTaken {
        participant: ParticipantId,
        card: CardId,
        from: ZoneTag,
    },
    /// `participant` was bound to their character.
    CharacterAssigned {
        participant: ParticipantId,
        card: CardId,
    },
    /// The power counter changed.
    PowerChanged { power: i32 },
}

/// Synchronous observer list.
///
/// Not a queue: `emit` dispatches immediately to every subscribed handler
/// and returns only once all of them have run.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn FnMut(&MatchEvent)>>,
}

impl EventBus {
    /// Create a bus with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an observer. Observers are called in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&MatchEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Dispatch an event to every observer, synchronously.
    pub fn emit(&mut self, event: MatchEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
