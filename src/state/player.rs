//! Per-player state.
//!
//! A `PlayerState` aggregates one participant's private zones (deck, hand,
//! discard pile, locations) plus their character and turn timer. Private
//! zones are authoritatively owned by the participant's own process
//! (`is_local`); every other process holds a mirror that is only updated
//! by applying received deltas.

use crate::cards::{CardCatalog, CardId, CardInstance, InstanceAllocator};
use crate::core::participant::ParticipantId;
use crate::zones::{Zone, ZoneTag};

/// Seconds a player gets per turn before it auto-ends.
pub const TURN_DURATION_SECS: f32 = 50.0;

/// One participant's slice of the match state.
#[derive(Debug)]
pub struct PlayerState {
    /// The participant this state belongs to.
    pub participant: ParticipantId,

    /// The character chosen once per match; never returned to the deck.
    pub character: Option<CardInstance>,

    pub deck: Zone,
    pub hand: Zone,
    pub discard: Zone,
    pub locations: Zone,

    /// Whether this process owns the player's private zones.
    pub is_local: bool,

    /// Seconds left in the current turn. Only meaningful while this player
    /// is the current actor.
    pub timer_remaining: f32,
}

impl PlayerState {
    /// Create an empty player state.
    #[must_use]
    pub fn new(participant: ParticipantId, is_local: bool) -> Self {
        Self {
            participant,
            character: None,
            deck: Zone::new(ZoneTag::Deck),
            hand: Zone::new(ZoneTag::Hand),
            discard: Zone::new(ZoneTag::DiscardPile),
            locations: Zone::new(ZoneTag::Location),
            is_local,
            timer_remaining: TURN_DURATION_SECS,
        }
    }

    /// Load the starting deck from a definition-id list.
    ///
    /// Unknown ids are dropped with a warning. Returns the number of cards
    /// actually loaded.
    pub fn load_deck(
        &mut self,
        ids: &[CardId],
        catalog: &CardCatalog,
        alloc: &mut InstanceAllocator,
    ) -> usize {
        for id in catalog.resolve_ids(ids) {
            self.deck.add(alloc.mint(id));
        }
        self.deck.len()
    }

    /// Reset the turn timer to a full turn.
    pub fn reset_timer(&mut self) {
        self.timer_remaining = TURN_DURATION_SECS;
    }

    /// Total cards across this player's zones (character included).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.hand.len()
            + self.discard.len()
            + self.locations.len()
            + usize::from(self.character.is_some())
    }
}
