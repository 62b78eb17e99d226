//! Ordered card containers.
//!
//! A `Zone` is an ordered sequence of card instances bound to one owner
//! (a player or the shared match state). Order matters for decks and
//! discard piles - index 0 is the top of the deck. For hands and shared
//! rows the order is visually irrelevant but still deterministic, because
//! it is the serialization order on the wire.
//!
//! ## Full-sequence sync
//!
//! Mirrors never mutate zones directly; they rebuild them from received
//! identifier sequences via [`Zone::replace_from_ids`]. Rebuilding reuses
//! the instances already present (and any drained from a donor zone), so
//! instance handles stay stable across a shuffle or refill sync.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId, CardInstance, InstanceAllocator, InstanceId};
use crate::core::rng::MatchRng;

/// Which zone a card container represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneTag {
    Hand,
    Deck,
    DiscardPile,
    Lineup,
    SuperVillain,
    Played,
    Location,
    Character,
}

impl std::fmt::Display for ZoneTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneTag::Hand => "hand",
            ZoneTag::Deck => "deck",
            ZoneTag::DiscardPile => "discard pile",
            ZoneTag::Lineup => "line-up",
            ZoneTag::SuperVillain => "super-villain row",
            ZoneTag::Played => "played cards",
            ZoneTag::Location => "locations",
            ZoneTag::Character => "character",
        };
        f.write_str(name)
    }
}

/// An ordered collection of card instances.
#[derive(Clone, Debug)]
pub struct Zone {
    tag: ZoneTag,
    cards: Vec<CardInstance>,
}

impl Zone {
    /// Create an empty zone.
    #[must_use]
    pub fn new(tag: ZoneTag) -> Self {
        Self {
            tag,
            cards: Vec::new(),
        }
    }

    /// The zone's tag.
    #[must_use]
    pub fn tag(&self) -> ZoneTag {
        self.tag
    }

    /// Number of cards in the zone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the zone is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The contained cards, top first for decks.
    #[must_use]
    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    /// Remove and return the top card (index 0).
    ///
    /// Returns `None` when empty; the caller decides the refill policy
    /// before giving up.
    pub fn draw_top(&mut self) -> Option<CardInstance> {
        if self.cards.is_empty() {
            return None;
        }
        Some(self.cards.remove(0))
    }

    /// Append a card to the end of the zone.
    pub fn add(&mut self, card: CardInstance) {
        self.cards.push(card);
    }

    /// Push a card on top of the zone (index 0).
    pub fn add_top(&mut self, card: CardInstance) {
        self.cards.insert(0, card);
    }

    /// Append several cards, preserving their order.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardInstance>) {
        self.cards.extend(cards);
    }

    /// Remove a card by instance identity.
    ///
    /// A logged no-op when absent: mutation requests racing a mirror's
    /// stale view must not crash.
    pub fn remove(&mut self, instance: InstanceId) -> Option<CardInstance> {
        match self.cards.iter().position(|c| c.id == instance) {
            Some(index) => Some(self.cards.remove(index)),
            None => {
                debug!("{instance} not present in {}, ignoring removal", self.tag);
                None
            }
        }
    }

    /// Remove the first card matching a definition id.
    ///
    /// Used for shared zones, where removal is triggered remotely and can
    /// only be matched by definition. Correct because one definition maps
    /// to one physical instance per zone.
    pub fn remove_by_card(&mut self, card: CardId) -> Option<CardInstance> {
        match self.cards.iter().position(|c| c.card == card) {
            Some(index) => Some(self.cards.remove(index)),
            None => {
                debug!("{card} not present in {}, ignoring removal", self.tag);
                None
            }
        }
    }

    /// Whether any instance of a definition is present.
    #[must_use]
    pub fn contains_card(&self, card: CardId) -> bool {
        self.cards.iter().any(|c| c.card == card)
    }

    /// Remove and return every card, preserving order.
    pub fn take_all(&mut self) -> Vec<CardInstance> {
        std::mem::take(&mut self.cards)
    }

    /// Shuffle the zone in place.
    pub fn shuffle(&mut self, rng: &mut MatchRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Serialize the zone as a definition-id sequence (the wire payload
    /// for full-zone sync).
    #[must_use]
    pub fn to_card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.card).collect()
    }

    /// Replace the zone's contents wholesale from a received id sequence.
    ///
    /// Instances are reused where possible: first from the zone's previous
    /// contents, then from `donor` (which is drained - receivers infer the
    /// source clear from context, e.g. a refill sync implies the discard
    /// pile emptied). Remaining ids resolve through the catalog and get
    /// freshly minted handles; unresolvable ids are dropped with a warning.
    pub fn replace_from_ids(
        &mut self,
        ids: &[CardId],
        catalog: &CardCatalog,
        donor: Option<&mut Zone>,
        alloc: &mut InstanceAllocator,
    ) {
        let mut pool = std::mem::take(&mut self.cards);
        if let Some(donor) = donor {
            pool.append(&mut donor.cards);
        }

        for &id in ids {
            if let Some(index) = pool.iter().position(|c| c.card == id) {
                self.cards.push(pool.remove(index));
            } else if catalog.contains(id) {
                self.cards.push(alloc.mint(id));
            } else {
                warn!("dropping unknown card id {id} while rebuilding {}", self.tag);
            }
        }

        if !pool.is_empty() {
            debug!(
                "{} instances left over after rebuilding {}",
                pool.len(),
                self.tag
            );
        }
    }
}
