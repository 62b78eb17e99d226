//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition for a match. It is
//! populated once at startup and treated as immutable afterwards; all wire
//! payloads carry `CardId`s that are resolved through it.

use log::warn;
use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardKind};

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use cardtable::cards::{CardCatalog, CardDefinition, CardId, CardKind};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new(CardKind::Hero { cost: 3, value: 2 }, 7, "Test Hero"));
///
/// let found = catalog.get(CardId::new(307)).unwrap();
/// assert_eq!(found.name, "Test Hero");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists. Duplicate ids are
    /// a content-authoring bug, not a runtime condition.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards of a given kind, ignoring cost/value fields.
    pub fn find_by_kind(&self, kind: CardKind) -> impl Iterator<Item = &CardDefinition> + '_ {
        self.cards.values().filter(move |c| c.kind.same_variant(kind))
    }

    /// Resolve a sequence of ids, dropping any that are unknown.
    ///
    /// Unresolvable ids are logged and skipped, never fatal - a mirror that
    /// receives an id it cannot resolve degrades rather than desyncing the
    /// whole match.
    #[must_use]
    pub fn resolve_ids(&self, ids: &[CardId]) -> Vec<CardId> {
        ids.iter()
            .copied()
            .filter(|id| {
                let known = self.contains(*id);
                if !known {
                    warn!("dropping unknown card id {id} during resolution");
                }
                known
            })
            .collect()
    }
}
