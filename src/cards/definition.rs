//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its
//! identifier, display name, kind, and asset reference. Definitions are
//! loaded once into the [`CardCatalog`](super::CardCatalog) at startup and
//! never mutated afterwards.
//!
//! Instance-specific data (which zone a card currently sits in) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card definition.
///
/// Identifiers are derived from `{kind, ordinal}` by decimal concatenation
/// of the kind's numeric base and the ordinal, so `Hero` (base 30) with
/// ordinal 7 yields `CardId(307)`. This keeps ids stable across builds and
/// makes the kind recoverable from the raw value for debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Derive a card ID from a kind base and an ordinal.
    #[must_use]
    pub fn compose(base: u32, ordinal: u32) -> Self {
        let mut shift = 10;
        while shift <= ordinal {
            shift *= 10;
        }
        Self(base * shift + ordinal)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card kind - a closed tagged variant.
///
/// Every kind except `Character` carries the cost to acquire it and the
/// victory-point value it is worth. Characters are picked once per match,
/// are never bought, and carry neither.
///
/// `Location` shares the cost/value shape but stays in play once placed
/// rather than being discarded at end of turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Character,
    SuperVillain { cost: i32, value: i32 },
    Hero { cost: i32, value: i32 },
    Villain { cost: i32, value: i32 },
    SuperPower { cost: i32, value: i32 },
    Equipment { cost: i32, value: i32 },
    Location { cost: i32, value: i32 },
    Starter { cost: i32, value: i32 },
}

impl CardKind {
    /// Numeric base used when composing card identifiers.
    #[must_use]
    pub const fn id_base(self) -> u32 {
        match self {
            CardKind::Character => 10,
            CardKind::SuperVillain { .. } => 20,
            CardKind::Hero { .. } => 30,
            CardKind::Villain { .. } => 40,
            CardKind::SuperPower { .. } => 50,
            CardKind::Equipment { .. } => 60,
            CardKind::Location { .. } => 70,
            CardKind::Starter { .. } => 80,
        }
    }

    /// Acquisition cost, if this kind has one.
    #[must_use]
    pub const fn cost(self) -> Option<i32> {
        match self {
            CardKind::Character => None,
            CardKind::SuperVillain { cost, .. }
            | CardKind::Hero { cost, .. }
            | CardKind::Villain { cost, .. }
            | CardKind::SuperPower { cost, .. }
            | CardKind::Equipment { cost, .. }
            | CardKind::Location { cost, .. }
            | CardKind::Starter { cost, .. } => Some(cost),
        }
    }

    /// Victory-point value, if this kind has one.
    #[must_use]
    pub const fn value(self) -> Option<i32> {
        match self {
            CardKind::Character => None,
            CardKind::SuperVillain { value, .. }
            | CardKind::Hero { value, .. }
            | CardKind::Villain { value, .. }
            | CardKind::SuperPower { value, .. }
            | CardKind::Equipment { value, .. }
            | CardKind::Location { value, .. }
            | CardKind::Starter { value, .. } => Some(value),
        }
    }

    /// Whether two kinds are the same variant, ignoring cost/value.
    #[must_use]
    pub fn same_variant(self, other: CardKind) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use cardtable::cards::{CardDefinition, CardId, CardKind};
///
/// let batarang = CardDefinition::new(CardKind::Equipment { cost: 2, value: 1 }, 4, "Batarang");
///
/// assert_eq!(batarang.id, CardId::new(604));
/// assert_eq!(batarang.kind.cost(), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier, derived from `{kind, ordinal}`.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// The kind of card, carrying cost and value where applicable.
    pub kind: CardKind,

    /// Opaque asset key for the card image. Rendering is a collaborator
    /// concern; the core only carries the reference.
    pub image: String,
}

impl CardDefinition {
    /// Create a new card definition. The ID is derived from the kind and
    /// the ordinal.
    #[must_use]
    pub fn new(kind: CardKind, ordinal: u32, name: impl Into<String>) -> Self {
        Self {
            id: CardId::compose(kind.id_base(), ordinal),
            name: name.into(),
            kind,
            image: String::new(),
        }
    }

    /// Set the image asset key (builder pattern).
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}
