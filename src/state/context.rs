//! The match context: everything one process knows about a match.
//!
//! `MatchContext` is an explicitly constructed aggregate - catalog, shared
//! state, players, instance allocator, RNG, event bus - passed to the
//! replication engine rather than reached through globals. Multiple
//! contexts can coexist in one process, which is what the two-peer tests
//! rely on.

use log::warn;

use crate::cards::{CardCatalog, CardId, CardInstance, InstanceAllocator};
use crate::core::events::EventBus;
use crate::core::participant::ParticipantId;
use crate::core::rng::MatchRng;
use crate::error::SetupError;
use crate::state::player::PlayerState;
use crate::state::shared::SharedState;

/// All state one process holds for a match.
#[derive(Debug)]
pub struct MatchContext {
    /// Immutable definition lookup.
    pub catalog: CardCatalog,
    /// Shared zones and counters (master-owned, mirrored elsewhere).
    pub shared: SharedState,
    /// Per-participant state, in join order.
    pub players: Vec<PlayerState>,
    /// Handle allocator for this process.
    pub alloc: InstanceAllocator,
    /// Local RNG for shuffles.
    pub rng: MatchRng,
    /// Synchronous observers of confirmed state changes.
    pub events: EventBus,
}

impl MatchContext {
    /// Create a context around a loaded catalog.
    #[must_use]
    pub fn new(catalog: CardCatalog, rng: MatchRng) -> Self {
        Self {
            catalog,
            shared: SharedState::new(),
            players: Vec::new(),
            alloc: InstanceAllocator::new(),
            rng,
            events: EventBus::new(),
        }
    }

    /// Register a participant. Created when the participant's avatar is
    /// instantiated by the transport.
    pub fn add_player(
        &mut self,
        participant: ParticipantId,
        is_local: bool,
    ) -> Result<&mut PlayerState, SetupError> {
        if self.players.iter().any(|p| p.participant == participant) {
            return Err(SetupError::DuplicateParticipant(participant));
        }
        self.players.push(PlayerState::new(participant, is_local));
        Ok(self.players.last_mut().expect("just pushed"))
    }

    /// Remove a participant on disconnect. Their zones are dropped; the
    /// cards in them do not survive.
    pub fn remove_player(&mut self, participant: ParticipantId) {
        let before = self.players.len();
        self.players.retain(|p| p.participant != participant);
        if self.players.len() == before {
            warn!("remove_player: {participant} was not registered");
        }
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, participant: ParticipantId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.participant == participant)
    }

    /// Look up a player mutably.
    pub fn player_mut(&mut self, participant: ParticipantId) -> Option<&mut PlayerState> {
        self.players
            .iter_mut()
            .find(|p| p.participant == participant)
    }

    /// The locally-owned player, if one is registered.
    #[must_use]
    pub fn local_player(&self) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.is_local)
    }

    /// Load the shared decks from definition-id lists. Unknown ids are
    /// dropped with a warning.
    pub fn load_shared_decks(
        &mut self,
        main: &[CardId],
        super_villains: &[CardId],
        characters: &[CardId],
    ) {
        for (zone, ids) in [
            (&mut self.shared.main_deck, main),
            (&mut self.shared.super_villain_deck, super_villains),
            (&mut self.shared.character_deck, characters),
        ] {
            for id in self.catalog.resolve_ids(ids) {
                zone.add(self.alloc.mint(id));
            }
        }
    }

    /// Validate that the match is fully configured.
    ///
    /// Called before play begins; a failure here aborts initialization
    /// rather than letting a half-configured match run.
    pub fn validate_setup(&self) -> Result<(), SetupError> {
        if self.catalog.is_empty() {
            return Err(SetupError::EmptyCatalog);
        }
        if self.players.is_empty() {
            return Err(SetupError::NoParticipants);
        }
        if self.shared.main_deck.is_empty() {
            return Err(SetupError::EmptyDeck("main"));
        }
        if self.shared.super_villain_deck.is_empty() {
            return Err(SetupError::EmptyDeck("super-villain"));
        }
        if self.shared.character_deck.is_empty() {
            return Err(SetupError::EmptyDeck("character"));
        }
        for player in &self.players {
            if player.deck.is_empty() {
                return Err(SetupError::EmptyPlayerDeck(player.participant));
            }
        }
        Ok(())
    }

    /// Total cards across every zone this process tracks. The multiset of
    /// cards is invariant under all operations; only locations change.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.shared.card_count() + self.players.iter().map(PlayerState::card_count).sum::<usize>()
    }

    /// Collect every instance handle in the match, for ownership audits.
    #[must_use]
    pub fn all_instances(&self) -> Vec<CardInstance> {
        let mut all = Vec::with_capacity(self.card_count());
        for zone in [
            &self.shared.main_deck,
            &self.shared.super_villain_deck,
            &self.shared.character_deck,
            &self.shared.lineup,
            &self.shared.super_villain_row,
            &self.shared.played,
        ] {
            all.extend_from_slice(zone.cards());
        }
        for player in &self.players {
            for zone in [&player.deck, &player.hand, &player.discard, &player.locations] {
                all.extend_from_slice(zone.cards());
            }
            if let Some(character) = player.character {
                all.push(character);
            }
        }
        all
    }
}
