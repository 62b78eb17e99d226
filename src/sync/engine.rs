//! The replication engine: authority gating, local mutation, broadcast.
//!
//! Every mutation follows the same protocol: check that this process is
//! allowed to originate it, apply it to local state, then broadcast a
//! compact delta. Mirrors apply received deltas through [`ReplicationEngine::apply`],
//! the single decode-and-apply path, and never mutate replicated state any
//! other way. The authoritative process always leads; consistency is
//! eventual and best-effort - a delta referencing state a mirror no longer
//! has degrades with a log line instead of desyncing loudly.
//!
//! ## Authority
//!
//! - A player's private zones (deck, hand, discard, locations) are owned
//!   by the process where `PlayerState::is_local` is true.
//! - Shared zones (line-up, super-villain row, decks feeding them) are
//!   owned by the master process, per [`Transport::is_master`].
//! - Turn advancement is master-only; everyone else forwards requests.
//!
//! Requests that fail an authority or precondition check are dropped with
//! a log line, never an error: late or duplicate requests are a normal
//! consequence of message delivery and disconnects.

use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::cards::{CardId, CardInstance, InstanceId};
use crate::core::events::MatchEvent;
use crate::core::participant::ParticipantId;
use crate::error::SetupError;
use crate::state::context::MatchContext;
use crate::state::player::PlayerState;
use crate::state::shared::PowerOp;
use crate::sync::message::{SyncMessage, Target};
use crate::sync::transport::Transport;
use crate::turn::sequencer::{StartTurn, TurnPhase, TurnSequencer};
use crate::zones::ZoneTag;

/// Cards in a fresh hand, drawn at setup and at the end of each turn.
pub const STARTING_HAND_SIZE: usize = 5;
/// Cards dealt into the line-up at match start.
pub const LINEUP_SIZE: usize = 5;
/// Super-villains revealed at match start.
pub const SUPER_VILLAINS_REVEALED: usize = 1;

/// Drives one process's view of a replicated match.
pub struct ReplicationEngine<T: Transport> {
    ctx: MatchContext,
    turns: TurnSequencer,
    transport: T,
}

impl<T: Transport> ReplicationEngine<T> {
    /// Create an engine around an explicitly constructed context.
    #[must_use]
    pub fn new(ctx: MatchContext, transport: T) -> Self {
        Self {
            ctx,
            turns: TurnSequencer::new(),
            transport,
        }
    }

    /// The match context.
    #[must_use]
    pub fn context(&self) -> &MatchContext {
        &self.ctx
    }

    /// The match context, mutably. Intended for setup and for subscribing
    /// observers; replicated state must only change through engine
    /// operations.
    pub fn context_mut(&mut self) -> &mut MatchContext {
        &mut self.ctx
    }

    /// The turn state machine.
    #[must_use]
    pub fn turns(&self) -> &TurnSequencer {
        &self.turns
    }

    /// The transport this engine sends through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The participant this process plays as.
    #[must_use]
    pub fn local_participant(&self) -> ParticipantId {
        self.transport.local_participant()
    }

    // === Match setup ===

    /// Validate configuration and, on the master, run global match setup:
    /// characters, line-up, super-villain row, power reset, turn order.
    ///
    /// Configuration failures are fatal; the match must not start half
    /// configured.
    pub fn setup_match(&mut self) -> Result<(), SetupError> {
        self.ctx.validate_setup()?;
        if self.transport.is_master() {
            self.assign_characters();
            self.deal_lineup(LINEUP_SIZE);
            self.reveal_super_villain(SUPER_VILLAINS_REVEALED);
            self.apply_power(PowerOp::Reset);
            self.setup_turn_order();
        }
        Ok(())
    }

    /// Shuffle the local player's starting deck and draw an opening hand.
    pub fn setup_local_player(&mut self) {
        let me = self.transport.local_participant();
        self.shuffle_deck(me);
        self.draw_cards(me, STARTING_HAND_SIZE);
    }

    /// Forget a disconnected participant. Their zones are dropped; the
    /// turn order is deliberately left untouched (no recovery path, the
    /// documented limitation).
    pub fn handle_disconnect(&mut self, participant: ParticipantId) {
        self.ctx.remove_player(participant);
    }

    // === Deck operations (player-owned) ===

    /// Draw up to `count` cards from `participant`'s deck into their hand.
    ///
    /// Authoritative only on the owning process. An empty deck refills
    /// from the discard pile first; if both are empty the draw stops early
    /// and silently yields fewer cards. One delta per drawn card.
    pub fn draw_cards(
        &mut self,
        participant: ParticipantId,
        count: usize,
    ) -> SmallVec<[CardInstance; 8]> {
        let mut drawn = SmallVec::new();
        for _ in 0..count {
            let deck_empty = match self.ctx.player(participant) {
                Some(p) if p.is_local => p.deck.is_empty(),
                _ => {
                    debug!("draw for {participant}: not locally owned, dropping");
                    return drawn;
                }
            };
            if deck_empty {
                self.refill_from_discard(participant);
            }

            let Some(player) = self.ctx.player_mut(participant) else {
                return drawn;
            };
            let Some(card) = player.deck.draw_top() else {
                debug!(
                    "{participant}: deck and discard both empty, drew {}/{count}",
                    drawn.len()
                );
                break;
            };
            player.hand.add(card);
            self.transport.send(
                Target::OthersBuffered,
                &SyncMessage::Draw {
                    participant,
                    card: card.card,
                },
            );
            self.ctx.events.emit(MatchEvent::CardDrawn { participant, card });
            drawn.push(card);
        }
        drawn
    }

    /// Shuffle `participant`'s deck and broadcast the resulting order.
    ///
    /// The shuffling process is authoritative for the order; mirrors
    /// replace their copy with the received sequence verbatim.
    pub fn shuffle_deck(&mut self, participant: ParticipantId) {
        let MatchContext {
            players,
            rng,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("shuffle for unknown {participant}");
            return;
        };
        if !player.is_local {
            debug!("shuffle for {participant}: not locally owned, dropping");
            return;
        }

        player.deck.shuffle(rng);
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::Shuffle {
                participant,
                deck: player.deck.to_card_ids(),
            },
        );
        events.emit(MatchEvent::DeckShuffled { participant });
    }

    /// Fold `participant`'s discard pile back into their deck and shuffle.
    ///
    /// Returns false without broadcasting when the discard pile is empty.
    pub fn refill_from_discard(&mut self, participant: ParticipantId) -> bool {
        let MatchContext {
            players,
            rng,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("refill for unknown {participant}");
            return false;
        };
        if !player.is_local {
            debug!("refill for {participant}: not locally owned, dropping");
            return false;
        }
        if player.discard.is_empty() {
            debug!("{participant}: nothing to refill from");
            return false;
        }

        let discarded = player.discard.take_all();
        player.deck.extend(discarded);
        player.deck.shuffle(rng);

        // No separate discard-clear delta: receivers infer it.
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::Refill {
                participant,
                deck: player.deck.to_card_ids(),
            },
        );
        events.emit(MatchEvent::DeckRefilled { participant });
        true
    }

    /// Move `participant`'s entire hand to their discard pile.
    pub fn discard_hand(&mut self, participant: ParticipantId) {
        let MatchContext {
            players, events, ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("discard-hand for unknown {participant}");
            return;
        };
        if !player.is_local {
            debug!("discard-hand for {participant}: not locally owned, dropping");
            return;
        }

        let hand = player.hand.take_all();
        player.discard.extend(hand);
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::DiscardHand {
                participant,
                discard: player.discard.to_card_ids(),
            },
        );
        events.emit(MatchEvent::HandDiscarded { participant });
    }

    /// Collect the shared played zone into `participant`'s discard pile.
    pub fn discard_played(&mut self, participant: ParticipantId) {
        let MatchContext {
            players,
            shared,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("discard-played for unknown {participant}");
            return;
        };
        if !player.is_local {
            debug!("discard-played for {participant}: not locally owned, dropping");
            return;
        }

        let played = shared.played.take_all();
        player.discard.extend(played);
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::DiscardPlayed {
                participant,
                discard: player.discard.to_card_ids(),
            },
        );
        events.emit(MatchEvent::PlayedCardsDiscarded { participant });
    }

    // === Card movement ===

    /// Play a card from `participant`'s hand into the shared played zone.
    ///
    /// Preconditions: the acting process owns the player, it is that
    /// player's turn, and the main phase is active. Returns false with no
    /// broadcast otherwise.
    pub fn play_card(&mut self, participant: ParticipantId, instance: InstanceId) -> bool {
        self.move_from_hand(participant, instance, ZoneTag::Played)
    }

    /// Place a location card from `participant`'s hand into their
    /// location zone. Same preconditions as [`Self::play_card`].
    pub fn play_location(&mut self, participant: ParticipantId, instance: InstanceId) -> bool {
        self.move_from_hand(participant, instance, ZoneTag::Location)
    }

    fn move_from_hand(
        &mut self,
        participant: ParticipantId,
        instance: InstanceId,
        to: ZoneTag,
    ) -> bool {
        if !self.turns.is_current(participant) || self.turns.phase() != TurnPhase::Main {
            debug!("{participant} tried to play out of turn, dropping");
            return false;
        }
        let MatchContext {
            players,
            shared,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("play for unknown {participant}");
            return false;
        };
        if !player.is_local {
            debug!("play for {participant}: not locally owned, dropping");
            return false;
        }
        let Some(card) = player.hand.remove(instance) else {
            return false;
        };
        match to {
            ZoneTag::Played => shared.played.add(card),
            ZoneTag::Location => player.locations.add(card),
            other => {
                warn!("unsupported play destination {other}");
                player.hand.add(card);
                return false;
            }
        }

        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::Move {
                participant,
                instance: card.id,
                card: card.card,
                to,
            },
        );
        events.emit(MatchEvent::CardPlayed {
            participant,
            card,
            to,
        });
        true
    }

    /// Take a card from the line-up into `participant`'s discard pile.
    ///
    /// Shared-zone cards are matched by definition id: any current actor
    /// may trigger removal, so instance handles cannot be assumed to
    /// agree.
    pub fn take_from_lineup(&mut self, participant: ParticipantId, card: CardId) -> bool {
        self.take_shared(participant, card, ZoneTag::Lineup)
    }

    /// Take a card from the super-villain row into `participant`'s
    /// discard pile.
    pub fn take_from_super_villain_row(
        &mut self,
        participant: ParticipantId,
        card: CardId,
    ) -> bool {
        self.take_shared(participant, card, ZoneTag::SuperVillain)
    }

    fn take_shared(&mut self, participant: ParticipantId, card: CardId, from: ZoneTag) -> bool {
        if !self.turns.is_current(participant) {
            debug!("{participant} tried to take from {from} out of turn, dropping");
            return false;
        }
        let MatchContext {
            players,
            shared,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("take from {from} for unknown {participant}");
            return false;
        };
        if !player.is_local {
            debug!("take from {from} for {participant}: not locally owned, dropping");
            return false;
        }
        let zone = match from {
            ZoneTag::Lineup => &mut shared.lineup,
            ZoneTag::SuperVillain => &mut shared.super_villain_row,
            other => {
                warn!("{other} is not a shared row");
                return false;
            }
        };
        let Some(instance) = zone.remove_by_card(card) else {
            return false;
        };
        player.discard.add(instance);

        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::TakeShared {
                participant,
                card,
                from,
            },
        );
        events.emit(MatchEvent::SharedCardTaken {
            participant,
            card,
            from,
        });
        true
    }

    // === Shared zones (master-owned) ===

    /// Deal cards from the main deck into the line-up. Master only.
    pub fn deal_lineup(&mut self, count: usize) {
        if !self.transport.is_master() {
            debug!("deal_lineup requires the master, dropping");
            return;
        }
        for _ in 0..count {
            let MatchContext { shared, events, .. } = &mut self.ctx;
            let Some(card) = shared.main_deck.draw_top() else {
                debug!("main deck exhausted, line-up left short");
                break;
            };
            shared.lineup.add(card);
            self.transport.send(
                Target::OthersBuffered,
                &SyncMessage::DealLineup { card: card.card },
            );
            events.emit(MatchEvent::LineupDealt { card: card.card });
        }
    }

    /// Reveal super-villains from their deck into the row. Master only.
    pub fn reveal_super_villain(&mut self, count: usize) {
        if !self.transport.is_master() {
            debug!("reveal_super_villain requires the master, dropping");
            return;
        }
        for _ in 0..count {
            let MatchContext { shared, events, .. } = &mut self.ctx;
            let Some(card) = shared.super_villain_deck.draw_top() else {
                debug!("super-villain deck exhausted");
                break;
            };
            shared.super_villain_row.add(card);
            self.transport.send(
                Target::OthersBuffered,
                &SyncMessage::RevealSuperVillain { card: card.card },
            );
            events.emit(MatchEvent::SuperVillainRevealed { card: card.card });
        }
    }

    /// Apply a power operation. Power is a turn-local resource; it is
    /// never broadcast, each process tracks its own view.
    pub fn apply_power(&mut self, op: PowerOp) {
        let power = self.ctx.shared.apply_power(op);
        self.ctx.events.emit(MatchEvent::PowerChanged { power });
    }

    /// Assign a random unique character to every participant. Master only.
    ///
    /// The master binds its own character directly; everyone else gets a
    /// unicast assignment and announces the binding back to the room.
    pub fn assign_characters(&mut self) {
        if !self.transport.is_master() {
            debug!("assign_characters requires the master, dropping");
            return;
        }
        let mut pool = self.ctx.shared.character_deck.to_card_ids();
        let me = self.transport.local_participant();
        for participant in self.transport.participants() {
            if pool.is_empty() {
                warn!("character deck exhausted before every participant got one");
                break;
            }
            let index = self.ctx.rng.gen_range(0..pool.len());
            let card = pool.remove(index);
            if participant == me {
                self.bind_local_character(card);
            } else {
                self.transport
                    .send(Target::One(participant), &SyncMessage::AssignCharacter { card });
            }
        }
    }

    fn bind_local_character(&mut self, card: CardId) {
        let me = self.transport.local_participant();
        let MatchContext {
            players,
            shared,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == me) else {
            warn!("character assigned before {me} joined, dropping");
            return;
        };
        let instance = shared
            .character_deck
            .remove_by_card(card)
            .or_else(|| catalog.contains(card).then(|| alloc.mint(card)));
        let Some(instance) = instance else {
            warn!("assigned character {card} is unknown, dropping");
            return;
        };
        player.character = Some(instance);
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::SyncCharacter {
                participant: me,
                card,
            },
        );
        events.emit(MatchEvent::CharacterAssigned {
            participant: me,
            card,
        });
    }

    // === Turn sequencing ===

    /// Build and broadcast the canonical turn order, then start the first
    /// turn. Master only, called once at match start.
    pub fn setup_turn_order(&mut self) {
        if !self.transport.is_master() {
            debug!("setup_turn_order requires the master, dropping");
            return;
        }
        let mut order = self.transport.participants();
        self.ctx.rng.shuffle(&mut order);
        self.transport.send(
            Target::OthersBuffered,
            &SyncMessage::SetTurnOrder {
                order: order.clone(),
            },
        );
        self.turns.set_order(order);

        let Some(&first) = self.turns.order().first() else {
            warn!("no participants, cannot start a turn");
            return;
        };
        self.transport
            .send(Target::OthersBuffered, &SyncMessage::StartTurn { actor: first });
        self.begin_turn(first);
    }

    /// End the local player's main phase.
    ///
    /// Runs the end-phase sequence (discard hand, collect played cards,
    /// draw a fresh hand) and then requests turn advancement - directly
    /// when this process is the master, by forwarding otherwise.
    pub fn end_main_phase(&mut self) {
        let actor = self.transport.local_participant();
        if !self.turns.end_main_phase(actor) {
            return;
        }

        self.discard_hand(actor);
        self.discard_played(actor);
        self.draw_cards(actor, STARTING_HAND_SIZE);

        if self.transport.is_master() {
            self.process_end_turn(actor);
        } else {
            self.transport
                .send(Target::Master, &SyncMessage::RequestEndTurn { actor });
        }
    }

    /// Advance the per-turn timer for the local player. On expiry the
    /// turn ends exactly as if the player had requested it.
    pub fn tick(&mut self, dt: f32) {
        let me = self.transport.local_participant();
        if !self.turns.is_current(me) || self.turns.phase() != TurnPhase::Main {
            return;
        }
        let Some(player) = self.ctx.player_mut(me) else {
            return;
        };
        player.timer_remaining -= dt;
        if player.timer_remaining <= 0.0 {
            debug!("turn timer expired for {me}");
            self.end_main_phase();
        }
    }

    /// Master-side turn advancement: the only point where the current
    /// actor changes. Requests naming a stale actor are dropped.
    fn process_end_turn(&mut self, actor: ParticipantId) {
        if !self.turns.is_current(actor) {
            debug!("end-turn from {actor} is stale, dropping");
            return;
        }
        self.transport
            .send(Target::Others, &SyncMessage::TurnEnded { actor });
        self.turns.finish_turn(actor);
        self.ctx.events.emit(MatchEvent::TurnEnded { actor });

        let Some(next) = self.turns.next_actor() else {
            return;
        };
        self.transport
            .send(Target::OthersBuffered, &SyncMessage::StartTurn { actor: next });
        self.begin_turn(next);
    }

    fn begin_turn(&mut self, actor: ParticipantId) {
        match self.turns.start_turn(actor) {
            StartTurn::Started => {
                if let Some(player) = self.ctx.player_mut(actor) {
                    player.reset_timer();
                }
                self.ctx.events.emit(MatchEvent::TurnStarted { actor });
                // Start -> Main is automatic; announce both.
                self.ctx.events.emit(MatchEvent::MainPhaseStarted { actor });
            }
            StartTurn::AlreadyCurrent => {
                // Re-delivered notification: no state change, but a UI
                // refresh is acceptable.
                self.ctx.events.emit(MatchEvent::TurnStarted { actor });
            }
            StartTurn::UnknownActor => {}
        }
    }

    // === Receive path ===

    /// Apply one received delta to mirrored state.
    ///
    /// This is the single dispatch point for everything that arrives from
    /// the transport. Deltas for state this process owns authoritatively
    /// are ignored (they are echoes or stale), except `RequestEndTurn`
    /// which the master re-validates and honors.
    pub fn apply(&mut self, from: ParticipantId, msg: SyncMessage) {
        trace!("apply from {from}: {msg:?}");
        match msg {
            SyncMessage::SetTurnOrder { order } => self.turns.set_order(order),
            SyncMessage::StartTurn { actor } => self.begin_turn(actor),
            SyncMessage::TurnEnded { actor } => {
                if self.turns.finish_turn(actor) {
                    self.ctx.events.emit(MatchEvent::TurnEnded { actor });
                }
            }
            SyncMessage::RequestEndTurn { actor } => {
                if self.transport.is_master() {
                    self.process_end_turn(actor);
                } else {
                    debug!("end-turn request delivered to a non-master, dropping");
                }
            }
            SyncMessage::Draw { participant, card } => self.apply_draw(participant, card),
            SyncMessage::Shuffle { participant, deck } => {
                self.apply_deck_replace(participant, &deck)
            }
            SyncMessage::Refill { participant, deck } => self.apply_refill(participant, &deck),
            SyncMessage::DiscardHand {
                participant,
                discard,
            } => self.apply_discard_hand(participant, &discard),
            SyncMessage::DiscardPlayed {
                participant,
                discard,
            } => self.apply_discard_played(participant, &discard),
            SyncMessage::Move {
                participant,
                instance,
                card,
                to,
            } => self.apply_move(participant, instance, card, to),
            SyncMessage::DealLineup { card } => self.apply_deal_lineup(card),
            SyncMessage::RevealSuperVillain { card } => self.apply_reveal_super_villain(card),
            SyncMessage::TakeShared {
                participant,
                card,
                from,
            } => self.apply_take_shared(participant, card, from),
            SyncMessage::AssignCharacter { card } => self.bind_local_character(card),
            SyncMessage::SyncCharacter { participant, card } => {
                self.apply_character(participant, card)
            }
        }
    }

    fn apply_draw(&mut self, participant: ParticipantId, card: CardId) {
        let MatchContext {
            players,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("draw delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("draw delta echoes locally owned state, dropping");
            return;
        }
        let instance = player
            .deck
            .remove_by_card(card)
            .or_else(|| catalog.contains(card).then(|| alloc.mint(card)));
        let Some(instance) = instance else {
            warn!("draw delta references unknown card {card}, dropping");
            return;
        };
        player.hand.add(instance);
        events.emit(MatchEvent::CardDrawn {
            participant,
            card: instance,
        });
    }

    fn apply_deck_replace(&mut self, participant: ParticipantId, deck: &[CardId]) {
        let MatchContext {
            players,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("shuffle delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("shuffle delta echoes locally owned state, dropping");
            return;
        }
        // Received order is authoritative; never re-shuffle locally.
        player.deck.replace_from_ids(deck, catalog, None, alloc);
        events.emit(MatchEvent::DeckShuffled { participant });
    }

    fn apply_refill(&mut self, participant: ParticipantId, deck: &[CardId]) {
        let MatchContext {
            players,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("refill delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("refill delta echoes locally owned state, dropping");
            return;
        }
        let PlayerState { deck: deck_zone, discard, .. } = player;
        deck_zone.replace_from_ids(deck, catalog, Some(discard), alloc);
        events.emit(MatchEvent::DeckRefilled { participant });
    }

    fn apply_discard_hand(&mut self, participant: ParticipantId, discard: &[CardId]) {
        let MatchContext {
            players,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("discard-hand delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("discard-hand delta echoes locally owned state, dropping");
            return;
        }
        let PlayerState { hand, discard: discard_zone, .. } = player;
        discard_zone.replace_from_ids(discard, catalog, Some(hand), alloc);
        events.emit(MatchEvent::HandDiscarded { participant });
    }

    fn apply_discard_played(&mut self, participant: ParticipantId, discard: &[CardId]) {
        let MatchContext {
            players,
            shared,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("discard-played delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("discard-played delta echoes locally owned state, dropping");
            return;
        }
        player
            .discard
            .replace_from_ids(discard, catalog, Some(&mut shared.played), alloc);
        events.emit(MatchEvent::PlayedCardsDiscarded { participant });
    }

    fn apply_move(
        &mut self,
        participant: ParticipantId,
        instance: InstanceId,
        card: CardId,
        to: ZoneTag,
    ) {
        let MatchContext {
            players,
            shared,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("move delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("move delta echoes locally owned state, dropping");
            return;
        }
        // The sender's handle is a hint; fall back to the definition id.
        let taken = player
            .hand
            .remove(instance)
            .or_else(|| player.hand.remove_by_card(card));
        let Some(taken) = taken else {
            warn!("move delta references {card} not in {participant}'s hand, dropping");
            return;
        };
        match to {
            ZoneTag::Played => shared.played.add(taken),
            ZoneTag::Location => player.locations.add(taken),
            other => {
                warn!("move delta names unsupported destination {other}, dropping");
                player.hand.add(taken);
                return;
            }
        }
        events.emit(MatchEvent::CardPlayed {
            participant,
            card: taken,
            to,
        });
    }

    fn apply_deal_lineup(&mut self, card: CardId) {
        if self.transport.is_master() {
            debug!("line-up delta echoes master-owned state, dropping");
            return;
        }
        let MatchContext {
            shared,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let instance = shared
            .main_deck
            .remove_by_card(card)
            .or_else(|| catalog.contains(card).then(|| alloc.mint(card)));
        let Some(instance) = instance else {
            warn!("line-up delta references unknown card {card}, dropping");
            return;
        };
        shared.lineup.add(instance);
        events.emit(MatchEvent::LineupDealt { card });
    }

    fn apply_reveal_super_villain(&mut self, card: CardId) {
        if self.transport.is_master() {
            debug!("super-villain delta echoes master-owned state, dropping");
            return;
        }
        let MatchContext {
            shared,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let instance = shared
            .super_villain_deck
            .remove_by_card(card)
            .or_else(|| catalog.contains(card).then(|| alloc.mint(card)));
        let Some(instance) = instance else {
            warn!("super-villain delta references unknown card {card}, dropping");
            return;
        };
        shared.super_villain_row.add(instance);
        events.emit(MatchEvent::SuperVillainRevealed { card });
    }

    fn apply_take_shared(&mut self, participant: ParticipantId, card: CardId, from: ZoneTag) {
        let MatchContext {
            players,
            shared,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("take delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("take delta echoes locally owned state, dropping");
            return;
        }
        let zone = match from {
            ZoneTag::Lineup => &mut shared.lineup,
            ZoneTag::SuperVillain => &mut shared.super_villain_row,
            other => {
                warn!("take delta names {other}, which is not a shared row, dropping");
                return;
            }
        };
        let Some(instance) = zone.remove_by_card(card) else {
            warn!("take delta references {card} no longer in {from}, dropping");
            return;
        };
        player.discard.add(instance);
        events.emit(MatchEvent::SharedCardTaken {
            participant,
            card,
            from,
        });
    }

    fn apply_character(&mut self, participant: ParticipantId, card: CardId) {
        let MatchContext {
            players,
            shared,
            catalog,
            alloc,
            events,
            ..
        } = &mut self.ctx;
        let Some(player) = players.iter_mut().find(|p| p.participant == participant) else {
            warn!("character delta for unknown {participant}, dropping");
            return;
        };
        if player.is_local {
            debug!("character delta echoes locally owned state, dropping");
            return;
        }
        let instance = shared
            .character_deck
            .remove_by_card(card)
            .or_else(|| catalog.contains(card).then(|| alloc.mint(card)));
        let Some(instance) = instance else {
            warn!("character delta references unknown card {card}, dropping");
            return;
        };
        player.character = Some(instance);
        events.emit(MatchEvent::CharacterAssigned { participant, card });
    }
}
