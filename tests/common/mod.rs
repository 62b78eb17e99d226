//! Shared fixture: several engines wired to one in-memory hub, simulating
//! one match spread across separate processes.

use cardtable::{
    CardCatalog, CardDefinition, CardId, CardKind, LocalEndpoint, LocalHub, MatchContext, MatchRng,
    ParticipantId, ReplicationEngine,
};

/// Card pool shared by every peer: enough of each kind that the shared
/// decks and two starting decks never overlap definitions by accident.
pub fn demo_catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();
    for o in 1..=4 {
        catalog.register(CardDefinition::new(CardKind::Character, o, format!("Character {o}")));
    }
    for o in 1..=4 {
        catalog.register(CardDefinition::new(
            CardKind::SuperVillain { cost: 8, value: 4 },
            o,
            format!("Super-Villain {o}"),
        ));
    }
    for o in 1..=16 {
        catalog.register(CardDefinition::new(
            CardKind::Hero { cost: 3, value: 1 },
            o,
            format!("Hero {o}"),
        ));
    }
    for o in 1..=5 {
        catalog.register(CardDefinition::new(
            CardKind::Location { cost: 2, value: 1 },
            o,
            format!("Location {o}"),
        ));
    }
    for o in 1..=10 {
        catalog.register(CardDefinition::new(
            CardKind::Starter { cost: 0, value: 0 },
            o,
            format!("Starter {o}"),
        ));
    }
    catalog
}

pub fn character_ids() -> Vec<CardId> {
    (1..=4).map(|o| CardId::compose(10, o)).collect()
}

pub fn super_villain_ids() -> Vec<CardId> {
    (1..=4).map(|o| CardId::compose(20, o)).collect()
}

pub fn main_deck_ids() -> Vec<CardId> {
    (1..=16).map(|o| CardId::compose(30, o)).collect()
}

/// Ten starters plus one location, so location play is reachable from a
/// starting deck.
pub fn starter_deck_ids() -> Vec<CardId> {
    let mut ids: Vec<CardId> = (1..=10).map(|o| CardId::compose(80, o)).collect();
    ids.push(CardId::compose(70, 1));
    ids
}

/// One match as seen by `count` peers, each with its own context and
/// endpoint. Peer 0 joined first and is the master.
pub struct TestMatch {
    pub hub: LocalHub,
    pub peers: Vec<ReplicationEngine<LocalEndpoint>>,
}

impl TestMatch {
    pub fn new(count: u32, seed: u64) -> Self {
        let hub = LocalHub::new();
        let participants: Vec<ParticipantId> = (1..=count).map(ParticipantId::new).collect();

        let mut peers = Vec::new();
        for &me in &participants {
            let endpoint = hub.join(me);
            // Each peer shuffles with its own stream, like separate
            // processes would.
            let rng = MatchRng::new(seed.wrapping_add(u64::from(me.raw())));
            let mut ctx = MatchContext::new(demo_catalog(), rng);
            ctx.load_shared_decks(&main_deck_ids(), &super_villain_ids(), &character_ids());
            for &p in &participants {
                ctx.add_player(p, p == me).unwrap();
            }
            let catalog = ctx.catalog.clone();
            let mut alloc = std::mem::take(&mut ctx.alloc);
            for &p in &participants {
                ctx.player_mut(p)
                    .unwrap()
                    .load_deck(&starter_deck_ids(), &catalog, &mut alloc);
            }
            ctx.alloc = alloc;
            peers.push(ReplicationEngine::new(ctx, endpoint));
        }
        Self { hub, peers }
    }

    /// Run the full match-start sequence and deliver everything.
    pub fn start(&mut self) {
        self.peers[0].setup_match().unwrap();
        self.pump();
        for peer in &mut self.peers {
            peer.setup_local_player();
        }
        self.pump();
    }

    pub fn peer(&mut self, participant: ParticipantId) -> &mut ReplicationEngine<LocalEndpoint> {
        self.peers
            .iter_mut()
            .find(|p| p.local_participant() == participant)
            .expect("no such peer")
    }

    /// The actor whose turn it is, from the master's view.
    pub fn current_actor(&self) -> ParticipantId {
        self.peers[0].turns().current_actor().expect("no turn underway")
    }

    /// Deliver in-flight messages until the hub drains, including messages
    /// sent in reaction to earlier deliveries.
    pub fn pump(&mut self) {
        loop {
            let deliveries = self.hub.take_deliveries();
            if deliveries.is_empty() {
                break;
            }
            for delivery in deliveries {
                if let Some(peer) = self
                    .peers
                    .iter_mut()
                    .find(|p| p.local_participant() == delivery.to)
                {
                    peer.apply(delivery.from, delivery.msg);
                }
            }
        }
    }
}

/// Every peer's view of every replicated zone must be identical (as
/// definition-id sequences; instance handles are process-local).
pub fn assert_mirrors_agree(m: &TestMatch) {
    let reference = &m.peers[0];
    for peer in &m.peers[1..] {
        let label = peer.local_participant();

        assert_eq!(
            reference.turns().order(),
            peer.turns().order(),
            "turn order diverged on {label}"
        );
        assert_eq!(
            reference.turns().current_actor(),
            peer.turns().current_actor(),
            "current actor diverged on {label}"
        );

        let a = &reference.context().shared;
        let b = &peer.context().shared;
        assert_eq!(a.main_deck.to_card_ids(), b.main_deck.to_card_ids());
        assert_eq!(a.super_villain_deck.to_card_ids(), b.super_villain_deck.to_card_ids());
        assert_eq!(a.character_deck.to_card_ids(), b.character_deck.to_card_ids());
        assert_eq!(a.lineup.to_card_ids(), b.lineup.to_card_ids(), "line-up diverged on {label}");
        assert_eq!(a.super_villain_row.to_card_ids(), b.super_villain_row.to_card_ids());
        assert_eq!(a.played.to_card_ids(), b.played.to_card_ids(), "played diverged on {label}");

        for player in &reference.context().players {
            let mirror = peer.context().player(player.participant).unwrap();
            let who = player.participant;
            assert_eq!(player.deck.to_card_ids(), mirror.deck.to_card_ids(), "{who} deck diverged on {label}");
            assert_eq!(player.hand.to_card_ids(), mirror.hand.to_card_ids(), "{who} hand diverged on {label}");
            assert_eq!(player.discard.to_card_ids(), mirror.discard.to_card_ids(), "{who} discard diverged on {label}");
            assert_eq!(player.locations.to_card_ids(), mirror.locations.to_card_ids());
            assert_eq!(
                player.character.map(|c| c.card),
                mirror.character.map(|c| c.card),
                "{who} character diverged on {label}"
            );
        }
    }
}
