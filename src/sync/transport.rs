//! The transport contract, and an in-memory implementation.
//!
//! The real relay (session membership, reliable ordered delivery, master
//! election, late-join buffering) is an external collaborator. The engine
//! only depends on this trait; [`LocalHub`] provides the loopback
//! implementation used by the test suites to wire several engines into
//! one simulated match.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::core::participant::ParticipantId;
use crate::sync::message::{SyncMessage, Target};

/// What the replication engine needs from the relay.
///
/// Delivery is assumed reliable and ordered per sender. `is_master` is
/// stable for the life of a match; master migration is not handled.
pub trait Transport {
    /// The participant this process plays as.
    fn local_participant(&self) -> ParticipantId;

    /// Whether this process owns the shared game state.
    fn is_master(&self) -> bool;

    /// Currently connected participants, in join order.
    fn participants(&self) -> Vec<ParticipantId>;

    /// Send a message. Fire-and-forget: no delivery confirmation, no
    /// cancellation once sent.
    fn send(&mut self, target: Target, msg: &SyncMessage);
}

/// A message sitting in the hub, already routed to one recipient.
#[derive(Clone, Debug)]
pub struct Delivery {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub msg: SyncMessage,
}

#[derive(Debug, Default)]
struct HubState {
    participants: Vec<ParticipantId>,
    /// Encoded in-flight messages: (sender, target, bytes). Kept encoded
    /// so every delivery exercises the wire codec.
    outbox: Vec<(ParticipantId, Target, Vec<u8>)>,
}

/// In-memory relay connecting several engines in one process.
///
/// The first registered participant is the master. Messages are held in
/// an outbox until the test pump drains them, which models the
/// request-then-later-confirmation gap of a real relay.
#[derive(Clone, Debug, Default)]
pub struct LocalHub {
    state: Rc<RefCell<HubState>>,
}

impl LocalHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant and get their endpoint.
    #[must_use]
    pub fn join(&self, participant: ParticipantId) -> LocalEndpoint {
        self.state.borrow_mut().participants.push(participant);
        LocalEndpoint {
            participant,
            state: Rc::clone(&self.state),
        }
    }

    /// Drain in-flight messages, fanned out per recipient in send order.
    ///
    /// Messages that fail to decode are dropped with a warning, the same
    /// degrade-not-crash policy the engine applies everywhere else.
    pub fn take_deliveries(&self) -> Vec<Delivery> {
        let (outbox, participants) = {
            let mut state = self.state.borrow_mut();
            (std::mem::take(&mut state.outbox), state.participants.clone())
        };
        let master = participants.first().copied();

        let mut deliveries = Vec::new();
        for (from, target, bytes) in outbox {
            let msg = match SyncMessage::decode(&bytes) {
                Ok(msg) => msg,
                Err(err) => {
                    warn!("dropping undecodable message from {from}: {err}");
                    continue;
                }
            };
            let recipients: Vec<ParticipantId> = match target {
                Target::Others | Target::OthersBuffered => participants
                    .iter()
                    .copied()
                    .filter(|&p| p != from)
                    .collect(),
                Target::Master => master.into_iter().collect(),
                Target::One(p) => vec![p],
            };
            for to in recipients {
                deliveries.push(Delivery {
                    from,
                    to,
                    msg: msg.clone(),
                });
            }
        }
        deliveries
    }

    /// Whether any messages are waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.borrow().outbox.is_empty()
    }
}

/// One participant's handle on a [`LocalHub`].
#[derive(Clone, Debug)]
pub struct LocalEndpoint {
    participant: ParticipantId,
    state: Rc<RefCell<HubState>>,
}

impl Transport for LocalEndpoint {
    fn local_participant(&self) -> ParticipantId {
        self.participant
    }

    fn is_master(&self) -> bool {
        self.state.borrow().participants.first() == Some(&self.participant)
    }

    fn participants(&self) -> Vec<ParticipantId> {
        self.state.borrow().participants.clone()
    }

    fn send(&mut self, target: Target, msg: &SyncMessage) {
        match msg.encode() {
            Ok(bytes) => self
                .state
                .borrow_mut()
                .outbox
                .push((self.participant, target, bytes)),
            Err(err) => warn!("failed to encode message from {}: {err}", self.participant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn draw(participant: u32) -> SyncMessage {
        SyncMessage::Draw {
            participant: ParticipantId::new(participant),
            card: CardId::new(301),
        }
    }

    #[test]
    fn test_first_joined_is_master() {
        let hub = LocalHub::new();
        let a = hub.join(ParticipantId::new(1));
        let b = hub.join(ParticipantId::new(2));

        assert!(a.is_master());
        assert!(!b.is_master());
        assert_eq!(a.participants(), b.participants());
    }

    #[test]
    fn test_others_excludes_sender() {
        let hub = LocalHub::new();
        let mut a = hub.join(ParticipantId::new(1));
        let _b = hub.join(ParticipantId::new(2));
        let _c = hub.join(ParticipantId::new(3));

        a.send(Target::Others, &draw(1));
        let deliveries = hub.take_deliveries();

        let recipients: Vec<_> = deliveries.iter().map(|d| d.to).collect();
        assert_eq!(
            recipients,
            vec![ParticipantId::new(2), ParticipantId::new(3)]
        );
        assert!(hub.is_idle());
    }

    #[test]
    fn test_master_target_routes_to_first() {
        let hub = LocalHub::new();
        let _a = hub.join(ParticipantId::new(1));
        let mut b = hub.join(ParticipantId::new(2));

        b.send(Target::Master, &draw(2));
        let deliveries = hub.take_deliveries();

        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].to, ParticipantId::new(1));
        assert_eq!(deliveries[0].from, ParticipantId::new(2));
    }

    #[test]
    fn test_one_target_routes_to_one() {
        let hub = LocalHub::new();
        let mut a = hub.join(ParticipantId::new(1));
        let _b = hub.join(ParticipantId::new(2));
        let _c = hub.join(ParticipantId::new(3));

        a.send(Target::One(ParticipantId::new(3)), &draw(1));
        let deliveries = hub.take_deliveries();

        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].to, ParticipantId::new(3));
    }

    #[test]
    fn test_per_sender_order_preserved() {
        let hub = LocalHub::new();
        let mut a = hub.join(ParticipantId::new(1));
        let _b = hub.join(ParticipantId::new(2));

        for card in [301, 302, 303] {
            a.send(
                Target::Others,
                &SyncMessage::Draw {
                    participant: ParticipantId::new(1),
                    card: CardId::new(card),
                },
            );
        }

        let cards: Vec<_> = hub
            .take_deliveries()
            .iter()
            .map(|d| match d.msg {
                SyncMessage::Draw { card, .. } => card.raw(),
                _ => panic!("unexpected message"),
            })
            .collect();
        assert_eq!(cards, vec![301, 302, 303]);
    }
}
