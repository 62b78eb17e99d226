//! Turn-order and phase state machine.
//!
//! Phases run Start -> Main -> End, then the next actor's Start. The
//! Start -> Main transition is automatic and synchronous; Main -> End is
//! triggered by the current actor (or their timer expiring); End -> next
//! Start happens only on the master, which is the single point where turn
//! advancement is permitted.
//!
//! The sequencer is a pure state machine. Broadcasting, authority checks,
//! and event emission live in the replication engine.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::participant::ParticipantId;

/// Phase within one actor's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Start,
    Main,
    End,
}

/// Outcome of feeding a start-turn notification to the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTurn {
    /// A new turn began for the actor.
    Started,
    /// The actor was already current; state untouched. Callers may still
    /// re-trigger UI refresh.
    AlreadyCurrent,
    /// The actor is not in the turn order; notification dropped.
    UnknownActor,
}

/// Whose turn it is and which phase is active.
#[derive(Clone, Debug, Default)]
pub struct TurnSequencer {
    order: Vec<ParticipantId>,
    index: usize,
    current: Option<ParticipantId>,
    phase: TurnPhase,
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::Start
    }
}

impl TurnSequencer {
    /// Create a sequencer with no turn order yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical turn order, empty before setup.
    #[must_use]
    pub fn order(&self) -> &[ParticipantId] {
        &self.order
    }

    /// The actor whose turn it is, if a match is underway.
    #[must_use]
    pub fn current_actor(&self) -> Option<ParticipantId> {
        self.current
    }

    /// The active phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Whether `actor` is the current actor.
    #[must_use]
    pub fn is_current(&self, actor: ParticipantId) -> bool {
        self.current == Some(actor)
    }

    /// Install the canonical turn order received from (or produced by)
    /// the master. Resets the index; no turn starts until a start-turn
    /// notification arrives.
    pub fn set_order(&mut self, order: Vec<ParticipantId>) {
        self.order = order;
        self.index = 0;
        self.current = None;
        self.phase = TurnPhase::Start;
    }

    /// Begin a turn for `actor`.
    ///
    /// Idempotent for a re-delivered notification: starting the actor who
    /// is already current changes no state.
    pub fn start_turn(&mut self, actor: ParticipantId) -> StartTurn {
        if self.current == Some(actor) {
            return StartTurn::AlreadyCurrent;
        }
        let Some(index) = self.order.iter().position(|&p| p == actor) else {
            debug!("start-turn for {actor} not in turn order, dropping");
            return StartTurn::UnknownActor;
        };

        self.index = index;
        self.current = Some(actor);
        // Start has no external trigger; a new turn lands in Main.
        self.phase = TurnPhase::Main;
        StartTurn::Started
    }

    /// Move the current actor from Main into End.
    ///
    /// Returns false (and changes nothing) unless `actor` is current and
    /// the main phase is active - late or duplicate requests are dropped.
    pub fn end_main_phase(&mut self, actor: ParticipantId) -> bool {
        if self.current != Some(actor) || self.phase != TurnPhase::Main {
            debug!("end-main-phase from {actor} is stale, dropping");
            return false;
        }
        self.phase = TurnPhase::End;
        true
    }

    /// Close out `actor`'s turn.
    ///
    /// Returns false (and changes nothing) when `actor` is not current.
    /// The index is kept so [`Self::next_actor`] still answers from the
    /// finished turn.
    pub fn finish_turn(&mut self, actor: ParticipantId) -> bool {
        if self.current != Some(actor) {
            debug!("turn-ended for {actor} who is not current, dropping");
            return false;
        }
        self.current = None;
        self.phase = TurnPhase::Start;
        true
    }

    /// The actor who would act next, `(index + 1) mod N`.
    ///
    /// Master-side only; mirrors learn the next actor from the broadcast.
    #[must_use]
    pub fn next_actor(&self) -> Option<ParticipantId> {
        if self.order.is_empty() {
            return None;
        }
        Some(self.order[(self.index + 1) % self.order.len()])
    }
}
