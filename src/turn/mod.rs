//! Turn sequencing: phases, turn order, advancement.

pub mod sequencer;

pub use sequencer::{StartTurn, TurnPhase, TurnSequencer};
