//! Match-wide shared state.
//!
//! The line-up, super-villain row, played-cards area, the face-down decks
//! feeding them, and the power counter. Shared zones are authoritatively
//! owned by the master process; everyone else mirrors them.

use crate::zones::{Zone, ZoneTag};

/// Operation on the power counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerOp {
    Add(i32),
    Subtract(i32),
    Reset,
}

/// Zones and counters shared by every participant.
#[derive(Debug)]
pub struct SharedState {
    /// Face-down deck feeding the line-up.
    pub main_deck: Zone,
    /// Face-down deck feeding the super-villain row.
    pub super_villain_deck: Zone,
    /// Characters not yet assigned to a player.
    pub character_deck: Zone,

    /// Face-up row of purchasable cards.
    pub lineup: Zone,
    /// Face-up super-villain row.
    pub super_villain_row: Zone,
    /// Cards played this turn, shared so every peer sees the table.
    pub played: Zone,

    /// Power available to the current actor. Deliberately unclamped; it
    /// can go negative.
    pub power: i32,
}

impl SharedState {
    /// Create empty shared state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            main_deck: Zone::new(ZoneTag::Deck),
            super_villain_deck: Zone::new(ZoneTag::Deck),
            character_deck: Zone::new(ZoneTag::Character),
            lineup: Zone::new(ZoneTag::Lineup),
            super_villain_row: Zone::new(ZoneTag::SuperVillain),
            played: Zone::new(ZoneTag::Played),
            power: 0,
        }
    }

    /// Apply a power operation and return the new total.
    pub fn apply_power(&mut self, op: PowerOp) -> i32 {
        match op {
            PowerOp::Add(amount) => self.power += amount,
            PowerOp::Subtract(amount) => self.power -= amount,
            PowerOp::Reset => self.power = 0,
        }
        self.power
    }

    /// Total cards across all shared zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.main_deck.len()
            + self.super_villain_deck.len()
            + self.character_deck.len()
            + self.lineup.len()
            + self.super_villain_row.len()
            + self.played.len()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_operations() {
        let mut shared = SharedState::new();

        assert_eq!(shared.apply_power(PowerOp::Add(5)), 5);
        assert_eq!(shared.apply_power(PowerOp::Subtract(2)), 3);
        assert_eq!(shared.apply_power(PowerOp::Reset), 0);
    }

    #[test]
    fn test_power_can_go_negative() {
        let mut shared = SharedState::new();
        assert_eq!(shared.apply_power(PowerOp::Subtract(4)), -4);
    }

    #[test]
    fn test_new_shared_state_is_empty() {
        let shared = SharedState::new();
        assert_eq!(shared.card_count(), 0);
        assert_eq!(shared.power, 0);
    }
}
