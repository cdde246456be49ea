//! Match configuration: round schedule and resource allotments.
//!
//! Rule variants are expressed through `MatchConfig` rather than constants
//! in the engine. The defaults reproduce the classic 24-round game with
//! reveals on rounds 3, 8, 13, 18 and 24.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::moves::Transport;

/// Ticket wallet, one counter per transport.
///
/// `black_fare` counts concealed-fare tickets; pursuers always hold zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tickets {
    pub taxi: u8,
    pub bus: u8,
    pub underground: u8,
    pub black_fare: u8,
}

impl Tickets {
    /// Create a wallet without black fares.
    #[must_use]
    pub const fn new(taxi: u8, bus: u8, underground: u8) -> Self {
        Self {
            taxi,
            bus,
            underground,
            black_fare: 0,
        }
    }

    /// Set the black-fare count.
    #[must_use]
    pub const fn with_black_fares(mut self, black_fare: u8) -> Self {
        self.black_fare = black_fare;
        self
    }

    /// Tickets held for `transport`.
    #[must_use]
    pub fn count(&self, transport: Transport) -> u8 {
        match transport {
            Transport::Taxi => self.taxi,
            Transport::Bus => self.bus,
            Transport::Underground => self.underground,
            Transport::ConcealedFare => self.black_fare,
        }
    }

    /// Whether at least one ticket for `transport` is held.
    #[must_use]
    pub fn has(&self, transport: Transport) -> bool {
        self.count(transport) > 0
    }

    /// Spend one ticket.
    ///
    /// Legal-move generation only offers transports with a ticket left, so
    /// an empty slot here means the caller bypassed it.
    pub fn spend(&mut self, transport: Transport) {
        let slot = self.slot_mut(transport);
        assert!(*slot > 0, "no {transport} ticket left to spend");
        *slot -= 1;
    }

    /// Receive one ticket.
    pub fn gain(&mut self, transport: Transport) {
        let slot = self.slot_mut(transport);
        *slot = slot.saturating_add(1);
    }

    /// Total tickets across all transports.
    #[must_use]
    pub fn total(&self) -> u32 {
        Transport::ALL.iter().map(|&t| u32::from(self.count(t))).sum()
    }

    fn slot_mut(&mut self, transport: Transport) -> &mut u8 {
        match transport {
            Transport::Taxi => &mut self.taxi,
            Transport::Bus => &mut self.bus,
            Transport::Underground => &mut self.underground,
            Transport::ConcealedFare => &mut self.black_fare,
        }
    }
}

/// Complete rule configuration for a match.
///
/// ## Example
///
/// ```
/// use rust_pursuit::core::{MatchConfig, Tickets};
///
/// let config = MatchConfig::default()
///     .with_round_cap(12)
///     .with_reveal_rounds([3, 6, 9, 12])
///     .with_double_move_cards(1)
///     .with_mover_tickets(Tickets::new(6, 4, 2).with_black_fares(3));
///
/// assert!(config.validate().is_ok());
/// assert!(config.is_reveal_round(6));
/// assert!(!config.is_reveal_round(8));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Last playable round. Reaching `round_cap + 1` means the mover escaped.
    pub round_cap: u32,

    /// Rounds after which the mover's true position is disclosed.
    pub reveal_rounds: BTreeSet<u32>,

    /// Mover's starting wallet, black fares included.
    pub mover_tickets: Tickets,

    /// Each pursuer's starting wallet.
    pub pursuer_tickets: Tickets,

    /// Double-move cards the mover starts with.
    pub double_move_cards: u8,

    /// Hand each ticket a pursuer spends over to the mover.
    pub pursuer_tickets_to_mover: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            round_cap: 24,
            reveal_rounds: [3, 8, 13, 18, 24].into_iter().collect(),
            mover_tickets: Tickets::new(4, 3, 3).with_black_fares(2),
            pursuer_tickets: Tickets::new(9, 10, 5),
            double_move_cards: 2,
            pursuer_tickets_to_mover: true,
        }
    }
}

impl MatchConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::ZeroRoundCap);
        }
        if let Some(&round) = self
            .reveal_rounds
            .iter()
            .find(|&&r| r == 0 || r > self.round_cap)
        {
            return Err(ConfigError::RevealRoundOutOfRange {
                round,
                cap: self.round_cap,
            });
        }
        if self.pursuer_tickets.black_fare > 0 {
            return Err(ConfigError::PursuerBlackFares);
        }
        Ok(())
    }

    /// Whether the mover surfaces after moving in `round`.
    #[must_use]
    pub fn is_reveal_round(&self, round: u32) -> bool {
        self.reveal_rounds.contains(&round)
    }

    /// Set the round cap.
    #[must_use]
    pub fn with_round_cap(mut self, cap: u32) -> Self {
        self.round_cap = cap;
        self
    }

    /// Replace the reveal schedule.
    #[must_use]
    pub fn with_reveal_rounds(mut self, rounds: impl IntoIterator<Item = u32>) -> Self {
        self.reveal_rounds = rounds.into_iter().collect();
        self
    }

    /// Set the mover's starting wallet.
    #[must_use]
    pub fn with_mover_tickets(mut self, tickets: Tickets) -> Self {
        self.mover_tickets = tickets;
        self
    }

    /// Set each pursuer's starting wallet.
    #[must_use]
    pub fn with_pursuer_tickets(mut self, tickets: Tickets) -> Self {
        self.pursuer_tickets = tickets;
        self
    }

    /// Set the number of double-move cards.
    #[must_use]
    pub fn with_double_move_cards(mut self, cards: u8) -> Self {
        self.double_move_cards = cards;
        self
    }

    /// Set the number of black-fare tickets.
    #[must_use]
    pub fn with_black_fares(mut self, tickets: u8) -> Self {
        self.mover_tickets.black_fare = tickets;
        self
    }

    /// Keep spent pursuer tickets out of the mover's wallet.
    #[must_use]
    pub fn without_ticket_transfer(mut self) -> Self {
        self.pursuer_tickets_to_mover = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.round_cap, 24);
        assert!(config.is_reveal_round(3));
        assert!(config.is_reveal_round(24));
        assert!(!config.is_reveal_round(4));
        assert_eq!(config.mover_tickets.black_fare, 2);
        assert_eq!(config.double_move_cards, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ticket_spend_and_gain() {
        let mut tickets = Tickets::new(1, 0, 2);
        assert!(tickets.has(Transport::Taxi));
        assert!(!tickets.has(Transport::Bus));

        tickets.spend(Transport::Taxi);
        tickets.gain(Transport::Bus);

        assert_eq!(tickets.count(Transport::Taxi), 0);
        assert_eq!(tickets.count(Transport::Bus), 1);
        assert_eq!(tickets.total(), 3);
    }

    #[test]
    #[should_panic(expected = "no black fare ticket left")]
    fn test_spending_missing_ticket_panics() {
        let mut tickets = Tickets::new(1, 1, 1);
        tickets.spend(Transport::ConcealedFare);
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let config = MatchConfig::default().with_round_cap(10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RevealRoundOutOfRange { round: 13, cap: 10 })
        ));

        let config = MatchConfig::default().with_round_cap(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRoundCap)));
    }

    #[test]
    fn test_validate_rejects_pursuer_black_fares() {
        let config =
            MatchConfig::default().with_pursuer_tickets(Tickets::new(5, 5, 5).with_black_fares(1));
        assert!(matches!(config.validate(), Err(ConfigError::PursuerBlackFares)));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MatchConfig::from_json(r#"{ "round_cap": 8, "reveal_rounds": [2, 5, 8] }"#).unwrap();

        assert_eq!(config.round_cap, 8);
        assert!(config.is_reveal_round(5));
        assert_eq!(config.double_move_cards, 2);
    }

    #[test]
    fn test_from_json_validates() {
        let result = MatchConfig::from_json(r#"{ "round_cap": 4 }"#);
        assert!(matches!(result, Err(ConfigError::RevealRoundOutOfRange { .. })));

        let result = MatchConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = MatchConfig::default().with_black_fares(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
