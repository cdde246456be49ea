//! A single seat at the table: identity, wallet, and mover resources.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{MatchConfig, NodeId, Side, Tickets};

/// Who makes the decisions for a participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// A live player choosing moves and double moves interactively.
    Human,
    /// An AI driving the seat through search.
    #[default]
    Computer,
}

/// Heuristic switches a computer participant brings into search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Shape terminal rewards by distance instead of win/loss only.
    pub reward_shaping: bool,
    /// Filter double moves and black fares with board heuristics.
    pub move_filtering: bool,
}

impl PolicyFlags {
    /// Both heuristics enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            reward_shaping: true,
            move_filtering: true,
        }
    }
}

/// Double-move cards plus the guard that allows one card per round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverResources {
    double_move_cards: u8,
    used_in_rounds: SmallVec<[u32; 4]>,
}

impl MoverResources {
    #[must_use]
    pub fn new(double_move_cards: u8) -> Self {
        Self {
            double_move_cards,
            used_in_rounds: SmallVec::new(),
        }
    }

    /// Cards left.
    #[must_use]
    pub fn double_move_cards(&self) -> u8 {
        self.double_move_cards
    }

    /// Rounds a card was played in, in play order.
    #[must_use]
    pub fn used_in_rounds(&self) -> &[u32] {
        &self.used_in_rounds
    }

    /// Whether a card may be played in `round`.
    #[must_use]
    pub fn has_double_move_card(&self, round: u32) -> bool {
        self.double_move_cards > 0 && !self.used_in_rounds.contains(&round)
    }

    /// Play a card in `round`.
    ///
    /// # Panics
    ///
    /// Panics if `has_double_move_card(round)` is false.
    pub fn spend_double_move(&mut self, round: u32) {
        assert!(
            self.has_double_move_card(round),
            "no double move card available in round {round}"
        );
        self.double_move_cards -= 1;
        self.used_in_rounds.push(round);
    }
}

/// A mover or pursuer with its wallet.
///
/// The initial wallet is kept alongside the live one so rollouts can reset
/// a participant with `reset`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    name: Arc<str>,
    side: Side,
    operator: Operator,
    flags: PolicyFlags,
    start: NodeId,
    initial_tickets: Tickets,
    tickets: Tickets,
    initial_resources: Option<MoverResources>,
    resources: Option<MoverResources>,
}

impl Participant {
    /// The mover, equipped from `config`.
    #[must_use]
    pub fn mover(name: impl Into<Arc<str>>, start: NodeId, config: &MatchConfig) -> Self {
        let resources = MoverResources::new(config.double_move_cards);
        Self::with_wallet(name, Side::Mover, start, config.mover_tickets, Some(resources))
    }

    /// A pursuer, equipped from `config`.
    #[must_use]
    pub fn pursuer(name: impl Into<Arc<str>>, start: NodeId, config: &MatchConfig) -> Self {
        Self::with_wallet(name, Side::Pursuer, start, config.pursuer_tickets, None)
    }

    fn with_wallet(
        name: impl Into<Arc<str>>,
        side: Side,
        start: NodeId,
        tickets: Tickets,
        resources: Option<MoverResources>,
    ) -> Self {
        Self {
            name: name.into(),
            side,
            operator: Operator::Computer,
            flags: PolicyFlags::default(),
            start,
            initial_tickets: tickets,
            tickets,
            initial_resources: resources.clone(),
            resources,
        }
    }

    #[must_use]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PolicyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace both the initial and the live wallet.
    #[must_use]
    pub fn with_tickets(mut self, tickets: Tickets) -> Self {
        self.initial_tickets = tickets;
        self.tickets = tickets;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn is_mover(&self) -> bool {
        self.side == Side::Mover
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.operator == Operator::Human
    }

    #[must_use]
    pub fn flags(&self) -> PolicyFlags {
        self.flags
    }

    /// Starting node.
    #[must_use]
    pub fn start(&self) -> NodeId {
        self.start
    }

    #[must_use]
    pub fn tickets(&self) -> &Tickets {
        &self.tickets
    }

    pub fn tickets_mut(&mut self) -> &mut Tickets {
        &mut self.tickets
    }

    #[must_use]
    pub fn initial_tickets(&self) -> &Tickets {
        &self.initial_tickets
    }

    /// Double-move resources; `None` for pursuers.
    #[must_use]
    pub fn resources(&self) -> Option<&MoverResources> {
        self.resources.as_ref()
    }

    pub fn resources_mut(&mut self) -> Option<&mut MoverResources> {
        self.resources.as_mut()
    }

    /// Whether this participant may play a double-move card in `round`.
    #[must_use]
    pub fn has_double_move_card(&self, round: u32) -> bool {
        self.resources
            .as_ref()
            .is_some_and(|r| r.has_double_move_card(round))
    }

    /// Restore tickets and resources to their initial values.
    pub fn reset(&mut self) {
        self.tickets = self.initial_tickets;
        self.resources.clone_from(&self.initial_resources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transport;

    #[test]
    fn test_mover_from_config() {
        let config = MatchConfig::default();
        let mover = Participant::mover("Mr. X", NodeId(45), &config);

        assert!(mover.is_mover());
        assert_eq!(mover.name(), "Mr. X");
        assert_eq!(mover.tickets().count(Transport::ConcealedFare), 2);
        assert_eq!(mover.resources().map(MoverResources::double_move_cards), Some(2));
    }

    #[test]
    fn test_pursuer_has_no_resources() {
        let pursuer = Participant::pursuer("Red", NodeId(13), &MatchConfig::default());
        assert!(pursuer.resources().is_none());
        assert!(!pursuer.has_double_move_card(1));
        assert_eq!(pursuer.tickets().count(Transport::ConcealedFare), 0);
    }

    #[test]
    fn test_one_card_per_round() {
        let mut res = MoverResources::new(2);
        res.spend_double_move(4);

        assert!(!res.has_double_move_card(4));
        assert!(res.has_double_move_card(5));
        assert_eq!(res.double_move_cards(), 1);

        res.spend_double_move(9);
        assert!(!res.has_double_move_card(10));
        assert_eq!(res.used_in_rounds(), &[4, 9]);
    }

    #[test]
    #[should_panic(expected = "no double move card available")]
    fn test_spend_twice_in_round_panics() {
        let mut res = MoverResources::new(2);
        res.spend_double_move(4);
        res.spend_double_move(4);
    }

    #[test]
    fn test_reset_restores_wallet() {
        let config = MatchConfig::default();
        let mut mover = Participant::mover("Mr. X", NodeId(45), &config);
        let initial = *mover.tickets();

        mover.tickets_mut().spend(Transport::Taxi);
        mover.tickets_mut().spend(Transport::ConcealedFare);
        if let Some(res) = mover.resources_mut() {
            res.spend_double_move(3);
        }
        mover.reset();

        assert_eq!(*mover.tickets(), initial);
        assert!(mover.has_double_move_card(3));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let base = Participant::pursuer("Blue", NodeId(26), &MatchConfig::default());
        let mut copy = base.clone();
        copy.tickets_mut().spend(Transport::Bus);

        assert_ne!(copy.tickets(), base.tickets());
    }
}
