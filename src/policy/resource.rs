//! Deciding when the mover spends its special resources.

use crate::board::{BeliefBoard, Board, Viewpoint};
use crate::core::{GameRng, MatchConfig, Move, Side, Tickets, Transport};
use crate::roster::MoverResources;
use crate::rules::SearchContext;

/// Read-only view handed to a `ResourcePolicy`.
///
/// Built from the match state's parts rather than the state itself, so the
/// policy can never reach back into the mutable match.
#[derive(Clone, Copy)]
pub struct ResourceView<'a> {
    /// Round the mover is acting in.
    pub round: u32,
    /// Search snapshot, or the mover's own flags in live play.
    pub context: SearchContext,
    /// Whether the state is a search rollout.
    pub in_search: bool,
    pub config: &'a MatchConfig,
    pub board: &'a dyn Board,
    pub positions: &'a BeliefBoard,
    pub resources: &'a MoverResources,
    pub tickets: &'a Tickets,
    /// Moves the mover has available for the decision.
    pub moves: &'a [Move],
    /// Viewpoint the mover is seen under.
    pub viewpoint: Viewpoint,
}

impl ResourceView<'_> {
    /// Mean distance from the mover to the pursuers over the pursuers' links.
    #[must_use]
    pub fn average_distance(&self) -> Option<f64> {
        self.positions
            .average_distance(self.board, Side::Pursuer, self.viewpoint)
    }

    /// Whether every available move is a taxi ride.
    #[must_use]
    pub fn only_taxi_moves(&self) -> bool {
        self.moves.iter().all(|m| m.uses(Transport::Taxi))
    }
}

/// Decides double moves and black fares for the mover.
///
/// The engine only asks when the resource is actually available, so
/// implementations need not re-check cards or tickets.
pub trait ResourcePolicy: Send + Sync {
    /// Play a double-move card now?
    fn use_double_move(&self, view: &ResourceView<'_>, rng: &mut GameRng) -> bool;

    /// Allow concealed-fare moves for this turn?
    fn use_black_fare(&self, view: &ResourceView<'_>, rng: &mut GameRng) -> bool;
}

/// Always gives the same answers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedResources {
    pub double_move: bool,
    pub black_fare: bool,
}

impl FixedResources {
    /// Never double-moves, never hides a fare.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            double_move: false,
            black_fare: false,
        }
    }

    /// Double-moves and hides fares whenever possible.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            double_move: true,
            black_fare: true,
        }
    }
}

impl ResourcePolicy for FixedResources {
    fn use_double_move(&self, _view: &ResourceView<'_>, _rng: &mut GameRng) -> bool {
        self.double_move
    }

    fn use_black_fare(&self, _view: &ResourceView<'_>, _rng: &mut GameRng) -> bool {
        self.black_fare
    }
}
