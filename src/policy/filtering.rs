//! Board heuristics for spending double moves and black fares.
//!
//! With move filtering switched on for the search's invoking player, a
//! resource is only spent outside the quiet rounds (the opening and the
//! reveal rounds), and then only when it pays off:
//!
//! - a double move when the pursuers are close on average
//! - a black fare when the mover has more than taxi rides to hide
//!
//! Without filtering, double moves are taken at random and black fares are
//! always allowed.

use std::collections::BTreeSet;

use crate::core::GameRng;

use super::resource::{ResourcePolicy, ResourceView};

/// Quiet rounds of the standard game.
pub const DEFAULT_QUIET_ROUNDS: [u32; 7] = [1, 2, 3, 8, 13, 18, 24];

/// Heuristic resource policy.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveFiltering {
    quiet_rounds: BTreeSet<u32>,
    distance_threshold: f64,
    greedy_double_move: f64,
}

impl Default for MoveFiltering {
    fn default() -> Self {
        Self {
            quiet_rounds: DEFAULT_QUIET_ROUNDS.into_iter().collect(),
            distance_threshold: 3.0,
            greedy_double_move: 0.3,
        }
    }
}

impl MoveFiltering {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds in which no resource is spent while filtering.
    #[must_use]
    pub fn with_quiet_rounds(mut self, rounds: impl IntoIterator<Item = u32>) -> Self {
        self.quiet_rounds = rounds.into_iter().collect();
        self
    }

    /// Double-move when the average pursuer distance is at most this.
    #[must_use]
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Chance of an unfiltered double move.
    #[must_use]
    pub fn with_greedy_double_move(mut self, probability: f64) -> Self {
        self.greedy_double_move = probability;
        self
    }

    #[must_use]
    pub fn is_quiet_round(&self, round: u32) -> bool {
        self.quiet_rounds.contains(&round)
    }
}

impl ResourcePolicy for MoveFiltering {
    fn use_double_move(&self, view: &ResourceView<'_>, rng: &mut GameRng) -> bool {
        if !view.context.move_filtering() {
            return rng.gen_bool(self.greedy_double_move);
        }
        if self.is_quiet_round(view.round) {
            return false;
        }
        view.average_distance()
            .is_some_and(|d| d <= self.distance_threshold)
    }

    fn use_black_fare(&self, view: &ResourceView<'_>, _rng: &mut GameRng) -> bool {
        if !view.context.move_filtering() {
            return true;
        }
        !self.is_quiet_round(view.round) && !view.only_taxi_moves()
    }
}
