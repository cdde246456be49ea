//! Rollout move choice and terminal rewards.

use crate::core::{GameRng, Move, PlayerId, PlayerMap};
use crate::rules::{MatchState, Outcome};

// =============================================================================
// Simulation Policy
// =============================================================================

/// Picks moves during a rollout.
pub trait SimulationPolicy: Send + Sync {
    /// Choose one of `moves` for the current player.
    ///
    /// Returning `None` passes the turn.
    fn pick_action(&self, state: &MatchState, moves: &[Move], rng: &mut GameRng) -> Option<Move>;
}

/// Uniformly random rollout moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSimulation;

impl SimulationPolicy for RandomSimulation {
    fn pick_action(&self, _state: &MatchState, moves: &[Move], rng: &mut GameRng) -> Option<Move> {
        rng.choose(moves).copied()
    }
}

/// Play `state` forward with `policy` until it ends or `max_depth` turns
/// have passed (`0` means no limit).
///
/// Players without a move pass. Returns the number of turns played.
pub fn simulate(
    state: &mut MatchState,
    policy: &dyn SimulationPolicy,
    rng: &mut GameRng,
    max_depth: u32,
) -> u32 {
    let mut depth = 0;

    while !state.is_terminal() && (max_depth == 0 || depth < max_depth) {
        let moves = state.rollout_moves();
        match policy.pick_action(state, &moves, rng) {
            Some(mv) => state.apply_action(mv),
            None => state.skip(),
        }
        depth += 1;
    }

    depth
}

// =============================================================================
// Reward Policy
// =============================================================================

/// Scores a state for one player, usually at the end of a rollout.
pub trait RewardPolicy: Send + Sync {
    fn reward(&self, state: &MatchState, player: PlayerId) -> f64;
}

/// Win/loss rewards with optional coalition reduction.
///
/// The winning side scores 1 and the losing side 0; unfinished states score
/// 0.5. When the search's invoking player uses reward shaping, pursuers who
/// did not make the capture themselves score `1 - coalition_reduction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalReward {
    pub coalition_reduction: f64,
}

impl Default for TerminalReward {
    fn default() -> Self {
        Self {
            coalition_reduction: 0.25,
        }
    }
}

impl RewardPolicy for TerminalReward {
    fn reward(&self, state: &MatchState, player: PlayerId) -> f64 {
        let Some(outcome) = state.outcome() else {
            return 0.5;
        };

        match (outcome, player == state.mover()) {
            (Outcome::MoverEscaped, true) => 1.0,
            (Outcome::MoverEscaped, false) | (Outcome::PursuersWin, true) => 0.0,
            (Outcome::PursuersWin, false) => {
                let shaped = state.search_context().is_some_and(|c| c.reward_shaping());
                let captor = state
                    .positions()
                    .pursuer_at_mover(player, state.terminal_viewpoint());
                if shaped && !captor {
                    1.0 - self.coalition_reduction
                } else {
                    1.0
                }
            }
        }
    }
}

/// Rewards for every player.
pub fn rewards(state: &MatchState, policy: &dyn RewardPolicy) -> PlayerMap<f64> {
    PlayerMap::new(state.player_count(), |p| policy.reward(state, p))
}
