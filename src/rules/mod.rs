//! The match state machine.
//!
//! `MatchState` composes the roster, the belief board and the ledger and
//! drives them through turns:
//! - Legal moves for the player to act, seen through the right viewpoint
//! - Applying a move: position, belief, ledger, turn pointer, double move
//! - Termination: capture or the round cap passing
//!
//! Searches fork the state with `MatchState::search_fork`; forks share the
//! board and the policies but nothing mutable.

mod builder;
mod search;
mod snapshot;
mod state;

pub use builder::MatchBuilder;
pub use search::SearchContext;
pub use snapshot::MatchSnapshot;
pub use state::{MatchState, Outcome, Phase};
