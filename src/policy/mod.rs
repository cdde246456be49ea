//! Decision makers the engine consults but does not define.
//!
//! Policies are trait-based so a search can plug in its own heuristics:
//! - `SimulationPolicy`: which move to play in a rollout
//! - `ResourcePolicy`: when the mover spends a double move or a black fare
//! - `RewardPolicy`: how a finished rollout is scored
//!
//! Policies never hold a reference into a match. They get `&MatchState`
//! or a `ResourceView` for the duration of one call, and every
//! implementation must be `Send + Sync` so a shared instance can serve
//! concurrent rollouts.

mod filtering;
mod resource;
mod simulation;

pub use filtering::{MoveFiltering, DEFAULT_QUIET_ROUNDS};
pub use resource::{FixedResources, ResourcePolicy, ResourceView};
pub use simulation::{rewards, simulate, RandomSimulation, RewardPolicy, SimulationPolicy, TerminalReward};
