//! # rust-pursuit
//!
//! Rules engine for hidden-movement pursuit games, built to be driven by
//! tree search.
//!
//! One mover hides on a transit network while a team of pursuers closes
//! in. The pursuers see which transport the mover takes but only learn its
//! node on reveal rounds; between reveals they work from a single-point
//! belief.
//!
//! ## Design Principles
//!
//! 1. **Explicit viewpoints**: every position query names whether it wants
//!    the mover's true node or the pursuers' belief.
//!
//! 2. **Cheap forks**: match state is plain data plus persistent
//!    collections, so a rollout clone shares nothing mutable.
//!
//! 3. **Injected decisions**: double moves, black fares, rollout moves and
//!    rewards come from policy traits; the engine only enforces the rules.
//!
//! ## Modules
//!
//! - `core`: Node and player IDs, moves, tickets, RNG, configuration, errors
//! - `board`: The `Board` oracle, `TransitMap`, and the `BeliefBoard`
//! - `ledger`: The authoritative move history
//! - `roster`: Participants, wallets, and the mover's resources
//! - `rules`: `MatchState`, search context, builder, snapshots
//! - `policy`: Simulation, resource, and reward policies
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rust_pursuit::{simulate, FixedResources, MatchBuilder, MatchConfig, NodeId,
//!     RandomSimulation, TransitMap, Transport};
//!
//! let map = TransitMap::new()
//!     .link(1, 2, Transport::Taxi)
//!     .link(2, 3, Transport::Taxi)
//!     .link(3, 4, Transport::Bus)
//!     .link(4, 1, Transport::Underground);
//!
//! let config = MatchConfig::default().with_round_cap(6).with_reveal_rounds([3, 6]);
//! let mut state = MatchBuilder::new(config)
//!     .mover("Mr. X", NodeId(1))
//!     .pursuer("Red", NodeId(3))
//!     .resource_policy(FixedResources::never())
//!     .seed(42)
//!     .build(Arc::new(map))
//!     .unwrap();
//!
//! let mut rollout = state.search_fork();
//! let mut rng = rollout.rng_mut().fork();
//! simulate(&mut rollout, &RandomSimulation, &mut rng, 0);
//!
//! assert!(rollout.is_terminal());
//! assert!(state.ledger().is_empty());
//! ```

pub mod core;
pub mod board;
pub mod ledger;
pub mod roster;
pub mod rules;
pub mod policy;

// Re-export commonly used types
pub use crate::core::{
    NodeId, PlayerId, PlayerMap, Side,
    Move, Transport,
    GameRng, GameRngState,
    MatchConfig, Tickets,
    ConfigError, LedgerError, RulesError, SnapshotError,
};

pub use crate::board::{Board, BeliefBoard, TransitLink, TransitMap, Viewpoint};

pub use crate::ledger::{LedgerEntry, MoveLedger};

pub use crate::roster::{MoverResources, Operator, Participant, PolicyFlags, Roster};

pub use crate::rules::{MatchBuilder, MatchSnapshot, MatchState, Outcome, Phase, SearchContext};

pub use crate::policy::{
    rewards, simulate,
    FixedResources, MoveFiltering, RandomSimulation,
    ResourcePolicy, ResourceView, RewardPolicy, SimulationPolicy, TerminalReward,
};
