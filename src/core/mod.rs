//! Core engine types: nodes, players, moves, tickets, RNG, configuration,
//! and errors.
//!
//! Everything here is plain `Copy`/`Clone` data so match states can be
//! cloned per rollout without sharing mutable substructure.

pub mod entity;
pub mod player;
pub mod moves;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::NodeId;
pub use player::{PlayerId, PlayerMap, Side};
pub use moves::{Move, Transport};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, Tickets};
pub use error::{ConfigError, LedgerError, RulesError, SnapshotError};
