//! The board graph and the positions on it.
//!
//! ## Overview
//!
//! - **`Board`**: the read-only adjacency oracle a match is played on
//! - **`TransitMap`**: an in-memory `Board` built from undirected links
//! - **`BeliefBoard`**: every player's true node plus the pursuers' single
//!   estimate of the mover, queried through an explicit `Viewpoint`
//!
//! ## Usage
//!
//! ```rust
//! use rust_pursuit::board::{BeliefBoard, TransitMap, Viewpoint};
//! use rust_pursuit::core::{Move, NodeId, PlayerId, PlayerMap, Tickets, Transport};
//!
//! let map = TransitMap::new()
//!     .link(5, 12, Transport::Taxi)
//!     .link(5, 6, Transport::Taxi)
//!     .link(12, 30, Transport::Taxi);
//!
//! let mover = PlayerId::new(0);
//! let mut board = BeliefBoard::new(PlayerMap::from_vec(vec![NodeId(5), NodeId(30)]), mover);
//!
//! let moves = board.legal_moves(&map, mover, Viewpoint::Actual, &Tickets::new(4, 0, 0));
//! assert_eq!(moves.len(), 2);
//!
//! board.move_actual(mover, &Move::new(Transport::Taxi, NodeId(12)));
//! board.recompute_belief(&map, Transport::Taxi, false, Viewpoint::Actual);
//!
//! // The pursuers only know a taxi was taken from 5.
//! assert!(board.candidates().contains(&NodeId(6)));
//! ```

mod belief;
mod graph;

pub use belief::{BeliefBoard, Viewpoint};
pub use graph::{distance_field, transports_for, Board, TransitLink, TransitMap};
