//! Board node identification.
//!
//! Every square on the board is a `NodeId`. The engine never interprets
//! node numbers beyond equality and ordering; adjacency comes from the
//! `Board` the match was built with.
//!
//! ```
//! use rust_pursuit::core::NodeId;
//!
//! let a = NodeId::new(5);
//! let b = NodeId::from(12);
//!
//! assert!(a < b);
//! assert_eq!(b.raw(), 12);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a board node (station).
///
/// Ordered by raw value so move lists and candidate pools iterate
/// deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Create a node ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw node number.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for NodeId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
