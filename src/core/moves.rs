//! Move representation: transport + destination.
//!
//! A `Move` is the only thing a player submits. It names the ticket spent
//! and the node travelled to; the origin is implied by the mover's position
//! under the viewpoint the move was generated for.
//!
//! Moves order by destination first, then by transport rank, so sorted move
//! lists read like a timetable and equal destinations group together.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entity::NodeId;

/// Means of travel between adjacent nodes.
///
/// Declaration order is the transport's rank in the move ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transport {
    Taxi,
    Bus,
    Underground,
    /// Black-fare ticket: travel by any link without disclosing which.
    ConcealedFare,
}

impl Transport {
    /// All transports in rank order.
    pub const ALL: [Transport; 4] = [
        Transport::Taxi,
        Transport::Bus,
        Transport::Underground,
        Transport::ConcealedFare,
    ];

    /// Transports with their own public links on the board.
    pub const PUBLIC: [Transport; 3] = [Transport::Taxi, Transport::Bus, Transport::Underground];

    /// Rank used as the tie-break in move ordering.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether using this transport hides the link actually taken.
    #[must_use]
    pub const fn is_concealed(self) -> bool {
        matches!(self, Transport::ConcealedFare)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Transport::Taxi => "taxi",
            Transport::Bus => "bus",
            Transport::Underground => "underground",
            Transport::ConcealedFare => "black fare",
        };
        f.write_str(name)
    }
}

/// A single transition: travel to `destination` using `transport`.
///
/// ```
/// use rust_pursuit::core::{Move, NodeId, Transport};
///
/// let bus = Move::new(Transport::Bus, NodeId(12));
/// let taxi = Move::new(Transport::Taxi, NodeId(12));
/// let far = Move::new(Transport::Taxi, NodeId(40));
///
/// assert!(taxi < bus);
/// assert!(bus < far);
/// assert_eq!(format!("{bus}"), "bus to 12");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    transport: Transport,
    destination: NodeId,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(transport: Transport, destination: NodeId) -> Self {
        Self {
            transport,
            destination,
        }
    }

    /// The ticket spent on this move.
    #[must_use]
    pub const fn transport(&self) -> Transport {
        self.transport
    }

    /// Where the move ends.
    #[must_use]
    pub const fn destination(&self) -> NodeId {
        self.destination
    }

    /// Check the transport used.
    #[must_use]
    pub fn uses(&self, transport: Transport) -> bool {
        self.transport == transport
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> Ordering {
        self.destination
            .cmp(&other.destination)
            .then_with(|| self.transport.rank().cmp(&other.transport.rank()))
    }
}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.transport, self.destination)
    }
}
