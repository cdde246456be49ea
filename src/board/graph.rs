//! The board: an adjacency oracle over transport links.
//!
//! The engine only ever asks "where can I get from here with this ticket?"
//! and "how far apart are these nodes?". Any graph that answers those can
//! implement `Board`; `TransitMap` is the in-memory implementation used by
//! tests and small boards.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ConfigError, NodeId, Side, Transport};

/// Read-only adjacency oracle.
///
/// Implementations must be immutable once a match starts; the engine
/// shares one board between every rollout clone.
pub trait Board: Send + Sync {
    /// Nodes linked to `node` by `transport`.
    ///
    /// `Transport::ConcealedFare` links are ferry routes that only a
    /// black-fare ticket can use.
    fn neighbors(&self, node: NodeId, transport: Transport) -> &[NodeId];

    /// Distinct nodes one step away with `transport`, ascending.
    ///
    /// A concealed fare can travel any link, so it reaches the union of
    /// every transport's neighbours.
    fn reachable(&self, node: NodeId, transport: Transport) -> SmallVec<[NodeId; 16]> {
        let mut out: SmallVec<[NodeId; 16]> = if transport.is_concealed() {
            Transport::ALL
                .iter()
                .flat_map(|&t| self.neighbors(node, t).iter().copied())
                .collect()
        } else {
            SmallVec::from_slice(self.neighbors(node, transport))
        };
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Fewest steps from `from` to `to` using the links `side` may travel.
    ///
    /// Returns `None` when `to` is unreachable.
    fn distance(&self, from: NodeId, to: NodeId, side: Side) -> Option<u32> {
        distance_field(self, &[from], side, Some(to)).get(&to).copied()
    }
}

/// Transports whose links a side can travel.
#[must_use]
pub fn transports_for(side: Side) -> &'static [Transport] {
    match side {
        Side::Mover => &Transport::ALL,
        Side::Pursuer => &Transport::PUBLIC,
    }
}

/// Breadth-first distances from the nearest of `sources` to every node
/// reachable over `side`'s links.
///
/// Stops early once `stop_at` has been labelled.
pub fn distance_field<B: Board + ?Sized>(
    board: &B,
    sources: &[NodeId],
    side: Side,
    stop_at: Option<NodeId>,
) -> FxHashMap<NodeId, u32> {
    let mut dist = FxHashMap::default();
    let mut queue = VecDeque::new();

    for &source in sources {
        if dist.insert(source, 0).is_none() {
            queue.push_back(source);
        }
    }

    while let Some(node) = queue.pop_front() {
        if Some(node) == stop_at {
            break;
        }
        let next = dist[&node] + 1;
        for &transport in transports_for(side) {
            for &neighbor in board.neighbors(node, transport) {
                if !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }
    }

    dist
}

/// One undirected link, as stored in board files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitLink {
    pub from: NodeId,
    pub to: NodeId,
    pub transport: Transport,
}

/// In-memory undirected transport network.
///
/// ```
/// use rust_pursuit::board::{Board, TransitMap};
/// use rust_pursuit::core::{NodeId, Side, Transport};
///
/// let map = TransitMap::new()
///     .link(1, 2, Transport::Taxi)
///     .link(2, 3, Transport::Bus)
///     .link(3, 4, Transport::ConcealedFare);
///
/// assert_eq!(map.neighbors(NodeId(2), Transport::Taxi), &[NodeId(1)]);
/// assert_eq!(map.distance(NodeId(1), NodeId(3), Side::Pursuer), Some(2));
/// // Ferry links only count for the mover.
/// assert_eq!(map.distance(NodeId(1), NodeId(4), Side::Pursuer), None);
/// assert_eq!(map.distance(NodeId(1), NodeId(4), Side::Mover), Some(3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitMap {
    links: FxHashMap<(NodeId, Transport), SmallVec<[NodeId; 6]>>,
    nodes: FxHashSet<NodeId>,
}

impl TransitMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `add_link`.
    #[must_use]
    pub fn link(mut self, a: u16, b: u16, transport: Transport) -> Self {
        self.add_link(NodeId(a), NodeId(b), transport);
        self
    }

    /// Add an undirected link. Duplicate links are ignored.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, transport: Transport) {
        self.add_arc(a, b, transport);
        self.add_arc(b, a, transport);
    }

    /// Build a map from a list of links.
    pub fn from_links(links: impl IntoIterator<Item = TransitLink>) -> Self {
        let mut map = Self::new();
        for l in links {
            map.add_link(l.from, l.to, l.transport);
        }
        map
    }

    /// Parse a JSON array of `TransitLink`s.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let links: Vec<TransitLink> = serde_json::from_str(json)?;
        Ok(Self::from_links(links))
    }

    /// Whether `node` appears in any link.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Number of linked nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn add_arc(&mut self, from: NodeId, to: NodeId, transport: Transport) {
        self.nodes.insert(from);
        let targets = self.links.entry((from, transport)).or_default();
        if !targets.contains(&to) {
            targets.push(to);
            targets.sort_unstable();
        }
    }
}

impl Board for TransitMap {
    fn neighbors(&self, node: NodeId, transport: Transport) -> &[NodeId] {
        self.links
            .get(&(node, transport))
            .map(|targets| targets.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransitMap {
        TransitMap::new()
            .link(1, 2, Transport::Taxi)
            .link(1, 3, Transport::Bus)
            .link(2, 8, Transport::ConcealedFare)
            .link(5, 8, Transport::Underground)
            .link(5, 3, Transport::Taxi)
            .link(7, 4, Transport::Taxi)
    }

    #[test]
    fn test_links_are_undirected() {
        let map = sample();
        assert_eq!(map.neighbors(NodeId(2), Transport::Taxi), &[NodeId(1)]);
        assert_eq!(map.neighbors(NodeId(1), Transport::Taxi), &[NodeId(2)]);
        assert!(map.neighbors(NodeId(1), Transport::Underground).is_empty());
    }

    #[test]
    fn test_duplicate_links_ignored() {
        let map = TransitMap::new()
            .link(1, 2, Transport::Taxi)
            .link(2, 1, Transport::Taxi);
        assert_eq!(map.neighbors(NodeId(1), Transport::Taxi).len(), 1);
        assert_eq!(map.node_count(), 2);
    }

    #[test]
    fn test_concealed_fare_reaches_every_link() {
        let map = sample();
        let reach = map.reachable(NodeId(1), Transport::ConcealedFare);
        assert_eq!(reach.as_slice(), &[NodeId(2), NodeId(3)]);

        let reach = map.reachable(NodeId(8), Transport::ConcealedFare);
        assert_eq!(reach.as_slice(), &[NodeId(2), NodeId(5)]);
    }

    #[test]
    fn test_distance_by_side() {
        let map = sample();
        assert_eq!(map.distance(NodeId(1), NodeId(1), Side::Pursuer), Some(0));
        assert_eq!(map.distance(NodeId(1), NodeId(8), Side::Pursuer), Some(3));
        assert_eq!(map.distance(NodeId(1), NodeId(8), Side::Mover), Some(2));
        assert_eq!(map.distance(NodeId(1), NodeId(7), Side::Mover), None);
    }

    #[test]
    fn test_distance_field_multi_source() {
        let map = sample();
        let field = distance_field(&map, &[NodeId(2), NodeId(5)], Side::Pursuer, None);
        assert_eq!(field[&NodeId(1)], 1);
        assert_eq!(field[&NodeId(3)], 1);
        assert_eq!(field[&NodeId(8)], 1);
        assert!(!field.contains_key(&NodeId(7)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "from": 1, "to": 2, "transport": "Taxi" },
            { "from": 2, "to": 3, "transport": "Underground" }
        ]"#;
        let map = TransitMap::from_json(json).unwrap();

        assert!(map.contains(NodeId(3)));
        assert_eq!(map.neighbors(NodeId(3), Transport::Underground), &[NodeId(2)]);
        assert!(TransitMap::from_json("{").is_err());
    }
}
