//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use rust_pursuit::{
    MatchBuilder, MatchConfig, MatchState, Move, NodeId, PlayerId, ResourcePolicy, TransitMap,
    Transport,
};

/// Twenty-node city: two taxi rings joined at 5-12, a few bus and
/// underground lines, and one ferry between 10 and 19.
pub fn city() -> Arc<TransitMap> {
    let mut map = TransitMap::new();
    let taxi = [
        (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 8), (8, 9), (9, 10), (10, 1),
        (5, 12), (11, 12), (12, 13), (13, 14), (14, 15), (15, 16), (16, 17), (17, 18),
        (18, 19), (19, 20), (20, 11),
    ];
    for (a, b) in taxi {
        map.add_link(NodeId(a), NodeId(b), Transport::Taxi);
    }
    for (a, b) in [(1, 5), (5, 9), (12, 16), (16, 20), (3, 14)] {
        map.add_link(NodeId(a), NodeId(b), Transport::Bus);
    }
    for (a, b) in [(1, 13), (13, 18)] {
        map.add_link(NodeId(a), NodeId(b), Transport::Underground);
    }
    map.add_link(NodeId(10), NodeId(19), Transport::ConcealedFare);
    Arc::new(map)
}

/// Mover in seat 0, pursuers after it in the given order.
pub fn match_on_city(
    config: MatchConfig,
    policy: impl ResourcePolicy + 'static,
    mover: u16,
    pursuers: &[u16],
) -> MatchState {
    let names = ["Red", "Blue", "Green", "Yellow", "Black"];
    let mut builder = MatchBuilder::new(config)
        .mover("Mr. X", NodeId(mover))
        .resource_policy(policy)
        .seed(42);
    for (i, &start) in pursuers.iter().enumerate() {
        builder = builder.pursuer(names[i % names.len()], NodeId(start));
    }
    builder.build(city()).unwrap()
}

pub fn taxi(to: u16) -> Move {
    Move::new(Transport::Taxi, NodeId(to))
}

pub fn bus(to: u16) -> Move {
    Move::new(Transport::Bus, NodeId(to))
}

pub fn black(to: u16) -> Move {
    Move::new(Transport::ConcealedFare, NodeId(to))
}

pub const MOVER: PlayerId = PlayerId::new(0);
