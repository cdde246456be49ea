//! True positions and the pursuers' estimate of the mover.
//!
//! ## Viewpoints
//!
//! Every query and mutation names the `Viewpoint` it works under. Under
//! `Viewpoint::Actual` the mover sits on its true node. Under
//! `Viewpoint::Belief` the mover sits on the belief node, the single point
//! the pursuers currently suspect. Pursuers are always on their true nodes.
//!
//! ## The estimator
//!
//! The belief is a deliberately cheap single-point estimate, not a
//! distribution:
//!
//! - After a mover move on a reveal round it snaps to the true position.
//! - After any other mover move it steps from the previous belief along the
//!   disclosed transport. Nodes held by a pursuer, and nodes a pursuer has
//!   already stepped on since the last reveal, are ruled out. The remaining
//!   candidates are kept; the one farthest from the nearest pursuer becomes
//!   the belief (lowest node id on ties).
//! - When a pursuer lands on the belief node the node is ruled out and the
//!   next candidate takes over.
//! - With no candidate left the belief settles on the nearest node that is
//!   neither held by a pursuer nor ruled out. It never sits under a pursuer
//!   while a free node exists.
//!
//! The estimate can be wrong. It only has to stay consistent with what the
//! pursuers have seen.

use im::OrdSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::core::{Move, NodeId, PlayerId, PlayerMap, Side, Tickets, Transport};

use super::graph::{distance_field, Board};

/// Whose picture of the mover's position a call works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Viewpoint {
    /// The mover's true position.
    Actual,
    /// The pursuers' estimate of the mover's position.
    Belief,
}

/// Player positions plus the belief about the mover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeliefBoard {
    positions: PlayerMap<NodeId>,
    mover: PlayerId,
    belief: NodeId,
    candidates: SmallVec<[NodeId; 8]>,
    excluded: OrdSet<NodeId>,
}

impl BeliefBoard {
    /// Create a board from starting positions.
    ///
    /// The belief starts on the mover's starting node.
    #[must_use]
    pub fn new(positions: PlayerMap<NodeId>, mover: PlayerId) -> Self {
        assert!(positions.contains(mover), "mover {mover} has no position");

        let belief = positions[mover];
        Self {
            positions,
            mover,
            belief,
            candidates: SmallVec::from_slice(&[belief]),
            excluded: OrdSet::new(),
        }
    }

    /// The mover's player ID.
    #[must_use]
    pub fn mover(&self) -> PlayerId {
        self.mover
    }

    /// Number of players on the board.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.positions.player_count()
    }

    /// True position of `player`.
    #[must_use]
    pub fn actual(&self, player: PlayerId) -> NodeId {
        self.positions[player]
    }

    /// Current belief node.
    #[must_use]
    pub fn belief(&self) -> NodeId {
        self.belief
    }

    /// Position of `player` under `viewpoint`.
    #[must_use]
    pub fn position(&self, player: PlayerId, viewpoint: Viewpoint) -> NodeId {
        if player == self.mover && viewpoint == Viewpoint::Belief {
            self.belief
        } else {
            self.positions[player]
        }
    }

    /// Remaining candidates behind the belief, ascending.
    #[must_use]
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    /// Whether `node` has been ruled out since the last reveal.
    #[must_use]
    pub fn is_excluded(&self, node: NodeId) -> bool {
        self.excluded.contains(&node)
    }

    /// Pursuers and their positions in turn order.
    pub fn pursuers(&self) -> impl Iterator<Item = (PlayerId, NodeId)> + '_ {
        let mover = self.mover;
        self.positions
            .iter()
            .filter(move |(p, _)| *p != mover)
            .map(|(p, &n)| (p, n))
    }

    /// Whether any pursuer stands on `node`.
    #[must_use]
    pub fn is_pursuer_at(&self, node: NodeId) -> bool {
        self.pursuers().any(|(_, n)| n == node)
    }

    // === Mutation ===

    /// Move `player`'s true position to the move's destination.
    pub fn move_actual(&mut self, player: PlayerId, mv: &Move) {
        self.positions[player] = mv.destination();
    }

    /// Move the belief to the move's destination.
    ///
    /// Used when a pursuer-rooted rollout simulates the mover without
    /// touching its true position.
    pub fn move_belief(&mut self, mv: &Move) {
        self.belief = mv.destination();
        self.candidates = SmallVec::from_slice(&[self.belief]);
    }

    /// Apply `mv` for `player` under `viewpoint`.
    pub fn move_player(&mut self, player: PlayerId, mv: &Move, viewpoint: Viewpoint) {
        if player == self.mover && viewpoint == Viewpoint::Belief {
            self.move_belief(mv);
        } else {
            self.move_actual(player, mv);
        }
    }

    /// Update the belief after the mover moved with `disclosed`.
    ///
    /// Under `Viewpoint::Belief` the belief already is the simulated mover,
    /// so only the reveal bookkeeping changes.
    pub fn recompute_belief(
        &mut self,
        board: &dyn Board,
        disclosed: Transport,
        reveal: bool,
        viewpoint: Viewpoint,
    ) {
        if reveal {
            self.excluded = OrdSet::new();
        }
        match viewpoint {
            Viewpoint::Belief => {
                self.candidates = SmallVec::from_slice(&[self.belief]);
            }
            Viewpoint::Actual if reveal => {
                self.belief = self.positions[self.mover];
                self.candidates = SmallVec::from_slice(&[self.belief]);
                tracing::debug!(node = %self.belief, "mover revealed");
            }
            Viewpoint::Actual => {
                let prior = self.belief;
                self.candidates = board
                    .reachable(prior, disclosed)
                    .into_iter()
                    .filter(|&n| self.admits(n))
                    .collect();

                match self.best_candidate(board) {
                    Some(node) => self.belief = node,
                    None => {
                        tracing::debug!(%prior, %disclosed, "no belief candidate left");
                        self.settle_near(board, prior);
                    }
                }
            }
        }
    }

    /// A pursuer landed on `node`; rule it out as the mover's position.
    ///
    /// Under `Viewpoint::Belief` the belief is the simulated mover, so a
    /// pursuer on it is a capture rather than new information.
    pub fn exclude_node(&mut self, board: &dyn Board, node: NodeId, viewpoint: Viewpoint) {
        if viewpoint == Viewpoint::Belief {
            return;
        }
        let was_belief = self.belief == node;
        if !was_belief && !self.candidates.contains(&node) {
            return;
        }

        self.excluded.insert(node);
        self.candidates.retain(|n| *n != node);

        if was_belief {
            if self.candidates.is_empty() {
                // Widen to everything one step from the falsified node.
                self.candidates = board
                    .reachable(node, Transport::ConcealedFare)
                    .into_iter()
                    .filter(|&n| self.admits(n))
                    .collect();
            }
            match self.best_candidate(board) {
                Some(next) => self.belief = next,
                None => {
                    tracing::debug!(%node, "belief falsified with no candidate left");
                    self.settle_near(board, node);
                }
            }
        }
    }

    // === Queries ===

    /// Whether any pursuer shares the mover's position under `viewpoint`.
    #[must_use]
    pub fn any_pursuer_at(&self, viewpoint: Viewpoint) -> bool {
        self.is_pursuer_at(self.position(self.mover, viewpoint))
    }

    /// Whether `pursuer` stands on the mover under `viewpoint`.
    #[must_use]
    pub fn pursuer_at_mover(&self, pursuer: PlayerId, viewpoint: Viewpoint) -> bool {
        pursuer != self.mover && self.positions[pursuer] == self.position(self.mover, viewpoint)
    }

    /// Mean graph distance from the mover to the pursuers.
    ///
    /// `side` picks which links count. Pursuers the mover cannot reach are
    /// left out; `None` when none can be reached.
    #[must_use]
    pub fn average_distance(&self, board: &dyn Board, side: Side, viewpoint: Viewpoint) -> Option<f64> {
        let origin = self.position(self.mover, viewpoint);
        let field = distance_field(board, &[origin], side, None);

        let (sum, count) = self
            .pursuers()
            .filter_map(|(_, n)| field.get(&n))
            .fold((0u32, 0u32), |(sum, count), &d| (sum + d, count + 1));

        (count > 0).then(|| f64::from(sum) / f64::from(count))
    }

    /// Every move `player` can make from its position under `viewpoint`.
    ///
    /// One move per held ticket and adjacent node; the mover additionally
    /// gets a concealed-fare move to every node any link reaches while it
    /// holds a black fare. Nodes occupied by a pursuer other than `player`
    /// are never destinations. Sorted and free of duplicates.
    #[must_use]
    pub fn legal_moves(
        &self,
        board: &dyn Board,
        player: PlayerId,
        viewpoint: Viewpoint,
        tickets: &Tickets,
    ) -> Vec<Move> {
        let origin = self.position(player, viewpoint);
        let mut moves = BTreeSet::new();

        for transport in Transport::PUBLIC {
            if !tickets.has(transport) {
                continue;
            }
            for &dest in board.neighbors(origin, transport) {
                if !self.blocked_for(player, dest) {
                    moves.insert(Move::new(transport, dest));
                }
            }
        }

        if player == self.mover && tickets.has(Transport::ConcealedFare) {
            for dest in board.reachable(origin, Transport::ConcealedFare) {
                if !self.blocked_for(player, dest) {
                    moves.insert(Move::new(Transport::ConcealedFare, dest));
                }
            }
        }

        moves.into_iter().collect()
    }

    // === Helpers ===

    fn blocked_for(&self, player: PlayerId, node: NodeId) -> bool {
        self.pursuers().any(|(p, n)| p != player && n == node)
    }

    fn admits(&self, node: NodeId) -> bool {
        !self.is_pursuer_at(node) && !self.excluded.contains(&node)
    }

    /// Put the belief on the node nearest `origin` (lowest id on ties) that
    /// no pursuer holds, preferring nodes not yet ruled out.
    fn settle_near(&mut self, board: &dyn Board, origin: NodeId) {
        let field = distance_field(board, &[origin], Side::Mover, None);
        let nearest = |ok: &dyn Fn(NodeId) -> bool| {
            field
                .iter()
                .filter(|(n, _)| ok(**n))
                .min_by_key(|(n, d)| (**d, **n))
                .map(|(n, _)| *n)
        };

        let next = nearest(&|n| self.admits(n)).or_else(|| nearest(&|n| !self.is_pursuer_at(n)));
        match next {
            Some(node) => {
                self.belief = node;
                self.candidates = SmallVec::from_slice(&[node]);
            }
            None => tracing::debug!(%origin, "every node near the mover is held by a pursuer"),
        }
    }

    fn best_candidate(&self, board: &dyn Board) -> Option<NodeId> {
        if self.candidates.len() <= 1 {
            return self.candidates.first().copied();
        }

        let sources: SmallVec<[NodeId; 8]> = self.pursuers().map(|(_, n)| n).collect();
        let field = distance_field(board, &sources, Side::Pursuer, None);
        let gap = |n: &NodeId| field.get(n).copied().unwrap_or(u32::MAX);

        self.candidates
            .iter()
            .copied()
            .max_by(|a, b| gap(a).cmp(&gap(b)).then_with(|| b.cmp(a)))
    }
}
