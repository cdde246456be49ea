//! Append-only move history backed by a persistent vector.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

use crate::core::{LedgerError, Move, PlayerId};

/// Most entries a single player may have in one round.
pub const MAX_MOVES_PER_ROUND: u8 = 2;

/// One recorded move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Round the move was made in.
    pub round: u32,
    /// Who moved.
    pub player: PlayerId,
    /// 0 for the first move of the round, 1 for the second half of a double move.
    pub submove: u8,
    /// The move itself.
    pub mv: Move,
}

/// Chronological, append-only record of moves.
///
/// Uses `im::Vector` so cloning a match state for a rollout shares the
/// history instead of copying it.
///
/// ```
/// use rust_pursuit::core::{Move, NodeId, PlayerId, Transport};
/// use rust_pursuit::ledger::MoveLedger;
///
/// let mut ledger = MoveLedger::new(3);
/// let mover = PlayerId::new(0);
///
/// assert_eq!(ledger.append(1, mover, Move::new(Transport::Taxi, NodeId(8))), Ok(0));
/// assert_eq!(ledger.append(1, mover, Move::new(Transport::Bus, NodeId(19))), Ok(1));
/// assert!(ledger.append(1, mover, Move::new(Transport::Taxi, NodeId(20))).is_err());
/// assert_eq!(ledger.moves_remaining_for(1, mover), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLedger {
    player_count: usize,
    entries: Vector<LedgerEntry>,
    reveals: OrdSet<u32>,
}

impl MoveLedger {
    /// Create an empty ledger for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");

        Self {
            player_count,
            entries: Vector::new(),
            reveals: OrdSet::new(),
        }
    }

    /// Record a move and return the submove index it was given.
    ///
    /// Fails exactly when `check_append` does, and then writes nothing.
    pub fn append(&mut self, round: u32, player: PlayerId, mv: Move) -> Result<u8, LedgerError> {
        let submove = self.check_append(round, player)?;
        self.entries.push_back(LedgerEntry {
            round,
            player,
            submove,
            mv,
        });
        Ok(submove)
    }

    /// The submove index a move by `player` in `round` would get.
    ///
    /// Rejects an unknown player, a round earlier than the last recorded
    /// one, and a third move for the same round and player.
    pub fn check_append(&self, round: u32, player: PlayerId) -> Result<u8, LedgerError> {
        if player.index() >= self.player_count {
            return Err(LedgerError::PlayerOutOfRange {
                player,
                player_count: self.player_count,
            });
        }
        if let Some(last) = self.last_round().filter(|&last| round < last) {
            return Err(LedgerError::OutOfOrder { round, last });
        }

        let submove = self.count_for(round, player);
        if submove >= MAX_MOVES_PER_ROUND {
            return Err(LedgerError::SubmoveLimit { round, player });
        }
        Ok(submove)
    }

    /// Number of moves recorded for `player` in `round`.
    #[must_use]
    pub fn count_for(&self, round: u32, player: PlayerId) -> u8 {
        // Entries are chronological, so everything for `round` is at the tail.
        self.entries
            .iter()
            .rev()
            .take_while(|e| e.round >= round)
            .filter(|e| e.round == round && e.player == player)
            .count() as u8
    }

    /// How many more moves `player` may record in `round`.
    #[must_use]
    pub fn moves_remaining_for(&self, round: u32, player: PlayerId) -> u8 {
        MAX_MOVES_PER_ROUND.saturating_sub(self.count_for(round, player))
    }

    /// Note that the mover surfaced in `round`.
    pub fn mark_reveal(&mut self, round: u32) {
        self.reveals.insert(round);
    }

    /// Whether the mover surfaced in `round`.
    #[must_use]
    pub fn is_reveal(&self, round: u32) -> bool {
        self.reveals.contains(&round)
    }

    /// Recorded reveal rounds in ascending order.
    pub fn reveal_rounds(&self) -> impl Iterator<Item = u32> + '_ {
        self.reveals.iter().copied()
    }

    /// Iterate over entries in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Entries recorded in `round`, chronologically.
    pub fn for_round(&self, round: u32) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| e.round == round)
    }

    /// Entries in table order: round, then submove, then player.
    ///
    /// The move value never takes part in the ordering, so two identical
    /// moves in the same cell can't collapse into one.
    #[must_use]
    pub fn table_order(&self) -> Vec<LedgerEntry> {
        let mut rows: Vec<_> = self.entries.iter().copied().collect();
        rows.sort_by_key(|e| (e.round, e.submove, e.player));
        rows
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Highest round with a recorded move.
    #[must_use]
    pub fn last_round(&self) -> Option<u32> {
        self.entries.last().map(|e| e.round)
    }

    /// Number of players the ledger accepts.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Number of recorded moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
