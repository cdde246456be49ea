//! Checkpoints of the authoritative match timeline.
//!
//! A snapshot is plain data: config, roster, positions, ledger, turn
//! pointers and RNG position. The board and the resource policy are not
//! part of it and are supplied again on restore. Search context is never
//! saved; a restored match is always live.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{BeliefBoard, Board};
use crate::core::{GameRng, GameRngState, MatchConfig, PlayerId, SnapshotError, Transport};
use crate::ledger::MoveLedger;
use crate::policy::ResourcePolicy;
use crate::roster::Roster;

use super::state::{MatchState, MoverTurn};

/// Serializable checkpoint of a `MatchState`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub config: MatchConfig,
    pub roster: Roster,
    pub positions: BeliefBoard,
    pub ledger: MoveLedger,
    pub round: u32,
    pub current: PlayerId,
    pub previous: PlayerId,
    pub last_disclosed: Option<Transport>,
    mover_turn: MoverTurn,
    pub rng: GameRngState,
}

impl MatchSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn check(&self) -> Result<(), SnapshotError> {
        self.config.validate()?;
        let players = self.roster.player_count();
        if self.positions.player_count() != players || self.ledger.player_count() != players {
            return Err(SnapshotError::Inconsistent("player counts differ"));
        }
        let mover = self.roster.mover();
        if self.positions.mover() != mover {
            return Err(SnapshotError::Inconsistent("mover seats differ"));
        }
        if mover.index() >= players {
            return Err(SnapshotError::Inconsistent("mover seat out of range"));
        }
        let movers = self.roster.iter().filter(|(_, p)| p.is_mover()).count();
        if movers != 1 || !self.roster.get(mover).is_mover() {
            return Err(SnapshotError::Inconsistent("mover seat holds a pursuer"));
        }
        if self.current.index() >= players || self.previous.index() >= players {
            return Err(SnapshotError::Inconsistent("turn pointer out of range"));
        }
        if self.round == 0 {
            return Err(SnapshotError::Inconsistent("round numbers start at 1"));
        }
        if self.ledger.last_round().is_some_and(|last| last > self.round) {
            return Err(SnapshotError::Inconsistent("ledger runs ahead of the round"));
        }
        Ok(())
    }
}

impl MatchState {
    /// Checkpoint this state.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            config: self.config.as_ref().clone(),
            roster: self.roster.clone(),
            positions: self.positions.clone(),
            ledger: self.ledger.clone(),
            round: self.round,
            current: self.current,
            previous: self.previous,
            last_disclosed: self.last_disclosed,
            mover_turn: self.mover_turn,
            rng: self.rng.state(),
        }
    }

    /// Resume a match from `snapshot` on `board`.
    pub fn from_snapshot(
        snapshot: MatchSnapshot,
        board: Arc<dyn Board>,
        resource_policy: Arc<dyn ResourcePolicy>,
    ) -> Result<Self, SnapshotError> {
        snapshot.check()?;
        Ok(Self {
            config: Arc::new(snapshot.config),
            board,
            resource_policy,
            roster: snapshot.roster,
            positions: snapshot.positions,
            ledger: snapshot.ledger,
            round: snapshot.round,
            current: snapshot.current,
            previous: snapshot.previous,
            last_disclosed: snapshot.last_disclosed,
            mover_turn: snapshot.mover_turn,
            search: None,
            rng: GameRng::from_state(&snapshot.rng),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TransitMap;
    use crate::core::{Move, NodeId};
    use crate::policy::FixedResources;
    use crate::rules::MatchBuilder;

    fn line() -> Arc<TransitMap> {
        Arc::new(
            TransitMap::new()
                .link(1, 2, Transport::Taxi)
                .link(2, 3, Transport::Taxi)
                .link(3, 4, Transport::Taxi)
                .link(4, 5, Transport::Taxi),
        )
    }

    fn started() -> MatchState {
        MatchBuilder::default()
            .mover("Mr. X", NodeId(1))
            .pursuer("Red", NodeId(5))
            .resource_policy(FixedResources::never())
            .seed(7)
            .build(line())
            .unwrap()
    }

    #[test]
    fn test_snapshot_bytes_restore_state() {
        let mut state = started();
        state.apply_action(Move::new(Transport::Taxi, NodeId(2)));
        state.apply_action(Move::new(Transport::Taxi, NodeId(4)));

        let bytes = state.snapshot().to_bytes().unwrap();
        let decoded = MatchSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, state.snapshot());

        let restored =
            MatchState::from_snapshot(decoded, line(), Arc::new(FixedResources::never())).unwrap();
        assert_eq!(restored.round(), 2);
        assert_eq!(restored.ledger().len(), 2);
        assert_eq!(restored.positions().actual(PlayerId::new(0)), NodeId(2));
        assert_eq!(restored.legal_moves(), state.legal_moves());
    }

    #[test]
    fn test_snapshot_drops_search_context() {
        let mut state = started();
        let fork = state.search_fork();
        let restored =
            MatchState::from_snapshot(fork.snapshot(), line(), Arc::new(FixedResources::never()))
                .unwrap();
        assert!(!restored.in_search());
    }

    #[test]
    fn test_rejects_inconsistent_snapshot() {
        let mut snapshot = started().snapshot();
        snapshot.current = PlayerId::new(9);

        let result = MatchState::from_snapshot(snapshot, line(), Arc::new(FixedResources::never()));
        assert!(matches!(result, Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_round_behind_ledger() {
        let mut state = started();
        state.apply_action(Move::new(Transport::Taxi, NodeId(2)));
        state.apply_action(Move::new(Transport::Taxi, NodeId(4)));
        state.apply_action(Move::new(Transport::Taxi, NodeId(3)));
        let mut snapshot = state.snapshot();
        assert_eq!(snapshot.ledger.last_round(), Some(2));
        snapshot.round = 1;

        let result = MatchState::from_snapshot(snapshot, line(), Arc::new(FixedResources::never()));
        assert!(matches!(result, Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_rejects_mover_seat_out_of_range() {
        let snapshot = started().snapshot();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        value["roster"]["mover"] = serde_json::json!(7);
        value["positions"]["mover"] = serde_json::json!(7);
        let tampered: MatchSnapshot = serde_json::from_value(value).unwrap();

        let result = MatchState::from_snapshot(tampered, line(), Arc::new(FixedResources::never()));
        assert!(matches!(result, Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(matches!(
            MatchSnapshot::from_bytes(&[0xff, 0x01]),
            Err(SnapshotError::Codec(_))
        ));
    }
}
