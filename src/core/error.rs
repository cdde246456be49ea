//! Error types for rules, ledger, configuration, and snapshots.
//!
//! `RulesError` and `LedgerError` describe contract violations. The fatal
//! entry points (`MatchState::apply_action`, `MatchState::skip`) panic with
//! their message; the `try_*` variants hand them back before any state has
//! been touched.

use thiserror::Error;

use super::entity::NodeId;
use super::moves::Move;
use super::player::PlayerId;

/// A move or turn operation the rules do not allow.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("{mv} is not a legal move for {player}")]
    IllegalMove { player: PlayerId, mv: Move },

    #[error("the match is already over")]
    MatchOver,

    #[error("double move unavailable: {0}")]
    DoubleMoveUnavailable(&'static str),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// A ledger write that would break chronological order or the two-entry
/// limit per round and player.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{player} is out of range for a {player_count}-player ledger")]
    PlayerOutOfRange { player: PlayerId, player_count: usize },

    #[error("{player} already has two moves recorded in round {round}")]
    SubmoveLimit { round: u32, player: PlayerId },

    #[error("round {round} precedes the last recorded round {last}")]
    OutOfOrder { round: u32, last: u32 },
}

/// Invalid match configuration or roster.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("round cap must be at least 1")]
    ZeroRoundCap,

    #[error("reveal round {round} is outside 1..={cap}")]
    RevealRoundOutOfRange { round: u32, cap: u32 },

    #[error("pursuers cannot hold black-fare tickets")]
    PursuerBlackFares,

    #[error("expected exactly one mover, found {0}")]
    MoverCount(usize),

    #[error("a match needs at least one pursuer")]
    NoPursuers,

    #[error("{0} players exceeds the 255-player limit")]
    TooManyPlayers(usize),

    #[error("{first} and {second} both start on node {node}")]
    SharedStart {
        node: NodeId,
        first: PlayerId,
        second: PlayerId,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to encode or restore a match snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("snapshot holds an invalid match: {0}")]
    Config(#[from] ConfigError),

    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transport;

    #[test]
    fn test_rules_error_message() {
        let err = RulesError::IllegalMove {
            player: PlayerId::new(2),
            mv: Move::new(Transport::Bus, NodeId(14)),
        };
        assert_eq!(err.to_string(), "bus to 14 is not a legal move for Player 2");
    }

    #[test]
    fn test_ledger_error_converts() {
        let err: RulesError = LedgerError::SubmoveLimit {
            round: 4,
            player: PlayerId::new(0),
        }
        .into();
        assert_eq!(err.to_string(), "Player 0 already has two moves recorded in round 4");
    }
}
