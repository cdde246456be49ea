//! Assembling a match.

use std::sync::Arc;

use crate::board::Board;
use crate::core::{ConfigError, GameRng, MatchConfig, NodeId};
use crate::policy::{MoveFiltering, ResourcePolicy};
use crate::roster::{Participant, Roster};

use super::state::MatchState;

/// Builder for a `MatchState`.
///
/// Seats are taken in the order they are added. `mover` and `pursuer`
/// equip participants from the builder's config; use `participant` for a
/// custom seat.
///
/// ```
/// use std::sync::Arc;
/// use rust_pursuit::board::TransitMap;
/// use rust_pursuit::core::{MatchConfig, NodeId, Transport};
/// use rust_pursuit::rules::MatchBuilder;
///
/// let map = TransitMap::new()
///     .link(1, 2, Transport::Taxi)
///     .link(2, 3, Transport::Taxi);
///
/// let state = MatchBuilder::new(MatchConfig::default())
///     .mover("Mr. X", NodeId(1))
///     .pursuer("Red", NodeId(3))
///     .seed(42)
///     .build(Arc::new(map))
///     .unwrap();
///
/// assert_eq!(state.round(), 1);
/// assert_eq!(state.legal_moves().len(), 1);
/// ```
pub struct MatchBuilder {
    config: MatchConfig,
    participants: Vec<Participant>,
    resource_policy: Arc<dyn ResourcePolicy>,
    seed: u64,
}

impl Default for MatchBuilder {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl MatchBuilder {
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            participants: Vec::new(),
            resource_policy: Arc::new(MoveFiltering::default()),
            seed: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Seat the mover.
    #[must_use]
    pub fn mover(self, name: &str, start: NodeId) -> Self {
        let seat = Participant::mover(name, start, &self.config);
        self.participant(seat)
    }

    /// Seat a pursuer.
    #[must_use]
    pub fn pursuer(self, name: &str, start: NodeId) -> Self {
        let seat = Participant::pursuer(name, start, &self.config);
        self.participant(seat)
    }

    #[must_use]
    pub fn participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    /// Policy deciding double moves and black fares. Defaults to
    /// `MoveFiltering`.
    #[must_use]
    pub fn resource_policy(mut self, policy: impl ResourcePolicy + 'static) -> Self {
        self.resource_policy = Arc::new(policy);
        self
    }

    /// Share an existing policy instance.
    #[must_use]
    pub fn shared_resource_policy(mut self, policy: Arc<dyn ResourcePolicy>) -> Self {
        self.resource_policy = policy;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the config and roster and start the match on `board`.
    pub fn build(self, board: Arc<dyn Board>) -> Result<MatchState, ConfigError> {
        self.config.validate()?;
        let roster = Roster::new(self.participants)?;
        tracing::debug!(
            players = roster.player_count(),
            mover = %roster.mover(),
            seed = self.seed,
            "match created"
        );

        Ok(MatchState::new(
            Arc::new(self.config),
            board,
            self.resource_policy,
            roster,
            GameRng::new(self.seed),
        ))
    }
}
