//! Participants of a match.
//!
//! ## Overview
//!
//! A `Roster` seats exactly one mover and one or more pursuers in turn
//! order. Each `Participant` carries its ticket wallet; the mover also
//! carries its double-move cards and the per-round guard on playing them.
//! Black-fare tickets live in the mover's wallet.
//!
//! Rosters are plain data. Cloning one for a rollout copies every wallet,
//! and `reset` restores all of them to their starting values.

mod participant;

pub use participant::{MoverResources, Operator, Participant, PolicyFlags};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, NodeId, PlayerId, PlayerMap, Tickets};

/// Participants in turn order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    seats: PlayerMap<Participant>,
    mover: PlayerId,
}

impl Roster {
    /// Seat `participants` in the given turn order.
    ///
    /// Fails unless there is exactly one mover, at least one pursuer, at
    /// most 255 seats, and no two participants share a starting node.
    pub fn new(participants: Vec<Participant>) -> Result<Self, ConfigError> {
        if participants.len() > 255 {
            return Err(ConfigError::TooManyPlayers(participants.len()));
        }

        let movers: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_mover())
            .map(|(i, _)| i)
            .collect();
        if movers.len() != 1 {
            return Err(ConfigError::MoverCount(movers.len()));
        }
        if participants.len() < 2 {
            return Err(ConfigError::NoPursuers);
        }

        let mut starts = FxHashMap::default();
        for (i, p) in participants.iter().enumerate() {
            let seat = PlayerId::new(i as u8);
            if let Some(first) = starts.insert(p.start(), seat) {
                return Err(ConfigError::SharedStart {
                    node: p.start(),
                    first,
                    second: seat,
                });
            }
        }

        Ok(Self {
            mover: PlayerId::new(movers[0] as u8),
            seats: PlayerMap::from_vec(participants),
        })
    }

    /// The mover's seat.
    #[must_use]
    pub fn mover(&self) -> PlayerId {
        self.mover
    }

    #[must_use]
    pub fn is_mover(&self, player: PlayerId) -> bool {
        player == self.mover
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.player_count()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &Participant {
        &self.seats[player]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut Participant {
        &mut self.seats[player]
    }

    #[must_use]
    pub fn mover_participant(&self) -> &Participant {
        &self.seats[self.mover]
    }

    pub fn mover_participant_mut(&mut self) -> &mut Participant {
        &mut self.seats[self.mover]
    }

    #[must_use]
    pub fn tickets(&self, player: PlayerId) -> &Tickets {
        self.seats[player].tickets()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Participant)> {
        self.seats.iter()
    }

    /// Pursuers in turn order.
    pub fn pursuers(&self) -> impl Iterator<Item = (PlayerId, &Participant)> {
        let mover = self.mover;
        self.seats.iter().filter(move |(p, _)| *p != mover)
    }

    /// Starting nodes in turn order.
    #[must_use]
    pub fn starts(&self) -> PlayerMap<NodeId> {
        PlayerMap::new(self.player_count(), |p| self.seats[p].start())
    }

    /// Restore every wallet and the mover's resources.
    pub fn reset(&mut self) {
        for (_, participant) in self.seats.iter_mut() {
            participant.reset();
        }
    }
}
