//! The frozen view of the player a search was started for.

use serde::{Deserialize, Serialize};

use crate::board::Viewpoint;
use crate::core::PlayerId;
use crate::roster::Roster;

/// Snapshot of the invoking player's side and heuristics, taken when a
/// search starts.
///
/// Every state forked from the search root carries the same context, so a
/// search stays consistent even if the live roster changes underneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchContext {
    invoking_player: PlayerId,
    is_mover: bool,
    reward_shaping: bool,
    move_filtering: bool,
}

impl SearchContext {
    /// Capture `player`'s side and policy flags from `roster`.
    #[must_use]
    pub fn snapshot(roster: &Roster, player: PlayerId) -> Self {
        let participant = roster.get(player);
        let flags = participant.flags();
        Self {
            invoking_player: player,
            is_mover: participant.is_mover(),
            reward_shaping: flags.reward_shaping,
            move_filtering: flags.move_filtering,
        }
    }

    #[must_use]
    pub fn invoking_player(&self) -> PlayerId {
        self.invoking_player
    }

    #[must_use]
    pub fn is_mover(&self) -> bool {
        self.is_mover
    }

    #[must_use]
    pub fn reward_shaping(&self) -> bool {
        self.reward_shaping
    }

    #[must_use]
    pub fn move_filtering(&self) -> bool {
        self.move_filtering
    }

    /// How the mover is seen from inside this search.
    ///
    /// A pursuer-rooted search never learns the mover's true node, so the
    /// mover is simulated on the belief.
    #[must_use]
    pub fn mover_viewpoint(&self) -> Viewpoint {
        if self.is_mover {
            Viewpoint::Actual
        } else {
            Viewpoint::Belief
        }
    }
}
