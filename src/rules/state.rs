//! The turn state machine.
//!
//! ## Turn order
//!
//! Players act in roster order. The round advances once the last seat has
//! acted. Right after the mover acts, the resource policy may play a
//! double-move card: the turn pointer goes back to the mover, the round is
//! restored to the one the mover acted in, and the pursuers' turns for that
//! round are skipped.
//!
//! ## Search
//!
//! A state in search mode carries a frozen `SearchContext`. It writes
//! nothing to the ledger, and when the search was started by a pursuer it
//! simulates the mover on the belief node instead of the true one, so a
//! pursuer-side rollout cannot exploit information it does not have.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{BeliefBoard, Board, Viewpoint};
use crate::core::{GameRng, MatchConfig, Move, PlayerId, RulesError, Tickets, Transport};
use crate::ledger::MoveLedger;
use crate::policy::{ResourcePolicy, ResourceView};
use crate::roster::Roster;

use super::search::SearchContext;

/// How a finished match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A pursuer stands on the mover.
    PursuersWin,
    /// The round cap passed without a capture.
    MoverEscaped,
}

/// Where the state machine is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    AwaitingAction { player: PlayerId, round: u32 },
    Terminal(Outcome),
}

/// Moves the mover has made in one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MoverTurn {
    pub(crate) round: u32,
    pub(crate) moves: u8,
}

/// A match in progress.
///
/// Cheap to clone: the board and the resource policy are shared, the ledger
/// and exclusion set are persistent collections, and everything else is
/// small plain data.
#[derive(Clone)]
pub struct MatchState {
    pub(crate) config: Arc<MatchConfig>,
    pub(crate) board: Arc<dyn Board>,
    pub(crate) resource_policy: Arc<dyn ResourcePolicy>,
    pub(crate) roster: Roster,
    pub(crate) positions: BeliefBoard,
    pub(crate) ledger: MoveLedger,
    pub(crate) round: u32,
    pub(crate) current: PlayerId,
    pub(crate) previous: PlayerId,
    pub(crate) last_disclosed: Option<Transport>,
    pub(crate) mover_turn: MoverTurn,
    pub(crate) search: Option<SearchContext>,
    pub(crate) rng: GameRng,
}

impl MatchState {
    /// Start a match in round 1 with the first seat to act.
    ///
    /// `roster` must already be validated; `MatchBuilder` is the checked
    /// way in.
    pub(crate) fn new(
        config: Arc<MatchConfig>,
        board: Arc<dyn Board>,
        resource_policy: Arc<dyn ResourcePolicy>,
        roster: Roster,
        rng: GameRng,
    ) -> Self {
        let positions = BeliefBoard::new(roster.starts(), roster.mover());
        let ledger = MoveLedger::new(roster.player_count());
        let first = PlayerId::new(0);
        let last = PlayerId::new((roster.player_count() - 1) as u8);
        Self {
            config,
            board,
            resource_policy,
            roster,
            positions,
            ledger,
            round: 1,
            current: first,
            previous: last,
            last_disclosed: None,
            mover_turn: MoverTurn::default(),
            search: None,
            rng,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Player to act.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Player who acted last.
    #[must_use]
    pub fn previous_player(&self) -> PlayerId {
        self.previous
    }

    #[must_use]
    pub fn mover(&self) -> PlayerId {
        self.roster.mover()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roster.player_count()
    }

    /// Transport the mover used last, as announced to the pursuers.
    #[must_use]
    pub fn last_disclosed(&self) -> Option<Transport> {
        self.last_disclosed
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &dyn Board {
        self.board.as_ref()
    }

    #[must_use]
    pub fn positions(&self) -> &BeliefBoard {
        &self.positions
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    #[must_use]
    pub fn tickets(&self, player: PlayerId) -> &Tickets {
        self.roster.tickets(player)
    }

    /// The state's RNG, for forking rollout generators.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn search_context(&self) -> Option<SearchContext> {
        self.search
    }

    #[must_use]
    pub fn in_search(&self) -> bool {
        self.search.is_some()
    }

    /// Whether the current round reveals the mover.
    #[must_use]
    pub fn is_reveal_round(&self) -> bool {
        self.config.is_reveal_round(self.round)
    }

    /// Moves the mover has made in `round`.
    #[must_use]
    pub fn mover_moves_in(&self, round: u32) -> u8 {
        if self.mover_turn.round == round {
            self.mover_turn.moves
        } else {
            0
        }
    }

    // === Viewpoints ===

    /// How the mover is seen by this state: on the belief inside a
    /// pursuer-rooted search, on its true node otherwise.
    #[must_use]
    pub fn terminal_viewpoint(&self) -> Viewpoint {
        self.search
            .map_or(Viewpoint::Actual, |ctx| ctx.mover_viewpoint())
    }

    /// Viewpoint the current player's moves are generated and applied
    /// under. Pursuers always move from their true nodes.
    #[must_use]
    pub fn move_viewpoint(&self) -> Viewpoint {
        if self.current == self.roster.mover() {
            self.terminal_viewpoint()
        } else {
            Viewpoint::Actual
        }
    }

    // === Termination ===

    /// A pursuer is on the mover, or the round cap has passed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// How the match ended, if it has. A capture in the final round still
    /// counts as a pursuer win.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.positions.any_pursuer_at(self.terminal_viewpoint()) {
            Some(Outcome::PursuersWin)
        } else if self.round > self.config.round_cap {
            Some(Outcome::MoverEscaped)
        } else {
            None
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.outcome() {
            Some(outcome) => Phase::Terminal(outcome),
            None => Phase::AwaitingAction {
                player: self.current,
                round: self.round,
            },
        }
    }

    // === Moves ===

    /// Every move the current player may make. Empty once the match is over.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.positions.legal_moves(
            self.board.as_ref(),
            self.current,
            self.move_viewpoint(),
            self.roster.tickets(self.current),
        )
    }

    /// Legal moves with the resource policy's black-fare decision applied.
    ///
    /// For the mover, concealed-fare moves are dropped when the policy
    /// declines to spend a black fare, unless they are the only moves left.
    pub fn rollout_moves(&mut self) -> Vec<Move> {
        let moves = self.legal_moves();
        let concealed = moves.iter().filter(|m| m.transport().is_concealed()).count();
        if self.current != self.roster.mover() || concealed == 0 || concealed == moves.len() {
            return moves;
        }

        let mover = self.roster.mover_participant();
        let Some(resources) = mover.resources() else {
            return moves;
        };
        let context = self
            .search
            .unwrap_or_else(|| SearchContext::snapshot(&self.roster, self.current));
        let view = ResourceView {
            round: self.round,
            context,
            in_search: self.search.is_some(),
            config: &self.config,
            board: self.board.as_ref(),
            positions: &self.positions,
            resources,
            tickets: mover.tickets(),
            moves: &moves,
            viewpoint: self.terminal_viewpoint(),
        };
        if self.resource_policy.use_black_fare(&view, &mut self.rng) {
            return moves;
        }

        moves
            .into_iter()
            .filter(|m| !m.transport().is_concealed())
            .collect()
    }

    /// Apply `mv` for the current player.
    ///
    /// # Panics
    ///
    /// Panics if the match is over or `mv` is not in `legal_moves()`.
    pub fn apply_action(&mut self, mv: Move) {
        if let Err(err) = self.try_apply_action(mv) {
            panic!("{err}");
        }
    }

    /// Apply `mv` for the current player, rejecting it before any change
    /// if the match is over or the move is not legal.
    pub fn try_apply_action(&mut self, mv: Move) -> Result<(), RulesError> {
        if self.is_terminal() {
            return Err(RulesError::MatchOver);
        }
        let player = self.current;
        if !self.legal_moves().contains(&mv) {
            return Err(RulesError::IllegalMove { player, mv });
        }
        let acted_round = self.round;
        if self.search.is_none() {
            self.ledger.check_append(acted_round, player)?;
        }

        let is_mover = player == self.roster.mover();
        let viewpoint = self.move_viewpoint();
        let estimate = self.terminal_viewpoint();
        let reveal = is_mover && self.config.is_reveal_round(acted_round);

        self.positions.move_player(player, &mv, viewpoint);
        self.spend_ticket(player, mv.transport());

        if is_mover {
            self.last_disclosed = Some(mv.transport());
            self.positions
                .recompute_belief(self.board.as_ref(), mv.transport(), reveal, estimate);
            self.count_mover_move(acted_round);
        } else {
            self.positions
                .exclude_node(self.board.as_ref(), mv.destination(), estimate);
        }

        if self.search.is_none() {
            let submove = self.ledger.append(acted_round, player, mv)?;
            if reveal {
                self.ledger.mark_reveal(acted_round);
            }
            tracing::trace!(round = acted_round, %player, %mv, submove, "move recorded");
        }

        self.advance_turn();

        if is_mover {
            self.offer_double_move(acted_round);
        }
        Ok(())
    }

    /// Pass the current player's turn without a move.
    ///
    /// # Panics
    ///
    /// Panics if the match is over.
    pub fn skip(&mut self) {
        assert!(!self.is_terminal(), "{}", RulesError::MatchOver);
        tracing::trace!(round = self.round, player = %self.current, "turn skipped");
        self.advance_turn();
    }

    /// Play a double-move card for a mover who just moved.
    ///
    /// Live human movers are never offered a double move automatically;
    /// this is how they take one. The same guards apply as for the
    /// automatic trigger.
    pub fn declare_double_move(&mut self) -> Result<(), RulesError> {
        let mover = self.roster.mover();
        let count = self.roster.player_count();
        let acted_round = self.mover_turn.round;

        let just_moved = self.mover_turn.moves > 0
            && self.previous == mover
            && self.current == mover.next(count)
            && (self.round == acted_round
                || (mover.is_last(count) && self.round == acted_round + 1));
        // A last-seat mover in the final round has pushed the round past
        // the cap; the rewind brings it back.
        let captured = self.positions.any_pursuer_at(self.terminal_viewpoint());
        if captured || (self.is_terminal() && !just_moved) {
            return Err(RulesError::MatchOver);
        }
        if !just_moved {
            return Err(RulesError::DoubleMoveUnavailable("the mover has not just moved"));
        }
        if self.mover_moves_in(acted_round) >= 2 {
            return Err(RulesError::DoubleMoveUnavailable(
                "the mover already moved twice this round",
            ));
        }
        if !self.roster.mover_participant().has_double_move_card(acted_round) {
            return Err(RulesError::DoubleMoveUnavailable(
                "no double move card left for this round",
            ));
        }

        self.rewind_for_double_move(acted_round);
        Ok(())
    }

    /// Restore every wallet and the mover's cards to their starting values.
    pub fn restore_tickets(&mut self) {
        self.roster.reset();
    }

    // === Search ===

    /// Enter search mode on behalf of the current player.
    pub fn enter_search(&mut self) {
        let context = SearchContext::snapshot(&self.roster, self.current);
        tracing::trace!(player = %self.current, mover = context.is_mover(), "entering search");
        self.search = Some(context);
    }

    /// Leave search mode.
    pub fn exit_search(&mut self) {
        self.search = None;
    }

    /// Clone for a rollout, forking the RNG.
    ///
    /// Takes `&mut self` because forking advances the parent's fork counter.
    #[must_use]
    pub fn clone_state(&mut self) -> Self {
        let mut fork = self.clone();
        fork.rng = self.rng.fork();
        fork
    }

    /// Isolated search copy: a `clone_state` that is in search mode,
    /// keeping an existing context or snapshotting the current player.
    #[must_use]
    pub fn search_fork(&mut self) -> Self {
        let mut fork = self.clone_state();
        if fork.search.is_none() {
            fork.enter_search();
        }
        fork
    }

    // === Helpers ===

    fn spend_ticket(&mut self, player: PlayerId, transport: Transport) {
        self.roster.get_mut(player).tickets_mut().spend(transport);
        if player != self.roster.mover() && self.config.pursuer_tickets_to_mover {
            self.roster.mover_participant_mut().tickets_mut().gain(transport);
        }
    }

    fn count_mover_move(&mut self, round: u32) {
        if self.mover_turn.round == round {
            self.mover_turn.moves += 1;
        } else {
            self.mover_turn = MoverTurn { round, moves: 1 };
        }
    }

    fn advance_turn(&mut self) {
        let count = self.roster.player_count();
        self.previous = self.current;
        if self.current.is_last(count) {
            self.round += 1;
        }
        self.current = self.current.next(count);
    }

    fn offer_double_move(&mut self, acted_round: u32) {
        // Judged on the round the mover acted in: a last-seat mover has
        // already pushed the round past the cap, and the rewind restores it.
        if acted_round > self.config.round_cap
            || self.positions.any_pursuer_at(self.terminal_viewpoint())
        {
            return;
        }
        let mover_id = self.roster.mover();
        let mover = self.roster.mover_participant();
        if mover.is_human() && self.search.is_none() {
            return;
        }
        if self.mover_moves_in(acted_round) >= 2 || !mover.has_double_move_card(acted_round) {
            return;
        }
        let Some(resources) = mover.resources() else {
            return;
        };

        let viewpoint = self.terminal_viewpoint();
        let moves = self
            .positions
            .legal_moves(self.board.as_ref(), mover_id, viewpoint, mover.tickets());
        let context = self
            .search
            .unwrap_or_else(|| SearchContext::snapshot(&self.roster, mover_id));
        let view = ResourceView {
            round: acted_round,
            context,
            in_search: self.search.is_some(),
            config: &self.config,
            board: self.board.as_ref(),
            positions: &self.positions,
            resources,
            tickets: mover.tickets(),
            moves: &moves,
            viewpoint,
        };

        if self.resource_policy.use_double_move(&view, &mut self.rng) {
            self.rewind_for_double_move(acted_round);
        }
    }

    fn rewind_for_double_move(&mut self, acted_round: u32) {
        if let Some(resources) = self.roster.mover_participant_mut().resources_mut() {
            resources.spend_double_move(acted_round);
        }
        self.current = self.previous;
        self.round = acted_round;
        tracing::debug!(
            round = acted_round,
            in_search = self.search.is_some(),
            "mover plays a double move"
        );
    }
}

impl fmt::Debug for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchState")
            .field("round", &self.round)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("last_disclosed", &self.last_disclosed)
            .field("search", &self.search)
            .field("positions", &self.positions)
            .field("roster", &self.roster)
            .field("ledger_len", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TransitMap;
    use crate::core::{LedgerError, NodeId};
    use crate::policy::FixedResources;
    use crate::roster::{Operator, Participant};
    use crate::rules::MatchBuilder;

    const MOVER: PlayerId = PlayerId::new(0);
    const RED: PlayerId = PlayerId::new(1);

    fn taxi(node: u16) -> Move {
        Move::new(Transport::Taxi, NodeId(node))
    }

    /// Mover at 1 and one pursuer at 6 on a taxi line 1-2-3-4-5-6.
    fn line_match() -> MatchState {
        let map = (1..6).fold(TransitMap::new(), |map, n| map.link(n, n + 1, Transport::Taxi));
        MatchBuilder::new(MatchConfig::default())
            .mover("X", NodeId(1))
            .pursuer("Red", NodeId(6))
            .resource_policy(FixedResources::never())
            .seed(7)
            .build(Arc::new(map))
            .unwrap()
    }

    #[test]
    fn test_previous_starts_at_last_seat() {
        let state = line_match();
        assert_eq!(state.current_player(), MOVER);
        assert_eq!(state.previous_player(), RED);
    }

    #[test]
    fn test_last_seat_mover_cannot_declare_before_moving() {
        let map = (1..6).fold(TransitMap::new(), |map, n| map.link(n, n + 1, Transport::Taxi));
        let mut state = MatchBuilder::new(MatchConfig::default())
            .pursuer("Red", NodeId(6))
            .mover("X", NodeId(1))
            .resource_policy(FixedResources::never())
            .build(Arc::new(map))
            .unwrap();
        assert_eq!(state.previous_player(), state.mover());

        assert!(matches!(
            state.declare_double_move(),
            Err(RulesError::DoubleMoveUnavailable(_))
        ));
        assert_eq!(state.round(), 1);
    }

    #[test]
    fn test_last_seat_mover_double_moves_in_final_round() {
        let map = (1..6).fold(TransitMap::new(), |map, n| map.link(n, n + 1, Transport::Taxi));
        let config = MatchConfig::default()
            .with_round_cap(2)
            .with_reveal_rounds([2]);
        let mut state = MatchBuilder::new(config)
            .pursuer("Red", NodeId(6))
            .mover("X", NodeId(1))
            .resource_policy(FixedResources::always())
            .build(Arc::new(map))
            .unwrap();
        let mover = state.mover();

        state.apply_action(taxi(5));
        state.apply_action(taxi(2));
        assert_eq!((state.current_player(), state.round()), (mover, 1));
        state.apply_action(taxi(3));
        assert_eq!(state.round(), 2);

        state.apply_action(taxi(4));
        state.apply_action(taxi(2));
        assert_eq!((state.current_player(), state.round()), (mover, 2));
        assert!(!state.is_terminal());

        state.apply_action(taxi(1));
        assert_eq!(state.outcome(), Some(Outcome::MoverEscaped));
    }

    #[test]
    fn test_last_seat_human_declares_in_final_round() {
        let map = (1..6).fold(TransitMap::new(), |map, n| map.link(n, n + 1, Transport::Taxi));
        let config = MatchConfig::default()
            .with_round_cap(1)
            .with_reveal_rounds([1]);
        let human = Participant::mover("X", NodeId(1), &config).with_operator(Operator::Human);
        let mut state = MatchBuilder::new(config)
            .pursuer("Red", NodeId(6))
            .participant(human)
            .resource_policy(FixedResources::always())
            .build(Arc::new(map))
            .unwrap();

        state.apply_action(taxi(5));
        state.apply_action(taxi(2));
        assert!(state.is_terminal());

        state.declare_double_move().unwrap();
        assert_eq!((state.current_player(), state.round()), (state.mover(), 1));
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_round_advances_after_last_seat() {
        let mut state = line_match();
        state.apply_action(taxi(2));
        assert_eq!(state.current_player(), RED);
        assert_eq!(state.previous_player(), MOVER);
        assert_eq!(state.round(), 1);

        state.apply_action(taxi(5));
        assert_eq!(state.current_player(), MOVER);
        assert_eq!(state.round(), 2);
    }

    #[test]
    fn test_mover_turn_tracks_current_round_only() {
        let mut state = line_match();
        state.apply_action(taxi(2));
        assert_eq!(state.mover_moves_in(1), 1);

        state.apply_action(taxi(5));
        state.apply_action(taxi(3));
        assert_eq!(state.mover_moves_in(2), 1);
        assert_eq!(state.mover_moves_in(1), 0);
    }

    #[test]
    fn test_pursuer_rooted_fork_moves_mover_on_belief() {
        let mut state = line_match();
        assert_eq!(state.move_viewpoint(), Viewpoint::Actual);
        state.apply_action(taxi(2));

        let mut fork = state.search_fork();
        assert_eq!(fork.terminal_viewpoint(), Viewpoint::Belief);
        assert_eq!(fork.move_viewpoint(), Viewpoint::Actual);

        fork.apply_action(taxi(5));
        assert_eq!(fork.current_player(), MOVER);
        assert_eq!(fork.move_viewpoint(), Viewpoint::Belief);
        assert_eq!(state.move_viewpoint(), Viewpoint::Actual);
    }

    #[test]
    fn test_search_leaves_ledger_alone() {
        let mut state = line_match();
        state.apply_action(taxi(2));
        assert_eq!(state.ledger().len(), 1);

        let mut fork = state.search_fork();
        fork.apply_action(taxi(5));
        fork.apply_action(taxi(3));
        assert_eq!(fork.ledger().len(), 1);
        assert_eq!(state.ledger().len(), 1);
    }

    #[test]
    fn test_ledger_rejection_leaves_state_untouched() {
        let mut state = line_match();
        state.apply_action(taxi(2));
        state.apply_action(taxi(5));
        state.apply_action(taxi(3));
        state.apply_action(taxi(4));
        assert_eq!(state.ledger().last_round(), Some(2));

        // Rewind the round behind the ledger.
        state.round = 1;
        state.current = MOVER;
        let before = state.snapshot();

        let err = state.try_apply_action(taxi(2)).unwrap_err();
        assert_eq!(
            err,
            RulesError::Ledger(LedgerError::OutOfOrder { round: 1, last: 2 })
        );
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_skip_records_nothing() {
        let mut state = line_match();
        state.skip();
        assert_eq!(state.current_player(), RED);
        assert!(state.ledger().is_empty());
        assert_eq!(state.last_disclosed(), None);
    }

    #[test]
    fn test_rollout_moves_drop_concealed_when_declined() {
        let mut state = line_match();
        assert!(state
            .legal_moves()
            .iter()
            .any(|m| m.transport().is_concealed()));
        let moves = state.rollout_moves();
        assert_eq!(moves, vec![taxi(2)]);
    }

    #[test]
    fn test_debug_is_compact() {
        let state = line_match();
        let text = format!("{state:?}");
        assert!(text.starts_with("MatchState"));
        assert!(text.contains("ledger_len: 0"));
    }
}
