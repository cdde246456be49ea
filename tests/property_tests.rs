//! Randomised rule invariants over whole matches.

mod common;

use common::{match_on_city, MOVER};
use proptest::prelude::*;
use rust_pursuit::{
    FixedResources, GameRng, MatchConfig, MatchState, MoveFiltering, PlayerId, RandomSimulation,
    SimulationPolicy, Viewpoint,
};

/// Play a live match with random moves, checking invariants after every
/// turn.
fn play_checked(mut state: MatchState, seed: u64) -> MatchState {
    let mut rng = GameRng::new(seed);
    let count = state.player_count();

    while !state.is_terminal() {
        let round = state.round();
        let actor = state.current_player();
        let reveal = actor == MOVER && state.is_reveal_round();

        let moves = state.rollout_moves();
        let moved = match RandomSimulation.pick_action(&state, &moves, &mut rng) {
            Some(mv) => {
                state.apply_action(mv);
                true
            }
            None => {
                state.skip();
                false
            }
        };

        // Rounds never go back and only advance past the last seat.
        let after = state.round();
        assert!(after == round || after == round + 1);
        if after == round + 1 {
            assert!(actor.is_last(count));
        }

        if moved && reveal {
            let positions = state.positions();
            assert_eq!(positions.belief(), positions.actual(MOVER));
        }

        // The estimate never sits under a pursuer.
        let positions = state.positions();
        assert!(!positions.is_pursuer_at(positions.belief()));

        let captured = state.positions().any_pursuer_at(Viewpoint::Actual);
        if captured || state.round() > state.config().round_cap {
            assert!(state.is_terminal());
        }
    }

    state
}

fn check_ledger(state: &MatchState) {
    let ledger = state.ledger();
    for round in 1..=state.round() {
        for player in PlayerId::all(state.player_count()) {
            let submoves: Vec<u8> = ledger
                .for_round(round)
                .filter(|e| e.player == player)
                .map(|e| e.submove)
                .collect();
            assert!(submoves.len() <= 2);
            let expected: Vec<u8> = (0..submoves.len() as u8).collect();
            assert_eq!(submoves, expected);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_matches_keep_turn_invariants(seed in any::<u64>(), mover in 1u16..=20) {
        let pursuers: Vec<u16> = [3u16, 11, 17]
            .into_iter()
            .filter(|&n| n != mover)
            .collect();
        let state = match_on_city(MatchConfig::default(), MoveFiltering::default(), mover, &pursuers);

        let state = play_checked(state, seed);
        check_ledger(&state);
    }

    #[test]
    fn crowded_matches_keep_belief_free(seed in any::<u64>(), mover in 1u16..=20) {
        let pursuers: Vec<u16> = [3u16, 11, 17, 9]
            .into_iter()
            .filter(|&n| n != mover)
            .collect();
        let mut state = match_on_city(MatchConfig::default(), MoveFiltering::default(), mover, &pursuers);
        let mut rng = GameRng::new(seed);

        while !state.is_terminal() {
            let moves = state.rollout_moves();
            match RandomSimulation.pick_action(&state, &moves, &mut rng) {
                Some(mv) => state.apply_action(mv),
                None => state.skip(),
            }
            let positions = state.positions();
            prop_assert!(!positions.is_pursuer_at(positions.belief()));

            // A pursuer-side search starts from a live position, never a
            // capture that has not happened.
            if !state.is_terminal() && state.current_player() != MOVER {
                prop_assert!(!state.search_fork().is_terminal());
            }
        }
    }

    #[test]
    fn double_moves_never_exceed_two_in_a_row(seed in any::<u64>()) {
        let state = match_on_city(MatchConfig::default(), FixedResources::always(), 5, &[17, 9]);
        let state = play_checked(state, seed);
        check_ledger(&state);

        let mut run = 0;
        for entry in state.ledger().iter() {
            run = if entry.player == MOVER { run + 1 } else { 0 };
            prop_assert!(run <= 2);
        }
        let used = state.roster().mover_participant().resources().unwrap().used_in_rounds().len();
        prop_assert!(used <= 2);
    }

    #[test]
    fn forks_never_touch_the_parent(seed in any::<u64>(), steps in 1usize..30) {
        let mut state = match_on_city(MatchConfig::default(), MoveFiltering::default(), 5, &[17, 9]);
        let before = state.snapshot();

        let mut fork = state.search_fork();
        let mut rng = GameRng::new(seed);
        for _ in 0..steps {
            if fork.is_terminal() {
                break;
            }
            let moves = fork.rollout_moves();
            match RandomSimulation.pick_action(&fork, &moves, &mut rng) {
                Some(mv) => fork.apply_action(mv),
                None => fork.skip(),
            }
        }

        let after = state.snapshot();
        prop_assert_eq!(after.positions, before.positions);
        prop_assert_eq!(after.roster, before.roster);
        prop_assert_eq!(after.ledger, before.ledger);
        prop_assert!(fork.ledger().is_empty());
    }
}
