//! Property-based tests for the state machine runtime.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated machines and objects.

use finite::core::{Guard, State, StateKind, Stateful, Transition};
use finite::{CallbackSpec, FiniteError, StateMachine, TransitionContext};
use proptest::prelude::*;

const STATES: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Clone, Debug, Default)]
struct Token {
    state: Option<String>,
    open: bool,
    fired: Vec<String>,
}

impl Stateful for Token {
    fn finite_state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    fn set_finite_state(&mut self, state: &str) {
        self.state = Some(state.to_string());
    }
}

#[derive(Clone, Debug)]
struct TransitionSpec {
    from: Vec<usize>,
    to: usize,
    guarded: bool,
}

prop_compose! {
    fn arbitrary_transition()(
        from in prop::collection::vec(0..STATES.len(), 1..4),
        to in 0..STATES.len(),
        guarded in any::<bool>(),
    ) -> TransitionSpec {
        TransitionSpec { from, to, guarded }
    }
}

fn machine(initial: usize, specs: &[TransitionSpec], open: bool) -> StateMachine<Token> {
    let mut machine = StateMachine::new(Token {
        open,
        ..Token::default()
    });
    for (index, id) in STATES.iter().enumerate() {
        let kind = if index == initial {
            StateKind::Initial
        } else {
            StateKind::Normal
        };
        machine.add_state(State::new(*id, kind)).unwrap();
    }
    for (index, spec) in specs.iter().enumerate() {
        let guard = spec.guarded.then(|| Guard::new(|t: &Token| t.open));
        let transition = Transition::new(
            format!("t{index}"),
            spec.from.iter().map(|i| STATES[*i]),
            STATES[spec.to],
            guard,
        )
        .unwrap();
        machine.add_transition(transition).unwrap();
    }
    machine
}

proptest! {
    #[test]
    fn initialize_selects_the_single_initial_state(initial in 0..STATES.len()) {
        let mut machine = machine(initial, &[], true);
        machine.initialize().unwrap();
        prop_assert_eq!(machine.current_state_id(), Some(STATES[initial]));
        prop_assert_eq!(machine.object().finite_state(), Some(STATES[initial]));
    }

    #[test]
    fn initialize_fails_without_exactly_one_initial_state(
        kinds in prop::collection::vec(any::<bool>(), 0..5)
    ) {
        let initial_count = kinds.iter().filter(|k| **k).count();
        prop_assume!(initial_count != 1);

        let mut machine = StateMachine::new(Token::default());
        for (index, is_initial) in kinds.iter().enumerate() {
            let kind = if *is_initial { StateKind::Initial } else { StateKind::Final };
            machine.add_state(State::new(format!("s{index}"), kind)).unwrap();
        }

        let result = machine.initialize();
        let rejected =
            matches!(result, Err(FiniteError::NoInitialState { found }) if found == initial_count);
        prop_assert!(rejected, "expected NoInitialState with {} initial states", initial_count);
    }

    #[test]
    fn can_matches_source_set_and_guard(
        initial in 0..STATES.len(),
        specs in prop::collection::vec(arbitrary_transition(), 1..6),
        open in any::<bool>(),
    ) {
        let mut machine = machine(initial, &specs, open);
        machine.initialize().unwrap();

        for (index, spec) in specs.iter().enumerate() {
            let expected = spec.from.contains(&initial) && (!spec.guarded || open);
            prop_assert_eq!(machine.can(&format!("t{index}")).unwrap(), expected);
        }
    }

    #[test]
    fn apply_follows_can(
        initial in 0..STATES.len(),
        specs in prop::collection::vec(arbitrary_transition(), 1..6),
        steps in prop::collection::vec(0..6usize, 1..12),
        open in any::<bool>(),
    ) {
        let mut machine = machine(initial, &specs, open);
        machine.initialize().unwrap();

        for step in steps {
            let name = format!("t{}", step % specs.len());
            let before = machine.current_state_id().map(str::to_string);
            let allowed = machine.can(&name).unwrap();

            match machine.apply(&name) {
                Ok(state) => {
                    prop_assert!(allowed);
                    let target = STATES[specs[step % specs.len()].to];
                    prop_assert_eq!(state.as_str(), target);
                    prop_assert_eq!(machine.current_state_id(), Some(target));
                    prop_assert_eq!(machine.object().finite_state(), Some(target));
                }
                Err(FiniteError::InvalidTransition { .. }) => {
                    prop_assert!(!allowed);
                    prop_assert_eq!(machine.current_state_id().map(str::to_string), before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn history_path_tracks_applied_transitions(
        specs in prop::collection::vec(arbitrary_transition(), 1..6),
        steps in prop::collection::vec(0..6usize, 0..12),
    ) {
        let mut machine = machine(0, &specs, true);
        machine.initialize().unwrap();
        let mut expected = vec![STATES[0].to_string()];

        for step in steps {
            if let Ok(state) = machine.apply(&format!("t{}", step % specs.len())) {
                expected.push(state);
            }
        }

        let path = machine.history().get_path();
        if machine.history().is_empty() {
            prop_assert!(path.is_empty());
        } else {
            prop_assert_eq!(path, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn unfiltered_hooks_fire_on_every_apply_and_filtered_only_on_match(
        specs in prop::collection::vec(arbitrary_transition(), 1..6),
        steps in prop::collection::vec(0..6usize, 1..12),
    ) {
        let mut machine = machine(0, &specs, true);
        machine
            .callbacks_mut()
            .add_before(
                |t: &mut Token, ctx: &TransitionContext| {
                    t.fired.push(format!("any:{}", ctx.transition));
                    Ok(())
                },
                CallbackSpec::new(),
            )
            .add_before(
                |t: &mut Token, _ctx: &TransitionContext| {
                    t.fired.push("t0".to_string());
                    Ok(())
                },
                CallbackSpec::new().on("t0"),
            );
        machine.initialize().unwrap();

        let mut applied = Vec::new();
        for step in steps {
            let name = format!("t{}", step % specs.len());
            if machine.apply(&name).is_ok() {
                applied.push(name);
            }
        }

        let mut expected = Vec::new();
        for name in &applied {
            expected.push(format!("any:{name}"));
            if name == "t0" {
                expected.push("t0".to_string());
            }
        }
        prop_assert_eq!(&machine.object().fired, &expected);
    }
}
