// Property tests: random input scripts must preserve the session invariants
// no matter what order catches, misses, pauses, and challenge resolutions
// arrive in.

use banana_catch::consts::*;
use banana_catch::sim::{ChallengeStatus, GamePhase, GameState, TickInput, tick};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Cmd {
    left: bool,
    right: bool,
    pause: bool,
    answer: Option<i64>,
    skip: bool,
}

fn cmd_strategy() -> impl Strategy<Value = Cmd> {
    (
        any::<bool>(),
        any::<bool>(),
        // Keep pause/answer/skip rare so scripts spend most ticks playing
        prop::bool::weighted(0.02),
        prop_oneof![
            40 => Just(None),
            1 => (0i64..10).prop_map(Some),
        ],
        prop::bool::weighted(0.005),
    )
        .prop_map(|(left, right, pause, answer, skip)| Cmd {
            left,
            right,
            pause,
            answer,
            skip,
        })
}

fn check_invariants(state: &GameState, prev_score: u64, prev_lives: u8) {
    assert!(state.score >= prev_score, "score must never decrease");
    assert!(state.lives <= prev_lives, "lives must never increase");
    if state.phase == GamePhase::GameOver {
        assert_eq!(state.lives, 0, "game over implies zero lives");
    }
    assert_eq!(
        state.challenge.is_some(),
        state.phase == GamePhase::Challenge,
        "challenge present iff in the Challenge phase"
    );
    assert!(state.basket.x >= 0.0 && state.basket.x <= GAME_WIDTH - BASKET_WIDTH);
    for pair in state.items.windows(2) {
        assert!(pair[0].id < pair[1].id, "items stay in spawn order");
    }
    for item in &state.items {
        assert!(item.pos.x >= 0.0 && item.pos.x <= GAME_WIDTH - ITEM_SIZE);
    }
}

proptest! {
    #[test]
    fn random_scripts_preserve_invariants(
        seed in any::<u64>(),
        script in prop::collection::vec(cmd_strategy(), 1..1500),
    ) {
        let mut state = GameState::new(seed);

        for (i, cmd) in script.iter().enumerate() {
            // Play the provider's part: deliver a question for any
            // challenge still loading, with a small solution so the
            // scripted answers are sometimes right and sometimes wrong
            if let Some(challenge) = state.challenge.as_mut() {
                if challenge.status == ChallengeStatus::Loading {
                    challenge.question_loaded("q.png".into(), (i % 10) as i64);
                }
            }

            let prev_score = state.score;
            let prev_lives = state.lives;
            let input = TickInput {
                left: cmd.left,
                right: cmd.right,
                pause: cmd.pause,
                answer: cmd.answer,
                skip_challenge: cmd.skip,
            };
            tick(&mut state, &input, SIM_DT);
            check_invariants(&state, prev_score, prev_lives);
        }
    }

    #[test]
    fn submission_is_at_most_once_per_session(
        seed in any::<u64>(),
        script in prop::collection::vec(cmd_strategy(), 1..1500),
    ) {
        let mut state = GameState::new(seed);
        let mut submissions = 0u32;

        for cmd in &script {
            let input = TickInput {
                left: cmd.left,
                right: cmd.right,
                pause: cmd.pause,
                answer: cmd.answer,
                skip_challenge: cmd.skip,
            };
            tick(&mut state, &input, SIM_DT);
            if state.take_session_stats().is_some() {
                submissions += 1;
            }
        }
        prop_assert!(submissions <= 1);
    }
}
