//! Fixed timestep simulation tick
//!
//! Advances one session deterministically. Phase dispatch is the freeze
//! mechanism: Paused and Challenge ticks never touch the playfield, so no
//! timer in the session can fire while its owning phase is not current.

use super::collision::{basket_hitbox, item_caught};
use super::puzzle::Challenge;
use super::spawn::spawn_item;
use super::state::{GamePhase, GameState, ItemKind};
use crate::consts::*;

/// Input commands for a single tick.
///
/// `pause`, `answer`, and `skip_challenge` are one-shot: the driver sets
/// them for exactly one tick and clears them after it runs.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Basket movement keys held down
    pub left: bool,
    pub right: bool,
    /// Pause toggle (ignored during Challenge and GameOver)
    pub pause: bool,
    /// Parsed integer answer for the active challenge
    pub answer: Option<i64>,
    /// Skip the active challenge (ends the game)
    pub skip_challenge: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Challenge => {
            challenge_tick(state, input);
            return;
        }
        GamePhase::Playing => {}
    }

    state.active_ticks += 1;

    // Basket movement
    let dir = (input.right as i8 - input.left as i8) as f32;
    if dir != 0.0 {
        state.basket.shift(dir * state.tuning.basket_speed * dt);
    }

    // Difficulty ramp, driven by active play time only
    state.ramp_ticks += 1;
    if state.ramp_ticks >= state.tuning.ramp_interval_ticks() {
        state.ramp_ticks = 0;
        state.level += 1;
        state.fall_speed =
            (state.fall_speed + state.tuning.ramp_fall_step).min(state.tuning.max_fall_speed);
        state.spawn_interval_ms = state
            .spawn_interval_ms
            .saturating_sub(state.tuning.spawn_interval_step_ms)
            .max(state.tuning.min_spawn_interval_ms);
        log::info!(
            "Level {} (fall {} px/s, spawn every {} ms)",
            state.level,
            state.fall_speed,
            state.spawn_interval_ms
        );
    }

    // Spawn when enough active time has passed since the last spawn
    let since_spawn = (state.active_ticks - state.last_spawn_tick) as f32 * MS_PER_TICK;
    if since_spawn >= state.spawn_interval_ms as f32 {
        spawn_item(state);
        state.last_spawn_tick = state.active_ticks;
    }

    // Advance and resolve items in spawn order. If a resolution leaves the
    // Playing phase (hazard caught, last life lost), the remaining items
    // stay untouched for the next Playing tick.
    let hitbox = basket_hitbox(state.basket.x, state.tuning.hitbox_inset);
    let mut idx = 0;
    while idx < state.items.len() {
        if state.phase != GamePhase::Playing {
            break;
        }

        let item = &mut state.items[idx];
        item.pos.y += item.fall_speed * dt;

        if item_caught(item.pos, &hitbox) {
            let kind = state.items.remove(idx).kind;
            if kind.is_hazard() {
                state.challenge = Some(Challenge::new(&state.tuning));
                state.phase = GamePhase::Challenge;
                log::info!("Hazard caught ({kind:?}), opening challenge");
            } else {
                state.score += state.tuning.banana_points + state.tuning.level_bonus * state.level as u64;
                state.bananas_collected += 1;
            }
            continue;
        }

        if state.items[idx].past_bottom() {
            let kind = state.items.remove(idx).kind;
            if kind == ItemKind::Banana {
                miss_banana(state);
            }
            continue;
        }

        idx += 1;
    }
}

fn miss_banana(state: &mut GameState) {
    state.missed_bananas += 1;
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        log::info!("Out of lives after {} s", state.elapsed_seconds());
        state.end_session();
    }
}

/// One tick while the challenge modal is up. The playfield is frozen; only
/// the challenge's own clocks and resolution inputs apply.
fn challenge_tick(state: &mut GameState, input: &TickInput) {
    let Some(challenge) = state.challenge.as_mut() else {
        // Stale input for a challenge that no longer exists
        return;
    };

    if let Some(answer) = input.answer {
        challenge.submit_answer(answer);
    }
    if input.skip_challenge {
        challenge.skip();
    }
    challenge.advance_tick();

    match challenge.outcome() {
        None => {}
        Some(outcome) if outcome.ends_game() => {
            log::info!("Challenge resolved {outcome:?}, session over");
            state.lives = 0;
            state.end_session();
        }
        Some(_) => {
            log::info!("Challenge answered correctly, resuming");
            state.challenge = None;
            state.phase = GamePhase::Playing;
        }
    }
}
