//! Game state and core simulation types
//!
//! Everything a running session needs lives in `GameState`; it serializes as
//! a whole so a session can be snapshotted and restored.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::puzzle::Challenge;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// User paused; playfield frozen
    Paused,
    /// A hazard was caught; playfield frozen while the math challenge runs
    Challenge,
    /// Session ended
    GameOver,
}

/// Kinds of falling items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Banana,
    Bomb,
    Rock,
}

impl ItemKind {
    /// Hazards open the math challenge instead of scoring
    pub fn is_hazard(&self) -> bool {
        matches!(self, ItemKind::Bomb | ItemKind::Rock)
    }
}

/// A falling item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    /// Unique per spawn, ascending; items iterate in spawn order
    pub id: u32,
    pub kind: ItemKind,
    /// Top-left corner of the item's bounding box
    pub pos: Vec2,
    /// Fall speed (px/s), base speed plus per-item jitter
    pub fall_speed: f32,
}

impl FallingItem {
    /// True once the item has fallen past the playfield bottom
    pub fn past_bottom(&self) -> bool {
        self.pos.y > GAME_HEIGHT
    }
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Left edge of the basket's visual width
    pub x: f32,
}

impl Default for Basket {
    fn default() -> Self {
        Self {
            x: GAME_WIDTH / 2.0 - BASKET_WIDTH / 2.0,
        }
    }
}

impl Basket {
    /// Move horizontally, clamped to the playfield
    pub fn shift(&mut self, dx: f32) {
        self.x = (self.x + dx).clamp(0.0, GAME_WIDTH - BASKET_WIDTH);
    }
}

/// Final stats handed to the score reporter exactly once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub bananas_collected: u32,
    pub lives_used: u8,
    pub level: u32,
    pub duration_secs: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session generation counter; async callbacks compare against this
    /// before applying effects, so a stale completion cannot touch a
    /// restarted session
    pub session: u64,
    /// Session seed for reproducibility
    pub seed: u64,
    /// Session RNG (spawn kinds, positions, jitter)
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,

    /// Score; never decreases while Playing
    pub score: u64,
    /// Remaining lives, 0..=tuning.max_lives
    pub lives: u8,
    /// Difficulty level, starts at 1
    pub level: u32,
    pub bananas_collected: u32,
    pub missed_bananas: u32,

    /// Ticks spent in the Playing phase; drives the elapsed-time display,
    /// spawn pacing, and the difficulty ramp. Paused and Challenge time
    /// never advances it.
    pub active_ticks: u64,
    /// Active ticks since the last level-up
    pub ramp_ticks: u64,
    /// `active_ticks` value at the most recent spawn
    pub last_spawn_tick: u64,

    /// Current base fall speed (px/s)
    pub fall_speed: f32,
    /// Current spawn interval
    pub spawn_interval_ms: u32,

    pub basket: Basket,
    /// Falling items in spawn order (ascending id)
    pub items: Vec<FallingItem>,
    /// Present iff phase == Challenge
    pub challenge: Option<Challenge>,

    /// Gameplay tuning the session was started with
    pub tuning: Tuning,

    score_submitted: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session with explicit tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            session: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            lives: tuning.start_lives,
            level: 1,
            bananas_collected: 0,
            missed_bananas: 0,
            active_ticks: 0,
            ramp_ticks: 0,
            last_spawn_tick: 0,
            fall_speed: tuning.initial_fall_speed,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            basket: Basket::default(),
            items: Vec::new(),
            challenge: None,
            tuning,
            score_submitted: false,
            next_id: 1,
        }
    }

    /// Reset every session field for "play again", bumping the session
    /// generation so in-flight timers and responses from the old session
    /// are discarded
    pub fn restart(&mut self, seed: u64) {
        let session = self.session + 1;
        *self = Self::with_tuning(seed, self.tuning.clone());
        self.session = session;
    }

    /// Allocate a new item ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds of active play so far
    pub fn elapsed_seconds(&self) -> u64 {
        self.active_ticks / TICK_HZ
    }

    /// End the session. Idempotent on the phase; the one-shot submission
    /// guard is separate (`take_session_stats`).
    pub(crate) fn end_session(&mut self) {
        self.challenge = None;
        self.phase = GamePhase::GameOver;
    }

    /// Hand out the final stats for score submission, exactly once per
    /// session and only after the GameOver transition. Safe to poll from
    /// every frame.
    pub fn take_session_stats(&mut self) -> Option<SessionStats> {
        if self.phase != GamePhase::GameOver || self.score_submitted {
            return None;
        }
        self.score_submitted = true;
        Some(SessionStats {
            score: self.score,
            bananas_collected: self.bananas_collected,
            lives_used: self.tuning.start_lives.saturating_sub(self.lives),
            level: self.level,
            duration_secs: self.elapsed_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_bumps_session_and_resets_fields() {
        let mut state = GameState::new(7);
        state.score = 420;
        state.lives = 1;
        state.phase = GamePhase::GameOver;

        state.restart(8);
        assert_eq!(state.session, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, state.tuning.start_lives);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.items.is_empty());
        assert!(state.challenge.is_none());
    }

    #[test]
    fn session_stats_handed_out_once() {
        let mut state = GameState::new(7);
        assert!(state.take_session_stats().is_none(), "not yet game over");

        state.score = 50;
        state.lives = 0;
        state.end_session();

        let stats = state.take_session_stats().expect("first poll after game over");
        assert_eq!(stats.score, 50);
        assert_eq!(stats.lives_used, state.tuning.start_lives);
        assert!(state.take_session_stats().is_none(), "second poll");
    }

    #[test]
    fn basket_clamps_to_playfield() {
        let mut basket = Basket::default();
        basket.shift(-10_000.0);
        assert_eq!(basket.x, 0.0);
        basket.shift(10_000.0);
        assert_eq!(basket.x, GAME_WIDTH - BASKET_WIDTH);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let state = GameState::new(99);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, state.seed);
        assert_eq!(back.phase, state.phase);
        assert_eq!(back.lives, state.lives);
    }
}
