//! Data-driven game balance
//!
//! Every gameplay number lives here so sessions can be tuned (or tests can
//! shrink intervals) without touching the simulation. Persisted separately
//! from session snapshots in LocalStorage.

use serde::{Deserialize, Serialize};

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at session start
    pub start_lives: u8,
    /// Hard cap on lives
    pub max_lives: u8,

    /// Base points for a caught banana
    pub banana_points: u64,
    /// Extra points per level on each catch
    pub level_bonus: u64,

    /// Basket horizontal speed (px/s)
    pub basket_speed: f32,
    /// Fall speed at level 1 (px/s)
    pub initial_fall_speed: f32,
    /// Fall speed ceiling (px/s)
    pub max_fall_speed: f32,
    /// Per-item speed jitter, drawn uniformly from +/- this value (px/s)
    pub fall_jitter: f32,

    /// Time between spawns at level 1
    pub initial_spawn_interval_ms: u32,
    /// Spawn interval floor
    pub min_spawn_interval_ms: u32,
    /// Spawn interval reduction per level-up
    pub spawn_interval_step_ms: u32,

    /// Active play time between level-ups (seconds)
    pub ramp_interval_secs: u32,
    /// Fall speed increase per level-up (px/s)
    pub ramp_fall_step: f32,

    /// Spawn kind weights (banana : bomb : rock)
    pub banana_weight: u32,
    pub bomb_weight: u32,
    pub rock_weight: u32,
    /// Margin from both playfield edges excluded from the spawn band (px)
    pub spawn_padding: f32,

    /// Margin shaved off each side of the basket's visual width to form the
    /// hit region (px)
    pub hitbox_inset: f32,

    /// Challenge answer budget (seconds, counted once the question is ready)
    pub challenge_secs: u32,
    /// Delay before a failed question fetch ends the game (seconds)
    pub challenge_grace_secs: u32,
    /// Image load retries before falling back to a text-only prompt
    pub max_asset_retries: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_lives: 3,
            max_lives: 5,

            banana_points: 10,
            level_bonus: 2,

            basket_speed: 180.0,
            initial_fall_speed: 120.0,
            max_fall_speed: 480.0,
            fall_jitter: 60.0,

            initial_spawn_interval_ms: 2000,
            min_spawn_interval_ms: 500,
            spawn_interval_step_ms: 100,

            ramp_interval_secs: 20,
            ramp_fall_step: 30.0,

            banana_weight: 70,
            bomb_weight: 15,
            rock_weight: 15,
            spawn_padding: 30.0,

            hitbox_inset: 40.0,

            challenge_secs: 30,
            challenge_grace_secs: 2,
            max_asset_retries: 2,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "banana_catch_tuning";

    /// Ramp interval in simulation ticks
    pub fn ramp_interval_ticks(&self) -> u64 {
        self.ramp_interval_secs as u64 * crate::consts::TICK_HZ
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str(&json) {
                    log::info!("Loaded tuning overrides from LocalStorage");
                    return tuning;
                }
            }
        }

        Self::default()
    }

    /// Save tuning overrides to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_json_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn partial_overrides_fill_from_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"start_lives": 5}"#).unwrap();
        assert_eq!(tuning.start_lives, 5);
        assert_eq!(tuning.max_lives, Tuning::default().max_lives);
    }
}
