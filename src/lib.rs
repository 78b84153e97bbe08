//! Banana Catch - a falling-fruit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `net`: External collaborators (puzzle provider, score service)
//! - `render`: Canvas 2D rendering
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local personal-best record

pub mod highscores;
pub mod net;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;
pub mod tuning;

pub use highscores::PersonalBest;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the display cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICK_HZ: u64 = 60;
    /// Milliseconds of simulated time per tick
    pub const MS_PER_TICK: f32 = 1000.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Basket geometry - the hit region is narrower, see `Tuning::hitbox_inset`
    pub const BASKET_WIDTH: f32 = 180.0;
    pub const BASKET_HEIGHT: f32 = 80.0;
    /// Gap between basket bottom and playfield bottom
    pub const BASKET_BOTTOM_MARGIN: f32 = 10.0;

    /// Square bounding box of falling items
    pub const ITEM_SIZE: f32 = 40.0;
}

/// Format elapsed seconds as "m:ss" for the HUD
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::format_time;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(61), "1:01");
        assert_eq!(format_time(600), "10:00");
    }
}
