//! Local personal-best record
//!
//! The score service is the source of truth for high scores; this record is
//! the offline fallback so the game-over screen can still show "your best"
//! when a submission fails. Persisted to LocalStorage.

use serde::{Deserialize, Serialize};

/// Best session recorded on this device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub score: u64,
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl PersonalBest {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "banana_catch_best";

    /// Whether a new score beats this record
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.score
    }

    /// Load the record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(Self::STORAGE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    /// Save the record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Personal best saved ({})", self.score);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Option<Self> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Record a finished session if it beats the stored best. Returns the
    /// record now on disk.
    pub fn record(score: u64, level: u32, timestamp: f64) -> Self {
        match Self::load() {
            Some(best) if !best.beaten_by(score) => best,
            _ => {
                let best = Self {
                    score,
                    level,
                    timestamp,
                };
                best.save();
                best
            }
        }
    }
}
