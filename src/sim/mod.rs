//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable item order (ascending id, which is spawn order)
//! - No rendering, network, or platform dependencies

pub mod collision;
pub mod puzzle;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, basket_hitbox, item_caught};
pub use puzzle::{Challenge, ChallengeOutcome, ChallengeStatus, ImageRetry};
pub use spawn::spawn_item;
pub use state::{Basket, FallingItem, GamePhase, GameState, ItemKind, SessionStats};
pub use tick::{TickInput, tick};
