//! Item spawner
//!
//! Spawns one item at a time: kind by weighted draw, horizontal position
//! uniform inside a padded band so every item is reachable, fall speed equal
//! to the current base speed plus bounded jitter. All randomness comes from
//! the session RNG, so a seed fully determines the item stream.

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, GameState, ItemKind};
use crate::consts::*;

/// Spawn a single item at the top of the playfield
pub fn spawn_item(state: &mut GameState) {
    let banana_w = state.tuning.banana_weight;
    let bomb_w = state.tuning.bomb_weight;
    let rock_w = state.tuning.rock_weight;
    let padding = state.tuning.spawn_padding;
    let jitter = state.tuning.fall_jitter;

    let roll = state.rng.random_range(0..banana_w + bomb_w + rock_w);
    let kind = if roll < banana_w {
        ItemKind::Banana
    } else if roll < banana_w + bomb_w {
        ItemKind::Bomb
    } else {
        ItemKind::Rock
    };

    let band = GAME_WIDTH - ITEM_SIZE - 2.0 * padding;
    let x = padding + state.rng.random_range(0.0..band);
    let fall_speed = state.fall_speed + state.rng.random_range(-jitter..=jitter);

    let id = state.next_entity_id();
    state.items.push(FallingItem {
        id,
        kind,
        pos: Vec2::new(x, -ITEM_SIZE),
        fall_speed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_stays_inside_padded_band() {
        let mut state = GameState::new(1234);
        for _ in 0..500 {
            spawn_item(&mut state);
        }
        let padding = state.tuning.spawn_padding;
        for item in &state.items {
            assert!(item.pos.x >= padding);
            assert!(item.pos.x + ITEM_SIZE <= GAME_WIDTH - padding);
            assert_eq!(item.pos.y, -ITEM_SIZE);
        }
    }

    #[test]
    fn spawn_speeds_stay_within_jitter_bounds() {
        let mut state = GameState::new(1234);
        for _ in 0..500 {
            spawn_item(&mut state);
        }
        let base = state.fall_speed;
        let jitter = state.tuning.fall_jitter;
        for item in &state.items {
            assert!(item.fall_speed >= base - jitter);
            assert!(item.fall_speed <= base + jitter);
        }
    }

    #[test]
    fn kind_distribution_roughly_matches_weights() {
        let mut state = GameState::new(42);
        let n = 10_000;
        for _ in 0..n {
            spawn_item(&mut state);
        }
        let bananas = state
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::Banana)
            .count();
        let share = bananas as f64 / n as f64;
        // 70% nominal; wide tolerance, this is a sanity check not a chi-square
        assert!((0.65..0.75).contains(&share), "banana share {share}");
    }

    #[test]
    fn ids_ascend_in_spawn_order() {
        let mut state = GameState::new(9);
        for _ in 0..20 {
            spawn_item(&mut state);
        }
        for pair in state.items.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn same_seed_spawns_identical_stream() {
        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        for _ in 0..100 {
            spawn_item(&mut a);
            spawn_item(&mut b);
        }
        for (x, y) in a.items.iter().zip(&b.items) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.fall_speed, y.fall_speed);
        }
    }
}
