//! Basket collision detection
//!
//! The basket's hit region is narrower than its visual width: a fixed inset
//! is shaved off each side so only clean catches register.

use glam::Vec2;

use crate::consts::*;

/// Axis-aligned hit region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The basket's effective hit region for a given basket position
pub fn basket_hitbox(basket_x: f32, inset: f32) -> Hitbox {
    Hitbox {
        x: basket_x + inset,
        y: GAME_HEIGHT - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN,
        width: BASKET_WIDTH - 2.0 * inset,
        height: BASKET_HEIGHT,
    }
}

/// AABB overlap between an item (top-left corner, `ITEM_SIZE` square) and
/// the basket hit region
pub fn item_caught(pos: Vec2, hitbox: &Hitbox) -> bool {
    pos.x < hitbox.x + hitbox.width
        && pos.x + ITEM_SIZE > hitbox.x
        && pos.y < hitbox.y + hitbox.height
        && pos.y + ITEM_SIZE > hitbox.y
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSET: f32 = 40.0;

    fn basket_row_y() -> f32 {
        // Vertically inside the basket band
        GAME_HEIGHT - BASKET_HEIGHT
    }

    #[test]
    fn item_inside_hit_region_is_caught() {
        // Basket at x=0: hit region spans [40, 140)
        let hitbox = basket_hitbox(0.0, INSET);
        let pos = Vec2::new(60.0, basket_row_y());
        assert!(item_caught(pos, &hitbox));
    }

    #[test]
    fn item_inside_visual_width_but_outside_inset_is_not_caught() {
        let hitbox = basket_hitbox(0.0, INSET);
        // Item right edge at x=0.0 + ITEM_SIZE = 40.0, exactly at the hit
        // region's left edge: touching, not overlapping
        let pos = Vec2::new(0.0, basket_row_y());
        assert!(!item_caught(pos, &hitbox));
        // Fully right of the hit region but within the visual basket
        let pos = Vec2::new(BASKET_WIDTH - INSET, basket_row_y());
        assert!(!item_caught(pos, &hitbox));
    }

    #[test]
    fn item_above_basket_band_is_not_caught() {
        let hitbox = basket_hitbox(0.0, INSET);
        let pos = Vec2::new(60.0, 0.0);
        assert!(!item_caught(pos, &hitbox));
    }

    #[test]
    fn item_left_edge_just_inside_inset_is_caught() {
        let hitbox = basket_hitbox(0.0, INSET);
        let pos = Vec2::new(INSET + 0.5, basket_row_y());
        assert!(item_caught(pos, &hitbox));
    }
}
