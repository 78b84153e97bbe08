//! Canvas 2D rendering
//!
//! Draws the playfield from an immutable state snapshot once per frame.
//! Overlays (pause menu, challenge modal, game-over card) are DOM elements
//! toggled from `main`; the canvas only shows the world.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::{GameState, ItemKind};

/// Glyph used to draw each item kind
fn glyph(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Banana => "\u{1F34C}",
        ItemKind::Bomb => "\u{1F4A3}",
        ItemKind::Rock => "\u{1FAA8}",
    }
}

const BASKET_GLYPH: &str = "\u{1F9FA}";

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Draw one frame of the playfield
    pub fn draw(&self, state: &GameState) {
        let ctx = &self.ctx;
        let (w, h) = (GAME_WIDTH as f64, GAME_HEIGHT as f64);

        // Sky
        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let _ = gradient.add_color_stop(0.0, "#87CEEB");
        let _ = gradient.add_color_stop(1.0, "#E0F6FF");
        ctx.set_fill_style(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);

        // Ground strip with a grass edge
        ctx.set_fill_style(&JsValue::from_str("#8B4513"));
        ctx.fill_rect(0.0, h - 20.0, w, 20.0);
        ctx.set_fill_style(&JsValue::from_str("#228B22"));
        ctx.fill_rect(0.0, h - 25.0, w, 5.0);

        // Basket
        ctx.set_font(&format!("{}px serif", BASKET_HEIGHT as u32));
        let _ = ctx.fill_text(
            BASKET_GLYPH,
            state.basket.x as f64,
            (GAME_HEIGHT - BASKET_BOTTOM_MARGIN) as f64,
        );

        // Falling items
        ctx.set_font(&format!("{}px serif", ITEM_SIZE as u32));
        for item in &state.items {
            let _ = ctx.fill_text(
                glyph(item.kind),
                item.pos.x as f64,
                (item.pos.y + ITEM_SIZE) as f64,
            );
        }
    }
}
