//! 2D canvas backend
//!
//! Paints a draw list onto a `CanvasRenderingContext2d` sized to the logical
//! game resolution; CSS scaling takes care of the display size.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::DrawCmd;
use crate::consts::{GAME_HEIGHT, GAME_WIDTH};

const LABEL_FONT: &str = "10px \"Press Start 2P\", monospace";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context and pin the backing store to the game size
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_image_smoothing_enabled(false);
        Some(Self { ctx })
    }

    pub fn render(&self, cmds: &[DrawCmd]) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, GAME_WIDTH as f64, GAME_HEIGHT as f64);

        for cmd in cmds {
            match cmd {
                DrawCmd::Sky { top, bottom } => {
                    let grad = ctx.create_linear_gradient(0.0, 0.0, 0.0, GAME_HEIGHT as f64);
                    grad.add_color_stop(0.0, &top.css()).ok();
                    grad.add_color_stop(1.0, &bottom.css()).ok();
                    ctx.set_fill_style_canvas_gradient(&grad);
                    ctx.fill_rect(0.0, 0.0, GAME_WIDTH as f64, GAME_HEIGHT as f64);
                }
                DrawCmd::Rect { rect, color } => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(
                        rect.min.x as f64,
                        rect.min.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::Ellipse { rect, color } => {
                    let half = rect.size / 2.0;
                    let center = rect.min + half;
                    ctx.set_fill_style_str(&color.css());
                    ctx.begin_path();
                    ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        half.x as f64,
                        half.y as f64,
                        0.0,
                        0.0,
                        TAU,
                    )
                    .ok();
                    ctx.fill();
                }
                DrawCmd::Text { text, pos, color } => {
                    ctx.set_font(LABEL_FONT);
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
                }
            }
        }
    }
}
