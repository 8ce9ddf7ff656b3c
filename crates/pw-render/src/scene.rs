//! Vello backend for [`ConnectionCanvas`].
//!
//! Call [`crate::ConnectionRenderer::paint`] with a freshly-cleared `Scene`
//! once per frame; the host composites it over the tree widgets and
//! presents it via wgpu.

use crate::paint::{ConnectionCanvas, LineStyle};
use kurbo::{Affine, Cap, Line, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

fn to_color([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

impl ConnectionCanvas for Scene {
    fn stroke_line(&mut self, line: Line, style: &LineStyle) {
        let stroke = Stroke::new(style.width).with_caps(Cap::Round);
        self.stroke(&stroke, Affine::IDENTITY, to_color(style.rgba), None, &line);
    }

    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        self.fill(Fill::NonZero, Affine::IDENTITY, to_color(rgba), None, &rect);
    }
}
