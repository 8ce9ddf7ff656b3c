//! Connection lines → canvas drawing commands.
//!
//! Each repaint draws, bottom to top:
//!
//! 1. row decorations: emphasized drop-target highlights and the
//!    sensor/controller cue on structural rows,
//! 2. persisted connections between visible endpoints of the two trees,
//! 3. the hypothetical connection of the gesture in progress.
//!
//! Lines go through the [`ConnectionCanvas`] trait so the same renderer
//! drives a vello scene or a recording canvas in tests.

use crate::anchor::anchor_point;
use kurbo::{Line, Point, Rect};
use pw_core::id::EndpointId;
use pw_core::model::{InterfaceKind, PortKind, ResolvedBounds, Side};
use pw_core::oracle::Rating;
use pw_core::pane::TreeView;
use pw_core::resolve::MatchResult;
use std::collections::HashMap;

/// Drawing surface for connection lines.
pub trait ConnectionCanvas {
    fn stroke_line(&mut self, line: Line, style: &LineStyle);
    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]);
}

/// What a line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Stored connection.
    Persisted,
    /// Gesture line following the pointer (no match yet).
    Pointer,
    /// Gesture line to a resolved partner, about to be committed.
    Confident,
}

/// Cache key for line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    pub kind: LineKind,
    pub port: PortKind,
    pub translucent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub rgba: [u8; 4],
    pub width: f64,
}

const TRANSLUCENT_ALPHA: u8 = 96;
const HIGHLIGHT_RGBA: [u8; 4] = [255, 196, 0, 72];
const SENSOR_CUE_RGBA: [u8; 4] = [46, 160, 67, 255];
const CONTROLLER_CUE_RGBA: [u8; 4] = [130, 80, 223, 255];
const CUE_WIDTH: f64 = 3.0;

impl LineStyle {
    fn for_key(key: StyleKey) -> Self {
        let [r, g, b] = match (key.kind, key.port) {
            (LineKind::Pointer, _) => [90, 90, 90],
            (_, PortKind::Plain) => [62, 120, 200],
            (_, PortKind::Proxy) => [128, 128, 128],
            (_, PortKind::Rpc) => [220, 140, 40],
        };
        let width = match key.kind {
            LineKind::Persisted => 1.5,
            LineKind::Pointer => 1.0,
            LineKind::Confident => 3.0,
        };
        let a = if key.translucent { TRANSLUCENT_ALPHA } else { 255 };
        Self {
            rgba: [r, g, b, a],
            width,
        }
    }
}

/// The gesture in progress, as far as drawing is concerned.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    /// Tree the selection was made in.
    pub origin: Side,
    pub selection: &'a [EndpointId],
    pub result: &'a MatchResult,
    pub pointer: Point,
}

/// Persisted connections with both ends visible, as
/// `(source endpoint, target endpoint)` in source display order.
pub fn visible_connections(from: &dyn TreeView, to: &dyn TreeView) -> Vec<(EndpointId, EndpointId)> {
    let mut out = Vec::new();
    for source in from.visible_endpoints() {
        let Some(port) = source.as_port() else {
            continue;
        };
        if port.is_widget_owned() {
            for partner in &port.links {
                if to.bounds(*partner).is_some() {
                    out.push((source.id, *partner));
                }
            }
        } else {
            for target in to.visible_endpoints() {
                if target
                    .as_port()
                    .is_some_and(|p| p.is_widget_owned() && p.is_linked_to(source.id))
                {
                    out.push((source.id, target.id));
                }
            }
        }
    }
    out
}

fn line_visible(line: &Line, viewport: ResolvedBounds) -> bool {
    let (min_x, max_x) = (line.p0.x.min(line.p1.x), line.p0.x.max(line.p1.x));
    let (min_y, max_y) = (line.p0.y.min(line.p1.y), line.p0.y.max(line.p1.y));
    min_x <= viewport.right() as f64
        && max_x >= viewport.x as f64
        && min_y <= viewport.bottom() as f64
        && max_y >= viewport.y as f64
}

fn row_rect(b: ResolvedBounds) -> Rect {
    Rect::new(b.x as f64, b.y as f64, b.right() as f64, b.bottom() as f64)
}

fn port_kind(view: &dyn TreeView, id: EndpointId) -> PortKind {
    view.endpoint(id)
        .and_then(|e| e.as_port())
        .map_or(PortKind::Plain, |p| p.kind)
}

/// Draws connections; owns the lazily built style cache.
#[derive(Debug, Clone)]
pub struct ConnectionRenderer {
    styles: HashMap<StyleKey, LineStyle>,
    /// Above this many visible connections, persisted lines go translucent.
    pub translucent_threshold: usize,
}

impl Default for ConnectionRenderer {
    fn default() -> Self {
        Self::new(25)
    }
}

impl ConnectionRenderer {
    pub fn new(translucent_threshold: usize) -> Self {
        Self {
            styles: HashMap::new(),
            translucent_threshold,
        }
    }

    pub fn style(&mut self, key: StyleKey) -> LineStyle {
        *self
            .styles
            .entry(key)
            .or_insert_with(|| LineStyle::for_key(key))
    }

    pub fn cached_styles(&self) -> usize {
        self.styles.len()
    }

    /// Paint one frame. `views` is indexed by [`Side::index`]. Returns the
    /// number of lines drawn.
    pub fn paint(
        &mut self,
        canvas: &mut dyn ConnectionCanvas,
        views: [&dyn TreeView; 2],
        preview: Option<Preview<'_>>,
        viewport: ResolvedBounds,
        emphasize_highlights: bool,
    ) -> usize {
        for view in views {
            paint_row_decorations(canvas, view, emphasize_highlights);
        }
        let mut drawn = self.paint_persisted(canvas, views, viewport);
        if let Some(preview) = preview {
            drawn += self.paint_preview(canvas, views, preview, viewport);
        }
        log::trace!("painted {drawn} connection lines");
        drawn
    }

    fn paint_persisted(
        &mut self,
        canvas: &mut dyn ConnectionCanvas,
        views: [&dyn TreeView; 2],
        viewport: ResolvedBounds,
    ) -> usize {
        let from = views[Side::Source.index()];
        let to = views[Side::Target.index()];
        let connections = visible_connections(from, to);
        let translucent = connections.len() > self.translucent_threshold;

        let mut drawn = 0;
        for (source, target) in connections {
            let (Some(a), Some(b)) = (anchor_point(from, source), anchor_point(to, target)) else {
                continue;
            };
            let line = Line::new(a.point, b.point);
            if !line_visible(&line, viewport) {
                continue;
            }
            let style = self.style(StyleKey {
                kind: LineKind::Persisted,
                port: port_kind(from, source),
                translucent,
            });
            canvas.stroke_line(line, &style);
            drawn += 1;
        }
        drawn
    }

    fn paint_preview(
        &mut self,
        canvas: &mut dyn ConnectionCanvas,
        views: [&dyn TreeView; 2],
        preview: Preview<'_>,
        viewport: ResolvedBounds,
    ) -> usize {
        let origin = views[preview.origin.index()];
        let other = views[preview.origin.other().index()];
        let confident = preview.result.worst_rating > Rating::Impossible;

        let mut drawn = 0;
        if confident {
            for (selected, partner) in preview.result.pairs(preview.selection) {
                let (Some(a), Some(b)) = (anchor_point(origin, selected), anchor_point(other, partner))
                else {
                    continue;
                };
                let style = self.style(StyleKey {
                    kind: LineKind::Confident,
                    port: port_kind(origin, selected),
                    translucent: false,
                });
                canvas.stroke_line(Line::new(a.point, b.point), &style);
                drawn += 1;
            }
        } else {
            for selected in preview.selection {
                let Some(a) = anchor_point(origin, *selected) else {
                    continue;
                };
                let line = Line::new(a.point, preview.pointer);
                if !line_visible(&line, viewport) {
                    continue;
                }
                let style = self.style(StyleKey {
                    kind: LineKind::Pointer,
                    port: port_kind(origin, *selected),
                    translucent: false,
                });
                canvas.stroke_line(line, &style);
                drawn += 1;
            }
        }
        drawn
    }
}

fn paint_row_decorations(canvas: &mut dyn ConnectionCanvas, view: &dyn TreeView, emphasize: bool) {
    if emphasize {
        for id in view.highlighted() {
            if let Some(b) = view.bounds(*id) {
                canvas.fill_rect(row_rect(b), HIGHLIGHT_RGBA);
            }
        }
    }
    for id in view.visible() {
        let Some(b) = view.bounds(*id) else {
            continue;
        };
        let cues = view.interface_cues(*id);
        for (i, cue) in cues.iter().enumerate() {
            let rgba = match cue {
                InterfaceKind::Sensor => SENSOR_CUE_RGBA,
                InterfaceKind::Controller => CONTROLLER_CUE_RGBA,
                InterfaceKind::Generic => continue,
            };
            let x = b.x as f64 + i as f64 * CUE_WIDTH;
            canvas.fill_rect(
                Rect::new(x, b.y as f64, x + CUE_WIDTH, b.bottom() as f64),
                rgba,
            );
        }
    }
}
