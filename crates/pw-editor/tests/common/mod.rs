//! Shared fixture: a widget tree on the left, a remote robot on the right.
//!
//! ```text
//! source (x 0..200)           target (x 300..500)
//!   gauge        y   0..18      p (out f64)   y  0..18
//!     a (in f64) y  18..36      q (out f64)   y 18..36
//!     b (in f64) y  36..54      r (out f64)   y 36..54
//! ```

#![allow(dead_code)]

use kurbo::{Line, Rect};
use pw_core::*;
use pw_editor::*;
use pw_render::{ConnectionCanvas, LineStyle};

pub const SOURCE_X: f32 = 40.0;
pub const TARGET_X: f32 = 350.0;

pub fn row_y(row: usize) -> f32 {
    row as f32 * 18.0 + 9.0
}

pub fn id(uri: &str) -> EndpointId {
    EndpointId::intern(uri)
}

pub fn engine() -> ConnectionEngine {
    let (source, target) = panes();
    ConnectionEngine::new(
        source,
        target,
        PortOracle::new(),
        LinkTable::new(),
        EngineConfig::default(),
    )
}

/// Same trees, reporting edits to `undo_log`.
pub fn engine_with<U: UndoLog>(undo_log: U) -> ConnectionEngine<LinkTable, U> {
    let (source, target) = panes();
    ConnectionEngine::with_undo_log(
        source,
        target,
        PortOracle::new(),
        LinkTable::new(),
        EngineConfig::default(),
        undo_log,
    )
}

fn panes() -> (Pane, Pane) {
    let mut widgets = EndpointTree::new("/widgets");
    widgets
        .add_top_level(Endpoint::group("/widgets/gauge", InterfaceKind::Generic))
        .unwrap();
    for leaf in ["a", "b"] {
        widgets
            .add_endpoint(
                id("/widgets/gauge"),
                Endpoint::port(
                    &format!("/widgets/gauge/{leaf}"),
                    Port::new(Direction::Input, Ownership::Widget, "f64"),
                ),
            )
            .unwrap();
    }

    let mut robot = EndpointTree::new("/robot");
    for leaf in ["p", "q", "r"] {
        robot
            .add_top_level(Endpoint::port(
                &format!("/robot/{leaf}"),
                Port::new(Direction::Output, Ownership::Remote, "f64"),
            ))
            .unwrap();
    }

    (
        Pane::new(
            Side::Source,
            widgets,
            PaneLayout::new(ResolvedBounds::new(0.0, 0.0, 200.0, 400.0)),
        ),
        Pane::new(
            Side::Target,
            robot,
            PaneLayout::new(ResolvedBounds::new(300.0, 0.0, 200.0, 400.0)),
        ),
    )
}

pub fn press<U: UndoLog>(
    engine: &mut ConnectionEngine<LinkTable, U>,
    x: f32,
    y: f32,
    ctrl: bool,
    time_ms: f64,
) -> bool {
    engine.handle_event(&InputEvent::PointerDown {
        x,
        y,
        button: MouseButton::Primary,
        modifiers: Modifiers {
            ctrl,
            ..Modifiers::NONE
        },
        time_ms,
    })
}

/// Select `a` then ctrl-click `b`, leaving a gesture pressed on `b`.
pub fn press_a_and_b<U: UndoLog>(engine: &mut ConnectionEngine<LinkTable, U>) {
    press(engine, SOURCE_X, row_y(1), false, 0.0);
    engine.handle_event(&InputEvent::from_pointer_up(SOURCE_X, row_y(1)));
    press(engine, SOURCE_X, row_y(2), true, 1000.0);
}

/// Drag the pressed selection onto target row `row` and drop it.
pub fn drop_on<U: UndoLog>(engine: &mut ConnectionEngine<LinkTable, U>, row: usize) -> bool {
    engine.handle_event(&InputEvent::from_pointer_move(TARGET_X, row_y(row)));
    engine.handle_event(&InputEvent::from_pointer_up(TARGET_X, row_y(row)))
}

pub fn links_of<U: UndoLog>(engine: &ConnectionEngine<LinkTable, U>, uri: &str) -> Vec<EndpointId> {
    engine
        .tree(Side::Source)
        .get(id(uri))
        .and_then(Endpoint::as_port)
        .map(|p| p.links.to_vec())
        .unwrap_or_default()
}

#[derive(Default)]
pub struct Recorder {
    pub lines: Vec<(Line, LineStyle)>,
    pub rects: Vec<(Rect, [u8; 4])>,
}

impl ConnectionCanvas for Recorder {
    fn stroke_line(&mut self, line: Line, style: &LineStyle) {
        self.lines.push((line, *style));
    }

    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        self.rects.push((rect, rgba));
    }
}

pub const VIEWPORT: ResolvedBounds = ResolvedBounds::new(0.0, 0.0, 800.0, 600.0);
