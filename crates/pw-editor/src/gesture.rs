//! Drag-to-connect gesture state machine.
//!
//! ```text
//! Idle ──press (non-empty selection)──▶ Selecting ──move──▶ Previewing
//!   ▲                                      │                   │
//!   └───────────── release / cancel ───────┴───────────────────┘
//! ```
//!
//! The gesture snapshots the origin selection at press time and re-resolves
//! the match against the opposite tree on every move. It never mutates the
//! trees itself; the engine applies highlights, commits, and undo entries
//! from what the gesture reports.

use kurbo::Point;
use pw_core::id::EndpointId;
use pw_core::model::{Endpoint, Side};
use pw_core::oracle::CompatibilityOracle;
use pw_core::pane::{Pane, TreeView};
use pw_core::resolve::{MatchResult, reachable, resolve};
use pw_render::hit::hit_test;
use pw_render::paint::Preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Pressed with a selection, pointer not moved yet.
    Selecting,
    /// Dragging; the live match is being previewed.
    Previewing,
}

/// What a release means for the trees.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// No gesture was in progress.
    Ignored,
    /// Dropped where no complete match exists.
    Rejected { origin: Side, reason: Option<String> },
    /// Pair `selection[i]` with `partners[i]`.
    Commit {
        origin: Side,
        selection: Vec<EndpointId>,
        partners: Vec<EndpointId>,
    },
}

#[derive(Debug, Default)]
pub struct ConnectGesture {
    phase: GesturePhase,
    origin: Option<Side>,
    selection: Vec<EndpointId>,
    pointer: (f32, f32),
    hovered: Option<EndpointId>,
    live: MatchResult,
    pressed_at_ms: f64,
    /// Tree revisions at press time, indexed by [`Side::index`].
    revisions: [u64; 2],
}

fn endpoints<'p>(pane: &'p Pane, ids: &[EndpointId]) -> Vec<&'p Endpoint> {
    ids.iter().filter_map(|id| pane.endpoint(*id)).collect()
}

impl ConnectGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    pub fn origin(&self) -> Option<Side> {
        self.origin
    }

    /// Selection captured at press time, in pairing order.
    pub fn selection(&self) -> &[EndpointId] {
        &self.selection
    }

    pub fn hovered(&self) -> Option<EndpointId> {
        self.hovered
    }

    /// The match for the last pointer position.
    pub fn live(&self) -> &MatchResult {
        &self.live
    }

    pub fn pressed_at_ms(&self) -> f64 {
        self.pressed_at_ms
    }

    /// Start a gesture from the current selection of `origin`.
    ///
    /// Returns the opposite-tree endpoints that could complete a match
    /// if hovered. When there are none the press is a plain click and no
    /// gesture starts.
    pub fn press(
        &mut self,
        origin: Side,
        x: f32,
        y: f32,
        time_ms: f64,
        panes: [&Pane; 2],
        oracle: &dyn CompatibilityOracle,
    ) -> Vec<EndpointId> {
        self.cancel();
        let origin_pane = panes[origin.index()];
        let selection = origin_pane.tree().selection().to_vec();
        if selection.is_empty() {
            return Vec::new();
        }

        let selected = endpoints(origin_pane, &selection);
        let other_visible = panes[origin.other().index()].visible_endpoints();
        let targets = reachable(&selected, &other_visible, oracle);
        if targets.is_empty() {
            log::debug!("press on {origin:?}: nothing reachable, plain click");
            return targets;
        }

        log::debug!(
            "gesture start on {:?}: {} selected, {} reachable",
            origin,
            selection.len(),
            targets.len()
        );
        self.phase = GesturePhase::Selecting;
        self.origin = Some(origin);
        self.selection = selection;
        self.pointer = (x, y);
        self.pressed_at_ms = time_ms;
        self.revisions = [panes[0].tree().revision(), panes[1].tree().revision()];
        targets
    }

    /// Track the pointer. Returns `true` when a gesture is in progress and
    /// the preview needs repainting.
    pub fn drag(
        &mut self,
        x: f32,
        y: f32,
        panes: [&Pane; 2],
        oracle: &dyn CompatibilityOracle,
    ) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        self.phase = GesturePhase::Previewing;
        self.pointer = (x, y);
        self.rematch(origin, panes, oracle);
        true
    }

    /// End the gesture at `(x, y)` and report what to do with the trees.
    pub fn release(
        &mut self,
        x: f32,
        y: f32,
        panes: [&Pane; 2],
        oracle: &dyn CompatibilityOracle,
    ) -> ReleaseOutcome {
        let Some(origin) = self.origin else {
            return ReleaseOutcome::Ignored;
        };
        self.pointer = (x, y);
        self.rematch(origin, panes, oracle);

        let live = std::mem::take(&mut self.live);
        let selection = std::mem::take(&mut self.selection);
        self.cancel();

        if live.is_feasible() {
            ReleaseOutcome::Commit {
                origin,
                selection,
                partners: live.partners,
            }
        } else {
            ReleaseOutcome::Rejected {
                origin,
                reason: live.infeasible_reason,
            }
        }
    }

    /// Drop back to idle without committing anything.
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
        self.origin = None;
        self.selection.clear();
        self.hovered = None;
        self.live = MatchResult::default();
    }

    /// Whether either tree changed structurally since the press.
    pub fn is_stale(&self, panes: [&Pane; 2]) -> bool {
        self.is_active()
            && (self.revisions[0] != panes[0].tree().revision()
                || self.revisions[1] != panes[1].tree().revision())
    }

    /// Preview lines to draw, only while dragging.
    pub fn preview(&self) -> Option<Preview<'_>> {
        if self.phase != GesturePhase::Previewing {
            return None;
        }
        Some(Preview {
            origin: self.origin?,
            selection: &self.selection,
            result: &self.live,
            pointer: Point::new(self.pointer.0 as f64, self.pointer.1 as f64),
        })
    }

    fn rematch(&mut self, origin: Side, panes: [&Pane; 2], oracle: &dyn CompatibilityOracle) {
        let other = panes[origin.other().index()];
        let hovered = hit_test(other, self.pointer.0, self.pointer.1);
        self.hovered = hovered;

        let selected = endpoints(panes[origin.index()], &self.selection);
        let other_visible = other.visible_endpoints();
        self.live = resolve(
            hovered.and_then(|id| other.endpoint(id)),
            &selected,
            &other_visible,
            oracle,
        );
        log::trace!(
            "hover {:?}: feasible={} worst={:?}",
            hovered,
            self.live.is_feasible(),
            self.live.worst_rating
        );
    }
}
