//! Connection engine: the host-facing facade.
//!
//! Owns both panes, the compatibility oracle, the port network, the gesture
//! state machine, the renderer and the undo stack. The host forwards
//! pointer events and structural edits, and calls [`ConnectionEngine::render`]
//! each frame. Everything runs on the host's UI thread.

use crate::commands::{CommandStack, ConnectionEdit, UndoLog};
use crate::config::EngineConfig;
use crate::gesture::{ConnectGesture, ReleaseOutcome};
use crate::input::{InputEvent, Modifiers, MouseButton};
use crate::mutator::{ConnectionMutator, connection_count};
use pw_core::id::EndpointId;
use pw_core::model::{ResolvedBounds, Side};
use pw_core::network::{LinkTable, PortNetwork};
use pw_core::oracle::CompatibilityOracle;
use pw_core::pane::{Pane, TreeView};
use pw_core::tree::EndpointTree;
use pw_render::hit::{hit_test, side_at};
use pw_render::paint::{ConnectionCanvas, ConnectionRenderer};

/// Entries of the per-tree context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    /// Remove every connection touching the selected endpoints (and the
    /// ports below selected structural rows).
    RemoveConnections,
    SelectAll,
    ClearSelection,
}

/// Called after a drop commits, with the selection and its partners in
/// pairing order.
pub type ConnectCallback = Box<dyn FnMut(&[EndpointId], &[EndpointId])>;

pub struct ConnectionEngine<N: PortNetwork = LinkTable, U: UndoLog = CommandStack> {
    /// Indexed by [`Side::index`].
    panes: [Pane; 2],
    oracle: Box<dyn CompatibilityOracle>,
    network: N,
    gesture: ConnectGesture,
    renderer: ConnectionRenderer,
    undo_log: U,
    config: EngineConfig,
    on_connect: Option<ConnectCallback>,
}

fn mutator<'a, N: PortNetwork>(
    panes: &'a mut [Pane; 2],
    network: &'a mut N,
) -> ConnectionMutator<'a> {
    let [source, target] = panes;
    ConnectionMutator::new(source.tree_mut(), target.tree_mut(), network)
}

impl<N: PortNetwork> ConnectionEngine<N> {
    /// Engine with the stock [`CommandStack`] undo log, `undo_depth` deep.
    ///
    /// # Panics
    /// If `source` and `target` are not the source and target panes.
    pub fn new(
        source: Pane,
        target: Pane,
        oracle: impl CompatibilityOracle + 'static,
        network: N,
        config: EngineConfig,
    ) -> Self {
        let undo_log = CommandStack::new(config.undo_depth);
        Self::with_undo_log(source, target, oracle, network, config, undo_log)
    }
}

impl<N: PortNetwork, U: UndoLog> ConnectionEngine<N, U> {
    /// Engine reporting edits to a host-supplied undo log.
    ///
    /// # Panics
    /// If `source` and `target` are not the source and target panes.
    pub fn with_undo_log(
        source: Pane,
        target: Pane,
        oracle: impl CompatibilityOracle + 'static,
        network: N,
        config: EngineConfig,
        undo_log: U,
    ) -> Self {
        assert_eq!(source.side(), Side::Source, "first pane must be the source");
        assert_eq!(target.side(), Side::Target, "second pane must be the target");
        Self {
            panes: [source, target],
            oracle: Box::new(oracle),
            network,
            gesture: ConnectGesture::new(),
            renderer: ConnectionRenderer::new(config.translucent_threshold),
            undo_log,
            config,
            on_connect: None,
        }
    }

    pub fn pane(&self, side: Side) -> &Pane {
        &self.panes[side.index()]
    }

    pub fn tree(&self, side: Side) -> &EndpointTree {
        self.panes[side.index()].tree()
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn gesture(&self) -> &ConnectGesture {
        &self.gesture
    }

    pub fn undo_log(&self) -> &U {
        &self.undo_log
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register the "connection committed" callback.
    pub fn set_on_connect_committed(
        &mut self,
        callback: impl FnMut(&[EndpointId], &[EndpointId]) + 'static,
    ) {
        self.on_connect = Some(Box::new(callback));
    }

    // ─── Tree edits ──────────────────────────────────────────────────────

    /// Edit one tree (add/remove endpoints, expand/collapse, ...). Rows are
    /// re-resolved afterwards, and a gesture whose snapshot went stale is
    /// cancelled.
    pub fn edit_tree<R>(&mut self, side: Side, f: impl FnOnce(&mut EndpointTree) -> R) -> R {
        let result = self.panes[side.index()].edit(f);
        self.cancel_if_stale();
        result
    }

    pub fn scroll(&mut self, side: Side, dy: f32) {
        self.panes[side.index()].scroll_by(dy);
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Route a normalized input event. Returns `true` if a repaint is
    /// needed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
                time_ms,
            } => match self.side_at(x, y) {
                Some(side) => self.on_press(side, x, y, button, modifiers, time_ms),
                None if button == MouseButton::Primary => {
                    self.cancel();
                    true
                }
                None => false,
            },
            InputEvent::PointerMove { x, y } => self.on_move(x, y),
            InputEvent::PointerUp { x, y, button } => {
                button == MouseButton::Primary && self.on_release(x, y)
            }
            InputEvent::Scroll { x, y, dy } => match self.side_at(x, y) {
                Some(side) => {
                    self.scroll(side, dy);
                    true
                }
                None => false,
            },
        }
    }

    fn side_at(&self, x: f32, y: f32) -> Option<Side> {
        let views: [&dyn TreeView; 2] = [&self.panes[0], &self.panes[1]];
        side_at(views, x, y)
    }

    /// Pointer pressed in the `side` tree.
    ///
    /// A plain click selects the row under the pointer (keeping a multi
    /// selection it is part of), ctrl/cmd-click toggles it, a click on empty
    /// space clears. The other tree's selection is cleared, then a gesture
    /// starts from whatever is selected and its drop targets are
    /// highlighted. Non-primary buttons are ignored here.
    pub fn on_press(
        &mut self,
        side: Side,
        x: f32,
        y: f32,
        button: MouseButton,
        modifiers: Modifiers,
        time_ms: f64,
    ) -> bool {
        if button != MouseButton::Primary {
            return false;
        }
        let hit = hit_test(&self.panes[side.index()], x, y);
        let tree = self.panes[side.index()].tree_mut();
        match hit {
            Some(id) if modifiers.toggles_selection() => tree.toggle_selected(id),
            Some(id) if !tree.is_selected(id) => tree.select(id),
            Some(_) => {}
            None => tree.clear_selection(),
        }
        tree.clear_highlighted();
        let other = self.panes[side.other().index()].tree_mut();
        other.clear_selection();

        let panes = [&self.panes[0], &self.panes[1]];
        let targets = self
            .gesture
            .press(side, x, y, time_ms, panes, self.oracle.as_ref());
        self.panes[side.other().index()]
            .tree_mut()
            .set_highlighted(targets);
        true
    }

    /// Pointer moved. Returns `true` while a gesture is previewing.
    pub fn on_move(&mut self, x: f32, y: f32) -> bool {
        if !self.gesture.is_active() {
            return false;
        }
        if self.cancel_if_stale() {
            return true;
        }
        let panes = [&self.panes[0], &self.panes[1]];
        self.gesture.drag(x, y, panes, self.oracle.as_ref())
    }

    /// Pointer released: commit the live match or reject the drop.
    pub fn on_release(&mut self, x: f32, y: f32) -> bool {
        if self.cancel_if_stale() {
            return true;
        }
        let panes = [&self.panes[0], &self.panes[1]];
        match self.gesture.release(x, y, panes, self.oracle.as_ref()) {
            ReleaseOutcome::Ignored => false,
            ReleaseOutcome::Rejected { origin, reason } => {
                if let Some(reason) = reason {
                    log::debug!("drop rejected: {reason}");
                }
                let other = self.panes[origin.other().index()].tree_mut();
                other.clear_selection();
                other.clear_highlighted();
                true
            }
            ReleaseOutcome::Commit {
                selection,
                partners,
                ..
            } => {
                self.commit(&selection, &partners);
                true
            }
        }
    }

    /// Abandon any gesture in progress without committing.
    pub fn cancel(&mut self) {
        if self.gesture.is_active() {
            log::debug!("gesture cancelled");
        }
        self.gesture.cancel();
        for pane in &mut self.panes {
            pane.tree_mut().clear_highlighted();
        }
    }

    fn cancel_if_stale(&mut self) -> bool {
        let panes = [&self.panes[0], &self.panes[1]];
        if !self.gesture.is_stale(panes) {
            return false;
        }
        log::warn!("tree changed during drag, cancelling gesture");
        self.cancel();
        true
    }

    fn commit(&mut self, selection: &[EndpointId], partners: &[EndpointId]) {
        let mut edit = ConnectionEdit::default();
        {
            let mut m = mutator(&mut self.panes, &mut self.network);
            for (selected, partner) in selection.iter().zip(partners) {
                if let Some(link) = m.connect(*selected, *partner) {
                    edit.added.push(link);
                }
            }
        }
        log::info!(
            "connected {} pair(s), {} new",
            selection.len(),
            edit.added.len()
        );
        if !edit.is_empty() {
            self.undo_log.record("Connect", edit);
        }

        for pane in &mut self.panes {
            pane.tree_mut().clear_selection();
            pane.tree_mut().clear_highlighted();
        }
        if let Some(callback) = self.on_connect.as_mut() {
            callback(selection, partners);
        }
    }

    // ─── Context menu ────────────────────────────────────────────────────

    /// Actions offered by a right-click in the `side` tree. Opening or using
    /// the menu never touches an in-progress gesture.
    pub fn context_menu(&self, side: Side) -> Vec<ContextAction> {
        let tree = self.tree(side);
        let mut actions = Vec::new();
        let trees = [self.panes[0].tree(), self.panes[1].tree()];
        if self
            .selected_ports(side)
            .into_iter()
            .any(|id| connection_count(trees, id) > 0)
        {
            actions.push(ContextAction::RemoveConnections);
        }
        if !tree.display_order().is_empty() {
            actions.push(ContextAction::SelectAll);
        }
        if !tree.selection().is_empty() {
            actions.push(ContextAction::ClearSelection);
        }
        actions
    }

    /// Apply a context-menu action. Returns `true` if anything changed.
    pub fn apply_context_action(&mut self, side: Side, action: ContextAction) -> bool {
        match action {
            ContextAction::RemoveConnections => {
                let ports = self.selected_ports(side);
                let mut edit = ConnectionEdit::default();
                {
                    let mut m = mutator(&mut self.panes, &mut self.network);
                    for id in ports {
                        edit.removed.extend(m.remove_connections(id));
                    }
                }
                let changed = !edit.is_empty();
                if changed {
                    log::info!("removed {} connection(s)", edit.removed.len());
                    self.undo_log.record("Remove connections", edit);
                }
                changed
            }
            ContextAction::SelectAll => {
                self.panes[side.index()].tree_mut().select_all();
                self.panes[side.other().index()].tree_mut().clear_selection();
                true
            }
            ContextAction::ClearSelection => {
                let tree = self.panes[side.index()].tree_mut();
                let changed = !tree.selection().is_empty();
                tree.clear_selection();
                changed
            }
        }
    }

    /// Connectable endpoints in or below the selection of `side`.
    fn selected_ports(&self, side: Side) -> Vec<EndpointId> {
        let tree = self.tree(side);
        let mut ports = Vec::new();
        for selected in tree.selection() {
            for id in tree.subtree(*selected) {
                if !ports.contains(&id) && tree.get(id).is_some_and(|e| e.is_connectable()) {
                    ports.push(id);
                }
            }
        }
        ports
    }

    // ─── Undo ────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        let mut m = mutator(&mut self.panes, &mut self.network);
        self.undo_log.undo(&mut m)
    }

    pub fn redo(&mut self) -> Option<String> {
        let mut m = mutator(&mut self.panes, &mut self.network);
        self.undo_log.redo(&mut m)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Paint persisted connections, highlights and the drag preview.
    /// Highlights are emphasized once the press has been held for
    /// `highlight_delay_ms`. Returns the number of lines drawn.
    pub fn render(
        &mut self,
        canvas: &mut dyn ConnectionCanvas,
        viewport: ResolvedBounds,
        time_ms: f64,
    ) -> usize {
        let emphasize = self.gesture.is_active()
            && time_ms - self.gesture.pressed_at_ms() >= self.config.highlight_delay_ms;
        let views: [&dyn TreeView; 2] = [&self.panes[0], &self.panes[1]];
        self.renderer
            .paint(canvas, views, self.gesture.preview(), viewport, emphasize)
    }
}
