//! Undo/Redo command stack.
//!
//! Every user-visible connection edit is one reversible [`Command`]: the
//! links it added and the links it removed. A multi-connect drop or a
//! "remove connections" on several rows is a single step. Undo pops and
//! reverts through the [`ConnectionMutator`]; redo re-applies.

use crate::mutator::{ConnectionMutator, Link};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The net effect of one edit on persisted connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdit {
    pub added: SmallVec<[Link; 4]>,
    pub removed: SmallVec<[Link; 4]>,
}

impl ConnectionEdit {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Re-apply the edit.
    pub fn apply(&self, mutator: &mut ConnectionMutator<'_>) {
        for link in &self.removed {
            mutator.disconnect(*link);
        }
        for link in &self.added {
            mutator.restore(*link);
        }
    }

    /// Undo the edit, newest link first.
    pub fn revert(&self, mutator: &mut ConnectionMutator<'_>) {
        for link in self.added.iter().rev() {
            mutator.disconnect(*link);
        }
        for link in self.removed.iter().rev() {
            mutator.restore(*link);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    pub edit: ConnectionEdit,
    pub description: String,
}

/// Undo log the engine reports completed edits to.
///
/// [`CommandStack`] is the stock implementation. Hosts with their own undo
/// system implement `record` and replay edits through
/// [`ConnectionEdit::revert`] / [`ConnectionEdit::apply`] themselves, or
/// override `undo` / `redo` to let the engine drive it.
pub trait UndoLog {
    /// Called once per user-visible edit; `edit` is never empty.
    fn record(&mut self, description: &str, edit: ConnectionEdit);

    /// Revert the newest edit. Returns its description.
    fn undo(&mut self, _mutator: &mut ConnectionMutator<'_>) -> Option<String> {
        None
    }

    /// Re-apply the newest undone edit.
    fn redo(&mut self, _mutator: &mut ConnectionMutator<'_>) -> Option<String> {
        None
    }
}

/// Manages undo/redo stacks.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(128)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Description of the command `undo` would revert.
    pub fn peek_undo(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description.as_str())
    }
}

impl UndoLog for CommandStack {
    fn record(&mut self, description: &str, edit: ConnectionEdit) {
        if edit.is_empty() {
            return;
        }
        self.undo_stack.push(Command {
            edit,
            description: description.to_string(),
        });
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    fn undo(&mut self, mutator: &mut ConnectionMutator<'_>) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        cmd.edit.revert(mutator);
        let desc = cmd.description.clone();
        self.redo_stack.push(cmd);
        Some(desc)
    }

    fn redo(&mut self, mutator: &mut ConnectionMutator<'_>) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        cmd.edit.apply(mutator);
        let desc = cmd.description.clone();
        self.undo_stack.push(cmd);
        Some(desc)
    }
}
