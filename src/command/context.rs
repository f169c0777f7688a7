use uuid::Uuid;

use crate::event::{EditorEvent, EventBus, SelectionEvent};
use crate::scene::Scene;
use crate::selection::SelectionTracker;
use crate::tool::ActiveTool;

use super::CommandError;

/// Context for command execution, providing access to the scene,
/// selection, tool state, and the event bus.
pub struct CommandContext<'a> {
    /// The scene being edited
    pub scene: &'a mut Scene,
    /// The current selection
    pub selection: &'a mut SelectionTracker,
    /// The event bus for broadcasting changes
    pub events: &'a EventBus,
    /// The sidebar tool currently open
    pub active_tool: &'a mut ActiveTool,
}

impl CommandContext<'_> {
    /// Replace the selection wholesale and notify. An empty result is
    /// treated as a clear, including the tool fallback.
    pub fn select(&mut self, candidates: Vec<Uuid>) {
        let was_empty = self.selection.is_empty();
        self.selection.set(&candidates, self.scene);
        if self.selection.is_empty() {
            self.clear_selection();
            return;
        }
        let current = self.selection.current().to_vec();
        let event = if was_empty {
            SelectionEvent::Created(current)
        } else {
            SelectionEvent::Updated(current)
        };
        self.events.emit(EditorEvent::SelectionChanged(event));
    }

    /// Clear the selection. Any tool whose availability depends on a
    /// non-empty selection falls back to the default select tool.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.events
            .emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
        if self.active_tool.is_selection_dependent() {
            let old = *self.active_tool;
            *self.active_tool = ActiveTool::Select;
            self.events.emit(EditorEvent::ToolChanged {
                old,
                new: ActiveTool::Select,
            });
        }
    }

    pub(crate) fn require_selection(&self) -> Result<Vec<Uuid>, CommandError> {
        if self.selection.is_empty() {
            return Err(CommandError::IneligibleSelection("empty selection"));
        }
        Ok(self.selection.current().to_vec())
    }
}
