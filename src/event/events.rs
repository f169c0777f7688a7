use uuid::Uuid;

use crate::tool::ActiveTool;

#[derive(Debug, Clone)]
pub enum SelectionEvent {
    Created(Vec<Uuid>),
    Updated(Vec<Uuid>),
    Cleared,
}

/// Change notifications emitted after a mutation has been fully
/// applied to the scene. Subscribers (layers list, toolbars) recompute
/// their derived state from the model; they never observe a
/// partially-applied mutation.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    ObjectAdded { id: Uuid },
    ObjectRemoved { id: Uuid },
    ObjectModified { id: Uuid },
    /// Z-order changed; the whole sequence should be re-read
    OrderChanged,
    WorkspaceChanged,
    SelectionChanged(SelectionEvent),
    ToolChanged { old: ActiveTool, new: ActiveTool },
    /// Undo/redo swapped in a different snapshot
    HistoryRestored,
    DocumentSaved { ok: bool },
    /// An async operation (image load, upload, background removal)
    /// failed; the scene was left unchanged.
    TaskFailed { message: String },
}
