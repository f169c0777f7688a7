use serde::{Deserialize, Serialize};

/// The sidebar tool currently open in the editing surface. Tool state
/// is transient UI state: changing it never touches history or
/// autosave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveTool {
    #[default]
    Select,
    Shapes,
    Text,
    Images,
    Draw,
    Fill,
    StrokeColor,
    StrokeWidth,
    Font,
    Opacity,
    Filter,
    RemoveBg,
    TextEffects,
    Settings,
    Layers,
}

impl ActiveTool {
    /// Tools that only make sense with a non-empty selection. Clearing
    /// the selection while one of these is open falls back to `Select`.
    pub fn is_selection_dependent(&self) -> bool {
        matches!(
            self,
            ActiveTool::Fill
                | ActiveTool::Font
                | ActiveTool::Filter
                | ActiveTool::Opacity
                | ActiveTool::RemoveBg
                | ActiveTool::StrokeColor
                | ActiveTool::StrokeWidth
                | ActiveTool::TextEffects
        )
    }
}
