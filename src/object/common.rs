use egui::Color32;

// Default styling applied to newly inserted objects, matching the
// poster editor's shape presets.
pub const DEFAULT_FILL_COLOR: Color32 = Color32::BLACK;
pub const DEFAULT_STROKE_COLOR: Color32 = Color32::BLACK;
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
pub const DEFAULT_SHAPE_SIZE: f32 = 400.0;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f32 = 32.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

// Common constants for all object kinds
pub const MIN_OBJECT_SIZE: f32 = 2.0;

/// Offset applied to pasted clones so they do not sit exactly on top
/// of their source.
pub const PASTE_OFFSET: f32 = 10.0;

/// Validates that object dimensions meet the minimum size
pub(crate) fn validate_size(width: f32, height: f32) -> Result<(), String> {
    if width < MIN_OBJECT_SIZE || height < MIN_OBJECT_SIZE {
        Err(format!(
            "Object dimensions too small (min: {}). Width: {}, Height: {}",
            MIN_OBJECT_SIZE, width, height
        ))
    } else {
        Ok(())
    }
}
