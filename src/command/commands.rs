use egui::{Color32, Vec2};
use uuid::Uuid;

use crate::event::EditorEvent;
use crate::object::{
    Fill, ImageFilter, PixelData, SceneObject, Shadow, ShapeKind, ShapeStyle, TextAlign,
};
use crate::scene::ReorderTarget;

use super::{CommandContext, CommandError, CommandResult};

/// The catalog of document-mutating operations. Each command applies
/// one coherent change to the scene; the editor session follows every
/// successful execution with a history push and an autosave mark.
///
/// Transient UI changes (tool activation, selection events) are not
/// commands: they live on the editor directly and skip history.
#[derive(Debug, Clone)]
pub enum Command {
    /// Insert a new shape at the workspace center
    AddShape {
        id: Uuid,
        kind: ShapeKind,
        style: ShapeStyle,
    },
    /// Insert a new text object at the workspace center
    AddText { id: Uuid, content: String },
    /// Insert a resolved image asset. This is the synchronous tail of
    /// the async add-image path; the resource is already loaded.
    InsertImage {
        id: Uuid,
        src: String,
        pixels: Option<PixelData>,
        size: Vec2,
    },
    ChangeFillColor { color: Color32 },
    ChangeStrokeColor { color: Color32 },
    ChangeStrokeWidth { width: f32 },
    ChangeOpacity { opacity: f32 },
    ChangeFontFamily { family: String },
    ChangeFontSize { size: f32 },
    ChangeTextAlign { align: TextAlign },
    /// Apply a named filter to the single selected image; "none"
    /// clears the filter list.
    ChangeImageFilter { filter: String },
    /// Set the shadow stack uniformly across the selected text objects
    ChangeTextShadow { shadows: Vec<Shadow> },
    /// Set the workspace fill; dimensions are untouched
    ChangeBackground { fill: Fill },
    /// Resize the workspace. Dimensions must be positive.
    ChangeSize { width: i32, height: i32 },
    BringToFront,
    BringForward,
    SendBackwards,
    SendToBack,
    /// Remove all selected objects and clear the selection
    DeleteSelected,
    /// Insert pre-cloned objects (fresh ids, offset positions) and
    /// select them
    Paste { objects: Vec<SceneObject> },
    ToggleVisibility { id: Uuid },
    ToggleLock { id: Uuid },
    Rename { id: Uuid, name: String },
}

impl Command {
    /// Execute the command with the given context. On error the scene
    /// is left unchanged.
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddShape { id, kind, style } => {
                let mut object = SceneObject::shape(*kind, style.clone());
                object.id = *id;
                ctx.scene.center_object(&mut object);
                ctx.scene.add(object);
                ctx.events.emit(EditorEvent::ObjectAdded { id: *id });
                ctx.select(vec![*id]);
                Ok(())
            }

            Command::AddText { id, content } => {
                let mut object = SceneObject::text(content);
                object.id = *id;
                ctx.scene.center_object(&mut object);
                ctx.scene.add(object);
                ctx.events.emit(EditorEvent::ObjectAdded { id: *id });
                ctx.select(vec![*id]);
                Ok(())
            }

            Command::InsertImage {
                id,
                src,
                pixels,
                size,
            } => {
                let mut object = SceneObject::image(src, pixels.clone(), *size);
                object.id = *id;
                ctx.scene.center_object(&mut object);
                ctx.scene.add(object);
                ctx.events.emit(EditorEvent::ObjectAdded { id: *id });
                ctx.select(vec![*id]);
                Ok(())
            }

            Command::ChangeFillColor { color } => {
                self.for_each_selected(ctx, |object| {
                    object.fill = Fill::solid(*color);
                })
            }

            Command::ChangeStrokeColor { color } => {
                self.for_each_selected(ctx, |object| {
                    object.stroke.color = *color;
                })
            }

            Command::ChangeStrokeWidth { width } => {
                if *width < 0.0 {
                    return Err(CommandError::InvalidParameters(format!(
                        "stroke width must be non-negative, got {width}"
                    )));
                }
                self.for_each_selected(ctx, |object| {
                    object.stroke.width = *width;
                })
            }

            Command::ChangeOpacity { opacity } => {
                if !(0.0..=1.0).contains(opacity) {
                    return Err(CommandError::InvalidParameters(format!(
                        "opacity must be within [0, 1], got {opacity}"
                    )));
                }
                self.for_each_selected(ctx, |object| {
                    object.opacity = *opacity;
                })
            }

            Command::ChangeFontFamily { family } => {
                self.for_each_selected_text(ctx, |props| {
                    props.style.family = family.clone();
                })
            }

            Command::ChangeFontSize { size } => {
                if *size <= 0.0 {
                    return Err(CommandError::InvalidParameters(format!(
                        "font size must be positive, got {size}"
                    )));
                }
                self.for_each_selected_text(ctx, |props| {
                    props.style.size = *size;
                })
            }

            Command::ChangeTextAlign { align } => {
                self.for_each_selected_text(ctx, |props| {
                    props.style.align = *align;
                })
            }

            Command::ChangeImageFilter { filter } => {
                let ids = ctx.require_selection()?;
                if ids.len() != 1 {
                    return Err(CommandError::IneligibleSelection(
                        "filters require exactly one selected image",
                    ));
                }
                let id = ids[0];
                let filters = if filter == "none" {
                    Vec::new()
                } else {
                    let parsed = ImageFilter::from_name(filter)
                        .ok_or_else(|| CommandError::UnknownFilter(filter.clone()))?;
                    vec![parsed]
                };
                let object = ctx
                    .scene
                    .find_mut(id)
                    .ok_or(CommandError::ObjectNotFound(id))?;
                let props = object.as_image_mut().ok_or(
                    CommandError::IneligibleSelection("selected object is not an image"),
                )?;
                props.filters = filters;
                ctx.events.emit(EditorEvent::ObjectModified { id });
                Ok(())
            }

            Command::ChangeTextShadow { shadows } => {
                self.for_each_selected_text(ctx, |props| {
                    props.shadow = shadows.clone();
                })
            }

            Command::ChangeBackground { fill } => {
                ctx.scene.workspace_mut().fill = fill.clone();
                ctx.events.emit(EditorEvent::WorkspaceChanged);
                Ok(())
            }

            Command::ChangeSize { width, height } => {
                if *width <= 0 || *height <= 0 {
                    return Err(CommandError::InvalidParameters(format!(
                        "canvas dimensions must be positive, got {width}x{height}"
                    )));
                }
                let workspace = ctx.scene.workspace_mut();
                workspace.width = *width as u32;
                workspace.height = *height as u32;
                ctx.events.emit(EditorEvent::WorkspaceChanged);
                Ok(())
            }

            Command::BringToFront => self.reorder_selected(ctx, ReorderTarget::Front),
            Command::BringForward => self.reorder_selected(ctx, ReorderTarget::Forward),
            Command::SendBackwards => self.reorder_selected(ctx, ReorderTarget::Backwards),
            Command::SendToBack => self.reorder_selected(ctx, ReorderTarget::Back),

            Command::DeleteSelected => {
                let ids = ctx.require_selection()?;
                for id in ids {
                    if ctx.scene.remove(id).is_some() {
                        ctx.events.emit(EditorEvent::ObjectRemoved { id });
                    }
                }
                ctx.clear_selection();
                Ok(())
            }

            Command::Paste { objects } => {
                let mut pasted = Vec::with_capacity(objects.len());
                for object in objects {
                    let id = ctx.scene.add(object.clone());
                    ctx.events.emit(EditorEvent::ObjectAdded { id });
                    pasted.push(id);
                }
                ctx.select(pasted);
                Ok(())
            }

            Command::ToggleVisibility { id } => {
                let object = ctx
                    .scene
                    .find_mut(*id)
                    .ok_or(CommandError::ObjectNotFound(*id))?;
                object.visible = !object.visible;
                ctx.events.emit(EditorEvent::ObjectModified { id: *id });
                Ok(())
            }

            Command::ToggleLock { id } => {
                let object = ctx
                    .scene
                    .find_mut(*id)
                    .ok_or(CommandError::ObjectNotFound(*id))?;
                object.locked = !object.locked;
                let now_locked = object.locked;
                ctx.events.emit(EditorEvent::ObjectModified { id: *id });
                // A freshly locked object cannot stay selected
                if now_locked && ctx.selection.contains(*id) {
                    let remaining: Vec<Uuid> = ctx
                        .selection
                        .current()
                        .iter()
                        .copied()
                        .filter(|selected| selected != id)
                        .collect();
                    ctx.select(remaining);
                }
                Ok(())
            }

            Command::Rename { id, name } => {
                let object = ctx
                    .scene
                    .find_mut(*id)
                    .ok_or(CommandError::ObjectNotFound(*id))?;
                object.name = name.clone();
                ctx.events.emit(EditorEvent::ObjectModified { id: *id });
                Ok(())
            }
        }
    }

    fn for_each_selected(
        &self,
        ctx: &mut CommandContext<'_>,
        mut apply: impl FnMut(&mut SceneObject),
    ) -> CommandResult {
        let ids = ctx.require_selection()?;
        for id in ids {
            if let Some(object) = ctx.scene.find_mut(id) {
                apply(object);
                ctx.events.emit(EditorEvent::ObjectModified { id });
            }
        }
        Ok(())
    }

    fn for_each_selected_text(
        &self,
        ctx: &mut CommandContext<'_>,
        mut apply: impl FnMut(&mut crate::object::TextProps),
    ) -> CommandResult {
        let ids = ctx.require_selection()?;
        let text_ids: Vec<Uuid> = ids
            .into_iter()
            .filter(|id| ctx.scene.find(*id).is_some_and(|o| o.kind.is_text()))
            .collect();
        if text_ids.is_empty() {
            return Err(CommandError::IneligibleSelection(
                "no text object selected",
            ));
        }
        for id in text_ids {
            if let Some(props) = ctx.scene.find_mut(id).and_then(|o| o.as_text_mut()) {
                apply(props);
                ctx.events.emit(EditorEvent::ObjectModified { id });
            }
        }
        Ok(())
    }

    /// Reorder every selected object towards the target, preserving
    /// the selection's relative order. Boundary moves are no-ops.
    fn reorder_selected(
        &self,
        ctx: &mut CommandContext<'_>,
        target: ReorderTarget,
    ) -> CommandResult {
        let ids = ctx.require_selection()?;
        let mut by_index: Vec<(usize, Uuid)> = ids
            .iter()
            .filter_map(|id| ctx.scene.index_of(*id).map(|index| (index, *id)))
            .collect();
        by_index.sort_by_key(|(index, _)| *index);
        // Moving towards the top starts from the bottom-most selected
        // object; moving towards the bottom starts from the top-most.
        if matches!(target, ReorderTarget::Backwards | ReorderTarget::Back) {
            by_index.reverse();
        }
        let mut changed = false;
        for (_, id) in by_index {
            changed |= ctx.scene.reorder(id, target);
        }
        if changed {
            ctx.events.emit(EditorEvent::OrderChanged);
        }
        Ok(())
    }
}
