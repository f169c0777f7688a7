use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::object::{Fill, SceneObject};

/// Default canvas dimensions for a new poster
pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 1200;

/// Canvas size presets offered by the settings sidebar
pub const PRESET_SQUARE: (u32, u32) = (1080, 1080);
pub const PRESET_PORTRAIT: (u32, u32) = (1080, 1350);
pub const PRESET_LANDSCAPE: (u32, u32) = (1920, 1080);

/// The distinguished canvas boundary: background fill plus fixed
/// dimensions. Not an entry in the object sequence, never selectable,
/// and the clip bounds for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub width: u32,
    pub height: u32,
    pub fill: Fill,
}

impl Workspace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fill: Fill::solid(Color32::WHITE),
        }
    }

    pub fn center(&self) -> egui::Pos2 {
        egui::Pos2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Where a reorder operation moves an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderTarget {
    /// Top of the stack
    Front,
    /// One step towards the top
    Forward,
    /// One step towards the bottom
    Backwards,
    /// Bottom of the stack
    Back,
}

/// The live scene model: one workspace plus the ordered object
/// sequence. Front of the sequence is the bottom of the stack.
///
/// Objects are addressed by stable identifier, never by reference, so
/// undo/redo and deserialization can swap the whole collection without
/// dangling handles.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    workspace: Workspace,
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            workspace: Workspace::new(width, height),
            objects: Vec::new(),
        }
    }

    /// Reconstruct a scene from deserialized parts
    pub(crate) fn from_parts(workspace: Workspace, objects: Vec<SceneObject>) -> Self {
        Self { workspace, objects }
    }

    /// Ordered object sequence, workspace excluded
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find(&self, id: Uuid) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Append an object at the top of the stack
    pub fn add(&mut self, object: SceneObject) -> Uuid {
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Remove an object by identity
    pub fn remove(&mut self, id: Uuid) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Move an object within the stack. Moving beyond a boundary
    /// clamps; the return value reports whether the order changed.
    pub fn reorder(&mut self, id: Uuid, target: ReorderTarget) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let last = self.objects.len() - 1;
        let new_index = match target {
            ReorderTarget::Front => last,
            ReorderTarget::Forward => (index + 1).min(last),
            ReorderTarget::Backwards => index.saturating_sub(1),
            ReorderTarget::Back => 0,
        };
        if new_index == index {
            return false;
        }
        let object = self.objects.remove(index);
        self.objects.insert(new_index, object);
        true
    }

    /// Replace the entire model content, clearing existing objects
    pub fn replace(&mut self, workspace: Workspace, objects: Vec<SceneObject>) {
        self.workspace = workspace;
        self.objects = objects;
    }

    /// Center an object over the workspace
    pub fn center_object(&self, object: &mut SceneObject) {
        let center = self.workspace.center();
        object.position = egui::Pos2::new(
            center.x - object.size.x / 2.0,
            center.y - object.size.y / 2.0,
        );
    }
}
