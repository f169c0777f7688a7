use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Snapshot;
use crate::object::SceneObject;
use crate::scene::{Scene, Workspace};

/// Errors that can occur converting between the live scene and the
/// persisted document
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document violates a model invariant. Treated as
    /// unrecoverable for the session: this indicates a bug upstream,
    /// not user input to repair.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// The persisted project format: the full object sequence (z-order by
/// position), the workspace, and the canvas dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub objects: Vec<SceneObject>,
    pub workspace: Workspace,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        let workspace = scene.workspace().clone();
        Self {
            objects: scene.objects().to_vec(),
            canvas_width: workspace.width,
            canvas_height: workspace.height,
            workspace,
        }
    }
}

/// Serialize the scene into the transmissible JSON document
pub fn serialize_scene(scene: &Scene) -> Result<String, PersistenceError> {
    let document = SceneDocument::from_scene(scene);
    Ok(serde_json::to_string(&document)?)
}

/// Rebuild a scene from a JSON document, replacing all content.
///
/// Fails fast on malformed documents (missing workspace, degenerate
/// dimensions) rather than silently repairing them.
pub fn deserialize_scene(json: &str) -> Result<Scene, PersistenceError> {
    let document: SceneDocument = serde_json::from_str(json)?;
    if document.workspace.width == 0 || document.workspace.height == 0 {
        return Err(PersistenceError::InvalidDocument(format!(
            "workspace dimensions must be positive, got {}x{}",
            document.workspace.width, document.workspace.height
        )));
    }
    Ok(Scene::from_parts(document.workspace, document.objects))
}

/// Take a history snapshot of the current scene state
pub fn snapshot(scene: &Scene) -> Result<Snapshot, PersistenceError> {
    let workspace = scene.workspace();
    Ok(Snapshot {
        json: serialize_scene(scene)?,
        width: workspace.width,
        height: workspace.height,
    })
}
