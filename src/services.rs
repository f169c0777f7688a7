//! External collaborators consumed by the editing core, behind narrow
//! async contracts. The core issues a request, awaits completion off
//! the editing path, and re-enters through the command path on
//! success; it never retries on its own.

use futures::future::BoxFuture;
use thiserror::Error;

/// What the project store hands back on load, and what it receives on
/// save
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectData {
    pub json: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load project: {0}")]
    Load(String),
    #[error("failed to save project: {0}")]
    Save(String),
}

/// The persisted-document store. The core calls `save` only through
/// the autosave scheduler; last write wins, no merge resolution.
pub trait ProjectStore: Send + Sync {
    fn load(&self, id: &str) -> BoxFuture<'static, Result<ProjectData, StoreError>>;
    fn save(&self, id: &str, data: ProjectData) -> BoxFuture<'static, Result<(), StoreError>>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("failed to fetch asset: {0}")]
    Fetch(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// Asset storage resolving image sources: uploads yield a URL, and
/// URLs resolve back to bytes.
pub trait AssetStore: Send + Sync {
    fn upload(&self, name: &str, bytes: Vec<u8>) -> BoxFuture<'static, Result<String, AssetError>>;
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, AssetError>>;
}

/// Background-removal service, in-process or remote. The algorithm is
/// the collaborator's concern; failures come back as a plain message.
/// The result is the processed image, encoded.
pub trait BackgroundRemoval: Send + Sync {
    fn remove_background(&self, src: &str) -> BoxFuture<'static, Result<Vec<u8>, String>>;
}
