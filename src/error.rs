use thiserror::Error;

use crate::command::CommandError;
use crate::export::ExportError;
use crate::serializer::PersistenceError;

/// Top-level error type for editor session operations
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// The session has been disposed; its scene must not be mutated
    #[error("editor session is disposed")]
    Disposed,

    #[error("no {0} collaborator configured")]
    MissingCollaborator(&'static str),

    #[error("failed to start task pool: {0}")]
    TaskPool(#[from] std::io::Error),
}
