mod commands;
mod context;
mod history;

use thiserror::Error;
use uuid::Uuid;

pub use commands::Command;
pub use context::CommandContext;
pub use history::{History, Snapshot};

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution. A failed command
/// leaves the scene unchanged and is never recorded in history.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("object {0} not found")]
    ObjectNotFound(Uuid),
    /// The command was invoked against a selection it does not apply to
    #[error("selection does not qualify: {0}")]
    IneligibleSelection(&'static str),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("unknown filter \"{0}\"")]
    UnknownFilter(String),
    #[error("unknown text effect \"{0}\"")]
    UnknownEffect(String),
}
