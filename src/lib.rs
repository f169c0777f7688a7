#![warn(clippy::all, rust_2018_idioms)]

pub mod autosave;
pub mod command;
pub mod editor;
pub mod error;
pub mod event;
pub mod export;
pub mod object;
pub mod scene;
pub mod selection;
pub mod serializer;
pub mod services;
mod task;
pub mod tool;

pub use autosave::{AutosaveScheduler, SavePayload};
pub use command::{Command, CommandError, History, Snapshot};
pub use editor::{Editor, EditorOptions};
pub use error::EditorError;
pub use event::{EditorEvent, EventBus, EventHandler};
pub use object::{Fill, SceneObject, ShapeKind, ShapeStyle};
pub use scene::{Scene, Workspace};
pub use selection::SelectionTracker;
pub use tool::ActiveTool;
