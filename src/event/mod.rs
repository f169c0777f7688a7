mod bus;
mod events;

pub use bus::EventBus;
pub use events::{EditorEvent, SelectionEvent};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}
