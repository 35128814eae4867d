pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{DragEvent, GlobeEvent, InputEvent, ResizeEvent, TickEvent, ZoomEvent};
pub use handler::{EventSender, InputHandler, ZoomAccumulator};
