pub mod event;

pub use event::{Event, EventChanges, EventFilter, NewEvent, Visibility};
