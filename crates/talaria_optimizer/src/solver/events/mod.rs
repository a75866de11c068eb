pub mod event_bus;
pub mod event_recorder;
pub mod search_event;
