use std::sync::Arc;

use super::search_event::SearchEvent;

/// Read-only observer of the search.
pub trait SearchListener: Send + Sync {
    fn on_event(&self, event: &SearchEvent);
}

impl<F> SearchListener for F
where
    F: Fn(&SearchEvent) + Send + Sync,
{
    fn on_event(&self, event: &SearchEvent) {
        self(event)
    }
}

/// Fans events out to the subscribed listeners.
///
/// Events are built lazily: without listeners, emitting costs a single length check.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Vec<Arc<dyn SearchListener>>,
}

impl EventBus {
    pub fn subscribe(&mut self, listener: Arc<dyn SearchListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    #[inline]
    pub fn emit(&self, event: impl FnOnce() -> SearchEvent) {
        if self.listeners.is_empty() {
            return;
        }

        let event = event();
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }
}
