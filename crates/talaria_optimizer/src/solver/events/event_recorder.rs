use parking_lot::Mutex;

use super::{event_bus::SearchListener, search_event::SearchEvent};

/// Keeps every received event, optionally only the ones with the given names.
#[derive(Default)]
pub struct EventRecorder {
    filter: Option<Vec<&'static str>>,
    events: Mutex<Vec<SearchEvent>>,
}

impl EventRecorder {
    pub fn only(names: Vec<&'static str>) -> Self {
        EventRecorder {
            filter: Some(names),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    pub fn take(&self) -> Vec<SearchEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl SearchListener for EventRecorder {
    fn on_event(&self, event: &SearchEvent) {
        if let Some(filter) = &self.filter
            && !filter.contains(&event.name())
        {
            return;
        }

        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter() {
        let recorder = EventRecorder::only(vec!["ruin_ended"]);
        recorder.on_event(&SearchEvent::RuinEnded { removed: 2 });
        recorder.on_event(&SearchEvent::IterationStarted { iteration: 1 });

        assert_eq!(recorder.count("ruin_ended"), 1);
        assert_eq!(recorder.take(), vec![SearchEvent::RuinEnded { removed: 2 }]);
        assert!(recorder.events().is_empty());
    }
}
