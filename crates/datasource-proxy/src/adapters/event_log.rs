//! # Event Log Adapters

use crate::events::ProxyEvent;
use crate::ports::outbound::EventPublisher;
use parking_lot::Mutex;
use tracing::trace;

/// Keeps every published event in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<ProxyEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<ProxyEvent> {
        self.events.lock().clone()
    }

    /// Number of events published so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: ProxyEvent) {
        trace!(topic = event.topic(), "Recording proxy event");
        self.events.lock().push(event);
    }
}
