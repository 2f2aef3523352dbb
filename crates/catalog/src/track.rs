//! Fire-and-forget interaction tracking.
//!
//! Events are an outbound signal only: delivery failure is logged and
//! dropped, never surfaced to the user action that produced the event.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use makola_core::{InteractionEvent, InteractionKind};

/// Delivery error from an event sink.
#[derive(Debug, thiserror::Error)]
#[error("Event delivery failed: {0}")]
pub struct SinkError(pub String);

/// Destination for interaction events.
///
/// `deliver` must not block the caller; sinks that do real I/O hand the
/// event off to a background task.
pub trait EventSink: Send + Sync {
    /// Accept one event for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be accepted; the tracker
    /// logs and drops it.
    fn deliver(&self, event: InteractionEvent) -> Result<(), SinkError>;
}

/// Sink that discards everything.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn deliver(&self, _event: InteractionEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that records events in memory, for tests.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far.
    #[must_use]
    pub fn events(&self) -> Vec<InteractionEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemorySink {
    fn deliver(&self, event: InteractionEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

/// Sink that posts events to the remote store's `/events` endpoint.
///
/// Each event is handed to a spawned task; the HTTP outcome is logged and
/// otherwise ignored.
pub struct HttpEventSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEventSink {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/events", base_url.trim_end_matches('/')),
        }
    }
}

impl EventSink for HttpEventSink {
    fn deliver(&self, event: InteractionEvent) -> Result<(), SinkError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| SinkError(e.to_string()))?;
        let request = self.client.post(&self.endpoint).json(&event);
        handle.spawn(async move {
            match request.send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "Event sink rejected event");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Event delivery failed"),
            }
        });
        Ok(())
    }
}

/// Shared handle for emitting interaction events.
#[derive(Clone)]
pub struct InteractionTracker {
    sink: Arc<dyn EventSink>,
}

impl InteractionTracker {
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Tracker that drops everything, for callers without a sink.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    /// Emit one event; never fails, never blocks.
    pub fn track(&self, event: InteractionEvent) {
        if let Err(e) = self.sink.deliver(event) {
            debug!(error = %e, "Dropped interaction event");
        }
    }

    /// Emit a product view.
    pub fn track_view(&self, seller_id: &str, product_id: &str) {
        self.track(InteractionEvent::new(InteractionKind::View, seller_id).with_product(product_id));
    }

    /// Emit a contact (seller reached over the messaging channel).
    pub fn track_contact(&self, seller_id: &str, product_id: &str) {
        self.track(
            InteractionEvent::new(InteractionKind::Contact, seller_id).with_product(product_id),
        );
    }

    /// Emit a store view.
    pub fn track_store_view(&self, seller_id: &str) {
        self.track(InteractionEvent::new(InteractionKind::StoreView, seller_id));
    }
}
