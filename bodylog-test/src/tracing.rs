//! Tracing utilities for asserting on emitted log lines.
//!
//! The interceptors log through `tracing`; tests install a [`LogCollector`]
//! as the thread's default dispatcher and inspect the captured events.

use std::sync::{Arc, Mutex};

use tracing::dispatcher::DefaultGuard;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Captured event information for testing.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level
    pub level: Level,
    /// The event target (e.g., "bodylog::logger")
    pub target: String,
    /// Formatted `message` field
    pub message: String,
    /// Remaining field values as strings
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A tracing layer that captures events for testing.
pub struct EventCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Visitor to capture event field values.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value.to_string());
    }
}

impl<S> Layer<S> for EventCaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        };
        self.events.lock().unwrap().push(captured);
    }
}

/// Collector for captured events.
#[derive(Clone)]
pub struct LogCollector {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    dispatch: Dispatch,
}

/// Create a new log collector with its associated dispatch.
pub fn create_log_collector() -> LogCollector {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCaptureLayer {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(layer);
    let dispatch = Dispatch::new(subscriber);
    LogCollector { events, dispatch }
}

impl LogCollector {
    /// Route this thread's events to the collector until the guard drops.
    ///
    /// With a current-thread runtime this covers tasks spawned by the code
    /// under test as well.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }

    /// Get captured messages in order.
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Get captured messages starting with `prefix`, in order.
    pub fn messages_starting_with(&self, prefix: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.starts_with(prefix))
            .collect()
    }

    /// Check if an event with exactly this message was captured.
    pub fn has_message(&self, message: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.message == message)
    }

    /// Get an event by message (returns the last occurrence).
    pub fn get_event(&self, message: &str) -> Option<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.message == message)
            .cloned()
    }

    /// Assert that messages were captured in the given order.
    /// Only checks that the given messages appear in order, allows others in between.
    pub fn assert_message_sequence(&self, expected: &[&str]) {
        let messages = self.messages();
        let mut expected_iter = expected.iter();
        let mut current_expected = expected_iter.next();

        for message in &messages {
            if let Some(exp) = current_expected
                && message == *exp
            {
                current_expected = expected_iter.next();
            }
        }

        if current_expected.is_some() {
            panic!(
                "Expected message sequence {:?} but got {:?}",
                expected, messages
            );
        }
    }

    /// Assert that all given messages were captured (in any order).
    pub fn assert_has_messages(&self, expected: &[&str]) {
        for message in expected {
            if !self.has_message(message) {
                panic!(
                    "Expected message '{}' not found. Captured messages: {:?}",
                    message,
                    self.messages()
                );
            }
        }
    }
}
