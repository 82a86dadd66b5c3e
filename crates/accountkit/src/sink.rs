//! Debug output sink
//!
//! When a client is built with `debug = true`, the transport records each
//! request's parameters, the `METHOD STATUS URL` line and the response body
//! through a `DebugSink`. Without an injected sink, lines go to stdout.
//!
//! `access_token` values are masked on both sides: in request parameters
//! (the app token embeds the app secret) and as a top-level field of JSON
//! response bodies (the user token from a code exchange).

use tracing::debug;

/// Destination for debug lines.
pub trait DebugSink: Send + Sync {
    fn record(&self, line: &str);
}

/// Writes debug lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl DebugSink for StdoutSink {
    fn record(&self, line: &str) {
        println!("{line}");
    }
}

/// Routes debug lines into `tracing` at DEBUG level under the `accountkit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn record(&self, line: &str) {
        debug!(target: "accountkit", "{line}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Collects recorded lines for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) lines: Mutex<Vec<String>>,
    }

    impl DebugSink for RecordingSink {
        fn record(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_owned());
        }
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::default();
        sink.record("first");
        sink.record("second");
        assert_eq!(*sink.lines.lock().unwrap(), vec!["first", "second"]);
    }

    struct CaptureLayer(Arc<Mutex<Vec<(String, String)>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0
                .lock()
                .unwrap()
                .push((event.metadata().target().to_owned(), visitor.0));
        }
    }

    #[test]
    fn tracing_sink_emits_event_under_accountkit_target() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record("GET 200 https://graph.accountkit.com/v1.1/me");
        });

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1, "got: {events:?}");
        assert_eq!(events[0].0, "accountkit");
        assert_eq!(events[0].1, "GET 200 https://graph.accountkit.com/v1.1/me");
    }

    #[test]
    fn builtin_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DebugSink>> = vec![Box::new(StdoutSink), Box::new(TracingSink)];
        for sink in &sinks {
            sink.record("GET 200 https://graph.accountkit.com/v1.1/me");
        }
    }
}
