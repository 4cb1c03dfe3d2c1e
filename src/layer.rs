use crate::hook::ElasticHook;
use crate::record::{CapturedError, Entry, FieldValue, Fields};
use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Targets whose events are never forwarded: the hook's own diagnostics and
/// the HTTP stack it delivers through.
const SKIPPED_TARGETS: [&str; 4] = [env!("CARGO_CRATE_NAME"), "reqwest", "hyper", "h2"];

/// `tracing_subscriber` layer that turns events into [`Entry`]s and fires
/// them through an [`ElasticHook`].
///
/// The hook's levels are read once, when the layer is built. Since
/// `on_event` cannot await, each accepted entry is fired on a task of the
/// current tokio runtime, tracked until it completes. Await
/// [`flush`](Self::flush) or [`shutdown`](Self::shutdown) before the runtime
/// goes away, otherwise pending entries are lost. Without a runtime the
/// entry is dropped.
///
/// Clones share the same tracker and counters, so a clone kept by the
/// caller can flush the layer installed in the subscriber.
#[derive(Clone)]
pub struct ElasticLayer {
    hook: Arc<ElasticHook>,
    levels: Vec<Level>,
    tracker: TaskTracker,
    /// Fires that returned an error.
    pub failed_events: Arc<AtomicU64>,
    /// Accepted entries dropped because no runtime was available.
    pub dropped_events: Arc<AtomicU64>,
}

impl ElasticLayer {
    pub fn new(hook: Arc<ElasticHook>) -> Self {
        let levels = hook.levels().to_vec();
        ElasticLayer {
            hook,
            levels,
            tracker: TaskTracker::new(),
            failed_events: Arc::new(AtomicU64::new(0)),
            dropped_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait until every fire started so far has completed. The layer keeps
    /// accepting entries afterwards.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Wait for pending fires and cancel the hook. Entries accepted after
    /// this are still fired, like direct [`ElasticHook::fire`] calls.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.hook.cancel();
    }

    /// Number of fires currently in flight.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    fn accepts(&self, level: &Level, target: &str) -> bool {
        self.levels.contains(level) && !SKIPPED_TARGETS.iter().any(|t| is_target_or_child(target, t))
    }
}

fn is_target_or_child(target: &str, prefix: &str) -> bool {
    target == prefix
        || target
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with("::"))
}

/// Convert a `tracing` event into an [`Entry`] stamped with the local time.
pub fn entry_from_event(event: &Event<'_>) -> Entry {
    let mut fields = Fields::new();
    let mut message: Option<String> = None;

    let mut visitor = FieldVisitor {
        fields: &mut fields,
        message: &mut message,
    };
    event.record(&mut visitor);

    let meta = event.metadata();
    Entry {
        time: Local::now().fixed_offset(),
        level: meta.level().to_string(),
        message: message.unwrap_or_default(),
        data: fields,
    }
}

impl<S> Layer<S> for ElasticLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if !self.accepts(meta.level(), meta.target()) {
            return;
        }

        let mut entry = entry_from_event(event);

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("no tokio runtime available, dropping log entry");
                return;
            }
        };

        let hook = Arc::clone(&self.hook);
        let failed = Arc::clone(&self.failed_events);
        self.tracker.spawn_on(
            async move {
                if let Err(e) = hook.fire(&mut entry).await {
                    failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("error firing log entry: {}", e);
                }
            },
            &handle,
        );
    }
}

/// Collects event fields into [`Fields`], pulling out the `message` field.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.insert(field, FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, FieldValue::error(CapturedError::capture(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `info!("text")` records its message through here.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, FieldValue::from(format!("{:?}", value)));
        }
    }
}
