use crate::builder::{build_event, build_event_with_process};
use crate::caller::{guess_caller, Frame};
use crate::field::{ErrorValue, FieldValue, Fields};
use crate::init::LayerConfig;
use crate::level::SourceLevel;
use crate::sink::EventSink;
use chrono::Utc;
use std::error::Error;
use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Name of the field `tracing` uses for the formatted message.
const MESSAGE_FIELD: &str = "message";

/// `tracing_subscriber` layer that turns every event into an ecs-logs
/// [`Event`](crate::event::Event) and writes it synchronously to an
/// [`EventSink`].
///
/// `tracing` macros cannot observe a failed write, so outcomes are counted
/// instead. Callers that need the error itself should build events with
/// [`build_event`] and call the sink directly.
pub struct EcsLayer {
    sink: Arc<dyn EventSink>,
    config: LayerConfig,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events fully written to the sink.
    pub written_events: Arc<AtomicU64>,
    /// Events the sink rejected.
    pub failed_events: Arc<AtomicU64>,
}

impl EcsLayer {
    pub fn new(sink: Arc<dyn EventSink>, config: LayerConfig) -> Self {
        Self {
            sink,
            config,
            total_events: Arc::new(AtomicU64::new(0)),
            written_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    fn resolve_source<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> Option<String>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let func_info = self.config.func_info?;

        let spans = ctx
            .event_scope(event)
            .into_iter()
            .flat_map(|scope| scope.map(|span| span.metadata()));
        let frames = std::iter::once::<Frame>(event.metadata()).chain(spans);

        let frame = guess_caller(
            frames,
            self.config.depth,
            self.config.max_depth,
            &self.config.skip_prefixes,
        )?;
        func_info(frame).map(|info| info.to_string())
    }
}

impl<S> Layer<S> for EcsLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let meta = event.metadata();
        let level = meta.level().to_level();
        if level < self.config.min_level {
            return;
        }

        let mut fields = Fields::new();
        let mut message = String::new();
        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let source = self.resolve_source(event, &ctx);
        let now = Utc::now();
        let ecs_event = match &self.config.process {
            Some(process) => build_event_with_process(
                meta.level(),
                &message,
                &fields,
                now,
                source.as_deref(),
                process,
            ),
            None => build_event(meta.level(), &message, &fields, now, source.as_deref()),
        };

        match self.sink.log(&ecs_event) {
            Ok(()) => self.written_events.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed_events.fetch_add(1, Ordering::Relaxed),
        };
    }
}

/// Collects `tracing` fields into [`Fields`], keeping errors as
/// [`FieldValue::Error`] and pulling out the message.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut String,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: impl Into<FieldValue>) {
        self.fields.insert(field.name().to_string(), value.into());
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            *self.message = value.to_string();
        } else {
            self.insert(field, value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, ErrorValue::from_dyn(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // `format_args!` messages arrive here; their Debug output is the text.
        if field.name() == MESSAGE_FIELD {
            *self.message = format!("{:?}", value);
        } else {
            self.insert(field, format!("{:?}", value));
        }
    }
}
