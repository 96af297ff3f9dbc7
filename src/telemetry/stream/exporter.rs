use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, Status};
use opentelemetry::Value;
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::trace::{SpanData, SpanExporter};
use opentelemetry_sdk::Resource;
use serde::Serialize;
use serde_json::Map;

use crate::telemetry::stream::sink::Sink;

/// Span exporter that writes one JSON object per finished span into a [`Sink`].
pub struct StreamExporter {
    sink: Sink,
    resource: Map<String, serde_json::Value>,
    is_shutdown: AtomicBool,
}

impl StreamExporter {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            resource: Map::new(),
            is_shutdown: AtomicBool::new(false),
        }
    }
}

impl fmt::Debug for StreamExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamExporter")
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl SpanExporter for StreamExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        if batch.is_empty() {
            return Ok(());
        }

        self.sink
            .write_with(|writer| {
                for span in &batch {
                    serde_json::to_writer(&mut *writer, &SpanRecord::new(span, &self.resource))?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()
            })
            .map_err(|e| OTelSdkError::InternalFailure(format!("stream write failed: {e}")))
    }

    fn shutdown(&mut self) -> OTelSdkResult {
        self.is_shutdown.store(true, Ordering::SeqCst);
        self.force_flush()
    }

    fn force_flush(&mut self) -> OTelSdkResult {
        self.sink
            .write_with(|writer| writer.flush())
            .map_err(|e| OTelSdkError::InternalFailure(format!("stream flush failed: {e}")))
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource
            .iter()
            .map(|(key, value)| (key.as_str().to_owned(), json_value(value)))
            .collect();
    }
}

#[derive(Serialize)]
struct SpanRecord<'a> {
    name: &'a str,
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_span_id: Option<String>,
    kind: String,
    start_time: String,
    end_time: String,
    status: StatusRecord<'a>,
    attributes: Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventRecord<'a>>,
    scope: ScopeRecord<'a>,
    resource: &'a Map<String, serde_json::Value>,
}

impl<'a> SpanRecord<'a> {
    fn new(span: &'a SpanData, resource: &'a Map<String, serde_json::Value>) -> Self {
        let parent_span_id =
            (span.parent_span_id != SpanId::INVALID).then(|| span.parent_span_id.to_string());

        Self {
            name: &span.name,
            trace_id: span.span_context.trace_id().to_string(),
            span_id: span.span_context.span_id().to_string(),
            parent_span_id,
            kind: format!("{:?}", span.span_kind),
            start_time: timestamp(span.start_time),
            end_time: timestamp(span.end_time),
            status: StatusRecord::from(&span.status),
            attributes: json_attributes(&span.attributes),
            events: span
                .events
                .events
                .iter()
                .map(|event| EventRecord {
                    name: &event.name,
                    timestamp: timestamp(event.timestamp),
                    attributes: json_attributes(&event.attributes),
                })
                .collect(),
            scope: ScopeRecord {
                name: span.instrumentation_scope.name(),
                version: span.instrumentation_scope.version(),
            },
            resource,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
enum StatusRecord<'a> {
    Unset,
    Ok,
    Error { description: &'a str },
}

impl<'a> From<&'a Status> for StatusRecord<'a> {
    fn from(status: &'a Status) -> Self {
        match status {
            Status::Error { description } => Self::Error { description },
            Status::Ok => Self::Ok,
            _ => Self::Unset,
        }
    }
}

#[derive(Serialize)]
struct EventRecord<'a> {
    name: &'a str,
    timestamp: String,
    attributes: Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct ScopeRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn json_attributes(attributes: &[opentelemetry::KeyValue]) -> Map<String, serde_json::Value> {
    attributes
        .iter()
        .map(|kv| (kv.key.as_str().to_owned(), json_value(&kv.value)))
        .collect()
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => (*b).into(),
        Value::I64(i) => (*i).into(),
        Value::F64(f) => serde_json::json!(f),
        Value::String(s) => s.as_str().into(),
        other => other.to_string().into(),
    }
}
