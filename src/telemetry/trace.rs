use opentelemetry_sdk::trace::SdkTracer;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::telemetry::config::{LogFormat, PipelineConfig};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::pipeline::Pipeline;

/// Name of the tracer backing the `tracing` bridge
pub fn tracer_name(config: &PipelineConfig) -> String {
    if config.service_name.is_empty() {
        env!("CARGO_PKG_NAME").to_string()
    } else {
        config.service_name.clone()
    }
}

/// Build the OpenTelemetry tracing layer
pub fn build_otel_layer<S>(pipeline: &Pipeline, config: &PipelineConfig) -> OpenTelemetryLayer<S, SdkTracer>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let tracer = pipeline.tracer(tracer_name(config));
    tracing_opentelemetry::layer().with_tracer(tracer)
}

/// Build the JSON fmt layer for structured logging
pub fn build_json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
}

/// Build the pretty fmt layer for human-readable output (local dev)
pub fn build_pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

/// Build the env filter from config
pub fn build_filter(config: &PipelineConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global tracing subscriber bridged to the pipeline.
///
/// Fails if a global subscriber is already set.
pub fn init_subscriber(pipeline: &Pipeline, config: &PipelineConfig) -> Result<(), TelemetryError> {
    let otel_layer = build_otel_layer(pipeline, config);
    let filter = build_filter(config);

    let result = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(otel_layer)
            .with(build_pretty_layer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(otel_layer)
            .with(build_json_layer())
            .try_init(),
    };

    result.map_err(|e| TelemetryError::Subscriber(e.to_string()))
}
