//! OTLP/gRPC output.
//!
//! Exports spans to a remote collector (New Relic, an OpenTelemetry
//! Collector, ...) over a TLS gRPC channel, authenticated with an
//! `api-key` header.
//!
//! # Transport policy
//!
//! - TLS with the platform trust roots (bare `host:port` endpoints default to `https://`)
//! - 30s connect and call timeout, lazy connection (a failed connection is
//!   redialed on the next export)
//! - gzip compression
//!
//! # Batching policy
//!
//! Queue of 10000 spans, export batches of up to 100000 (clamped by the SDK
//! to the queue size), flushed every 5s with a 5s export timeout. Every span
//! is sampled. The batch worker runs on the Tokio runtime, which is what
//! bounds each export by the export timeout.
//!
//! # Environment Variables
//!
//! - `OTEL_GRPC_URL`: Collector address
//! - `OTEL_GRPC_API_KEY`: Value of the `api-key` header

pub mod config;
pub mod exporter;
mod headers;

use opentelemetry_sdk::runtime::Tokio;
use opentelemetry_sdk::trace::span_processor_with_async_runtime::BatchSpanProcessor;
use opentelemetry_sdk::trace::{
    BatchConfig, BatchConfigBuilder, Sampler, SdkTracerProvider, SpanExporter,
};
use opentelemetry_sdk::Resource;

use crate::telemetry::api::PipelineOutput;
use crate::telemetry::config::{OutputKind, PipelineConfig};
use crate::telemetry::error::TelemetryError;

pub use exporter::{build_channel, build_grpc_exporter};
pub use headers::api_key_metadata;

use config::{BATCH_TIMEOUT, EXPORT_TIMEOUT, MAX_EXPORT_BATCH_SIZE, MAX_QUEUE_SIZE};

/// Ships spans to `config.endpoint` with the fixed transport and batching policy.
pub struct GrpcOutput;

impl PipelineOutput for GrpcOutput {
    fn kind(&self) -> OutputKind {
        OutputKind::Grpc
    }

    fn build_tracer_provider(
        &self,
        config: &PipelineConfig,
        resource: Resource,
    ) -> Result<SdkTracerProvider, TelemetryError> {
        let exporter = build_grpc_exporter(&config.endpoint, &config.api_key)?;

        Ok(batched_provider(exporter, batch_config().build(), resource))
    }
}

/// Queue, batch size, schedule and export timeout of the gRPC output
fn batch_config() -> BatchConfigBuilder {
    BatchConfigBuilder::default()
        .with_max_queue_size(MAX_QUEUE_SIZE)
        .with_max_export_batch_size(MAX_EXPORT_BATCH_SIZE)
        .with_scheduled_delay(BATCH_TIMEOUT)
        .with_max_export_timeout(EXPORT_TIMEOUT)
}

// Spawns the batch worker; the caller must be inside a Tokio runtime.
fn batched_provider<E>(exporter: E, batch_config: BatchConfig, resource: Resource) -> SdkTracerProvider
where
    E: SpanExporter + 'static,
{
    let processor = BatchSpanProcessor::builder(exporter, Tokio)
        .with_batch_config(batch_config)
        .build();

    SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build()
}
