//! Stream output.
//!
//! Finished spans are batched by the SDK and written as JSON lines into the
//! [`Sink`] carried by the config: stdout, stderr, a file, or a
//! [`SharedBuffer`] when the caller wants to read them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use otel_pipeline::telemetry::{self, OutputKind, PipelineConfig, Sink};
//!
//! let config = PipelineConfig::from_env().with_sink(Sink::stdout());
//! let pipeline = telemetry::build(OutputKind::Stream, &config)?;
//! ```

mod exporter;
mod sink;

use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::debug;

use crate::telemetry::api::PipelineOutput;
use crate::telemetry::config::{OutputKind, PipelineConfig};
use crate::telemetry::error::TelemetryError;

pub use exporter::StreamExporter;
pub use sink::{SharedBuffer, Sink};

/// Writes spans to the configured sink using the SDK's default batching
pub struct StreamOutput;

impl PipelineOutput for StreamOutput {
    fn kind(&self) -> OutputKind {
        OutputKind::Stream
    }

    fn build_tracer_provider(
        &self,
        config: &PipelineConfig,
        resource: Resource,
    ) -> Result<SdkTracerProvider, TelemetryError> {
        let sink = config
            .sink
            .clone()
            .ok_or_else(|| TelemetryError::exporter("stream output requires a sink"))?;

        if !sink.is_usable() {
            return Err(TelemetryError::exporter(format!("{sink:?} is poisoned")));
        }

        debug!(?sink, "building stream exporter");
        let exporter = StreamExporter::new(sink);

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build();

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> Resource {
        Resource::builder_empty().build()
    }

    #[test]
    fn stream_output_without_sink_fails() {
        let config = PipelineConfig::new("svc", "1.0", "id");

        let result = StreamOutput.build_tracer_provider(&config, resource());

        assert!(matches!(result, Err(TelemetryError::ExporterConstruction(_))));
    }

    #[test]
    fn stream_output_ignores_grpc_fields() {
        let config = PipelineConfig::new("svc", "1.0", "id").with_sink(SharedBuffer::new());

        let provider = StreamOutput
            .build_tracer_provider(&config, resource())
            .expect("stream provider");

        assert!(provider.shutdown().is_ok());
    }

    #[test]
    fn stream_output_reports_kind() {
        assert_eq!(StreamOutput.kind(), OutputKind::Stream);
    }
}
