//! Trace pipeline factory for services: stream or OTLP/gRPC output, resource
//! identity from `OTEL_*` variables. See [`telemetry`].

pub mod telemetry;

pub use telemetry::{
    build, init, LogFormat, OutputKind, Pipeline, PipelineConfig, SharedBuffer, Sink,
    TelemetryError,
};
