//! Trace pipelines over OpenTelemetry with two outputs.
//!
//! A pipeline is an [`SdkTracerProvider`](opentelemetry_sdk::trace::SdkTracerProvider)
//! plus the resource describing the emitting service, wired to one of:
//!
//! - [`OutputKind::Stream`]: JSON lines into a [`Sink`] (stdout, a file, a buffer)
//! - [`OutputKind::Grpc`]: OTLP over gRPC to a remote collector
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // Resolve everything from the environment, install globally, bridge `tracing`
//! let pipeline = telemetry::init()?;
//! // ...
//! pipeline.shutdown()?;
//! ```
//!
//! # Building without global side effects
//!
//! ```rust,ignore
//! use telemetry::{OutputKind, PipelineConfig, SharedBuffer};
//!
//! let buffer = SharedBuffer::new();
//! let config = PipelineConfig::builder()
//!     .service_name("my-service")
//!     .service_version("1.0.0")
//!     .service_instance_id("pod-1")
//!     .sink(buffer.clone())
//!     .build();
//!
//! let pipeline = telemetry::build(OutputKind::Stream, &config)?;
//! let tracer = pipeline.tracer("my-component");
//! // Opt in to the process-wide provider explicitly
//! pipeline.install_global();
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OTEL_SERVICE_NAME` | Service name | empty |
//! | `OTEL_SERVICE_VERSION` | Service version | empty |
//! | `OTEL_SERVICE_ID` | Service instance id | empty |
//! | `OTEL_GRPC_API_KEY` | `api-key` header for gRPC output | empty |
//! | `OTEL_GRPC_URL` | Collector address for gRPC output | empty |
//! | `OTEL_OUTPUT` | `stream` or `grpc` | `grpc` if `OTEL_GRPC_URL` is set, else `stream` |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `LOG_FORMAT` | `pretty` or `json` | `pretty` |
//!
//! # Module Structure
//!
//! - [`api`]: Output trait and the pipeline factory
//! - [`config`]: Configuration types
//! - [`error`]: Error types
//! - [`pipeline`]: The pipeline handle
//! - [`resource`]: Resource construction
//! - [`stream`]: Stream output
//! - [`grpc`]: OTLP/gRPC output
//! - [`trace`]: `tracing` subscriber bridge

pub mod api;
pub mod config;
pub mod error;
pub mod grpc;
pub mod pipeline;
pub mod resource;
pub mod stream;
pub mod trace;

// Re-exports
pub use api::{build, build_from_env, build_with_output, init, init_with_config, PipelineOutput};
pub use config::{LogFormat, OutputKind, PipelineConfig, PipelineConfigBuilder};
pub use error::TelemetryError;
pub use grpc::GrpcOutput;
pub use pipeline::Pipeline;
pub use stream::{SharedBuffer, Sink, StreamOutput};
