use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::info;

use crate::telemetry::config::{OutputKind, PipelineConfig};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::grpc::GrpcOutput;
use crate::telemetry::pipeline::Pipeline;
use crate::telemetry::resource::build_resource;
use crate::telemetry::stream::{Sink, StreamOutput};
use crate::telemetry::trace::init_subscriber;

/// One of the two span destinations ([`StreamOutput`], [`GrpcOutput`])
pub trait PipelineOutput {
    fn kind(&self) -> OutputKind;

    /// Build the tracer provider for this output around an already merged resource
    fn build_tracer_provider(
        &self,
        config: &PipelineConfig,
        resource: Resource,
    ) -> Result<SdkTracerProvider, TelemetryError>;
}

/// Build a pipeline with a specific output
pub fn build_with_output<O: PipelineOutput>(
    output: &O,
    config: &PipelineConfig,
) -> Result<Pipeline, TelemetryError> {
    let resource = build_resource(config)?;
    let provider = output.build_tracer_provider(config, resource.clone())?;

    info!(
        output = %output.kind(),
        service.name = %config.service_name,
        service.version = %config.service_version,
        "trace pipeline built"
    );
    Ok(Pipeline::new(provider, resource, output.kind()))
}

/// Build a pipeline for the selected output kind.
///
/// The provider is not installed globally; call [`Pipeline::install_global`]
/// for that.
pub fn build(kind: OutputKind, config: &PipelineConfig) -> Result<Pipeline, TelemetryError> {
    match kind {
        OutputKind::Stream => build_with_output(&StreamOutput, config),
        OutputKind::Grpc => build_with_output(&GrpcOutput, config),
    }
}

/// Build from `OTEL_OUTPUT` and the `OTEL_*` identity/credential variables
pub fn build_from_env() -> Result<Pipeline, TelemetryError> {
    build(OutputKind::from_env()?, &PipelineConfig::from_env())
}

/// Build, install as the global provider, and install the tracing subscriber
pub fn init_with_config(
    kind: OutputKind,
    config: &PipelineConfig,
) -> Result<Pipeline, TelemetryError> {
    let pipeline = build(kind, config)?;
    pipeline.install_global();
    init_subscriber(&pipeline, config)?;
    Ok(pipeline)
}

/// Initialize from environment. Stream output writes to stdout.
pub fn init() -> Result<Pipeline, TelemetryError> {
    let mut config = PipelineConfig::from_env();
    config.sink.get_or_insert_with(Sink::stdout);
    init_with_config(OutputKind::from_env()?, &config)
}
