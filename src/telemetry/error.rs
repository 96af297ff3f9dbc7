use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

/// Boxed cause carried by [`TelemetryError::ExporterConstruction`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The export adapter or its transport could not be built
    #[error("could not create exporter: {0}")]
    ExporterConstruction(#[source] BoxError),
    /// Merging the identity attributes into the default resource failed
    #[error("could not create resource: {0}")]
    ResourceMerge(String),
    #[error("unknown output kind `{0}`, expected `stream` or `grpc`")]
    UnknownOutput(String),
    /// Flush or shutdown reported by the trace provider
    #[error("trace provider error: {0}")]
    Provider(#[from] OTelSdkError),
    #[error("could not install tracing subscriber: {0}")]
    Subscriber(String),
}

impl TelemetryError {
    pub(crate) fn exporter(err: impl Into<BoxError>) -> Self {
        Self::ExporterConstruction(err.into())
    }
}

impl From<opentelemetry_otlp::ExporterBuildError> for TelemetryError {
    fn from(err: opentelemetry_otlp::ExporterBuildError) -> Self {
        Self::exporter(err)
    }
}

impl From<tonic::transport::Error> for TelemetryError {
    fn from(err: tonic::transport::Error) -> Self {
        Self::exporter(err)
    }
}

impl From<tonic::metadata::errors::InvalidMetadataValue> for TelemetryError {
    fn from(err: tonic::metadata::errors::InvalidMetadataValue) -> Self {
        Self::exporter(err)
    }
}
