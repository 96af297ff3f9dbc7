use opentelemetry_otlp::{Compression, SpanExporter, WithExportConfig, WithTonicConfig};
use tonic::transport::{Channel, ClientTlsConfig};
use tracing::info;

use crate::telemetry::error::TelemetryError;
use crate::telemetry::grpc::config::{normalize_endpoint, uses_tls, CALL_TIMEOUT};
use crate::telemetry::grpc::headers::api_key_metadata;

/// Build a lazily connected channel to the collector.
///
/// Nothing is dialed here, so an unreachable collector does not fail or block
/// construction, and a dropped connection is redialed by the next export. No
/// keep-alive pings are sent: collectors commonly answer pings on an idle
/// connection with `GOAWAY too_many_pings`. Must run inside a Tokio runtime.
pub fn build_channel(endpoint: &str) -> Result<Channel, TelemetryError> {
    tokio::runtime::Handle::try_current().map_err(TelemetryError::exporter)?;

    let endpoint = normalize_endpoint(endpoint);
    let mut builder = Channel::from_shared(endpoint.clone()).map_err(TelemetryError::exporter)?;

    if uses_tls(&endpoint) {
        builder = builder.tls_config(ClientTlsConfig::new().with_native_roots())?;
    }

    let channel = builder
        .connect_timeout(CALL_TIMEOUT)
        .timeout(CALL_TIMEOUT)
        .connect_lazy();

    Ok(channel)
}

/// Build the OTLP/gRPC span exporter: gzip, `api-key` header, 30s call timeout
pub fn build_grpc_exporter(endpoint: &str, api_key: &str) -> Result<SpanExporter, TelemetryError> {
    let channel = build_channel(endpoint)?;
    let metadata = api_key_metadata(api_key)?;

    info!(endpoint, "building OTLP gRPC exporter");
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_channel(channel)
        .with_metadata(metadata)
        .with_compression(Compression::Gzip)
        .with_timeout(CALL_TIMEOUT)
        .build()?;

    Ok(exporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_channel_outside_runtime_fails() {
        let result = build_channel("collector:4317");

        assert!(matches!(result, Err(TelemetryError::ExporterConstruction(_))));
    }

    #[tokio::test]
    async fn build_channel_rejects_invalid_uri() {
        let result = build_channel("http://bad host:4317");

        assert!(matches!(result, Err(TelemetryError::ExporterConstruction(_))));
    }

    #[tokio::test]
    async fn build_channel_plain_http_succeeds() {
        assert!(build_channel("http://localhost:4317").is_ok());
    }

    #[tokio::test]
    async fn build_grpc_exporter_with_unreachable_endpoint_succeeds() {
        // Connection is lazy; the host is never contacted here
        let result = build_grpc_exporter("unreachable.invalid:4317", "sampleApiKey");

        assert!(result.is_ok());
    }
}
