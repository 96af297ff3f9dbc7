use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{
    SERVICE_INSTANCE_ID, SERVICE_NAME, SERVICE_VERSION,
};
use opentelemetry_semantic_conventions::SCHEMA_URL;

use crate::telemetry::config::PipelineConfig;
use crate::telemetry::error::TelemetryError;

/// Identity attributes in merge order: instance id, name, version
pub fn identity_attributes(config: &PipelineConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new(SERVICE_INSTANCE_ID, config.service_instance_id.clone()),
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, config.service_version.clone()),
    ]
}

/// Build the pipeline resource: SDK defaults (including `OTEL_RESOURCE_ATTRIBUTES`)
/// overlaid with the identity attributes, tagged with the semconv schema URL.
///
/// Identity values win over detected ones.
pub fn build_resource(config: &PipelineConfig) -> Result<Resource, TelemetryError> {
    let identity = identity_attributes(config);

    let resource = Resource::builder()
        .with_attributes(identity.clone())
        .with_schema_url(identity, SCHEMA_URL)
        .build();

    ensure_schema_url(resource)
}

/// The SDK merge never fails; on conflicting schema URLs it keeps one side or
/// drops both. The default detectors carry none today, so this only trips if a
/// detector starts declaring a different schema.
fn ensure_schema_url(resource: Resource) -> Result<Resource, TelemetryError> {
    match resource.schema_url() {
        Some(url) if url == SCHEMA_URL => Ok(resource),
        found => Err(TelemetryError::ResourceMerge(format!(
            "conflicting schema URLs, expected {SCHEMA_URL}, merged into {found:?}"
        ))),
    }
}
