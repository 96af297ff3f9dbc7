use tonic::metadata::{MetadataMap, MetadataValue};

use crate::telemetry::error::TelemetryError;
use crate::telemetry::grpc::config::API_KEY_HEADER;

/// Request metadata attached to every OTLP export call
pub fn api_key_metadata(api_key: &str) -> Result<MetadataMap, TelemetryError> {
    let mut metadata = MetadataMap::new();
    metadata.insert(API_KEY_HEADER, MetadataValue::try_from(api_key)?);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_metadata_sets_header() {
        let metadata = api_key_metadata("sampleApiKey").unwrap();

        assert_eq!(metadata.get(API_KEY_HEADER).unwrap(), "sampleApiKey");
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn empty_api_key_is_allowed() {
        let metadata = api_key_metadata("").unwrap();

        assert_eq!(metadata.get(API_KEY_HEADER).unwrap(), "");
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let result = api_key_metadata("bad\nkey");

        assert!(matches!(result, Err(TelemetryError::ExporterConstruction(_))));
    }
}
