use std::time::Duration;

/// Header carrying the collector API key
pub const API_KEY_HEADER: &str = "api-key";

/// Bound on connection handshake and on every export call
pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

pub const MAX_QUEUE_SIZE: usize = 10_000;

/// Larger than the queue on purpose; the SDK clamps it to [`MAX_QUEUE_SIZE`]
pub const MAX_EXPORT_BATCH_SIZE: usize = 100_000;

pub const BATCH_TIMEOUT: Duration = Duration::from_secs(5);

pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Collector addresses are often given as bare `host:port`; default those to TLS.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

/// Whether the endpoint should be dialed with TLS
pub fn uses_tls(endpoint: &str) -> bool {
    endpoint.starts_with("https://")
}
