use std::env;
use std::fmt;
use std::str::FromStr;

use crate::telemetry::error::TelemetryError;
use crate::telemetry::stream::Sink;

pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const OTEL_SERVICE_VERSION: &str = "OTEL_SERVICE_VERSION";
pub const OTEL_SERVICE_ID: &str = "OTEL_SERVICE_ID";
pub const OTEL_GRPC_API_KEY: &str = "OTEL_GRPC_API_KEY";
pub const OTEL_GRPC_URL: &str = "OTEL_GRPC_URL";
pub const OTEL_OUTPUT: &str = "OTEL_OUTPUT";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable format with colors (for local dev)
    #[default]
    Pretty,
    /// JSON structured format (for log collectors)
    Json,
}

/// Where finished spans are sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Serialized into the configured [`Sink`]
    #[default]
    Stream,
    /// Shipped to an OTLP collector over gRPC
    Grpc,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Grpc => "grpc",
        }
    }

    /// Read the output kind from `OTEL_OUTPUT`.
    /// When unset, picks gRPC if `OTEL_GRPC_URL` is set, otherwise stream.
    pub fn from_env() -> Result<Self, TelemetryError> {
        match env::var(OTEL_OUTPUT) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => {
                let has_url = env::var(OTEL_GRPC_URL).is_ok_and(|url| !url.is_empty());
                Ok(if has_url { Self::Grpc } else { Self::Stream })
            }
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" | "io" | "stdout" => Ok(Self::Stream),
            "grpc" | "otlp" => Ok(Self::Grpc),
            other => Err(TelemetryError::UnknownOutput(other.to_string())),
        }
    }
}

/// Everything needed to assemble a pipeline.
///
/// `sink` only matters for [`OutputKind::Stream`], `api_key` and `endpoint`
/// only for [`OutputKind::Grpc`]. The others may stay empty.
#[derive(Clone, Default)]
pub struct PipelineConfig {
    pub service_name: String,
    pub service_version: String,
    pub service_instance_id: String,
    pub sink: Option<Sink>,
    pub api_key: String,
    pub endpoint: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl PipelineConfig {
    /// Create config from environment variables.
    /// Missing variables become empty strings; the sink is left unset.
    pub fn from_env() -> Self {
        let log_format = match env::var("LOG_FORMAT") {
            Ok(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            service_name: env::var(OTEL_SERVICE_NAME).unwrap_or_default(),
            service_version: env::var(OTEL_SERVICE_VERSION).unwrap_or_default(),
            service_instance_id: env::var(OTEL_SERVICE_ID).unwrap_or_default(),
            sink: None,
            api_key: env::var(OTEL_GRPC_API_KEY).unwrap_or_default(),
            endpoint: env::var(OTEL_GRPC_URL).unwrap_or_default(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format,
        }
    }

    /// Create a new config with explicit identity values
    pub fn new(
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        service_instance_id: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            service_instance_id: service_instance_id.into(),
            log_level: "info".to_string(),
            ..Self::default()
        }
    }

    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn with_sink(mut self, sink: impl Into<Sink>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}

// The API key is credential material; never print it.
impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "[redacted]" };
        f.debug_struct("PipelineConfig")
            .field("service_name", &self.service_name)
            .field("service_version", &self.service_version)
            .field("service_instance_id", &self.service_instance_id)
            .field("sink", &self.sink)
            .field("api_key", &api_key)
            .field("endpoint", &self.endpoint)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    service_instance_id: Option<String>,
    sink: Option<Sink>,
    api_key: Option<String>,
    endpoint: Option<String>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
}

impl PipelineConfigBuilder {
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn service_instance_id(mut self, id: impl Into<String>) -> Self {
        self.service_instance_id = Some(id.into());
        self
    }

    pub fn sink(mut self, sink: impl Into<Sink>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn json(self) -> Self {
        self.log_format(LogFormat::Json)
    }

    pub fn pretty(self) -> Self {
        self.log_format(LogFormat::Pretty)
    }

    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            service_name: self.service_name.unwrap_or_default(),
            service_version: self.service_version.unwrap_or_default(),
            service_instance_id: self.service_instance_id.unwrap_or_default(),
            sink: self.sink,
            api_key: self.api_key.unwrap_or_default(),
            endpoint: self.endpoint.unwrap_or_default(),
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
            log_format: self.log_format.unwrap_or_default(),
        }
    }
}
