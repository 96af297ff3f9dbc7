use std::borrow::Cow;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use tracing::debug;

use crate::telemetry::config::OutputKind;
use crate::telemetry::error::TelemetryError;

/// A built trace pipeline.
///
/// Owns the tracer provider and the resource it was built with. The caller
/// drives the lifecycle: build, acquire tracers, [`force_flush`](Self::force_flush)
/// as needed, [`shutdown`](Self::shutdown) on exit. Clones share the same provider.
#[derive(Debug, Clone)]
pub struct Pipeline {
    provider: SdkTracerProvider,
    resource: Resource,
    kind: OutputKind,
}

impl Pipeline {
    pub(crate) fn new(provider: SdkTracerProvider, resource: Resource, kind: OutputKind) -> Self {
        Self {
            provider,
            resource,
            kind,
        }
    }

    pub fn tracer(&self, name: impl Into<Cow<'static, str>>) -> SdkTracer {
        self.provider.tracer(name)
    }

    /// Export every finished span still buffered in the batch processor.
    ///
    /// Blocks until the batch worker answers. For gRPC pipelines that worker
    /// lives on the Tokio runtime, so do not call this from the only thread of
    /// a current-thread runtime.
    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        self.provider.force_flush()?;
        Ok(())
    }

    /// Flush and stop the pipeline. Spans ended afterwards are dropped.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        debug!(kind = %self.kind, "shutting down trace pipeline");
        self.provider.shutdown()?;
        Ok(())
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn provider(&self) -> &SdkTracerProvider {
        &self.provider
    }

    /// Install this pipeline's provider as the process-wide default.
    ///
    /// The global is last-writer-wins: pipelines installed concurrently from
    /// several threads race, and only one of them ends up installed.
    pub fn install_global(&self) {
        debug!(kind = %self.kind, "installing global tracer provider");
        global::set_tracer_provider(self.provider.clone());
    }
}
