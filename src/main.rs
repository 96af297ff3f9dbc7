use std::time::Duration;

use otel_pipeline::telemetry;
use tracing::{info, info_span, Instrument};

#[tracing::instrument(fields(attempt))]
async fn handle_job(job: u32) {
    tracing::Span::current().record("attempt", 1);
    tokio::time::sleep(Duration::from_millis(10)).await;
    info!(job, "job processed");
}

#[tokio::main]
async fn main() -> Result<(), telemetry::TelemetryError> {
    // Output from OTEL_OUTPUT (or OTEL_GRPC_URL), identity from OTEL_SERVICE_*
    let pipeline = telemetry::init()?;

    info!(output = %pipeline.kind(), "telemetry initialized");

    async {
        for job in 0..3 {
            handle_job(job).await;
        }
    }
    .instrument(info_span!("batch"))
    .await;

    pipeline.shutdown()
}
