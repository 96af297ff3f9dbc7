use std::net::SocketAddr;
use std::time::Duration;

use opentelemetry::trace::{Span, Tracer};
use opentelemetry_proto::tonic::collector::trace::v1::{
    trace_service_server::{TraceService, TraceServiceServer},
    ExportTraceServiceRequest, ExportTraceServiceResponse,
};
use opentelemetry_proto::tonic::common::v1::any_value;
use otel_pipeline::{build, OutputKind, PipelineConfig};
use tokio::sync::mpsc;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;

/// What the collector saw on one export call
struct Received {
    api_key: Option<String>,
    request: ExportTraceServiceRequest,
}

struct MockCollector {
    tx: mpsc::Sender<Received>,
}

#[tonic::async_trait]
impl TraceService for MockCollector {
    async fn export(
        &self,
        request: tonic::Request<ExportTraceServiceRequest>,
    ) -> Result<tonic::Response<ExportTraceServiceResponse>, tonic::Status> {
        let api_key = request
            .metadata()
            .get("api-key")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let received = Received {
            api_key,
            request: request.into_inner(),
        };
        self.tx
            .send(received)
            .await
            .map_err(|_| tonic::Status::internal("receiver dropped"))?;

        Ok(tonic::Response::new(ExportTraceServiceResponse {
            partial_success: None,
        }))
    }
}

async fn start_collector() -> (SocketAddr, mpsc::Receiver<Received>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind collector");
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = mpsc::channel(16);
    // The exporter always sends gzip; a server that refuses it fails the call
    let service =
        TraceServiceServer::new(MockCollector { tx }).accept_compressed(CompressionEncoding::Gzip);

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("collector failed")
    });

    (addr, rx)
}

fn string_attribute<'a>(
    attributes: &'a [opentelemetry_proto::tonic::common::v1::KeyValue],
    key: &str,
) -> Option<&'a str> {
    attributes
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .and_then(|value| match &value.value {
            Some(any_value::Value::StringValue(s)) => Some(s.as_str()),
            _ => None,
        })
}

#[tokio::test(flavor = "multi_thread")]
async fn grpc_pipeline_delivers_span_with_api_key() {
    let (addr, mut rx) = start_collector().await;
    let config = PipelineConfig::new("sampleServiceName", "v1.0.0.0", "sampleServiceID")
        .with_api_key("sampleApiKey")
        .with_endpoint(format!("http://{addr}"));

    let pipeline = build(OutputKind::Grpc, &config).expect("grpc pipeline");
    let mut span = pipeline.tracer("export-test").start("exported span");
    span.add_event("checkpoint", vec![]);
    span.end();

    // force_flush blocks until the batch worker on the runtime answers
    let flushing = pipeline.clone();
    tokio::task::spawn_blocking(move || flushing.force_flush())
        .await
        .unwrap()
        .expect("flush to collector");

    let received = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("collector timed out")
        .expect("missing export request");

    assert_eq!(received.api_key.as_deref(), Some("sampleApiKey"));

    let resource_spans = received.request.resource_spans.first().unwrap();
    let resource = resource_spans.resource.as_ref().unwrap();
    assert_eq!(
        string_attribute(&resource.attributes, "service.name"),
        Some("sampleServiceName")
    );
    assert_eq!(
        string_attribute(&resource.attributes, "service.instance.id"),
        Some("sampleServiceID")
    );

    let scope_spans = resource_spans.scope_spans.first().unwrap();
    let exported = scope_spans.spans.first().unwrap();
    assert_eq!(exported.name, "exported span");
    assert_eq!(exported.events.first().unwrap().name, "checkpoint");

    tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .unwrap()
        .expect("shutdown");
}

#[tokio::test(flavor = "multi_thread")]
async fn grpc_pipeline_without_api_key_sends_no_header() {
    let (addr, mut rx) = start_collector().await;
    let config =
        PipelineConfig::new("svc", "1.0", "id").with_endpoint(format!("http://{addr}"));

    let pipeline = build(OutputKind::Grpc, &config).expect("grpc pipeline");
    pipeline.tracer("export-test").start("anonymous span").end();

    let flushing = pipeline.clone();
    tokio::task::spawn_blocking(move || flushing.force_flush())
        .await
        .unwrap()
        .expect("flush to collector");

    let received = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("collector timed out")
        .expect("missing export request");

    let exported = &received.request.resource_spans[0].scope_spans[0].spans[0];
    assert_eq!(exported.name, "anonymous span");
    assert!(received.api_key.as_deref().unwrap_or_default().is_empty());

    tokio::task::spawn_blocking(move || pipeline.shutdown())
        .await
        .unwrap()
        .expect("shutdown");
}
