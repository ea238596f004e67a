//! Integration tests for the forwarding gateway using a stub backend.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Multipart, State},
    http::{Request, Response, StatusCode, header},
    routing::post,
};
use scangate::{
    GatewayConfig,
    api::{ApiSizeLimits, create_router_with_limits},
};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "X-SCANGATE-BOUNDARY";

/// Hand-built multipart body with a single field.
fn multipart_body(field_name: &str, file_name: &str, content_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
Content-Type: {content_type}\r\n\
\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(path: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("Failed to build request")
}

async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub backend failed");
    });
    addr
}

fn gateway_for(addr: SocketAddr) -> Router {
    let config = GatewayConfig {
        backend_url: format!("http://{addr}"),
        ..Default::default()
    };
    create_router_with_limits(config, ApiSizeLimits::from_mb(5))
}

/// Stub backend that echoes the uploaded file bytes back as a JPEG artifact,
/// counting calls.
fn echo_backend(calls: Arc<AtomicUsize>) -> Router {
    async fn echo(State(calls): State<Arc<AtomicUsize>>, mut multipart: Multipart) -> Response<Body> {
        calls.fetch_add(1, Ordering::SeqCst);

        let mut file_bytes = Vec::new();
        let mut file_name = String::new();
        while let Some(field) = multipart.next_field().await.expect("stub multipart read") {
            if field.name() == Some("file") {
                file_name = field.file_name().unwrap_or_default().to_string();
                file_bytes = field.bytes().await.expect("stub field read").to_vec();
            }
        }

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/jpeg")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            )
            .body(Body::from(file_bytes))
            .expect("stub response")
    }

    Router::new()
        .route("/scan", post(echo))
        .route("/ocr", post(echo))
        .with_state(calls)
}

/// Stub backend that always fails with the given status and body.
fn failing_backend(status: StatusCode, details: &'static str) -> Router {
    let handler = move || async move { (status, details) };
    Router::new()
        .route("/scan", post(handler.clone()))
        .route("/ocr", post(handler))
}

#[tokio::test]
async fn test_missing_file_field_is_rejected_without_backend_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let addr = spawn_backend(echo_backend(Arc::clone(&calls))).await;
    let gateway = gateway_for(addr);

    let body = multipart_body("attachment", "doc.png", "image/png", b"bytes");
    let response = gateway
        .oneshot(upload_request("/scan", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("error JSON parse");
    assert_eq!(value["error"], "No file uploaded");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_success_relay_is_byte_identical_with_verbatim_headers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let addr = spawn_backend(echo_backend(Arc::clone(&calls))).await;
    let gateway = gateway_for(addr);

    // Deliberately not valid UTF-8: the relay must never decode the payload.
    let payload: Vec<u8> = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x80, 0x81];
    let body = multipart_body("file", "photo.png", "image/png", &payload);
    let response = gateway
        .oneshot(upload_request("/scan", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"photo.png\""
    );

    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    assert_eq!(bytes.as_ref(), payload.as_slice());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_backend_failure_status_and_details_are_relayed() {
    let addr = spawn_backend(failing_backend(StatusCode::INTERNAL_SERVER_ERROR, "OOM")).await;
    let gateway = gateway_for(addr);

    let body = multipart_body("file", "doc.png", "image/png", b"bytes");
    let response = gateway
        .oneshot(upload_request("/scan", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("error JSON parse");
    assert_eq!(value["error"], "backend scan failed");
    assert_eq!(value["details"], "OOM");
}

#[tokio::test]
async fn test_ocr_failures_carry_their_own_label() {
    let addr = spawn_backend(failing_backend(StatusCode::NOT_FOUND, "model not loaded")).await;
    let gateway = gateway_for(addr);

    let body = multipart_body("file", "note.jpg", "image/jpeg", b"bytes");
    let response = gateway
        .oneshot(upload_request("/ocr", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("error JSON parse");
    assert_eq!(value["error"], "backend OCR failed");
    assert_eq!(value["details"], "model not loaded");
}

#[tokio::test]
async fn test_missing_backend_content_type_is_a_protocol_violation() {
    async fn headerless(mut multipart: Multipart) -> Response<Body> {
        while let Some(field) = multipart.next_field().await.expect("stub multipart read") {
            let _ = field.bytes().await;
        }
        Response::builder()
            .status(StatusCode::OK)
            .body(Body::from("payload"))
            .expect("stub response")
    }
    let addr = spawn_backend(Router::new().route("/scan", post(headerless))).await;
    let gateway = gateway_for(addr);

    let body = multipart_body("file", "doc.png", "image/png", b"bytes");
    let response = gateway
        .oneshot(upload_request("/scan", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("error JSON parse");
    assert_eq!(value["error"], "backend response violated protocol");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_generic_failed_request() {
    // Bind then immediately drop a listener so the port is known dead.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);

    let gateway = gateway_for(addr);

    let body = multipart_body("file", "doc.png", "image/png", b"bytes");
    let response = gateway
        .oneshot(upload_request("/scan", body))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("error JSON parse");
    assert_eq!(value["error"], "backend scan failed");
}

#[tokio::test]
async fn test_health_endpoint() {
    let calls = Arc::new(AtomicUsize::new(0));
    let addr = spawn_backend(echo_backend(calls)).await;
    let gateway = gateway_for(addr);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = gateway.oneshot(request).await.expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1_000_000).await.expect("body read");
    let value: Value = serde_json::from_slice(&bytes).expect("health JSON parse");
    assert_eq!(value["status"], "healthy");
    assert!(value["version"].is_string());
}
