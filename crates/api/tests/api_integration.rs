//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (axum::Router, Arc<api::AppState>) {
    let state = api::create_memory_state();
    api::seed_categories(&state.categories).await.unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

struct FilePart {
    name: &'static str,
    filename: &'static str,
    content_type: &'static str,
    data: Vec<u8>,
}

fn multipart_body(texts: &[(&str, &str)], files: &[FilePart]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.name, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn intake_request_body(description: &str) -> Vec<u8> {
    multipart_body(
        &[("description", description), ("size_preference", "30cm")],
        &[FilePart {
            name: "source_image",
            filename: "main.png",
            content_type: "image/png",
            data: vec![0u8; 32],
        }],
    )
}

async fn submit_order(app: &axum::Router, requester: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/custom-orders")
                .header("x-caller-id", requester)
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(intake_request_body(
                    "A diorama of a mountain village",
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["order_id"].as_str().unwrap().to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_intake_returns_created_order() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;
    assert!(!order_id.is_empty());
}

#[tokio::test]
async fn test_intake_requires_caller_identity() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/custom-orders")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(intake_request_body(
                    "A diorama of a mountain village",
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_intake_rejects_short_description() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/custom-orders")
                .header("x-caller-id", "user_1")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(intake_request_body("short")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("description"));
}

#[tokio::test]
async fn test_order_detail_carries_signed_source_url() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/custom-orders/{order_id}"))
                .header("x-caller-id", "user_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "pending_review");
    assert!(json["source_image_url"].as_str().unwrap().contains("signed"));
}

#[tokio::test]
async fn test_requesters_cannot_read_foreign_orders() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/custom-orders/{order_id}"))
                .header("x-caller-id", "user_2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_requires_operator_role() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/quote"))
                .header("x-caller-id", "user_1")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"price": 50000}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/quote"))
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"price": 50000}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "quote_provided");
    assert_eq!(json["quoted_price"], 50000);
}

#[tokio::test]
async fn test_set_status_rejects_unknown_status_string() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/status"))
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "half_done"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_rejects_non_completed_order_with_conflict() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let body = multipart_body(
        &[
            ("name", "Mountain village diorama"),
            ("description", "Hand-painted, 30cm base"),
            ("base_price", "120000"),
            ("painting_price", "30000"),
            ("stock_quantity", "1"),
            ("category_id", "4"),
        ],
        &[FilePart {
            name: "images",
            filename: "front.png",
            content_type: "image/png",
            data: vec![0u8; 32],
        }],
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/publish"))
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_complete_then_publish_end_to_end() {
    let (app, _) = setup().await;
    let order_id = submit_order(&app, "user_1").await;

    let complete_body = multipart_body(&[], &[FilePart {
        name: "images",
        filename: "done.png",
        content_type: "image/png",
        data: vec![0u8; 32],
    }]);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/completed-images"))
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(complete_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "completed");

    let publish_body = multipart_body(
        &[
            ("name", "Mountain village diorama"),
            ("description", "Hand-painted, 30cm base"),
            ("base_price", "120000"),
            ("painting_price", "30000"),
            ("stock_quantity", "1"),
            ("category_id", "4"),
        ],
        &[FilePart {
            name: "images",
            filename: "front.png",
            content_type: "image/png",
            data: vec![0u8; 32],
        }],
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/custom-orders/{order_id}/publish"))
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(publish_body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    let product_id = json["product_id"].as_str().unwrap().to_string();
    assert!(json["link_warning"].is_null());

    // The product is visible in the catalog.
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["price"], 150000);
    assert_eq!(json["image_urls"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_categories_are_seeded() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_operator_list_sees_all_requesters_orders() {
    let (app, _) = setup().await;
    submit_order(&app, "user_1").await;
    submit_order(&app, "user_2").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/custom-orders?status=pending_review")
                .header("x-caller-id", "admin_1")
                .header("x-caller-role", "operator")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    // A requester only sees their own.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/custom-orders")
                .header("x-caller-id", "user_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}
