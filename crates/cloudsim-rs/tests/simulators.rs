//! Exercise the clients against an in-process fake of the simulator APIs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cloudsim_rs::{ClientOptions, ObjectStoreClient, QueueClient, SimError};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn queue_app(recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/messages",
            get(|| async {
                Json(json!({
                    "queueName": "test-queue",
                    "queueUrl": "http://localstack:4566/000000000000/test-queue",
                    "approximateNumberOfMessages": "2",
                    "approximateNumberOfMessagesNotVisible": "5",
                    "messages": [
                        {"messageId": "m-1", "body": "first", "md5OfBody": "aaaaaaaaaaaa",
                         "receiptHandle": "rh-1", "attributes": {}, "messageAttributes": {}},
                        {"messageId": "m-2", "body": "second", "md5OfBody": "bbbbbbbbbbbb",
                         "receiptHandle": "rh-2", "attributes": {}, "messageAttributes": {}}
                    ]
                }))
            }),
        )
        .route(
            "/send-message",
            post(
                |State(rec): State<Recorded>, Json(body): Json<Value>| async move {
                    let text = body["message"].as_str().unwrap_or_default().to_string();
                    rec.bodies.lock().unwrap().push(body);
                    if text == "overflow" {
                        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "queue full"})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({"messageId": "m-3", "md5OfBody": "cccccccc"})),
                    )
                },
            ),
        )
        .route(
            "/delete-message",
            post(
                |State(rec): State<Recorded>, Json(body): Json<Value>| async move {
                    let handle = body["receiptHandle"].as_str().unwrap_or_default().to_string();
                    rec.bodies.lock().unwrap().push(body);
                    if handle == "stale" {
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"error": "ReceiptHandleIsInvalid"})),
                        );
                    }
                    (StatusCode::OK, Json(json!({"success": true})))
                },
            ),
        )
        .with_state(recorded)
}

#[tokio::test]
async fn lists_files() {
    let app = Router::new().route(
        "/files",
        get(|| async {
            Json(json!({
                "bucket": "test-bucket",
                "files": [
                    {"key": "octocat.png", "size": 1536, "lastModified": "2024-05-01T10:00:00+00:00"}
                ]
            }))
        }),
    );
    let base = serve(app).await;

    let client = ObjectStoreClient::new(&base, &ClientOptions::default()).unwrap();
    let listing = client.list_files().await.unwrap();

    assert_eq!(listing.bucket_name, "test-bucket");
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].size, 1536);
}

#[tokio::test]
async fn surfaces_error_payload_on_listing_failure() {
    let app = Router::new().route(
        "/files",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "NoSuchBucket: test-bucket"})),
            )
        }),
    );
    let base = serve(app).await;

    let client = ObjectStoreClient::new(&base, &ClientOptions::default()).unwrap();
    let err = client.list_files().await.unwrap_err();

    match err {
        SimError::Application { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("NoSuchBucket: test-bucket"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_status_without_payload_has_no_message() {
    let app = Router::new().route(
        "/files",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;

    let client = ObjectStoreClient::new(&base, &ClientOptions::default()).unwrap();
    let err = client.list_files().await.unwrap_err();

    assert!(matches!(
        err,
        SimError::Application {
            status: 500,
            message: None
        }
    ));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let app = Router::new().route(
        "/files",
        get(|| async { Json(json!({"bucket": "b", "files": "not-a-list"})) }),
    );
    let base = serve(app).await;

    let client = ObjectStoreClient::new(&base, &ClientOptions::default()).unwrap();
    let err = client.list_files().await.unwrap_err();

    assert!(matches!(err, SimError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn reads_queue_with_string_counts() {
    let base = serve(queue_app(Recorded::default())).await;

    let client = QueueClient::new(&base, &ClientOptions::default()).unwrap();
    let queue = client.messages().await.unwrap();

    assert_eq!(queue.queue_name, "test-queue");
    assert_eq!(queue.visible_count, 2);
    assert_eq!(queue.in_flight_count, 5);
    assert_eq!(queue.messages.len(), 2);
    assert_eq!(queue.messages[1].receipt_handle, "rh-2");
}

#[tokio::test]
async fn sends_and_deletes_messages() {
    let recorded = Recorded::default();
    let base = serve(queue_app(recorded.clone())).await;
    let client = QueueClient::new(&base, &ClientOptions::default()).unwrap();

    let receipt = client.send_message("hello queue").await.unwrap();
    assert_eq!(receipt.message_id.as_deref(), Some("m-3"));

    client.delete_message("rh-1").await.unwrap();

    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![
            json!({"message": "hello queue"}),
            json!({"receiptHandle": "rh-1"})
        ]
    );
}

#[tokio::test]
async fn mutation_failures_carry_server_message() {
    let base = serve(queue_app(Recorded::default())).await;
    let client = QueueClient::new(&base, &ClientOptions::default()).unwrap();

    let err = client.send_message("overflow").await.unwrap_err();
    assert_eq!(err.server_message(), Some("queue full"));

    let err = client.delete_message("stale").await.unwrap_err();
    assert_eq!(err.server_message(), Some("ReceiptHandleIsInvalid"));
}

#[tokio::test]
async fn unreachable_service_is_a_connection_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = QueueClient::new(&addr.to_string(), &ClientOptions::default()).unwrap();
    let err = client.messages().await.unwrap_err();

    assert!(err.is_connectivity(), "got {err:?}");
}
