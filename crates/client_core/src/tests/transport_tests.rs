use super::*;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    routing::post,
    Json, Router,
};
use shared::domain::{TaskAction, TaskStatus};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<(String, ChatRequest)>>>>,
    status: StatusCode,
    body: String,
}

async fn handle_chat(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send((user_id, payload));
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

async fn spawn_chat_server(
    status: StatusCode,
    body: String,
) -> (String, oneshot::Receiver<(String, ChatRequest)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        body,
    };
    let app = Router::new()
        .route("/:user_id/chat", post(handle_chat))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

#[tokio::test]
async fn exchange_posts_request_and_parses_envelope() {
    let reply = r#"{
        "response": "Done",
        "timestamp": "2026-02-09T12:00:00Z",
        "metadata": {"operation": "complete", "taskId": "t3"}
    }"#;
    let (server_url, request_rx) = spawn_chat_server(StatusCode::OK, reply.to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let before = Utc::now();
    let envelope = transport
        .exchange("user-7", "finish the report")
        .await
        .expect("exchange");

    assert_eq!(envelope.response, "Done");
    assert_eq!(
        envelope.metadata.expect("metadata").action(),
        Some(TaskAction::Completed {
            task_id: "t3".into(),
            task_name: None,
        })
    );

    let (user_id, request) = request_rx.await.expect("request captured");
    assert_eq!(user_id, "user-7");
    assert_eq!(request.message, "finish the report");
    assert!(request.timestamp >= before && request.timestamp <= Utc::now());
}

#[tokio::test]
async fn structured_error_body_maps_to_typed_error() {
    let body = r#"{"error": "token expired", "code": "UNAUTHORIZED"}"#;
    let (server_url, _rx) = spawn_chat_server(StatusCode::UNAUTHORIZED, body.to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let err = transport
        .exchange("user-7", "hello")
        .await
        .expect_err("must fail");
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "token expired");
}

#[tokio::test]
async fn unknown_wire_code_collapses_to_unknown_error() {
    let body = r#"{"error": "teapot", "code": "IM_A_TEAPOT"}"#;
    let (server_url, _rx) = spawn_chat_server(StatusCode::BAD_REQUEST, body.to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let err = transport
        .exchange("user-7", "hello")
        .await
        .expect_err("must fail");
    assert_eq!(err.code, ErrorCode::UnknownError);
    assert_eq!(err.message, "teapot");
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_request_failed() {
    let (server_url, _rx) =
        spawn_chat_server(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let err = transport
        .exchange("user-7", "hello")
        .await
        .expect_err("must fail");
    assert_eq!(err.code, ErrorCode::UnknownError);
    assert_eq!(err.message, "Request failed");
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_failure() {
    let (server_url, _rx) = spawn_chat_server(StatusCode::OK, "not-json".to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let err = transport
        .exchange("user-7", "hello")
        .await
        .expect_err("must fail");
    assert_eq!(err.code, ErrorCode::UnknownError);
    assert!(err.message.contains("malformed chat response body"));
}

#[tokio::test]
async fn connection_refused_maps_to_network_error() {
    // Grab a free port, then close the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport = HttpChatTransport::new(format!("http://{addr}"));
    let err = transport
        .exchange("user-7", "hello")
        .await
        .expect_err("must fail");
    assert_eq!(err.code, ErrorCode::NetworkError);
}

#[tokio::test]
async fn list_reply_with_statuses_round_trips() {
    let reply = r#"{
        "response": "Your tasks:",
        "timestamp": "2026-02-09T12:00:00Z",
        "metadata": {
            "operation": "list",
            "taskCount": 1,
            "tasks": [
                {"id": "t1", "name": "water plants", "status": "active", "dueDate": "2026-02-10"}
            ]
        }
    }"#;
    let (server_url, _rx) = spawn_chat_server(StatusCode::OK, reply.to_string()).await;

    let transport = HttpChatTransport::new(server_url);
    let envelope = transport
        .exchange("user-7", "show tasks")
        .await
        .expect("exchange");
    let Some(TaskAction::Listed { tasks }) = envelope.metadata.expect("metadata").action() else {
        panic!("expected list action");
    };
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Active);
    assert_eq!(tasks[0].due_date.as_deref(), Some("2026-02-10"));
}
