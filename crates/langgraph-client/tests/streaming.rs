//! Streaming tests against a mock LangGraph server.

use std::time::Duration;

use futures::StreamExt;
use langgraph_client::{
    CancelHandle, Error, FrameMode, LangGraphClient, RunCreate, StreamEvent, StreamMode,
    StreamRequest, StreamStatus,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUN_STREAM: &str = "event: metadata\n\
data: {\"run_id\":\"run-1\"}\n\
\n\
event: values\n\
data: {\"messages\":[]}\n\
metadata: {\"step\":1}\n\
\n\
: keep-alive\n\
\n\
event: end\n\
\n";

fn client_for(server: &MockServer) -> LangGraphClient {
    LangGraphClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn event_stream(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

fn event(name: &str, data: &str, metadata: &str) -> StreamEvent {
    StreamEvent {
        event: name.to_string(),
        data: data.to_string(),
        metadata: metadata.to_string(),
    }
}

#[tokio::test]
async fn test_stream_run_on_thread() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread-1/runs/stream"))
        .and(header("accept", "text/event-stream"))
        .and(header("cache-control", "no-store"))
        .and(body_partial_json(serde_json::json!({
            "assistant_id": "agent",
            "stream_mode": ["values"],
        })))
        .respond_with(event_stream(RUN_STREAM))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let run = RunCreate::new("agent").with_stream_mode([StreamMode::Values]);
    let stream = client.runs().stream(Some("thread-1"), &run).await.unwrap();

    let (events, status) = stream.collect_all().await;
    assert_eq!(
        events,
        vec![
            event("metadata", "{\"run_id\":\"run-1\"}", ""),
            event("values", "{\"messages\":[]}", "{\"step\":1}"),
            event("end", "", ""),
        ]
    );
    assert!(events[2].is_end());
    assert_eq!(status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_stateless_stream_uses_runs_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(event_stream("event: end\n\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap();

    let events: Vec<StreamEvent> = stream.collect().await;
    assert_eq!(events, vec![event("end", "", "")]);
}

#[tokio::test]
async fn test_stream_multiline_data_is_joined() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/custom/stream"))
        .respond_with(event_stream("event: values\r\ndata: {\"a\":\r\ndata: 1}\r\n\r\n"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client
        .stream(StreamRequest::get("/custom/stream"))
        .await
        .unwrap();

    let first = stream.recv().await.unwrap();
    assert_eq!(first.data, "{\"a\":\n1}");
    let value: serde_json::Value = first.data_json().unwrap();
    assert_eq!(value["a"], 1);
    assert!(stream.recv().await.is_none());
    assert_eq!(stream.finished().await, StreamStatus::Completed);
}

#[tokio::test]
async fn test_eager_frame_mode_emits_per_line() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(event_stream("event: values\ndata: {}\n\n"))
        .mount(&server)
        .await;

    let client = LangGraphClient::builder()
        .base_url(server.uri())
        .frame_mode(FrameMode::Eager)
        .build()
        .unwrap();

    let stream = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap();
    let (events, _) = stream.collect_all().await;

    assert_eq!(
        events,
        vec![event("values", "", ""), event("", "{}", "")]
    );
}

#[tokio::test]
async fn test_error_status_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/threads/missing/runs/stream"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"detail\":\"Thread not found\"}"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .runs()
        .stream(Some("missing"), &RunCreate::new("agent"))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "{\"detail\":\"Thread not found\"}");
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedContentType { content_type } => {
            assert_eq!(content_type.as_deref(), Some("application/json"));
        }
        other => panic!("Expected UnexpectedContentType, got {:?}", other),
    }
}

#[tokio::test]
async fn test_content_type_with_charset_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"event: end\n\n".to_vec(), "text/event-stream; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap();
    let (events, status) = stream.collect_all().await;
    assert_eq!(events.len(), 1);
    assert_eq!(status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_connection_refused() {
    // Reserve a port, then free it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = LangGraphClient::builder()
        .base_url(format!("http://127.0.0.1:{}", port))
        .build()
        .unwrap();

    let err = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap_err();
    assert!(err.is_connection_error(), "got {:?}", err);
}

#[tokio::test]
async fn test_cancel_before_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(event_stream("event: end\n\n").set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancelHandle::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client
            .runs()
            .stream_with(None, &RunCreate::new("agent"), Some(cancel)),
    )
    .await
    .expect("cancel should abort the pending request");

    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_join_stream_strips_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/threads/t1/runs/r1/join/stream"))
        .and(query_param("cancel_on_disconnect", "true"))
        .respond_with(event_stream(RUN_STREAM))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stream = client.runs().join_stream("t1", "r1", true).await.unwrap();
    let (events, status) = stream.collect_all().await;

    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.metadata.is_empty()));
    assert_eq!(events[1].data, "{\"messages\":[]}");
    assert_eq!(status, StreamStatus::Completed);
}

#[tokio::test]
async fn test_cancel_open_stream_ends_events() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .respond_with(event_stream(RUN_STREAM))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client
        .runs()
        .stream(None, &RunCreate::new("agent"))
        .await
        .unwrap();

    stream.cancel();
    stream.cancel();

    // Whatever was already queued may still arrive; the channel must close.
    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        while stream.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok());
    assert!(stream.status().is_terminal());
}

#[tokio::test]
async fn test_stream_sends_api_key_and_custom_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/runs/stream"))
        .and(header("x-api-key", "secret"))
        .and(header("x-tenant", "acme"))
        .and(header("x-request-id", "req-7"))
        .respond_with(event_stream("event: end\n\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = LangGraphClient::builder()
        .base_url(server.uri())
        .api_key("secret")
        .header("x-tenant", "acme")
        .build()
        .unwrap();

    let request = StreamRequest::post("/runs/stream")
        .json(&RunCreate::new("agent"))
        .unwrap()
        .header("x-request-id", "req-7");
    let stream = client.stream(request).await.unwrap();
    let (events, _) = stream.collect_all().await;
    assert_eq!(events.len(), 1);
}
