use gptbot::{
    CompletionEngine, Engine, EngineError, InferContext, Message, ModelType, Request, Session,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine_for(server: &MockServer) -> CompletionEngine {
    let session = Session::with_options("sk-test", &server.uri(), None).unwrap();
    CompletionEngine::with_session(session, ModelType::TextDavinci003)
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "cmpl-1",
        "object": "text_completion",
        "choices": [{ "text": text, "index": 0, "finish_reason": "stop" }]
    }))
}

#[tokio::test]
async fn hello_returns_first_choice_text() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "text-davinci-003",
            "prompt": ["hello"],
            "temperature": 0.7,
            "max_tokens": 50
        })))
        .respond_with(reply("hi there"))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let request = Request::new(vec![Message::user("hello")], 0.7, 50);
    let response = engine.infer(&InferContext::background(), &request).await.unwrap();

    assert_eq!(response.text, "hi there");
}

#[tokio::test]
async fn role_never_sent() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(reply("ok"))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let request = Request::new(
        vec![
            Message::new("system", "Summarize: cats"),
            Message::user("trailing"),
        ],
        0.0,
        0,
    );
    engine
        .infer(&InferContext::background(), &request)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let raw = String::from_utf8_lossy(&received[0].body);
    assert!(!raw.contains("role"));
    assert!(!raw.contains("system"));
    assert!(!raw.contains("trailing"));

    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["prompt"], json!(["Summarize: cats"]));
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["max_tokens"], 0);
}

#[tokio::test]
async fn zero_choices_is_empty_response() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let request = Request::new(vec![Message::user("hello")], 0.7, 50);
    let err = engine
        .infer(&InferContext::background(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::EmptyResponse));
}

#[tokio::test]
async fn unauthorized_surfaces_backend_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key"))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let request = Request::new(vec![Message::user("hello")], 0.7, 50);
    let err = engine
        .infer(&InferContext::background(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, EngineError::Http { ref body, .. } if body == "Incorrect API key"));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    init_tracing();
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = Session::with_options("sk-test", &format!("http://{addr}"), None).unwrap();
    let engine = CompletionEngine::with_session(session, ModelType::TextAda001);
    let request = Request::new(vec![Message::user("hello")], 0.7, 50);
    let err = engine
        .infer(&InferContext::background(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Transport(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn truncated_error_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // Drain the request so the client is done writing before we hang up.
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        while !received.ends_with(b"}") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
            }
        }
        // Promise 100 bytes, send 5, then hang up.
        let _ = socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\nshort")
            .await;
        let _ = socket.shutdown().await;
    });

    let session = Session::with_options("sk-test", &format!("http://{addr}"), None).unwrap();
    let engine = CompletionEngine::with_session(session, ModelType::TextDavinci002);
    let request = Request::new(vec![Message::user("hello")], 0.7, 50);
    let err = engine
        .infer(&InferContext::background(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, EngineError::Http { ref body, .. } if body.is_empty()));
}
