#![allow(clippy::unwrap_used, clippy::expect_used)]

use parley_core::{EngineFactory, ParleyError, TemplateSegment, Turn};
use parley_engine::{EngineConfig, OllamaEngine};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STANDARD: [TemplateSegment; 3] = [
    TemplateSegment::SystemInstruction,
    TemplateSegment::History,
    TemplateSegment::UserUtterance,
];

async fn backend_with_reply(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        })))
        .mount(&server)
        .await;
    server
}

fn factory_for(server: &MockServer) -> OllamaEngine {
    OllamaEngine::new(EngineConfig {
        base_url: server.uri(),
        ..EngineConfig::default()
    })
}

#[tokio::test]
async fn standard_template_sends_system_history_user() {
    let server = backend_with_reply("Nice weather today.").await;
    let engine = factory_for(&server).open(&STANDARD);

    let history = vec![Turn::user("Hello!"), Turn::assistant("Hi there.")];
    let reply = engine
        .generate_reply("You are Sam.", &history, "Bus is late again.")
        .await
        .unwrap();
    assert_eq!(reply, "Nice weather today.");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["model"], "orca-mini");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "You are Sam.");
    assert_eq!(messages[1]["content"], "Hello!");
    assert_eq!(messages[2]["content"], "Hi there.");
    assert_eq!(messages[3]["role"], "user");
    assert_eq!(messages[3]["content"], "Bus is late again.");
}

#[tokio::test]
async fn handle_template_reshapes_the_request_body() {
    let server = backend_with_reply("ok").await;
    // Utterance-first shape, no history slot.
    let engine = factory_for(&server).open(&[
        TemplateSegment::UserUtterance,
        TemplateSegment::SystemInstruction,
    ]);

    let history = vec![Turn::user("earlier"), Turn::assistant("earlier reply")];
    engine
        .generate_reply("You are terse.", &history, "Hello!")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Hello!");
    assert_eq!(messages[1]["role"], "system");
    assert_eq!(messages[1]["content"], "You are terse.");
}

#[tokio::test]
async fn backend_error_status_maps_to_engine_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let engine = factory_for(&server).open(&STANDARD);
    let err = engine.generate_reply("sys", &[], "hi").await.unwrap_err();
    match err {
        ParleyError::Engine(msg) => assert!(msg.contains("model not loaded")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_completion_is_rejected() {
    let server = backend_with_reply("").await;
    let engine = factory_for(&server).open(&STANDARD);
    let err = engine.generate_reply("sys", &[], "hi").await.unwrap_err();
    assert!(matches!(err, ParleyError::Engine(msg) if msg.contains("empty")));
}
