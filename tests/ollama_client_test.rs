mod common;

use std::time::Duration;

use serde_json::json;
use ux_agent::llm::{
    GenerateRequest, GenerationConfig, LlmError, LlmProvider, OllamaClient, OllamaConfig,
};

use common::FakeHttpServer;

fn client(base_url: &str, api_key: Option<&str>) -> OllamaClient {
    let config = OllamaConfig::new(base_url, "gemma:2b-instruct")
        .with_api_key(api_key.map(str::to_string))
        .with_request_timeout(Duration::from_secs(5));
    OllamaClient::new(config).expect("Failed to create Ollama client")
}

#[tokio::test]
async fn test_generate_posts_prompt_and_returns_text() {
    let reply = json!({
        "model": "gemma:2b-instruct",
        "response": "Map the journey first.",
        "done": true,
        "prompt_eval_count": 42,
        "eval_count": 6
    });
    let server = FakeHttpServer::start(200, &reply.to_string()).await;
    let client = client(&server.base_url, None);

    let request = GenerateRequest::new("User: hi\n\nAssistant:")
        .with_config(GenerationConfig::new(200).with_temperature(0.2));
    let generation = client.generate(request).await.expect("generate failed");

    assert_eq!(generation.text, "Map the journey first.");
    assert_eq!(generation.model, "gemma:2b-instruct");
    let usage = generation.usage.expect("usage missing");
    assert_eq!(usage.input_tokens, 42);
    assert_eq!(usage.output_tokens, 6);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/generate");
    assert!(requests[0].header("authorization").is_none());

    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gemma:2b-instruct");
    assert_eq!(body["prompt"], "User: hi\n\nAssistant:");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["num_predict"], 200);
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer_token() {
    let server = FakeHttpServer::start(200, r#"{"models":[{"name":"gemma:2b-instruct"}]}"#).await;
    let client = client(&server.base_url, Some("cloud-key"));

    client.health_check().await.expect("health check failed");

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/tags");
    assert_eq!(requests[0].header("authorization"), Some("Bearer cloud-key"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server =
        FakeHttpServer::start(404, r#"{"error":"model 'gemma:2b-instruct' not found"}"#).await;
    let client = client(&server.base_url, None);

    let err = client.generate(GenerateRequest::new("hi")).await.unwrap_err();
    match err {
        LlmError::HttpError { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "model 'gemma:2b-instruct' not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_reply_is_an_error() {
    let reply = r#"{"model":"gemma:2b-instruct","response":"  ","done":true}"#;
    let server = FakeHttpServer::start(200, reply).await;
    let client = client(&server.base_url, None);

    let err = client.generate(GenerateRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_unreachable_server_is_a_connection_error() {
    // Bind and drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{}", addr), None);
    assert!(client.health_check().await.is_err());
    assert!(client.generate(GenerateRequest::new("hi")).await.is_err());
}
