//! End-to-end tests over the HTTP reference provider with a mock server.

use ai_cache_rust::{
    CompletionClient, CompletionRequest, Error, Message, ProviderConfig, ProviderError,
};
use tempfile::TempDir;

fn chat_body() -> &'static str {
    r#"{
        "id": "chatcmpl-123",
        "model": "gpt-4o-mini",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
    }"#
}

fn client_for(base_url: &str, legacy_root: &std::path::Path) -> CompletionClient {
    CompletionClient::builder()
        .config(
            ProviderConfig::new("gpt-4o-mini")
                .base_url(base_url)
                .api_key("test-key"),
        )
        .legacy_cache_root(legacy_root)
        .build()
        .unwrap()
}

#[tokio::test]
async fn chat_completion_is_parsed_priced_and_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_body())
        .expect(1)
        .create_async()
        .await;

    let root = TempDir::new().unwrap();
    let client = client_for(&server.url(), root.path());
    let request = CompletionRequest::chat(vec![Message::user("2+2=")]);

    let first = client.create(request.clone()).await.unwrap();
    assert_eq!(first.first_text(), Some("4"));
    assert!(first.cost > 0.0);

    // Second identical call is served from cache; the server sees one POST.
    let second = client.create(request).await.unwrap();
    assert_eq!(first, second);
    mock.assert_async().await;

    let total = client.total_usage_summary().unwrap();
    assert_eq!(total.models["gpt-4o-mini"].calls, 2);
    assert_eq!(total.models["gpt-4o-mini"].prompt_tokens, 24);
}

#[tokio::test]
async fn bare_completions_are_normalized_to_the_unified_model() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "cmpl-9",
                "model": "gpt-3.5-turbo-instruct",
                "choices": [{"index": 0, "text": "4", "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
            }"#,
        )
        .create_async()
        .await;

    let root = TempDir::new().unwrap();
    let client = client_for(&server.url(), root.path());

    let response = client
        .create(CompletionRequest::completion("1+3="))
        .await
        .unwrap();
    assert_eq!(response.first_text(), Some("4"));
    assert_eq!(response.usage.prompt_tokens, 5);
}

#[tokio::test]
async fn provider_errors_surface_without_side_effects() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let root = TempDir::new().unwrap();
    let client = client_for(&server.url(), root.path());

    let err = client
        .create(CompletionRequest::chat(vec![Message::user("2+2=")]))
        .await
        .unwrap_err();
    match err {
        Error::Remote(ProviderError::Http { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(client.total_usage_summary().is_none());
    assert!(std::fs::read_dir(root.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn malformed_base_url_fails_at_build_time() {
    let err = CompletionClient::builder()
        .config(ProviderConfig::new("gpt-4o-mini").base_url("not a url"))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
