use super::*;

const PATH: &str = "/v1beta/models/model-1:generateContent";

fn client(url: String) -> GeminiChatClient {
    GeminiChatClient::new("abc".to_string(), Some("model-1".to_string()), Some(url))
}

#[tokio::test]
async fn it_returns_generated_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "abc")
        .match_query(mockito::Matcher::Missing)
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi "},{"text":"there"}]}}]}"#)
        .create_async()
        .await;

    let res = client(server.url()).complete("Hello").await.unwrap();

    assert_eq!(res.response, "Hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(403)
        .with_body(r#"{"error":{"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let res = client(server.url()).complete("Hello").await;

    assert!(res.is_err());
    assert!(!res.unwrap_err().to_string().contains("API key not valid"));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_on_empty_candidates() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;

    let res = client(server.url()).complete("Hello").await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_on_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    assert!(client(server.url()).complete("Hello").await.is_err());
}

#[test]
fn it_requires_an_api_key() {
    let config = LlmConfig {
        api_key: Some("  ".to_string()),
        ..LlmConfig::default()
    };
    assert!(GeminiChatClient::from_config(&config).is_err());
}

#[test]
fn it_applies_defaults() {
    let config = LlmConfig {
        api_key: Some("abc".to_string()),
        ..LlmConfig::default()
    };
    let client = GeminiChatClient::from_config(&config).unwrap();

    assert_eq!(client.get_model(), DEFAULT_GEMINI_MODEL);
    assert_eq!(client.get_base_url().as_deref(), Some(DEFAULT_GEMINI_BASE_URL));
}

#[tokio::test]
async fn it_keeps_the_api_key_out_of_network_errors() {
    let client = GeminiChatClient::new(
        "SUPERSECRETKEY".to_string(),
        None,
        Some("http://127.0.0.1:9".to_string())
    );

    let err = client.complete("hi").await.unwrap_err();

    assert!(!err.to_string().contains("SUPERSECRETKEY"));
}

#[tokio::test]
async fn it_keeps_the_api_key_out_of_body_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = GeminiChatClient::new(
        "SUPERSECRETKEY".to_string(),
        Some("model-1".to_string()),
        Some(server.url())
    );
    let err = client.complete("hi").await.unwrap_err();

    assert!(!err.to_string().contains("SUPERSECRETKEY"));
}
