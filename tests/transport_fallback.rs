//! Transport pipeline behavior against mock HTTP servers: proxy first,
//! direct API as fallback, terminal errors surfaced without retrying.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wishtheory::generation::GenerationClient;
use wishtheory::Config;

fn sample_content() -> serde_json::Value {
    json!({
        "affirmations": [
            "I am living in my peaceful home by the ocean.",
            "I am surrounded by the sound of waves every morning.",
            "I am grateful for the calm my home gives me.",
            "I am at ease in my sanctuary by the sea.",
            "I am worthy of the serenity I have created."
        ],
        "scripting": "I wake to the sound of the tide and sunlight on the water. My home is quiet and warm, and every room holds the peace I always imagined. I am deeply grateful.",
        "visualizations": [
            "Morning coffee on a weathered deck above the dunes.",
            "Salt air drifting through open windows at dusk.",
            "Bare feet on cool tile, the horizon framed by the door."
        ],
        "actions": [
            "Browse coastal listings for twenty minutes this week.",
            "Open a dedicated savings account for the home fund.",
            "Visit the nearest shoreline and walk it at sunrise."
        ]
    })
}

/// Gemini-shaped success body carrying `content` as the candidate text.
fn gemini_text_body(content: &serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": content.to_string() }] }
        }]
    })
}

fn client(proxy: Option<&MockServer>, gemini: Option<&MockServer>) -> GenerationClient {
    let config = Config {
        endpoint: proxy.map(MockServer::uri),
        api_base: gemini.map(MockServer::uri),
        api_key: gemini.map(|_| "test-key".to_string()),
        ..Config::default()
    };
    GenerationClient::new(&config)
}

#[tokio::test]
async fn proxy_success_is_used_directly() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_content()))
        .expect(1)
        .mount(&proxy)
        .await;

    let content = client(Some(&proxy), None)
        .generate_content("a peaceful home by the ocean")
        .await
        .unwrap();

    assert_eq!(content.affirmations.len(), 5);
    assert_eq!(content.visualizations.len(), 3);
    assert_eq!(content.actions.len(), 3);
    assert!(content.scripting.contains("tide"));
}

#[tokio::test]
async fn missing_proxy_route_falls_back_to_direct_api() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/manifest"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&proxy)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_body(&sample_content())))
        .expect(1)
        .mount(&gemini)
        .await;

    let content = client(Some(&proxy), Some(&gemini))
        .generate_content("a peaceful home by the ocean")
        .await
        .unwrap();

    // Same shape as a proxy success: the caller cannot tell which transport answered.
    assert_eq!(content.affirmations.len(), 5);
    assert_eq!(content.visualizations.len(), 3);
    assert_eq!(content.actions.len(), 3);
}

#[tokio::test]
async fn unreachable_proxy_falls_back_to_direct_api() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_body(&sample_content())))
        .expect(1)
        .mount(&gemini)
        .await;

    let config = Config {
        // Nothing listens here; the connection error is recoverable.
        endpoint: Some("http://127.0.0.1:9".into()),
        api_base: Some(gemini.uri()),
        api_key: Some("test-key".into()),
        ..Config::default()
    };
    let content = GenerationClient::new(&config)
        .generate_content("a peaceful home by the ocean")
        .await
        .unwrap();

    assert_eq!(content.affirmations.len(), 5);
}

#[tokio::test]
async fn proxy_server_error_is_surfaced_without_fallback() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/manifest"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "quota exceeded" })),
        )
        .expect(1)
        .mount(&proxy)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;

    let err = client(Some(&proxy), Some(&gemini))
        .generate_content("a peaceful home by the ocean")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quota exceeded");
}

#[tokio::test]
async fn proxy_error_without_json_body_reports_the_status() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/manifest"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&proxy)
        .await;

    let err = client(Some(&proxy), None)
        .generate_content("anything")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn no_proxy_and_no_key_is_a_configuration_error() {
    let err = client(None, None)
        .generate_content("a peaceful home by the ocean")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn speak_uses_the_proxy_payload() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/speak"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "QUJD" })))
        .expect(1)
        .mount(&proxy)
        .await;

    let payload = client(Some(&proxy), None)
        .generate_audio("I am calm.")
        .await
        .unwrap();
    assert_eq!(payload, "QUJD");
}

#[tokio::test]
async fn speak_with_empty_proxy_payload_falls_back_to_direct_api() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/speak"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "" })))
        .expect(1)
        .mount(&proxy)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{
                    "inlineData": { "mimeType": "audio/pcm", "data": "UENN" }
                }]}
            }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let payload = client(Some(&proxy), Some(&gemini))
        .generate_audio("I am calm.")
        .await
        .unwrap();
    assert_eq!(payload, "UENN");
}

#[tokio::test]
async fn direct_api_error_message_is_surfaced() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/manifest"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&proxy)
        .await;

    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Resource has been exhausted", "code": 429 }
        })))
        .mount(&gemini)
        .await;

    let err = client(Some(&proxy), Some(&gemini))
        .generate_content("anything")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Resource has been exhausted");
}
