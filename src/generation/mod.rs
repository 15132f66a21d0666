//! Generation client: structured manifestation content and spoken audio from
//! the remote service, behind a try-primary-then-fallback transport strategy.
//!
//! Transports form a ranked pipeline. Each attempt resolves to success (use
//! the value), a recoverable skip (try the next transport), or a terminal
//! error (surface it, no further attempts). The primary transport is a
//! deployed proxy (`{endpoint}/api/manifest`, `{endpoint}/api/speak`); the
//! fallback calls Gemini directly with a local API key.

mod gemini;
pub mod http_client;
mod types;

use crate::config::Config;
use crate::error::GenerationError;
use crate::manifestation::ManifestationContent;
use gemini::DirectGemini;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::pin::Pin;
use types::{ManifestRequest, ProxyError, SpeakRequest, SpeakResponse};

/// Outcome of one transport attempt. Terminal errors travel in the outer
/// `Result`.
enum TransportOutcome<T> {
    Success(T),
    Skip(String),
}

type Attempt<'a, T> =
    Pin<Box<dyn Future<Output = Result<TransportOutcome<T>, GenerationError>> + Send + 'a>>;

pub struct GenerationClient {
    http: Client,
    endpoint: Option<String>,
    direct: DirectGemini,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Self {
        let http = http_client::build_client();
        Self {
            endpoint: config.endpoint_base(),
            direct: DirectGemini::new(config, http.clone()),
            http,
        }
    }

    /// Generate the four-part manifestation content for `desire`.
    pub async fn generate_content(
        &self,
        desire: &str,
    ) -> Result<ManifestationContent, GenerationError> {
        let attempts: Vec<(&str, Attempt<'_, ManifestationContent>)> = vec![
            ("proxy", Box::pin(self.proxy_manifest(desire))),
            ("direct", Box::pin(self.direct_manifest(desire))),
        ];
        let content = run_pipeline(attempts).await?;
        if content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(content)
    }

    /// Generate spoken audio for `text`; returns the base64 PCM payload.
    pub async fn generate_audio(&self, text: &str) -> Result<String, GenerationError> {
        let attempts: Vec<(&str, Attempt<'_, String>)> = vec![
            ("proxy", Box::pin(self.proxy_speak(text))),
            ("direct", Box::pin(self.direct_speak(text))),
        ];
        run_pipeline(attempts).await
    }

    // ── Primary transport: deployed proxy ───────────────────────────────

    async fn proxy_manifest(
        &self,
        desire: &str,
    ) -> Result<TransportOutcome<ManifestationContent>, GenerationError> {
        let Some(base) = &self.endpoint else {
            return Ok(TransportOutcome::Skip("no proxy endpoint configured".into()));
        };

        let response = match self
            .http
            .post(format!("{base}/api/manifest"))
            .json(&ManifestRequest { desire })
            .send()
            .await
        {
            Ok(response) => response,
            // Unreachable endpoint is recoverable; fall through to direct.
            Err(e) => return Ok(TransportOutcome::Skip(e.to_string())),
        };

        let status = response.status();
        if status.is_success() {
            let content = response
                .json::<ManifestationContent>()
                .await
                .map_err(|e| GenerationError::Service {
                    message: format!("manifest endpoint returned an invalid body: {e}"),
                })?;
            return Ok(TransportOutcome::Success(content));
        }

        // A missing route means we are in a deployment without the backend;
        // anything else is a real answer and must not be papered over.
        if status == StatusCode::NOT_FOUND {
            return Ok(TransportOutcome::Skip("manifest endpoint absent (404)".into()));
        }
        Err(proxy_error(status, response.text().await.unwrap_or_default()))
    }

    async fn proxy_speak(&self, text: &str) -> Result<TransportOutcome<String>, GenerationError> {
        let Some(base) = &self.endpoint else {
            return Ok(TransportOutcome::Skip("no proxy endpoint configured".into()));
        };

        let response = match self
            .http
            .post(format!("{base}/api/speak"))
            .json(&SpeakRequest { text })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(TransportOutcome::Skip(e.to_string())),
        };

        let status = response.status();
        if status.is_success() {
            let body: SpeakResponse =
                response.json().await.map_err(|e| GenerationError::Service {
                    message: format!("speak endpoint returned an invalid body: {e}"),
                })?;
            return Ok(match body.data.filter(|d| !d.is_empty()) {
                Some(data) => TransportOutcome::Success(data),
                None => TransportOutcome::Skip("speak endpoint returned no audio".into()),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Ok(TransportOutcome::Skip("speak endpoint absent (404)".into()));
        }
        Err(proxy_error(status, response.text().await.unwrap_or_default()))
    }

    // ── Fallback transport: direct API ──────────────────────────────────

    async fn direct_manifest(
        &self,
        desire: &str,
    ) -> Result<TransportOutcome<ManifestationContent>, GenerationError> {
        self.direct
            .generate_content(desire)
            .await
            .map(TransportOutcome::Success)
    }

    async fn direct_speak(&self, text: &str) -> Result<TransportOutcome<String>, GenerationError> {
        self.direct
            .generate_audio(text)
            .await
            .map(TransportOutcome::Success)
    }
}

async fn run_pipeline<T>(
    attempts: Vec<(&str, Attempt<'_, T>)>,
) -> Result<T, GenerationError> {
    for (name, attempt) in attempts {
        match attempt.await? {
            TransportOutcome::Success(value) => {
                tracing::debug!(transport = name, "transport succeeded");
                return Ok(value);
            }
            TransportOutcome::Skip(reason) => {
                tracing::warn!(transport = name, %reason, "transport unavailable, falling back");
            }
        }
    }
    Err(GenerationError::TransportUnavailable)
}

/// Map a non-2xx, non-404 proxy answer to a terminal service error, keeping
/// the endpoint's own message verbatim when it sent one.
fn proxy_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ProxyError>(&body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| format!("manifestation endpoint failed ({status})"));
    GenerationError::Service { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_error_prefers_the_body_message() {
        let err = proxy_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"quota exceeded"}"#.into(),
        );
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn proxy_error_falls_back_to_status_wording() {
        let err = proxy_error(StatusCode::BAD_GATEWAY, "<html>oops</html>".into());
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn empty_pipeline_reports_transport_unavailable() {
        let attempts: Vec<(&str, Attempt<'_, ()>)> = Vec::new();
        let err = run_pipeline(attempts).await.unwrap_err();
        assert!(matches!(err, GenerationError::TransportUnavailable));
    }

    #[tokio::test]
    async fn pipeline_skips_then_succeeds() {
        let attempts: Vec<(&str, Attempt<'_, u32>)> = vec![
            ("a", Box::pin(async { Ok(TransportOutcome::Skip("down".into())) })),
            ("b", Box::pin(async { Ok(TransportOutcome::Success(7)) })),
        ];
        assert_eq!(run_pipeline(attempts).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn pipeline_stops_at_terminal_errors() {
        let attempts: Vec<(&str, Attempt<'_, u32>)> = vec![
            (
                "a",
                Box::pin(async {
                    Err(GenerationError::Service {
                        message: "quota exceeded".into(),
                    })
                }),
            ),
            ("b", Box::pin(async { Ok(TransportOutcome::Success(7)) })),
        ];
        let err = run_pipeline(attempts).await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
