//! Single-shot completion call against the RapidAPI-hosted chat endpoint.
//!
//! One `respond` = one POST. No retries, no caching; every call is
//! independent. The credential is captured at construction.

use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error};

use super::wire::{CompletionRequest, CompletionResponse};
use super::{EMPTY_REPLY, FAILURE_REPLY, RequestError};
use crate::config::Config;
use crate::error::AppError;

/// Fixed chat completions endpoint.
pub const API_URL: &str =
    "https://cheapest-gpt-4-turbo-gpt-4-vision-chatgpt-openai-ai-api.p.rapidapi.com/v1/chat/completions";

/// Value of the `X-RapidAPI-Host` header.
pub const API_HOST: &str = "cheapest-gpt-4-turbo-gpt-4-vision-chatgpt-openai-ai-api.p.rapidapi.com";

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Characters of an error body kept in the failure log line.
const BODY_EXCERPT_CHARS: usize = 200;

/// Request/response translator for the completion API.
///
/// Cheap to clone: `reqwest::Client` is an `Arc` internally.
#[derive(Clone)]
pub struct Responder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

impl Responder {
    /// Responder for the production endpoint, using the credential and
    /// timeout from `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::with_endpoint(API_URL, config.api_key.clone(), config.http_timeout)
    }

    /// Responder posting to `endpoint` instead of [`API_URL`].
    ///
    /// `timeout = None` leaves the request unbounded.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: String,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint: endpoint.into(), api_key })
    }

    /// Reply text for `input`. Never fails: errors become [`FAILURE_REPLY`],
    /// an answer without candidates becomes [`EMPTY_REPLY`].
    pub async fn respond(&self, input: &str) -> String {
        match self.complete(input).await {
            Ok(Some(content)) => content,
            Ok(None) => EMPTY_REPLY.to_string(),
            Err(RequestError::Status { status, body }) => {
                error!(
                    kind = "status",
                    %status,
                    body = %excerpt(&body, BODY_EXCERPT_CHARS),
                    "completion request failed"
                );
                FAILURE_REPLY.to_string()
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "completion request failed");
                FAILURE_REPLY.to_string()
            }
        }
    }

    /// One round-trip. `Ok(None)` means the provider returned zero candidates.
    pub async fn complete(&self, input: &str) -> Result<Option<String>, RequestError> {
        let payload = CompletionRequest::single_turn(input);
        let body = serde_json::to_vec(&payload).map_err(RequestError::Serialize)?;

        debug!(
            model = %payload.model,
            max_tokens = payload.max_tokens,
            content_len = input.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_HOST_HEADER, API_HOST)
            .body(body)
            .send()
            .await
            .map_err(RequestError::Transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(RequestError::ReadBody)?;
        let text = String::from_utf8_lossy(&bytes);

        debug!(%status, body = %text, "received completion response");

        if status != StatusCode::OK {
            return Err(RequestError::Status { status, body: text.into_owned() });
        }

        let parsed: CompletionResponse =
            serde_json::from_slice(&bytes).map_err(RequestError::Decode)?;

        debug!(choices = parsed.choices.len(), "decoded completion response");
        Ok(parsed.into_first_content())
    }
}

/// First `max_chars` characters of `body`, marked when cut.
fn excerpt(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_keeps_short_bodies_whole() {
        assert_eq!(excerpt(r#"{"error":"quota"}"#, 200), r#"{"error":"quota"}"#);
        assert_eq!(excerpt("", 200), "");
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 4), "héll…");
        assert_eq!(excerpt(&"x".repeat(500), 200).chars().count(), 201);
    }

    #[tokio::test]
    async fn debug_hides_api_key() {
        let r = Responder::with_endpoint("http://localhost:0/", "secret-key".into(), None).unwrap();
        let shown = format!("{r:?}");
        assert!(shown.contains("localhost"));
        assert!(!shown.contains("secret-key"));
    }

    #[test]
    fn endpoint_host_matches_host_header() {
        assert!(API_URL.starts_with(&format!("https://{API_HOST}/")));
    }

    #[tokio::test]
    async fn unreachable_endpoint_returns_failure_reply() {
        // Port 1 on loopback refuses connections.
        let r = Responder::with_endpoint(
            "http://127.0.0.1:1/v1/chat/completions",
            "k".into(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(r.respond("Hello").await, FAILURE_REPLY);
        assert!(matches!(r.complete("Hello").await, Err(RequestError::Transport(_))));
    }
}
