//! Completion provider: request/response translation for the hosted LLM API.
//!
//! [`Responder`] owns the HTTP client and the API credential. Its `respond`
//! method never fails: every [`RequestError`] is logged and collapsed into
//! [`FAILURE_REPLY`], so a bad upstream call cannot stop the message loop.

pub mod responder;
pub mod wire;

use thiserror::Error;

pub use responder::Responder;

/// Reply sent to the chat when the completion call fails for any reason.
pub const FAILURE_REPLY: &str = "Failed to process request";

/// Reply sent to the chat when the provider answers with zero candidates.
pub const EMPTY_REPLY: &str = "No response from AI";

// ── Error ─────────────────────────────────────────────────────────────────────

/// One failed completion call. The variants are only distinguished in logs;
/// the end user always sees [`FAILURE_REPLY`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),
    #[error("non-OK HTTP status: {status}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("failed to unmarshal response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RequestError {
    /// Short, stable tag for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Serialize(_) => "serialize",
            RequestError::Transport(_) => "transport",
            RequestError::ReadBody(_) => "read_body",
            RequestError::Status { .. } => "status",
            RequestError::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_names_code() {
        let e = RequestError::Status {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "{}".into(),
        };
        assert!(e.to_string().contains("429"));
        assert_eq!(e.kind(), "status");
    }

    #[test]
    fn decode_error_kind() {
        let err = serde_json::from_str::<wire::CompletionResponse>("not json").unwrap_err();
        let e = RequestError::Decode(err);
        assert_eq!(e.kind(), "decode");
        assert!(e.to_string().starts_with("failed to unmarshal"));
    }
}
