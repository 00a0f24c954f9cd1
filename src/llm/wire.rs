//! JSON shapes of the `/v1/chat/completions` endpoint.
//!
//! Only the fields this bot reads or writes are modelled. Decoding is lenient
//! about absent fields: no `choices` is an empty list, a missing or `null`
//! `content` is the empty string.

use serde::{Deserialize, Serialize};

/// Model requested for every completion.
pub const MODEL: &str = "gpt-4-turbo-2024-04-09";
/// Server-side cap on generated tokens.
pub const MAX_TOKENS: u32 = 100;
pub const TEMPERATURE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Turn>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    /// Single-turn request: `input` as the only user message, fixed model
    /// parameters.
    pub fn single_turn(input: &str) -> Self {
        Self {
            messages: vec![Turn { role: "user".to_string(), content: input.to_string() }],
            model: MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub message: CandidateMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first candidate, verbatim. `None` when there are no
    /// candidates at all.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_turn_request_shape() {
        let req = CompletionRequest::single_turn("Hello");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [{ "role": "user", "content": "Hello" }],
                "model": "gpt-4-turbo-2024-04-09",
                "max_tokens": 100,
                "temperature": 0.9,
            })
        );
    }

    #[test]
    fn first_candidate_wins() {
        let resp: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.into_first_content().as_deref(), Some("first"));
    }

    #[test]
    fn content_is_not_trimmed() {
        let resp: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  padded \n"}}]}"#).unwrap();
        assert_eq!(resp.into_first_content().as_deref(), Some("  padded \n"));
    }

    #[test]
    fn empty_or_missing_choices_yield_none() {
        let empty: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.into_first_content(), None);
        let missing: CompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(missing.into_first_content(), None);
    }

    #[test]
    fn null_content_decodes_as_empty_string() {
        let resp: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(resp.into_first_content().as_deref(), Some(""));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let resp: CompletionResponse = serde_json::from_str(
            r#"{"id":"c1","object":"chat.completion","choices":[{"index":0,"finish_reason":"length","message":{"role":"assistant","content":"ok"}}],"usage":{"prompt_tokens":3}}"#,
        )
        .unwrap();
        assert_eq!(resp.into_first_content().as_deref(), Some("ok"));
    }
}
