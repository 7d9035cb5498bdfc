// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generation service contract.
//!
//! A single `POST /generate_flowchart` carrying `{"input", "context"?}` and answering with
//! `{"mermaid_code": "<diagram source>"}`. The diagram source is treated as an opaque string.

use std::future::Future;

use serde::{Deserialize, Serialize};

mod client;

pub use client::HttpGenerationClient;

/// Path of the generation endpoint on the service host.
pub const GENERATE_PATH: &str = "/generate_flowchart";

/// Default endpoint of a locally running generation service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/generate_flowchart";

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl GenerateRequest {
    /// Builds a request, dropping a blank context so it is omitted on the wire.
    pub fn new(input: impl Into<String>, context: impl Into<String>) -> Self {
        let context = context.into();
        let context = if context.trim().is_empty() { None } else { Some(context) };
        Self { input: input.into(), context }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub mermaid_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation failed{}: {message}", status_suffix(.status))]
    GenerationFailed { status: Option<u16>, message: String },
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|status| format!(" (HTTP {status})")).unwrap_or_default()
}

impl GenerationError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::GenerationFailed { status: None, message: err.to_string() }
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let mut message: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
        if body.chars().count() > ERROR_BODY_PREVIEW_CHARS {
            message.push('…');
        }
        if message.is_empty() {
            message = "empty response body".to_owned();
        }
        Self::GenerationFailed { status: Some(status), message }
    }
}

/// Anything that can turn a [`GenerateRequest`] into diagram source.
///
/// The HTTP client is the production implementation; tests plug in fixed answers.
pub trait GenerationClient: Send + Sync {
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Extracts the diagram source from a response body.
///
/// Only the canonical shape (`mermaid_code` as a bare string) is accepted; the
/// `{"mermaid_code": {"content": ...}}` shape fails as [`GenerationError::MalformedResponse`].
pub fn parse_generate_response(body: &str) -> Result<String, GenerationError> {
    serde_json::from_str::<GenerateResponse>(body)
        .map(|response| response.mermaid_code)
        .map_err(|err| GenerationError::MalformedResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_generate_response, GenerateRequest, GenerationError};
    use rstest::rstest;

    #[test]
    fn request_omits_blank_context() {
        let request = GenerateRequest::new("order processing", "  ");
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(json, r#"{"input":"order processing"}"#);
    }

    #[test]
    fn request_keeps_context() {
        let request = GenerateRequest::new("onboarding", "for new engineers");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"input": "onboarding", "context": "for new engineers"})
        );
    }

    #[test]
    fn response_source_is_returned_verbatim() {
        let source = parse_generate_response(r#"{"mermaid_code":"graph TD; A-->B;"}"#)
            .expect("canonical response");
        assert_eq!(source, "graph TD; A-->B;");
    }

    #[test]
    fn response_extra_fields_are_ignored() {
        let source =
            parse_generate_response(r#"{"mermaid_code":"graph LR; X-->Y;","model":"stub"}"#)
                .expect("canonical response");
        assert_eq!(source, "graph LR; X-->Y;");
    }

    #[rstest]
    #[case::content_object(r#"{"mermaid_code":{"role":"assistant","content":"graph TD;"}}"#)]
    #[case::missing_field(r#"{"content":"graph TD;"}"#)]
    #[case::bare_string(r#""graph TD;""#)]
    #[case::not_json("<html>oops</html>")]
    #[case::empty("")]
    fn malformed_responses_are_rejected(#[case] body: &str) {
        let err = parse_generate_response(body).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)), "{err:?}");
    }

    #[test]
    fn status_error_truncates_long_bodies() {
        let body = "x".repeat(500);
        let GenerationError::GenerationFailed { status, message } =
            GenerationError::status(500, &body)
        else {
            panic!("expected GenerationFailed");
        };
        assert_eq!(status, Some(500));
        assert_eq!(message.chars().count(), 201);
        assert!(message.ends_with('…'));
    }

    #[test]
    fn status_error_display_mentions_status() {
        let err = GenerationError::status(503, "");
        assert_eq!(err.to_string(), "generation failed (HTTP 503): empty response body");

        let err = GenerationError::transport("connection refused");
        assert_eq!(err.to_string(), "generation failed: connection refused");
    }
}
