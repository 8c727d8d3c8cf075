//! External text-understanding service clients.
//!
//! # Responsibility
//! - Define the `TextModel` seam over the language-model transport.
//! - Build categorization and nudge requests on top of it.
//!
//! # Invariants
//! - Clients never retry; failures surface as one `AiError` value and the
//!   caller owns the recovery policy.
//! - Prompt text is never logged, only its length.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod categorizer;
pub mod gemini;
pub mod nudge;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug)]
pub enum AiError {
    /// Input text is blank after trimming; no request was sent.
    EmptyInput,
    /// No API key configured for the remote model.
    MissingApiKey,
    Transport(reqwest::Error),
    /// Service answered with a non-success status.
    Status {
        status: u16,
        body: String,
    },
    /// Response body or model output does not match the expected shape.
    Decode(String),
    /// Model returned no text candidate.
    EmptyResponse,
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input text is empty"),
            Self::MissingApiKey => write!(f, "language model API key is not configured"),
            Self::Transport(err) => write!(f, "language model request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "language model returned status {status}: {body}")
            }
            Self::Decode(message) => write!(f, "invalid language model response: {message}"),
            Self::EmptyResponse => write!(f, "language model returned no text"),
        }
    }
}

impl Error for AiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl AiError {
    /// Stable short code for metadata-only log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::MissingApiKey => "missing_api_key",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::EmptyResponse => "empty_response",
        }
    }
}

/// One generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// JSON schema constraining structured output; `None` for free text.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// Language-model backend used by the categorizer and nudge clients.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Returns the raw model text for `request`.
    async fn generate(&self, request: &GenerateRequest) -> AiResult<String>;

    /// Backend description for logging.
    fn description(&self) -> String;
}
