//! Wire types for the Ollama `/generate` and `/chat` endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single entry of the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Continuation state handed back to the server verbatim.
///
/// Ollama returns a token array from `/generate`; older callers pass a plain
/// string. Either form is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Context {
    Tokens(Vec<i64>),
    Text(String),
}

impl Context {
    /// Whether there is nothing to forward.
    pub fn is_empty(&self) -> bool {
        match self {
            Context::Tokens(tokens) => tokens.is_empty(),
            Context::Text(text) => text.is_empty(),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::Tokens(Vec::new())
    }
}

impl From<Vec<i64>> for Context {
    fn from(tokens: Vec<i64>) -> Self {
        Context::Tokens(tokens)
    }
}

impl From<String> for Context {
    fn from(text: String) -> Self {
        Context::Text(text)
    }
}

impl From<&str> for Context {
    fn from(text: &str) -> Self {
        Context::Text(text.to_string())
    }
}

/// Sampling options in the server's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f64,
    #[serde(rename = "num_predict")]
    pub max_tokens: i32,
}

/// Body of `POST /generate`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: SamplingOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Context>,
}

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    pub messages: &'a [ChatMessage],
    pub options: SamplingOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Context>,
}
