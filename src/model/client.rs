//! Blocking client for the Ollama generate and chat API.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::image::encode_image_file;
use super::types::{ChatMessage, ChatRequest, Context, GenerateRequest, SamplingOptions};

/// Default API root of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/api";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemma3:4b";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: i32 = 200;

const GENERATE_ENDPOINT: &str = "/generate";
const CHAT_ENDPOINT: &str = "/chat";

/// Client errors.
///
/// A server that answers with something unusable is not an error; those calls
/// return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Image not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Connection settings, fixed once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub model_name: String,
    /// Whole-request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Use a custom API root, e.g. `http://gpu-box:11434/api`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different model.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for a local Ollama server.
///
/// Set [`prompt`](Self::prompt) and the sampling fields, then call
/// [`generate`](Self::generate) or [`chat`](Self::chat). Every call blocks the
/// current thread until the server answers.
///
/// Chat history and image attachments live on the client. Attachments are
/// sent with every request until [`clear_images`](Self::clear_images) is
/// called. The client is not meant to be shared between threads without
/// external locking, and it must not be used from inside an async runtime.
pub struct OllamaClient {
    config: ClientConfig,
    http: Client,
    /// Text sent with the next request.
    pub prompt: String,
    pub temperature: f64,
    /// Sent as `num_predict`.
    pub max_tokens: i32,
    /// Forwarded as `context` when non-empty.
    pub context: Context,
    history: Vec<ChatMessage>,
    images: Vec<String>,
}

impl OllamaClient {
    /// Create a new client with the given configuration.
    ///
    /// The base URL is not validated here; a bad URL surfaces as
    /// [`ClientError::Transport`] on the first request.
    ///
    /// # Panics
    /// If the TLS backend or DNS resolver cannot be initialized, as
    /// `reqwest::blocking::Client::new` does.
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to initialize HTTP client (TLS backend or resolver)");

        Self {
            config,
            http,
            prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            context: Context::default(),
            history: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Create a new client talking to `localhost:11434` with the default model.
    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model_name
    }

    /// Messages exchanged so far, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Pending base64 image attachments.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// One-shot completion of the current prompt.
    ///
    /// # Returns
    /// The generated text, `None` if the server's answer carried no text, or
    /// an error if the request could not be completed.
    pub fn generate(&self) -> Result<Option<String>, ClientError> {
        let request = self.generate_request();
        tracing::debug!(
            model = request.model,
            images = self.images.len(),
            "Sending generate request"
        );
        self.send_request(GENERATE_ENDPOINT, &request)
    }

    /// Send the current prompt as the next user turn of the conversation.
    ///
    /// The user turn is recorded before the request goes out and stays in the
    /// history even if the request fails. The reply is recorded only when it
    /// is non-empty.
    pub fn chat(&mut self) -> Result<Option<String>, ClientError> {
        self.history.push(ChatMessage::user(self.prompt.clone()));

        let request = self.chat_request();
        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            images = self.images.len(),
            "Sending chat request"
        );
        let answer = self.send_request(CHAT_ENDPOINT, &request)?;

        if let Some(content) = answer.as_deref().filter(|c| !c.is_empty()) {
            self.history.push(ChatMessage::assistant(content));
        }

        Ok(answer)
    }

    /// Forget the conversation.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drop all pending image attachments.
    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    /// Attach the file at `path` to every following request.
    ///
    /// On error the attachment list is left unchanged.
    pub fn add_image(&mut self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        let encoded = encode_image_file(path)?;
        tracing::info!("Attached image {} ({} base64 bytes)", path.display(), encoded.len());
        self.images.push(encoded);
        Ok(())
    }

    fn sampling_options(&self) -> SamplingOptions {
        SamplingOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn pending_images(&self) -> Option<&[String]> {
        (!self.images.is_empty()).then_some(self.images.as_slice())
    }

    fn pending_context(&self) -> Option<&Context> {
        (!self.context.is_empty()).then_some(&self.context)
    }

    fn generate_request(&self) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.config.model_name,
            prompt: &self.prompt,
            stream: false,
            options: self.sampling_options(),
            images: self.pending_images(),
            context: self.pending_context(),
        }
    }

    fn chat_request(&self) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.config.model_name,
            stream: false,
            messages: &self.history,
            options: self.sampling_options(),
            images: self.pending_images(),
            context: self.pending_context(),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// POST `payload` and pull the answer text out of the reply.
    ///
    /// Only transport failures are errors. The body is inspected whatever the
    /// HTTP status, since Ollama reports problems as JSON without an answer
    /// field.
    fn send_request<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Option<String>, ClientError> {
        let url = self.endpoint_url(endpoint);

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            tracing::warn!("{} returned {}: {}", url, status, body);
        }

        Ok(Self::extract_answer(&body))
    }

    /// Pick the answer out of a response body.
    ///
    /// A top-level `response` string wins over `message.content`.
    fn extract_answer(body: &str) -> Option<String> {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Response is not valid JSON: {}", e);
                return None;
            }
        };

        let answer = value
            .get("response")
            .and_then(Value::as_str)
            .or_else(|| value.pointer("/message/content").and_then(Value::as_str))
            .map(str::to_string);

        if answer.is_none() {
            tracing::debug!("No answer field in response");
        }
        answer
    }
}
