//! Ollama client module for generate and chat requests.

mod client;
mod image;
mod types;

pub use client::{
    ClientConfig, ClientError, OllamaClient, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use image::encode_image_file;
pub use types::{ChatMessage, Context, Role, SamplingOptions};
