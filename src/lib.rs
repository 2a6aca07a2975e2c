// Copyright 2025 The ollama-client Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Ollama Client
//!
//! Blocking client for the generate and chat endpoints of a local
//! [Ollama](https://ollama.com) server.
//!
//! The client keeps the chat history and any attached images between calls,
//! so a conversation is just a sequence of `prompt` updates and `chat` calls.
//!
//! ## One-shot Generation
//!
//! ```rust,no_run
//! use ollama_client::{ClientConfig, OllamaClient};
//!
//! fn main() -> Result<(), ollama_client::ClientError> {
//!     let mut client = OllamaClient::new(
//!         ClientConfig::default().with_model_name("llama3.2"),
//!     );
//!     client.prompt = "Why is the sky blue?".to_string();
//!     client.temperature = 0.2;
//!
//!     match client.generate()? {
//!         Some(text) => println!("{}", text),
//!         None => println!("The server returned no text"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Chat with an Image
//!
//! ```rust,no_run
//! use ollama_client::OllamaClient;
//!
//! fn main() -> Result<(), ollama_client::ClientError> {
//!     let mut client = OllamaClient::with_defaults();
//!     client.add_image("photo.jpg")?;
//!
//!     client.prompt = "What is in this picture?".to_string();
//!     client.chat()?;
//!
//!     client.clear_images();
//!     client.prompt = "Describe it as a haiku.".to_string();
//!     if let Some(reply) = client.chat()? {
//!         println!("{}", reply);
//!     }
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod settings;

pub use model::{
    ChatMessage, ClientConfig, ClientError, Context, OllamaClient, Role, SamplingOptions,
};
pub use settings::{AppSettings, SettingsError};
