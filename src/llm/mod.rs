//! Language model client
//!
//! [`ModelClient`] is the single-completion seam used by both the query
//! translator and the answer synthesizer. Calls are attempted once; retries
//! are never performed here.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::LlmClient;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Live handle to a hosted language model, shared by concurrent requests
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// One blocking round trip: prompt in, generated text out
    async fn complete(&self, prompt: &str) -> ModelResult<String>;

    /// Model identifier for logs and health output
    fn model_name(&self) -> &str;
}
