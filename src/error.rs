//! Pipeline error taxonomy
//!
//! Component crates of the pipeline (store connector, model client) have
//! their own error enums. [`PipelineError`] is what initialization and the
//! per-request pipeline report upward, and what the HTTP layer turns into a
//! status code.

use thiserror::Error;

use crate::llm::ModelError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required configuration value is absent or unparsable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Graph store or model unreachable, or credentials rejected, at init
    #[error("Connection error: {0}")]
    Connection(String),

    /// The model call that produces the Cypher query failed
    #[error("Translation error: {0}")]
    Translation(String),

    /// The store rejected the generated query
    #[error("Execution error: {0}")]
    Execution(String),

    /// The model call that produces the answer failed
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Question answering requested while initialization has not succeeded
    #[error("RAG system not initialized")]
    NotReady { initialization_error: Option<String> },

    #[error("{0}")]
    InvalidQuestion(String),

    #[error("Failed to collect graph statistics: {0}")]
    Stats(String),
}

impl PipelineError {
    /// Stable label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Connection(_) => "connection",
            PipelineError::Translation(_) => "translation",
            PipelineError::Execution(_) => "execution",
            PipelineError::Synthesis(_) => "synthesis",
            PipelineError::NotReady { .. } => "not_ready",
            PipelineError::InvalidQuestion(_) => "invalid_question",
            PipelineError::Stats(_) => "stats",
        }
    }

    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::InvalidQuestion(_) => 400,
            _ => 500,
        }
    }

    /// Map an error raised while constructing the store connector
    pub fn from_store_init(err: StoreError) -> Self {
        match err {
            StoreError::Execution(msg) => PipelineError::Connection(format!(
                "connectivity self-test failed: {}",
                msg
            )),
            other => PipelineError::Connection(other.to_string()),
        }
    }

    /// Map an error raised while configuring the model client
    pub fn from_model_init(err: ModelError) -> Self {
        match err {
            ModelError::ConfigError(msg) => PipelineError::Configuration(msg),
            other => PipelineError::Connection(other.to_string()),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
