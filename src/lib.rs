//! Loregraph
//!
//! Natural-language question answering over a Lord of the Rings property
//! graph stored in Neo4j.
//!
//! # Architecture
//!
//! A question goes through three stages, each a single blocking call to an
//! external service:
//!
//! - **Translate**: a language model turns the question into Cypher, guided by
//!   a fixed schema description and few-shot examples ([`nlq`])
//! - **Execute**: the Cypher runs against the graph store ([`store`], [`rag::executor`])
//! - **Synthesize**: the model writes an answer from the rows ([`rag::synthesizer`])
//!
//! [`rag::PipelineService`] owns the live store and model handles, exposes
//! readiness, and supports re-initialization. The [`http`] module serves the
//! JSON API and a small embedded frontend.
//!
//! ## Example Usage
//!
//! ```no_run
//! use loregraph::rag::{EnvBootstrap, PipelineService};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let service = PipelineService::new(Arc::new(EnvBootstrap), false);
//! if service.initialize().await.is_ok() {
//!     let response = service.ask("List all characters who are Hobbits").await;
//!     if let Ok(response) = response {
//!         println!("{}\n{}", response.generated_query, response.answer);
//!     }
//! }
//! # }
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod nlq;
pub mod rag;
pub mod store;

pub use config::{AppConfig, GraphConfig, LLMProvider, ModelConfig, ServerConfig};
pub use error::{PipelineError, PipelineResult};
pub use llm::{LlmClient, ModelClient, ModelError, ModelResult};
pub use nlq::{sanitize_query, QueryTranslator};
pub use rag::{PipelineService, PipelineStatus, QaResponse, RagPipeline};
pub use store::{GraphConnector, GraphStats, Neo4jConnector, ResultSet, Row, StoreError, StoreResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
