//! Question answering pipeline
//!
//! Three stages, each returning a typed result:
//!
//! 1. [`crate::nlq::QueryTranslator`] turns the question into Cypher
//! 2. [`executor::QueryExecutor`] runs it against the graph store
//! 3. [`synthesizer::AnswerSynthesizer`] writes the answer from the rows
//!
//! [`pipeline::RagPipeline`] composes them and [`state::PipelineService`]
//! owns the process-wide handles.

pub mod executor;
pub mod pipeline;
pub mod state;
pub mod synthesizer;

pub use executor::{QueryExecutor, QueryOutcome};
pub use pipeline::{ExecutionStatus, ExecutionSummary, QaResponse, RagPipeline};
pub use state::{Bootstrap, EnvBootstrap, HealthReport, PipelineService, PipelineSnapshot, PipelineStatus};
pub use synthesizer::{AnswerContext, AnswerSynthesizer};
