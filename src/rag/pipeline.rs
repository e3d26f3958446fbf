//! Translate → Execute → Synthesize

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::llm::ModelClient;
use crate::nlq::QueryTranslator;
use crate::rag::executor::{QueryExecutor, QueryOutcome};
use crate::rag::synthesizer::{AnswerContext, AnswerSynthesizer};
use crate::store::{GraphConnector, StoreError};

/// How the generated query fared against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Rows,
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub status: ExecutionStatus,
    pub row_count: usize,
}

/// Successful pipeline run
#[derive(Debug, Clone)]
pub struct QaResponse {
    pub answer: String,
    pub generated_query: String,
    pub execution: ExecutionSummary,
    pub elapsed: Duration,
}

pub struct RagPipeline {
    translator: QueryTranslator,
    executor: QueryExecutor,
    synthesizer: AnswerSynthesizer,
    strict_execution: bool,
}

impl RagPipeline {
    pub fn new(store: Arc<dyn GraphConnector>, model: Arc<dyn ModelClient>, strict_execution: bool) -> Self {
        Self {
            translator: QueryTranslator::new(Arc::clone(&model)),
            executor: QueryExecutor::new(store),
            synthesizer: AnswerSynthesizer::new(model),
            strict_execution,
        }
    }

    /// Answer one question. Any stage failure ends the run; no partial answer is returned.
    pub async fn ask(&self, question: &str) -> PipelineResult<QaResponse> {
        let started = Instant::now();
        let question = question.trim();

        let cypher = self.translator.translate(question).await?;
        info!("Generated Cypher: {}", cypher);

        let (answer, execution) = match self.executor.execute(&cypher).await {
            Ok(outcome) => {
                let summary = ExecutionSummary {
                    status: match outcome {
                        QueryOutcome::Rows(_) => ExecutionStatus::Rows,
                        QueryOutcome::Empty => ExecutionStatus::Empty,
                    },
                    row_count: outcome.row_count(),
                };
                let answer = self
                    .synthesizer
                    .synthesize(question, AnswerContext::Outcome(&outcome))
                    .await?;
                (answer, summary)
            }
            Err(err) => {
                let message = store_message(err);
                let err = PipelineError::Execution(message.clone());
                if self.strict_execution {
                    error!(kind = err.kind(), "Query rejected by store: {}", err);
                    return Err(err);
                }
                warn!(kind = err.kind(), "Query rejected by store, answering from error context: {}", err);
                let answer = self
                    .synthesizer
                    .synthesize(question, AnswerContext::ExecutionFailed(&message))
                    .await?;
                (answer, ExecutionSummary { status: ExecutionStatus::Failed, row_count: 0 })
            }
        };

        Ok(QaResponse {
            answer,
            generated_query: cypher,
            execution,
            elapsed: started.elapsed(),
        })
    }
}

fn store_message(err: StoreError) -> String {
    match err {
        StoreError::Execution(msg) => msg,
        other => other.to_string(),
    }
}
