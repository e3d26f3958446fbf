//! Answer synthesis stage

use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};
use crate::llm::ModelClient;
use crate::nlq::prompt::answer_prompt;
use crate::rag::executor::QueryOutcome;

pub const EMPTY_CONTEXT: &str = "No data found in the graph.";

/// What the synthesizer is told about the query result
#[derive(Debug, Clone, Copy)]
pub enum AnswerContext<'a> {
    Outcome(&'a QueryOutcome),
    /// The store rejected the query; the message is passed as context
    ExecutionFailed(&'a str),
}

impl AnswerContext<'_> {
    pub fn render(&self) -> String {
        match self {
            AnswerContext::Outcome(QueryOutcome::Rows(rows)) => {
                serde_json::to_string(rows).unwrap_or_else(|_| format!("{:?}", rows))
            }
            AnswerContext::Outcome(QueryOutcome::Empty) => EMPTY_CONTEXT.to_string(),
            AnswerContext::ExecutionFailed(msg) => format!("Error executing Cypher query: {}", msg),
        }
    }
}

pub struct AnswerSynthesizer {
    model: Arc<dyn ModelClient>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Answer text is returned verbatim
    pub async fn synthesize(&self, question: &str, context: AnswerContext<'_>) -> PipelineResult<String> {
        let prompt = answer_prompt(question, &context.render());
        self.model
            .complete(&prompt)
            .await
            .map_err(|e| PipelineError::Synthesis(e.to_string()))
    }
}
