//! Natural Language Querying (NLQ)
//!
//! Text-to-Cypher translation: one model completion over a fixed schema
//! prompt, followed by fence stripping.

pub mod prompt;

use std::sync::Arc;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::llm::ModelClient;

const FENCE: &str = "```";
const FENCE_LANGUAGE: &str = "cypher";

/// Strip Markdown code fences from a model completion.
///
/// A leading fence (bare or tagged `cypher`, any case) and a trailing fence
/// are removed and the result trimmed. This repeats until neither end
/// carries a fence, so the output never starts or ends with one and
/// applying the function again is a no-op.
pub fn sanitize_query(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let mut next = current;
        if let Some(rest) = next.strip_prefix(FENCE) {
            next = match rest.get(..FENCE_LANGUAGE.len()) {
                Some(tag) if tag.eq_ignore_ascii_case(FENCE_LANGUAGE) => &rest[FENCE_LANGUAGE.len()..],
                _ => rest,
            };
        }
        if let Some(rest) = next.strip_suffix(FENCE) {
            next = rest;
        }
        let next = next.trim();
        if next.len() == current.len() {
            return next.to_string();
        }
        current = next;
    }
}

/// Translates questions into Cypher with the configured model
pub struct QueryTranslator {
    model: Arc<dyn ModelClient>,
}

impl QueryTranslator {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    pub async fn translate(&self, question: &str) -> PipelineResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::InvalidQuestion("question must not be empty".to_string()));
        }

        let raw = self
            .model
            .complete(&prompt::cypher_prompt(question))
            .await
            .map_err(|e| PipelineError::Translation(e.to_string()))?;
        debug!("Raw Cypher completion: {}", raw);

        Ok(sanitize_query(&raw))
    }
}
