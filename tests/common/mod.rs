//! Scripted stand-ins for the graph store and language model

#![allow(dead_code)]

use async_trait::async_trait;
use loregraph::rag::{Bootstrap, PipelineService};
use loregraph::store::{GraphConnector, ResultSet, Row, StoreError, StoreResult};
use loregraph::{ModelClient, ModelError, ModelResult, PipelineError, PipelineResult};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const CONTEXT_MARKER: &str = "Data retrieved from the graph (already filtered by the Cypher query): ";

pub fn name_rows(names: &[&str]) -> ResultSet {
    names
        .iter()
        .map(|name| {
            let mut row = Row::new();
            row.insert("Name".to_string(), json!(name));
            row
        })
        .collect()
}

/// Store returning fixed rows for questions and fixed counts for statistics
pub struct StubStore {
    rows: ResultSet,
    reject: Option<String>,
    counts: bool,
    pub queries: Mutex<Vec<String>>,
}

impl StubStore {
    pub fn with_rows(rows: ResultSet) -> Arc<Self> {
        Arc::new(Self { rows, reject: None, counts: true, queries: Mutex::new(Vec::new()) })
    }

    /// Count queries come back without a `total` column
    pub fn without_counts() -> Arc<Self> {
        Arc::new(Self { rows: Vec::new(), reject: None, counts: false, queries: Mutex::new(Vec::new()) })
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            rows: Vec::new(),
            reject: Some(message.to_string()),
            counts: true,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphConnector for StubStore {
    async fn query(&self, cypher: &str) -> StoreResult<ResultSet> {
        self.queries.lock().unwrap().push(cypher.to_string());

        if cypher.ends_with("AS total") && self.counts {
            let total = if cypher.contains(":Characters") {
                847
            } else if cypher.contains(":Movies") {
                3
            } else if cypher.contains("-[r]->") {
                5120
            } else {
                2515
            };
            let mut row = Row::new();
            row.insert("total".to_string(), json!(total));
            return Ok(vec![row]);
        }

        match &self.reject {
            Some(message) => Err(StoreError::Execution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}

/// Model that returns a fixed Cypher completion for translation prompts and
/// answers synthesis prompts strictly from the context it was given
pub struct GroundedModel {
    cypher_completion: String,
    fail_translation: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl GroundedModel {
    pub fn new(cypher_completion: &str) -> Arc<Self> {
        Arc::new(Self {
            cypher_completion: cypher_completion.to_string(),
            fail_translation: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            cypher_completion: String::new(),
            fail_translation: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    fn answer_from(context: &str) -> String {
        match serde_json::from_str::<Vec<serde_json::Map<String, serde_json::Value>>>(context) {
            Ok(rows) => {
                let names: Vec<String> = rows
                    .iter()
                    .flat_map(|row| row.values())
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                format!("The matching characters are: {}.", names.join(", "))
            }
            Err(_) if context.starts_with("No data found") => {
                "No matching records were found in the graph.".to_string()
            }
            Err(_) => format!("The graph could not answer this question ({}).", context),
        }
    }
}

#[async_trait]
impl ModelClient for GroundedModel {
    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if prompt.contains("Output only the Cypher query.") {
            if self.fail_translation {
                return Err(ModelError::ApiError("429 RESOURCE_EXHAUSTED".to_string()));
            }
            return Ok(self.cypher_completion.clone());
        }

        let context = prompt
            .lines()
            .find_map(|line| line.trim_start().strip_prefix(CONTEXT_MARKER))
            .unwrap_or_default();
        Ok(Self::answer_from(context))
    }

    fn model_name(&self) -> &str {
        "grounded"
    }
}

/// Bootstrap whose model configuration can be switched on after startup
pub struct TestBootstrap {
    pub store: Arc<StubStore>,
    pub model: Arc<GroundedModel>,
    pub model_configured: AtomicBool,
}

impl TestBootstrap {
    pub fn new(store: Arc<StubStore>, model: Arc<GroundedModel>, model_configured: bool) -> Arc<Self> {
        Arc::new(Self {
            store,
            model,
            model_configured: AtomicBool::new(model_configured),
        })
    }

    pub fn fix_configuration(&self) {
        self.model_configured.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Bootstrap for TestBootstrap {
    async fn connect_store(&self) -> PipelineResult<Arc<dyn GraphConnector>> {
        Ok(self.store.clone())
    }

    async fn configure_model(&self) -> PipelineResult<Arc<dyn ModelClient>> {
        if self.model_configured.load(Ordering::SeqCst) {
            Ok(self.model.clone())
        } else {
            Err(PipelineError::Configuration("GOOGLE_API_KEY not set".to_string()))
        }
    }
}

pub async fn ready_service(store: Arc<StubStore>, model: Arc<GroundedModel>) -> Arc<PipelineService> {
    let service = Arc::new(PipelineService::new(TestBootstrap::new(store, model, true), false));
    service.initialize().await.unwrap();
    service
}
