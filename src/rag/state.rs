//! Process-wide pipeline state
//!
//! [`PipelineService`] owns the live handles behind an `RwLock<Arc<_>>`.
//! Each request clones the current [`PipelineSnapshot`] once and runs all of
//! its stages against it, so a concurrent re-initialization can never hand a
//! request a mix of old and new handles.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::config::{GraphConfig, ModelConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::llm::{LlmClient, ModelClient};
use crate::rag::pipeline::{QaResponse, RagPipeline};
use crate::store::{GraphConnector, GraphStats, Neo4jConnector};

/// Builds the external handles during initialization
#[async_trait]
pub trait Bootstrap: Send + Sync {
    async fn connect_store(&self) -> PipelineResult<Arc<dyn GraphConnector>>;
    async fn configure_model(&self) -> PipelineResult<Arc<dyn ModelClient>>;
}

/// Reads configuration from the environment on every initialization
pub struct EnvBootstrap;

#[async_trait]
impl Bootstrap for EnvBootstrap {
    async fn connect_store(&self) -> PipelineResult<Arc<dyn GraphConnector>> {
        let config = GraphConfig::from_lookup(|name| std::env::var(name).ok())?;
        let connector = Neo4jConnector::connect(&config)
            .await
            .map_err(PipelineError::from_store_init)?;
        Ok(Arc::new(connector))
    }

    async fn configure_model(&self) -> PipelineResult<Arc<dyn ModelClient>> {
        let config = ModelConfig::from_lookup(|name| std::env::var(name).ok())?;
        let client = LlmClient::new(&config).map_err(PipelineError::from_model_init)?;
        info!("Language model configured: {:?} {}", config.provider, config.model);
        Ok(Arc::new(client))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Uninitialized,
    Ready,
    Degraded,
}

/// Consistent set of handles produced by one initialization attempt
#[derive(Default)]
pub struct PipelineSnapshot {
    store: Option<Arc<dyn GraphConnector>>,
    model: Option<Arc<dyn ModelClient>>,
    pipeline: Option<RagPipeline>,
    initialization_error: Option<String>,
}

impl PipelineSnapshot {
    pub fn status(&self) -> PipelineStatus {
        match (&self.pipeline, &self.initialization_error) {
            (Some(_), _) => PipelineStatus::Ready,
            (None, Some(_)) => PipelineStatus::Degraded,
            (None, None) => PipelineStatus::Uninitialized,
        }
    }

    pub fn initialization_error(&self) -> Option<&str> {
        self.initialization_error.as_deref()
    }

    /// The pipeline, or the error every request must fail with
    pub fn pipeline(&self) -> PipelineResult<&RagPipeline> {
        self.pipeline.as_ref().ok_or_else(|| PipelineError::NotReady {
            initialization_error: self.initialization_error.clone(),
        })
    }

    pub fn store(&self) -> PipelineResult<&Arc<dyn GraphConnector>> {
        match (&self.store, &self.pipeline) {
            (Some(store), Some(_)) => Ok(store),
            _ => Err(PipelineError::NotReady {
                initialization_error: self.initialization_error.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub store_connected: bool,
    pub model_connected: bool,
    pub initialization_error: Option<String>,
}

pub struct PipelineService {
    bootstrap: Arc<dyn Bootstrap>,
    strict_execution: bool,
    current: RwLock<Arc<PipelineSnapshot>>,
    reinit: Mutex<()>,
}

impl PipelineService {
    pub fn new(bootstrap: Arc<dyn Bootstrap>, strict_execution: bool) -> Self {
        Self {
            bootstrap,
            strict_execution,
            current: RwLock::new(Arc::new(PipelineSnapshot::default())),
            reinit: Mutex::new(()),
        }
    }

    /// Build every component and swap the result in.
    ///
    /// Usable from any state. Failures are recorded in the new snapshot
    /// rather than propagated as a crash; the error is also returned.
    pub async fn initialize(&self) -> PipelineResult<()> {
        let _guard = self.reinit.lock().await;
        info!("Initializing RAG system...");

        let mut snapshot = PipelineSnapshot::default();
        let result = self.build(&mut snapshot).await;
        match &result {
            Ok(()) => info!("RAG system initialized"),
            Err(err) => {
                error!(kind = err.kind(), "Initialization failed: {}", err);
                snapshot.initialization_error = Some(err.to_string());
            }
        }

        *self.current.write().await = Arc::new(snapshot);
        result
    }

    async fn build(&self, snapshot: &mut PipelineSnapshot) -> PipelineResult<()> {
        let store = self.bootstrap.connect_store().await?;
        snapshot.store = Some(Arc::clone(&store));

        let model = self.bootstrap.configure_model().await?;
        snapshot.model = Some(Arc::clone(&model));

        snapshot.pipeline = Some(RagPipeline::new(store, model, self.strict_execution));
        Ok(())
    }

    /// The snapshot a request should use for its whole duration
    pub async fn snapshot(&self) -> Arc<PipelineSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn status(&self) -> PipelineStatus {
        self.snapshot().await.status()
    }

    pub async fn health(&self) -> HealthReport {
        let snapshot = self.snapshot().await;
        HealthReport {
            status: if snapshot.store.is_some() { "ok" } else { "error" },
            timestamp: Utc::now().to_rfc3339(),
            store_connected: snapshot.store.is_some(),
            model_connected: snapshot.model.is_some(),
            initialization_error: snapshot.initialization_error.clone(),
        }
    }

    pub async fn ask(&self, question: &str) -> PipelineResult<QaResponse> {
        let snapshot = self.snapshot().await;
        snapshot.pipeline()?.ask(question).await
    }

    pub async fn stats(&self) -> PipelineResult<GraphStats> {
        let snapshot = self.snapshot().await;
        snapshot
            .store()?
            .stats()
            .await
            .map_err(|e| PipelineError::Stats(e.to_string()))
    }
}
