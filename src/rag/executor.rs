//! Query execution stage

use std::sync::Arc;
use tracing::{debug, info};

use crate::store::{GraphConnector, ResultSet, StoreError};

/// Result of running a generated query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(ResultSet),
    /// Valid query, zero rows
    Empty,
}

impl QueryOutcome {
    pub fn row_count(&self) -> usize {
        match self {
            QueryOutcome::Rows(rows) => rows.len(),
            QueryOutcome::Empty => 0,
        }
    }
}

pub struct QueryExecutor {
    store: Arc<dyn GraphConnector>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn GraphConnector>) -> Self {
        Self { store }
    }

    /// Run the query. An empty result is [`QueryOutcome::Empty`], never an error;
    /// store rejections are returned to the caller unchanged.
    pub async fn execute(&self, cypher: &str) -> Result<QueryOutcome, StoreError> {
        info!("Executing Cypher: {}", cypher);
        let rows = self.store.query(cypher).await?;
        debug!("Query results: {:?}", rows);

        if rows.is_empty() {
            Ok(QueryOutcome::Empty)
        } else {
            Ok(QueryOutcome::Rows(rows))
        }
    }
}
