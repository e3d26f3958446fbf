//! Graph store connector
//!
//! The pipeline only needs one operation from the store: run a Cypher string
//! and get rows back. [`GraphConnector`] is that seam; [`neo4j::Neo4jConnector`]
//! is the production implementation.

pub mod neo4j;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use neo4j::Neo4jConnector;

/// Errors raised by a graph store connector
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected the query (syntax or semantic error)
    #[error("Query error: {0}")]
    Execution(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One result row: column name to value, in column order
pub type Row = IndexMap<String, serde_json::Value>;

/// Ordered rows produced by a query. An empty set is a valid outcome.
pub type ResultSet = Vec<Row>;

/// Counts shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: u64,
    pub total_characters: u64,
    pub total_movies: u64,
    pub total_relationships: u64,
}

pub const SELF_TEST_QUERY: &str = "MATCH (n) RETURN count(n)";

const STATS_QUERIES: [&str; 4] = [
    "MATCH (n) RETURN count(n) AS total",
    "MATCH (c:Characters) RETURN count(c) AS total",
    "MATCH (m:Movies) RETURN count(m) AS total",
    "MATCH ()-[r]->() RETURN count(r) AS total",
];

/// Live handle to a graph store, shared by concurrent requests
#[async_trait]
pub trait GraphConnector: Send + Sync {
    /// Execute a Cypher query and return its rows
    async fn query(&self, cypher: &str) -> StoreResult<ResultSet>;

    /// Collect node, character, movie and relationship counts
    async fn stats(&self) -> StoreResult<GraphStats> {
        let mut totals = [0u64; 4];
        for (slot, cypher) in totals.iter_mut().zip(STATS_QUERIES) {
            let rows = self.query(cypher).await?;
            *slot = extract_total(&rows)?;
        }
        Ok(GraphStats {
            total_nodes: totals[0],
            total_characters: totals[1],
            total_movies: totals[2],
            total_relationships: totals[3],
        })
    }
}

fn extract_total(rows: &ResultSet) -> StoreResult<u64> {
    rows.first()
        .and_then(|row| row.get("total"))
        .and_then(|v| v.as_u64())
        .ok_or_else(|| StoreError::Protocol("count query returned no 'total' column".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CountingStore;

    #[async_trait]
    impl GraphConnector for CountingStore {
        async fn query(&self, cypher: &str) -> StoreResult<ResultSet> {
            let total = if cypher.contains(":Characters") {
                847
            } else if cypher.contains(":Movies") {
                3
            } else if cypher.contains("-[r]->") {
                9000
            } else {
                2515
            };
            let mut row = Row::new();
            row.insert("total".to_string(), json!(total));
            Ok(vec![row])
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl GraphConnector for EmptyStore {
        async fn query(&self, _cypher: &str) -> StoreResult<ResultSet> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_stats_from_count_queries() {
        let stats = CountingStore.stats().await.unwrap();
        assert_eq!(
            stats,
            GraphStats {
                total_nodes: 2515,
                total_characters: 847,
                total_movies: 3,
                total_relationships: 9000,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_without_rows_is_protocol_error() {
        let err = EmptyStore.stats().await.unwrap_err();
        assert!(matches!(err, StoreError::Protocol(_)));
    }
}
