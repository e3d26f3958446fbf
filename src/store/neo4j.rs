//! Neo4j connector over the HTTP transactional API
//!
//! Every query is sent as a single auto-commit transaction to
//! `POST {base}/db/{database}/tx/commit` with basic auth.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::GraphConfig;
use crate::store::{GraphConnector, ResultSet, Row, StoreError, StoreResult, SELF_TEST_QUERY};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Map a Neo4j connection URI onto the HTTP endpoint base.
///
/// Bolt-style schemes point at the default HTTP port (7474) on the same host;
/// the TLS variants are served over HTTPS on the default port.
pub fn http_base_url(uri: &str) -> StoreResult<String> {
    let uri = uri.trim().trim_end_matches('/');
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| StoreError::Connection(format!("invalid Neo4j URI '{}'", uri)))?;
    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(StoreError::Connection(format!("invalid Neo4j URI '{}'", uri)));
    }

    match scheme.to_ascii_lowercase().as_str() {
        "http" | "https" => Ok(uri.to_string()),
        "bolt" | "neo4j" => {
            let host = authority
                .rsplit_once(':')
                .map(|(host, _port)| host)
                .unwrap_or(authority);
            Ok(format!("http://{}:7474", host))
        }
        "bolt+s" | "bolt+ssc" | "neo4j+s" | "neo4j+ssc" => {
            let host = authority
                .rsplit_once(':')
                .map(|(host, _port)| host)
                .unwrap_or(authority);
            Ok(format!("https://{}", host))
        }
        other => Err(StoreError::Connection(format!(
            "unsupported Neo4j URI scheme '{}'",
            other
        ))),
    }
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Serialize)]
struct Statement<'a> {
    statement: &'a str,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<DataRow>,
}

#[derive(Deserialize)]
struct DataRow {
    row: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

impl Neo4jError {
    fn into_store_error(self) -> StoreError {
        let detail = format!("{}: {}", self.code, self.message);
        if self.code.contains(".Security.") {
            StoreError::Connection(detail)
        } else {
            StoreError::Execution(detail)
        }
    }
}

/// Live handle to a Neo4j database
pub struct Neo4jConnector {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl Neo4jConnector {
    /// Connect and run the count-all self-test.
    ///
    /// A handle is only returned once the store has answered a query, so
    /// unreachable hosts and rejected credentials fail here.
    pub async fn connect(config: &GraphConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let endpoint = format!("{}/db/{}/tx/commit", http_base_url(&config.uri)?, config.database);
        let connector = Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
        };

        let rows = connector.query(SELF_TEST_QUERY).await.map_err(|e| match e {
            StoreError::Http(err) => {
                StoreError::Connection(format!("cannot reach {}: {}", connector.endpoint, err))
            }
            other => other,
        })?;
        info!("Connected to Neo4j at {}: {:?}", connector.endpoint, rows);

        Ok(connector)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphConnector for Neo4jConnector {
    async fn query(&self, cypher: &str) -> StoreResult<ResultSet> {
        debug!("Executing Cypher: {}", cypher);

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&TxRequest {
                statements: vec![Statement { statement: cypher }],
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Connection(format!(
                "Neo4j rejected credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Protocol(format!("Neo4j returned {}: {}", status, text)));
        }

        let body: TxResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))?;

        if let Some(err) = body.errors.into_iter().next() {
            return Err(err.into_store_error());
        }

        let Some(result) = body.results.into_iter().next() else {
            return Ok(Vec::new());
        };

        Ok(result
            .data
            .into_iter()
            .map(|data| {
                result
                    .columns
                    .iter()
                    .cloned()
                    .zip(data.row)
                    .collect::<Row>()
            })
            .collect())
    }
}
