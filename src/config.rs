//! Environment-driven configuration
//!
//! Values are read on every initialization rather than cached, so a reset
//! picks up variables that were fixed after the process started.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_PORT: u16 = 9342;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Hosted language model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    Gemini,
    OpenAI,
    Ollama,
}

impl LLMProvider {
    fn parse(value: &str) -> PipelineResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LLMProvider::Gemini),
            "openai" => Ok(LLMProvider::OpenAI),
            "ollama" => Ok(LLMProvider::Ollama),
            other => Err(PipelineError::Configuration(format!(
                "unknown LLM_PROVIDER '{}' (expected gemini, openai or ollama)",
                other
            ))),
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => DEFAULT_GEMINI_MODEL,
            LLMProvider::OpenAI => DEFAULT_OPENAI_MODEL,
            LLMProvider::Ollama => DEFAULT_OLLAMA_MODEL,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::Ollama => "http://localhost:11434",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }

    /// API key variables, most specific first
    fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            LLMProvider::Gemini => &["GOOGLE_API_KEY", "LLM_API_KEY"],
            LLMProvider::OpenAI | LLMProvider::Ollama => &["LLM_API_KEY"],
        }
    }

    fn model_vars(&self) -> &'static [&'static str] {
        match self {
            LLMProvider::Gemini => &["GEMINI_MODEL", "LLM_MODEL"],
            LLMProvider::OpenAI | LLMProvider::Ollama => &["LLM_MODEL"],
        }
    }
}

/// Graph store connection settings
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Language model settings
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub temperature: f32,
}

/// Process-level server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Execution failures abort the request instead of becoming answer context
    pub strict_execution: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            strict_execution: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub model: ModelConfig,
    pub server: ServerConfig,
}

/// Reads a variable, treating blank values as unset
fn lookup_any<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> PipelineResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(PipelineError::Configuration(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

impl GraphConfig {
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup_any(&lookup, &["NEO4J_URI"]);
        let username = lookup_any(&lookup, &["NEO4J_USER", "NEO4J_USERNAME"]);
        let password = lookup_any(&lookup, &["NEO4J_PASSWORD"]);

        match (uri, username, password) {
            (Some(uri), Some(username), Some(password)) => Ok(Self {
                uri,
                username,
                password,
                database: lookup_any(&lookup, &["NEO4J_DATABASE"])
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            }),
            (uri, username, password) => {
                let missing: Vec<&str> = [
                    ("NEO4J_URI", uri.is_none()),
                    ("NEO4J_USER", username.is_none()),
                    ("NEO4J_PASSWORD", password.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();
                Err(PipelineError::Configuration(format!(
                    "Neo4j environment variables not set: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl ModelConfig {
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup_any(&lookup, &["LLM_PROVIDER"]) {
            Some(value) => LLMProvider::parse(&value)?,
            None => LLMProvider::Gemini,
        };

        let api_key = lookup_any(&lookup, provider.api_key_vars());
        if api_key.is_none() && provider.requires_api_key() {
            let vars = match provider {
                LLMProvider::Gemini => "GOOGLE_API_KEY (or LLM_API_KEY)",
                _ => "LLM_API_KEY",
            };
            return Err(PipelineError::Configuration(format!("{} not set", vars)));
        }

        let temperature = match lookup_any(&lookup, &["MODEL_TEMPERATURE"]) {
            Some(raw) => {
                let value: f32 = raw.parse().map_err(|_| {
                    PipelineError::Configuration(format!(
                        "MODEL_TEMPERATURE must be numeric, got '{}'",
                        raw
                    ))
                })?;
                if !(0.0..=2.0).contains(&value) {
                    return Err(PipelineError::Configuration(format!(
                        "MODEL_TEMPERATURE must be within [0, 2], got {}",
                        value
                    )));
                }
                value
            }
            None => 0.0,
        };

        Ok(Self {
            provider,
            model: lookup_any(&lookup, provider.model_vars())
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            api_base_url: lookup_any(&lookup, &["LLM_API_BASE_URL"]),
            temperature,
        })
    }
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup_any(&lookup, &["LOREGRAPH_PORT"]) {
            Some(raw) => raw.parse().map_err(|_| {
                PipelineError::Configuration(format!("LOREGRAPH_PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };
        // Optional flag: an unreadable value falls back to lenient execution
        let strict_execution = match lookup_any(&lookup, &["LOREGRAPH_STRICT_EXECUTION"]) {
            Some(raw) => parse_bool("LOREGRAPH_STRICT_EXECUTION", &raw).unwrap_or_else(|err| {
                warn!("{}; using lenient execution", err);
                false
            }),
            None => false,
        };

        Ok(Self {
            host: lookup_any(&lookup, &["LOREGRAPH_HOST"]).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            strict_execution,
        })
    }

    pub fn from_env() -> PipelineResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            graph: GraphConfig::from_lookup(&lookup)?,
            model: ModelConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
        })
    }

    pub fn from_env() -> PipelineResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
