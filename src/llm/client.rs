//! HTTP client for Gemini, OpenAI and Ollama completions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{LLMProvider, ModelConfig};
use crate::llm::{ModelClient, ModelError, ModelResult};

pub struct LlmClient {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: Option<String>,
    api_base_url: String,
    temperature: f32,
}

impl LlmClient {
    /// Build a client from configuration. No network traffic happens here.
    pub fn new(config: &ModelConfig) -> ModelResult<Self> {
        if config.provider.requires_api_key() && config.api_key.is_none() {
            return Err(ModelError::ConfigError(format!(
                "{:?} requires an API key",
                config.provider
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ModelError::ConfigError(e.to_string()))?;

        let api_base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| config.provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            provider: config.provider,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            api_base_url,
            temperature: config.temperature,
        })
    }

    fn api_key(&self) -> ModelResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ModelError::ConfigError(format!("{:?} requires an API key", self.provider)))
    }

    async fn openai_chat(&self, prompt: &str) -> ModelResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: String,
        }

        let url = format!("{}/chat/completions", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key()?))
            .json(&Request {
                model: &self.model,
                messages: vec![Message { role: "user", content: prompt }],
                temperature: self.temperature,
            })
            .send()
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ModelError::ApiError(format!("OpenAI error {}: {}", status, text)));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| ModelError::SerializationError(e.to_string()))?;
        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::ApiError("OpenAI returned no choices".to_string()))
    }

    async fn ollama_generate(&self, prompt: &str) -> ModelResult<String> {
        #[derive(Serialize)]
        struct Options {
            temperature: f32,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: Options,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let url = format!("{}/api/generate", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&Request {
                model: &self.model,
                prompt,
                stream: false,
                options: Options { temperature: self.temperature },
            })
            .send()
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ModelError::ApiError(format!("Ollama error: {}", resp.status())));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| ModelError::SerializationError(e.to_string()))?;
        Ok(result.response)
    }

    async fn gemini_generate(&self, prompt: &str) -> ModelResult<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            contents: Vec<Content<'a>>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize)]
        struct Content<'a> {
            role: &'a str,
            parts: Vec<Part<'a>>,
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            candidates: Option<Vec<Candidate>>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Option<CandidateContent>,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<CandidatePart>,
        }

        #[derive(Deserialize)]
        struct CandidatePart {
            #[serde(default)]
            text: String,
        }

        let url = format!("{}/models/{}:generateContent", self.api_base_url, self.model);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key()?)
            .json(&Request {
                contents: vec![Content {
                    role: "user",
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig { temperature: self.temperature },
            })
            .send()
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ModelError::ApiError(format!("Gemini error {}: {}", status, text)));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| ModelError::SerializationError(e.to_string()))?;

        // Multi-part candidates are concatenated in order
        let text: String = result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect::<String>())
            .ok_or_else(|| ModelError::ApiError("Gemini returned no candidates".to_string()))?;

        Ok(text)
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    async fn complete(&self, prompt: &str) -> ModelResult<String> {
        match self.provider {
            LLMProvider::Gemini => self.gemini_generate(prompt).await,
            LLMProvider::OpenAI => self.openai_chat(prompt).await,
            LLMProvider::Ollama => self.ollama_generate(prompt).await,
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
