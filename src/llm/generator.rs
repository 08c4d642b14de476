//! Optional generative backend for rewrite suggestions

use crate::config::GeneratorConfig;
use crate::error::{Result, ResumeAnalyzerError};
use crate::llm::prompts::{clean_generated_bullet, render_rewrite_prompt};
use anyhow::{anyhow, Context};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::future::Future;
use std::time::Duration;

/// Capability that turns a missing skill into one resume bullet
pub trait RewriteGenerator {
    fn name(&self) -> &str;

    /// Whether calling `generate` can succeed at all
    fn is_available(&self) -> bool;

    fn generate(&self, skill: &str, job_context: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Stand-in used when no backend is configured; every request fails
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for UnavailableGenerator {
    fn default() -> Self {
        Self::new("generator disabled")
    }
}

impl RewriteGenerator for UnavailableGenerator {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _skill: &str, _job_context: &str) -> Result<String> {
        Err(ResumeAnalyzerError::Generation(self.reason.clone()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat completions endpoint
pub struct HttpGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    max_context_chars: usize,
}

impl HttpGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = match &config.api_key_env {
            Some(var) => Some(env::var(var).map_err(|_| {
                ResumeAnalyzerError::Configuration(format!("{} environment variable not set", var))
            })?),
            None => None,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResumeAnalyzerError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            max_context_chars: config.max_context_chars,
        })
    }

    async fn send_completion(&self, prompt: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Generator request failed with status {}: {}", status, error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse generator response")?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("No choices in generator response"))
    }
}

impl RewriteGenerator for HttpGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, skill: &str, job_context: &str) -> Result<String> {
        let prompt = render_rewrite_prompt(skill, job_context, self.max_context_chars);
        debug!("Requesting rewrite for '{}' ({} prompt chars)", skill, prompt.len());

        let raw = self.send_completion(&prompt).await?;
        let bullet = clean_generated_bullet(&raw);
        if bullet.is_empty() {
            return Err(ResumeAnalyzerError::Generation(format!(
                "empty response for skill '{}'",
                skill
            )));
        }
        Ok(bullet)
    }
}

/// The backend chosen at startup
pub enum Generator {
    Http(HttpGenerator),
    Unavailable(UnavailableGenerator),
}

impl Generator {
    /// Never fails: a misconfigured backend degrades to `Unavailable`
    pub fn from_config(config: &GeneratorConfig) -> Self {
        if !config.enabled {
            return Generator::Unavailable(UnavailableGenerator::default());
        }

        match HttpGenerator::from_config(config) {
            Ok(generator) => {
                info!("Rewrite generator enabled: {} at {}", config.model, config.endpoint);
                Generator::Http(generator)
            }
            Err(e) => {
                warn!("Rewrite generator unavailable, using templates: {}", e);
                Generator::Unavailable(UnavailableGenerator::new(e.to_string()))
            }
        }
    }

    pub fn disabled() -> Self {
        Generator::Unavailable(UnavailableGenerator::default())
    }
}

impl RewriteGenerator for Generator {
    fn name(&self) -> &str {
        match self {
            Generator::Http(g) => g.name(),
            Generator::Unavailable(g) => g.name(),
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Generator::Http(g) => g.is_available(),
            Generator::Unavailable(g) => g.is_available(),
        }
    }

    async fn generate(&self, skill: &str, job_context: &str) -> Result<String> {
        match self {
            Generator::Http(g) => g.generate(skill, job_context).await,
            Generator::Unavailable(g) => g.generate(skill, job_context).await,
        }
    }
}
