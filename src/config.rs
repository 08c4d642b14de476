//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Extracted resume text shorter than this (after trimming) is rejected
    pub min_resume_chars: usize,
    pub default_candidate_name: String,
    /// Optional TOML file replacing the built-in skill, section and template tables
    pub dictionary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub low_score_threshold: u8,
    pub weak_strength_threshold: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding a bearer token, if the endpoint needs one
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub enabled: bool,
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
    Pdf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-analyzer");

        Self {
            analysis: AnalysisConfig {
                min_resume_chars: 200,
                default_candidate_name: "Candidate".to_string(),
                dictionary_path: None,
            },
            scoring: ScoringConfig {
                low_score_threshold: 60,
                weak_strength_threshold: 70,
            },
            generator: GeneratorConfig {
                enabled: false,
                endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
                model: "llama3.1".to_string(),
                api_key_env: None,
                timeout_secs: 30,
                max_tokens: 120,
                max_context_chars: 2000,
            },
            storage: StorageConfig {
                enabled: true,
                database_path: data_dir.join("history.db"),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the configuration from `config_path`, creating it with defaults on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.scoring.low_score_threshold > 100 || self.scoring.weak_strength_threshold > 100 {
            return Err(ResumeAnalyzerError::Configuration(
                "scoring thresholds must be within 0..=100".to_string(),
            ));
        }
        if self.generator.enabled && self.generator.endpoint.trim().is_empty() {
            return Err(ResumeAnalyzerError::Configuration(
                "generator.endpoint is required when the generator is enabled".to_string(),
            ));
        }
        if self.generator.enabled && self.generator.timeout_secs == 0 {
            return Err(ResumeAnalyzerError::Configuration(
                "generator.timeout_secs must be greater than 0 when the generator is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
