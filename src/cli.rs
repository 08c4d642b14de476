//! CLI interface for the resume analyzer

use crate::config::OutputFormat;
use crate::input::JobSource;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(version)]
#[command(about = "ATS-style resume analysis against a job description")]
#[command(long_about = "Score a resume against a job description, detect missing sections, \
rank skill gaps by priority and suggest resume bullets for the missing skills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    #[command(group(
        ArgGroup::new("job_source")
            .required(true)
            .args(["job", "role", "job_text"])
    ))]
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Predefined role from `resume-analyzer roles`
        #[arg(long)]
        role: Option<String>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Candidate name shown in the report and history
        #[arg(short, long)]
        name: Option<String>,

        /// Output format: console, json, markdown, html, pdf
        #[arg(short, long)]
        output: Option<String>,

        /// Save the rendered report to a file (pdf output is always saved)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include extracted skills and job keywords
        #[arg(short, long)]
        detailed: bool,

        /// Use template suggestions only
        #[arg(long)]
        no_generate: bool,

        /// Do not record this analysis in the history database
        #[arg(long)]
        no_history: bool,
    },

    /// Show recent analyses
    History {
        /// Number of records to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// List the predefined job descriptions
    Roles,

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        "pdf" => Ok(OutputFormat::Pdf),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html, pdf",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

/// Exactly one of the three is set; clap enforces that through the argument group
pub fn job_source(job: Option<PathBuf>, role: Option<String>, job_text: Option<String>) -> Option<JobSource> {
    job.map(JobSource::File)
        .or_else(|| role.map(JobSource::Role))
        .or_else(|| job_text.map(JobSource::Text))
}
