//! resume-analyzer: ATS-style resume analysis against a job description

use clap::Parser;
use log::{debug, error, info, warn};
use resume_analyzer::cli::{self, Cli, Commands, ConfigAction};
use resume_analyzer::config::{Config, OutputFormat};
use resume_analyzer::database::{HistoryDatabase, ResultStore};
use resume_analyzer::error::{Result, ResumeAnalyzerError};
use resume_analyzer::input::{InputManager, JobLibrary};
use resume_analyzer::llm::generator::{Generator, RewriteGenerator};
use resume_analyzer::output::{save_report_bytes, suggest_filename, ReportGenerator};
use resume_analyzer::processing::analyzer::{AnalysisEngine, AnalysisInput};
use resume_analyzer::processing::text_processor::truncate_preview;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        if e.is_user_facing() {
            error!("{}", e);
        } else {
            error!("Command failed: {}", e);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            role,
            job_text,
            name,
            output,
            save,
            detailed,
            no_generate,
            no_history,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeAnalyzerError::InvalidInput)?,
                None => config.output.format,
            };

            let source = cli::job_source(job, role, job_text).ok_or_else(|| {
                ResumeAnalyzerError::InvalidInput("one of --job, --role or --job-text is required".to_string())
            })?;

            info!("Starting resume analysis for {}", resume.display());

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_description = input_manager.job_description(&source, &JobLibrary::default()).await?;
            debug!("Job description preview: {}", truncate_preview(&job_description, 120));

            let input = AnalysisInput::new(
                name.unwrap_or_else(|| config.analysis.default_candidate_name.clone()),
                resume_text,
                job_description,
            );

            let engine = AnalysisEngine::from_config(&config)?;
            let generator = if no_generate {
                Generator::disabled()
            } else {
                Generator::from_config(&config.generator)
            };
            debug!("Rewrite generator: {} (available: {})", generator.name(), generator.is_available());

            let store = if config.storage.enabled && !no_history {
                open_history(&config.storage.database_path)
            } else {
                None
            };

            let result = match &store {
                Some(db) => engine.analyze_and_record(&input, &generator, db).await?,
                None => engine.analyze(&input, &generator).await?,
            };

            let detailed = detailed || config.output.detailed;
            let save = match (save, output_format) {
                (None, OutputFormat::Pdf) => Some(PathBuf::from(suggest_filename(
                    OutputFormat::Pdf,
                    &result.candidate,
                    false,
                ))),
                (save, _) => save,
            };
            match save {
                Some(path) => {
                    let report = ReportGenerator::with_options(false, detailed, true, true, true)
                        .generate_bytes(&result, output_format)?;
                    save_report_bytes(&report, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => {
                    let report = ReportGenerator::with_options(config.output.color_output, detailed, true, true, true)
                        .generate_report(&result, output_format)?;
                    println!("{}", report);
                }
            }
        }

        Commands::History { limit, output } => {
            let output_format = cli::parse_output_format(&output).map_err(ResumeAnalyzerError::InvalidInput)?;
            if !matches!(output_format, OutputFormat::Console | OutputFormat::Json) {
                return Err(ResumeAnalyzerError::InvalidInput(
                    "history supports console and json output".to_string(),
                ));
            }

            let db = HistoryDatabase::open(&config.storage.database_path)?;
            let records = db.fetch_recent(limit)?;
            let report = ReportGenerator::with_options(config.output.color_output, false, true, false, false)
                .generate_history(&records, output_format)?;
            println!("{}", report);
        }

        Commands::Roles => {
            for role in JobLibrary::default().roles() {
                println!("{}", role.name);
                for line in role.description.lines() {
                    println!("    {}", line);
                }
                println!();
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("# {}\n{}", config_path.display(), content);
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults at {}", config_path.display());
            }
        },
    }

    Ok(())
}

/// History is best effort: a database that cannot be opened disables recording
fn open_history(path: &Path) -> Option<HistoryDatabase> {
    match HistoryDatabase::open(path) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!("History disabled, cannot open {}: {}", path.display(), e);
            None
        }
    }
}
