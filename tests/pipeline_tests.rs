//! End-to-end analysis tests: extraction, scoring, suggestions and history

use resume_analyzer::config::{Config, OutputFormat};
use resume_analyzer::database::{HistoryDatabase, HistoryEntry, HistoryRecord, ResultStore};
use resume_analyzer::error::{Result, ResumeAnalyzerError};
use resume_analyzer::input::{InputManager, JobLibrary};
use resume_analyzer::llm::generator::{Generator, RewriteGenerator, UnavailableGenerator};
use resume_analyzer::llm::rewriter::SuggestionSource;
use resume_analyzer::output::{save_report_bytes, suggest_filename, ReportGenerator};
use resume_analyzer::processing::analyzer::{AnalysisEngine, AnalysisInput};
use resume_analyzer::processing::sections::Section;
use resume_analyzer::processing::skills::Dictionaries;
use std::path::Path;
use tempfile::TempDir;

async fn sample_input() -> AnalysisInput {
    let mut manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let job = manager
        .extract_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();
    AnalysisInput::new("John Doe", resume, job)
}

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(&Config::default(), Dictionaries::default()).unwrap()
}

struct FailingStore;

impl ResultStore for FailingStore {
    fn save(&self, _entry: &HistoryEntry<'_>) -> Result<i64> {
        Err(ResumeAnalyzerError::Storage("disk full".to_string()))
    }

    fn fetch_recent(&self, _limit: usize) -> Result<Vec<HistoryRecord>> {
        Ok(Vec::new())
    }
}

struct CannedGenerator;

impl RewriteGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, skill: &str, _job_context: &str) -> Result<String> {
        Ok(format!("Shipped production work using {}.", skill))
    }
}

#[tokio::test]
async fn test_full_analysis_of_sample_resume() {
    let input = sample_input().await;
    let result = engine().analyze(&input, &UnavailableGenerator::default()).await.unwrap();

    assert_eq!(result.candidate, "John Doe");
    assert_eq!(result.matched_skills, vec!["docker", "git", "python", "rest api", "sql"]);
    assert_eq!(
        result.missing_skills,
        vec!["algorithms", "aws", "data structures", "kubernetes", "tableau"]
    );
    assert_eq!(result.match_score, 50);

    assert_eq!(result.core_missing, vec!["algorithms", "data structures"]);
    assert_eq!(result.skill_gap_roadmap.critical, result.core_missing);
    assert_eq!(result.skill_gap_roadmap.important, vec!["aws"]);
    assert_eq!(result.skill_gap_roadmap.optional, vec!["kubernetes", "tableau"]);

    for section in Section::ALL {
        assert!(result.sections.is_present(section), "{} not detected", section);
    }

    assert_eq!(
        result.feedback[0],
        "Critical ATS risk: missing core skills (algorithms, data structures)."
    );
    assert!(result.feedback.iter().all(|m| !m.starts_with("Missing resume sections")));

    assert_eq!(result.rewrite_suggestions.len(), result.missing_skills.len());
    assert!(result
        .rewrite_suggestions
        .iter()
        .all(|s| s.source == SuggestionSource::Template && !s.suggested_rewrite.is_empty()));
}

#[tokio::test]
async fn test_markdown_resume_scores_like_text_resume() {
    let mut manager = InputManager::new();
    let markdown = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();
    let text_input = sample_input().await;
    let md_input = AnalysisInput::new("John Doe", markdown, text_input.job_description.clone());

    let engine = engine();
    let from_text = engine.analyze(&text_input, &Generator::disabled()).await.unwrap();
    let from_md = engine.analyze(&md_input, &Generator::disabled()).await.unwrap();

    assert_eq!(from_md.match_score, from_text.match_score);
    assert_eq!(from_md.matched_skills, from_text.matched_skills);
    assert!(from_md.sections.is_present(Section::Experience));
}

#[tokio::test]
async fn test_generated_suggestions_are_used_when_available() {
    let input = sample_input().await;
    let result = engine().analyze(&input, &CannedGenerator).await.unwrap();

    assert!(result
        .rewrite_suggestions
        .iter()
        .all(|s| s.source == SuggestionSource::Generated));
    assert_eq!(
        result.rewrite_suggestions[0].suggested_rewrite,
        "Shipped production work using algorithms."
    );
}

#[tokio::test]
async fn test_short_resume_is_rejected() {
    let mut manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/short_resume.txt"))
        .await
        .unwrap();
    let input = AnalysisInput::new("Jane Roe", resume, "Python developer");

    let err = engine().analyze(&input, &Generator::disabled()).await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InsufficientText { .. }));
    assert!(err.is_user_facing());
}

#[tokio::test]
async fn test_blank_job_description_is_rejected() {
    let mut input = sample_input().await;
    input.job_description = "  \n ".to_string();

    let err = engine().analyze(&input, &Generator::disabled()).await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InvalidJobDescription(_)));
}

#[tokio::test]
async fn test_history_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let db = HistoryDatabase::open(&temp_dir.path().join("history.db")).unwrap();

    let input = sample_input().await;
    let result = engine()
        .analyze_and_record(&input, &Generator::disabled(), &db)
        .await
        .unwrap();

    let records = db.fetch_recent(5).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.candidate_name, "John Doe");
    assert_eq!(record.score, result.match_score);
    assert_eq!(record.matched_skills, result.matched_skills);
    assert_eq!(record.missing_skills, result.missing_skills);
    assert_eq!(record.resume_words, result.resume_word_count);
    assert_eq!(record.job_description, input.job_description);

    let history = ReportGenerator::with_options(false, false, true, false, false)
        .generate_history(&records, OutputFormat::Console)
        .unwrap();
    assert!(history.contains("John Doe"));
}

#[tokio::test]
async fn test_store_failure_does_not_fail_analysis() {
    let input = sample_input().await;
    let result = engine()
        .analyze_and_record(&input, &Generator::disabled(), &FailingStore)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_predefined_role_analysis() {
    let input = sample_input().await;
    let role = JobLibrary::default().get("Frontend Developer").unwrap().description.clone();
    let input = AnalysisInput::new(input.candidate_name, input.resume_text, role);

    let result = engine().analyze(&input, &Generator::disabled()).await.unwrap();
    assert_eq!(result.job_skills, vec!["css", "git", "html", "javascript", "react", "redux", "typescript"]);
    assert_eq!(result.missing_skills, vec!["css", "html", "redux"]);
    assert_eq!(result.match_score, 57);
    assert_eq!(result.skill_gap_roadmap.optional, vec!["css", "html", "redux"]);
}

#[tokio::test]
async fn test_every_format_renders() {
    let input = sample_input().await;
    let result = engine().analyze(&input, &Generator::disabled()).await.unwrap();
    let generator = ReportGenerator::with_options(false, true, true, true, true);

    for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Html] {
        let report = generator.generate_report(&result, format).unwrap();
        assert!(report.contains("John Doe"), "{:?} report lacks the candidate", format);
    }
}

#[tokio::test]
async fn test_pdf_report_saved_to_file() {
    let input = sample_input().await;
    let result = engine().analyze(&input, &Generator::disabled()).await.unwrap();
    let generator = ReportGenerator::with_options(false, true, true, true, true);

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir
        .path()
        .join(suggest_filename(OutputFormat::Pdf, &result.candidate, false));
    let bytes = generator.generate_bytes(&result, OutputFormat::Pdf).unwrap();
    save_report_bytes(&bytes, &path).unwrap();

    assert_eq!(path.file_name().unwrap(), "john_doe_analysis.pdf");
    let saved = std::fs::read(&path).unwrap();
    assert!(saved.starts_with(b"%PDF"));
    assert_eq!(saved.len(), bytes.len());
}
