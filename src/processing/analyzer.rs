//! Analysis engine: runs the scoring pipeline and assembles one result record

use crate::config::Config;
use crate::database::{HistoryEntry, ResultStore};
use crate::error::{Result, ResumeAnalyzerError};
use crate::llm::generator::RewriteGenerator;
use crate::llm::rewriter::{RewriteSuggester, Suggestion};
use crate::processing::ats_matcher::SkillExtractor;
use crate::processing::scoring::{score_match, score_strength};
use crate::processing::sections::{SectionDetector, SectionStatus};
use crate::processing::skill_gap::{classify_gaps, SkillGapRoadmap};
use crate::processing::skills::{Dictionaries, PriorityTiers};
use crate::processing::text_processor::{word_count, TextProcessor};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

const JOB_KEYWORD_LIMIT: usize = 15;

/// Already-extracted texts for one analysis
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub candidate_name: String,
    pub resume_text: String,
    pub job_description: String,
}

impl AnalysisInput {
    pub fn new(
        candidate_name: impl Into<String>,
        resume_text: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            resume_text: resume_text.into(),
            job_description: job_description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub candidate: String,
    pub analyzed_at: DateTime<Utc>,

    /// ATS compatibility (0-100)
    pub match_score: u8,
    /// Resume quality heuristic (0-100)
    pub resume_strength: u8,

    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Missing skills from the core tier
    pub core_missing: Vec<String>,

    pub sections: SectionStatus,
    pub feedback: Vec<String>,
    pub skill_gap_roadmap: SkillGapRoadmap,
    pub rewrite_suggestions: Vec<Suggestion>,

    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub job_keywords: Vec<String>,
    pub resume_word_count: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackThresholds {
    pub low_score: u8,
    pub weak_strength: u8,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            low_score: 60,
            weak_strength: 70,
        }
    }
}

/// Feedback messages in fixed order: core skills, score, strength, sections
pub fn build_feedback(
    core_missing: &[String],
    match_score: u8,
    resume_strength: u8,
    sections: &SectionStatus,
    thresholds: FeedbackThresholds,
) -> Vec<String> {
    let mut feedback = Vec::new();

    if !core_missing.is_empty() {
        feedback.push(format!(
            "Critical ATS risk: missing core skills ({}).",
            core_missing.join(", ")
        ));
    }

    if match_score < thresholds.low_score {
        feedback.push("Low ATS compatibility: the resume may be filtered out automatically.".to_string());
    }

    if resume_strength < thresholds.weak_strength {
        feedback.push(
            "Resume quality is weak: tighten the formatting and add measurable achievements.".to_string(),
        );
    }

    let missing_sections = sections.missing();
    if !missing_sections.is_empty() {
        feedback.push(format!(
            "Missing resume sections: {}.",
            missing_sections.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        ));
    }

    feedback
}

/// Main analysis engine that coordinates all pipeline components
pub struct AnalysisEngine {
    extractor: SkillExtractor,
    detector: SectionDetector,
    tiers: PriorityTiers,
    suggester: RewriteSuggester,
    keywords: TextProcessor,
    thresholds: FeedbackThresholds,
    min_resume_chars: usize,
}

impl AnalysisEngine {
    /// Engine with the dictionaries named in the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let dictionaries = Dictionaries::load(config.analysis.dictionary_path.as_deref())?;
        Self::new(config, dictionaries)
    }

    pub fn new(config: &Config, dictionaries: Dictionaries) -> Result<Self> {
        let Dictionaries {
            skills,
            tiers,
            sections,
            templates,
        } = dictionaries;

        let extractor = SkillExtractor::new(skills)?;
        let detector = SectionDetector::new(&sections)?;
        let suggester = RewriteSuggester::new(templates, Duration::from_secs(config.generator.timeout_secs));

        Ok(Self {
            extractor,
            detector,
            tiers,
            suggester,
            keywords: TextProcessor::new(),
            thresholds: FeedbackThresholds {
                low_score: config.scoring.low_score_threshold,
                weak_strength: config.scoring.weak_strength_threshold,
            },
            min_resume_chars: config.analysis.min_resume_chars,
        })
    }

    /// Reject inputs the pipeline cannot produce a meaningful result for
    pub fn validate_input(&self, input: &AnalysisInput) -> Result<()> {
        let chars = input.resume_text.trim().chars().count();
        if chars < self.min_resume_chars {
            return Err(ResumeAnalyzerError::InsufficientText {
                chars,
                required: self.min_resume_chars,
            });
        }

        if input.job_description.trim().is_empty() {
            return Err(ResumeAnalyzerError::InvalidJobDescription(
                "job description is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Run the full pipeline and assemble the result record
    pub async fn analyze<G: RewriteGenerator>(
        &self,
        input: &AnalysisInput,
        generator: &G,
    ) -> Result<AnalysisResult> {
        let start_time = Instant::now();
        self.validate_input(input)?;

        let resume_skills = self.extractor.extract_skills(&input.resume_text);
        let job_skills = self.extractor.extract_skills(&input.job_description);
        debug!(
            "Extracted {} resume skills and {} job skills",
            resume_skills.len(),
            job_skills.len()
        );

        let match_result = score_match(&resume_skills, &job_skills);
        let resume_strength = score_strength(&input.resume_text, &resume_skills);
        let sections = self.detector.detect_sections(&input.resume_text);
        let roadmap = classify_gaps(&job_skills, &resume_skills, &self.tiers);
        let core_missing = roadmap.critical.clone();

        let feedback = build_feedback(
            &core_missing,
            match_result.score,
            resume_strength,
            &sections,
            self.thresholds,
        );

        let rewrite_suggestions = self
            .suggester
            .generate_suggestions(&match_result.missing, &input.job_description, generator)
            .await;

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Analysis for '{}' finished: score {}%, strength {}%, {} missing skills ({}ms)",
            input.candidate_name,
            match_result.score,
            resume_strength,
            match_result.missing.len(),
            processing_time_ms
        );

        Ok(AnalysisResult {
            candidate: input.candidate_name.clone(),
            analyzed_at: Utc::now(),
            match_score: match_result.score,
            resume_strength,
            matched_skills: match_result.matched,
            missing_skills: match_result.missing,
            core_missing,
            sections,
            feedback,
            skill_gap_roadmap: roadmap,
            rewrite_suggestions,
            resume_skills: into_sorted(resume_skills),
            job_skills: into_sorted(job_skills),
            job_keywords: self.keywords.extract_keywords(&input.job_description, JOB_KEYWORD_LIMIT),
            resume_word_count: word_count(&input.resume_text),
            processing_time_ms,
        })
    }

    /// Analyze, then append the result to `store`. A failed write is logged
    /// and the result is still returned.
    pub async fn analyze_and_record<G: RewriteGenerator, S: ResultStore>(
        &self,
        input: &AnalysisInput,
        generator: &G,
        store: &S,
    ) -> Result<AnalysisResult> {
        let result = self.analyze(input, generator).await?;

        match store.save(&HistoryEntry::from_result(&result, input)) {
            Ok(id) => debug!("Saved analysis #{}", id),
            Err(e) => warn!("Failed to save analysis history: {}", e),
        }

        Ok(result)
    }
}

fn into_sorted(skills: BTreeSet<String>) -> Vec<String> {
    skills.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::generator::UnavailableGenerator;
    use crate::llm::rewriter::SuggestionSource;
    use crate::processing::sections::Section;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(&Config::default(), Dictionaries::default()).unwrap()
    }

    fn resume() -> String {
        let mut text = String::from(
            "Jane Doe\nSummary\nBackend engineer focused on data platforms.\n\nExperience\n",
        );
        text.push_str("Built Python services and SQL reporting pipelines, used Git daily. ");
        text.push_str(&"Delivered features with measurable impact across teams. ".repeat(8));
        text.push_str("\nEducation\nBSc Computer Science\n");
        text
    }

    #[test]
    fn test_feedback_order_and_triggers() {
        let mut sections = SectionStatus::all_missing();
        let feedback = build_feedback(
            &["python".to_string(), "sql".to_string()],
            40,
            50,
            &sections,
            FeedbackThresholds::default(),
        );
        assert_eq!(feedback.len(), 4);
        assert_eq!(feedback[0], "Critical ATS risk: missing core skills (python, sql).");
        assert!(feedback[1].starts_with("Low ATS compatibility"));
        assert!(feedback[2].starts_with("Resume quality is weak"));
        assert_eq!(feedback[3], "Missing resume sections: summary, experience, education, skills.");

        sections = SectionDetector::default().detect_sections("Summary\nExperience\nEducation\nSkills");
        let feedback = build_feedback(&[], 60, 70, &sections, FeedbackThresholds::default());
        assert!(feedback.is_empty());
    }

    #[test]
    fn test_feedback_only_strength() {
        let sections = SectionDetector::default().detect_sections("Summary\nExperience\nEducation\nSkills");
        let feedback = build_feedback(&[], 95, 69, &sections, FeedbackThresholds::default());
        assert_eq!(feedback.len(), 1);
        assert!(feedback[0].starts_with("Resume quality is weak"));
    }

    #[test]
    fn test_validate_rejects_short_resume() {
        let input = AnalysisInput::new("A", "too short", "Python developer");
        let err = engine().validate_input(&input).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::InsufficientText { chars: 9, required: 200 }));
    }

    #[test]
    fn test_validate_rejects_blank_job_description() {
        let input = AnalysisInput::new("A", resume(), "   \n\t");
        let err = engine().validate_input(&input).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::InvalidJobDescription(_)));
    }

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let input = AnalysisInput::new(
            "Jane Doe",
            resume(),
            "Required: Python, SQL, Docker and AWS. Nice to have: Tableau.",
        );
        let result = engine().analyze(&input, &UnavailableGenerator::default()).await.unwrap();

        assert_eq!(result.candidate, "Jane Doe");
        assert_eq!(result.job_skills, vec!["aws", "docker", "python", "sql", "tableau"]);
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills, vec!["aws", "docker", "tableau"]);
        assert_eq!(result.match_score, 40);
        assert!(result.core_missing.is_empty());
        assert_eq!(result.skill_gap_roadmap.important, vec!["aws", "docker"]);
        assert_eq!(result.skill_gap_roadmap.optional, vec!["tableau"]);

        assert!(result.sections.is_present(Section::Summary));
        assert!(result.sections.is_present(Section::Experience));
        assert!(result.sections.is_present(Section::Education));
        assert!(!result.sections.is_present(Section::Skills));

        let suggestion_skills: Vec<&str> =
            result.rewrite_suggestions.iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(suggestion_skills, vec!["aws", "docker", "tableau"]);
        assert!(result
            .rewrite_suggestions
            .iter()
            .all(|s| s.source == SuggestionSource::Template));

        assert_eq!(result.feedback.len(), 3);
        assert!(result.feedback[0].starts_with("Low ATS compatibility"));
        assert_eq!(result.feedback[2], "Missing resume sections: skills.");
    }

    #[tokio::test]
    async fn test_analyze_job_without_known_skills() {
        let input = AnalysisInput::new("A", resume(), "We value curiosity and kindness.");
        let result = engine().analyze(&input, &UnavailableGenerator::default()).await.unwrap();

        assert_eq!(result.match_score, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert!(result.rewrite_suggestions.is_empty());
        assert!(result.skill_gap_roadmap.is_empty());
    }
}
