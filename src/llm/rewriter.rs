//! Rewrite suggestions for missing skills, generated or from templates

use crate::error::{Result, ResumeAnalyzerError};
use crate::llm::generator::RewriteGenerator;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_SECTION: &str = "Experience / Projects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Template,
    Generated,
}

impl SuggestionSource {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionSource::Template => "template",
            SuggestionSource::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub skill: String,
    pub suggested_rewrite: String,
    pub recommended_section: String,
    pub source: SuggestionSource,
}

/// Canonical skill -> ready-made bullet. Keys are trimmed and lowercased on
/// every construction path, including deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct RewriteTemplates(BTreeMap<String, String>);

impl From<BTreeMap<String, String>> for RewriteTemplates {
    fn from(templates: BTreeMap<String, String>) -> Self {
        Self::new(templates)
    }
}

impl From<RewriteTemplates> for BTreeMap<String, String> {
    fn from(templates: RewriteTemplates) -> Self {
        templates.0
    }
}

impl RewriteTemplates {
    pub fn new(templates: BTreeMap<String, String>) -> Self {
        Self(
            templates
                .into_iter()
                .map(|(skill, text)| (skill.trim().to_lowercase(), text))
                .collect(),
        )
    }

    /// Entries from `overrides` replace same-skill entries; the rest are kept
    pub fn merged_with(mut self, overrides: RewriteTemplates) -> Self {
        self.0.extend(overrides.0);
        self
    }

    pub fn get(&self, skill: &str) -> Option<&str> {
        self.0.get(skill).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Template for `skill`, or the generic bullet when none is defined
    pub fn render(&self, skill: &str) -> String {
        match self.get(skill) {
            Some(text) => text.to_string(),
            None => format!(
                "Applied {} in real-world projects to solve practical problems and deliver measurable results.",
                title_case(skill)
            ),
        }
    }
}

impl Default for RewriteTemplates {
    fn default() -> Self {
        let table = [
            ("python", "Developed backend services in Python, building scalable and maintainable systems that cut processing time."),
            ("java", "Engineered object-oriented Java services with automated tests, improving release stability across teams."),
            ("javascript", "Built interactive JavaScript features that improved page responsiveness and user engagement."),
            ("sql", "Wrote and optimized SQL queries over large datasets, reducing report generation time and database load."),
            ("machine learning", "Trained and deployed machine learning models that automated predictions and supported data-driven decisions."),
            ("data analysis", "Performed data analysis to uncover trends and patterns, turning them into actionable business insights."),
            ("docker", "Containerized applications with Docker to keep development, testing and production environments consistent."),
            ("aws", "Deployed and operated cloud workloads on AWS using services such as EC2, S3 and IAM."),
            ("rest api", "Designed and implemented RESTful APIs enabling secure, efficient communication between services."),
            ("nlp", "Applied natural language processing techniques to extract insights from unstructured text data."),
            ("git", "Managed source code with Git, collaborating through branching, merging and code reviews."),
            ("react", "Built reusable React components that sped up feature delivery and kept the UI consistent."),
        ];
        Self(
            table
                .iter()
                .map(|(skill, text)| (skill.to_string(), text.to_string()))
                .collect(),
        )
    }
}

/// Capitalize every letter that follows a non-letter ("ci/cd" -> "Ci/Cd")
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

pub struct RewriteSuggester {
    templates: RewriteTemplates,
    section: String,
    timeout: Duration,
}

impl RewriteSuggester {
    pub fn new(templates: RewriteTemplates, timeout: Duration) -> Self {
        Self {
            templates,
            section: DEFAULT_SECTION.to_string(),
            timeout,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// One suggestion per usable skill, in input order.
    ///
    /// Uses `generator` when it reports itself available; any failure or
    /// timeout on that path switches the whole batch to templates.
    pub async fn generate_suggestions<G: RewriteGenerator>(
        &self,
        missing_skills: &[String],
        job_description: &str,
        generator: &G,
    ) -> Vec<Suggestion> {
        let skills = usable_skills(missing_skills);
        if skills.is_empty() {
            return Vec::new();
        }

        if generator.is_available() {
            match self.generated_suggestions(&skills, job_description, generator).await {
                Ok(suggestions) => {
                    info!("Generated {} rewrite suggestions with {}", suggestions.len(), generator.name());
                    return suggestions;
                }
                Err(e) => warn!("Rewrite generation failed, falling back to templates: {}", e),
            }
        } else {
            debug!("Rewrite generator unavailable, using templates");
        }

        self.build_template_suggestions(&skills)
    }

    /// Template-only path; total over any input
    pub fn template_suggestions(&self, missing_skills: &[String]) -> Vec<Suggestion> {
        self.build_template_suggestions(&usable_skills(missing_skills))
    }

    fn build_template_suggestions(&self, skills: &[String]) -> Vec<Suggestion> {
        skills
            .iter()
            .map(|skill| Suggestion {
                skill: skill.clone(),
                suggested_rewrite: self.templates.render(skill),
                recommended_section: self.section.clone(),
                source: SuggestionSource::Template,
            })
            .collect()
    }

    async fn generated_suggestions<G: RewriteGenerator>(
        &self,
        skills: &[String],
        job_description: &str,
        generator: &G,
    ) -> Result<Vec<Suggestion>> {
        let mut suggestions = Vec::with_capacity(skills.len());

        for skill in skills {
            let text = tokio::time::timeout(self.timeout, generator.generate(skill, job_description))
                .await
                .map_err(|_| {
                    ResumeAnalyzerError::Generation(format!(
                        "timed out after {}s for skill '{}'",
                        self.timeout.as_secs(),
                        skill
                    ))
                })??;

            suggestions.push(Suggestion {
                skill: skill.clone(),
                suggested_rewrite: text,
                recommended_section: self.section.clone(),
                source: SuggestionSource::Generated,
            });
        }

        Ok(suggestions)
    }
}

impl Default for RewriteSuggester {
    fn default() -> Self {
        Self::new(RewriteTemplates::default(), Duration::from_secs(30))
    }
}

/// Trimmed, lowercased skills; entries with no alphanumeric character are dropped
fn usable_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}
