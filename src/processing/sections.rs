//! Resume section detection from header lines

use crate::error::{Result, ResumeAnalyzerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence flag for every section; all four keys are always present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionStatus(BTreeMap<Section, bool>);

impl SectionStatus {
    pub fn all_missing() -> Self {
        Self(Section::ALL.iter().map(|s| (*s, false)).collect())
    }

    pub fn is_present(&self, section: Section) -> bool {
        self.0.get(&section).copied().unwrap_or(false)
    }

    pub fn missing(&self) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|s| !self.is_present(*s))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, bool)> + '_ {
        self.0.iter().map(|(s, present)| (*s, *present))
    }

    fn set(&mut self, section: Section, present: bool) {
        self.0.insert(section, present);
    }
}

/// Header phrasings accepted for each section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHeaders {
    pub summary: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
}

impl SectionHeaders {
    pub fn for_section(&self, section: Section) -> &[String] {
        match section {
            Section::Summary => &self.summary,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Skills => &self.skills,
        }
    }
}

impl Default for SectionHeaders {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            summary: owned(&["summary", "professional summary", "profile", "career summary"]),
            experience: owned(&[
                "experience",
                "work experience",
                "professional experience",
                "employment history",
            ]),
            education: owned(&["education", "academic background", "qualifications"]),
            skills: owned(&["skills", "technical skills", "key skills", "core competencies"]),
        }
    }
}

pub struct SectionDetector {
    patterns: Vec<(Section, Option<Regex>)>,
}

impl SectionDetector {
    pub fn new(headers: &SectionHeaders) -> Result<Self> {
        let mut patterns = Vec::with_capacity(Section::ALL.len());

        for section in Section::ALL {
            let alternatives: Vec<String> = headers
                .for_section(section)
                .iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .map(|h| regex::escape(&h))
                .collect();

            // A section without headers can never be detected
            let regex = if alternatives.is_empty() {
                None
            } else {
                let pattern = format!(
                    r"(?m)^[\s&&[^\n]]*(?:{})[\s&&[^\n]]*[:\-—]?[\s&&[^\n]]*$",
                    alternatives.join("|")
                );
                Some(Regex::new(&pattern).map_err(|e| {
                    ResumeAnalyzerError::Configuration(format!("invalid {} header pattern: {}", section, e))
                })?)
            };
            patterns.push((section, regex));
        }

        Ok(Self { patterns })
    }

    /// Which conventional sections have a header line in `resume_text`
    pub fn detect_sections(&self, resume_text: &str) -> SectionStatus {
        let mut status = SectionStatus::all_missing();
        if resume_text.trim().is_empty() {
            return status;
        }

        let text = resume_text.to_lowercase().replace("\r\n", "\n").replace('\r', "\n");

        for (section, regex) in &self.patterns {
            let present = regex.as_ref().map(|r| r.is_match(&text)).unwrap_or(false);
            status.set(*section, present);
        }

        status
    }
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new(&SectionHeaders::default()).expect("built-in section headers are valid")
    }
}
