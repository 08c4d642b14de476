//! Canonical skill dictionary, priority tiers and the dictionary file loader

use crate::error::{Result, ResumeAnalyzerError};
use crate::llm::rewriter::RewriteTemplates;
use crate::processing::sections::SectionHeaders;
use crate::processing::skill_gap::Tier;
use crate::processing::text_processor::normalize;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One canonical skill and the surface phrasings that identify it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub canonical: String,
    pub variants: Vec<String>,
}

/// Ordered, validated synonym table. Variants are stored normalized so they
/// can be compared directly against normalized text.
#[derive(Debug, Clone)]
pub struct SkillDictionary {
    entries: Vec<SkillEntry>,
}

impl SkillDictionary {
    pub fn new(entries: Vec<SkillEntry>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut cleaned = Vec::with_capacity(entries.len());

        for entry in entries {
            let canonical = entry.canonical.trim().to_lowercase();
            if canonical.is_empty() {
                return Err(ResumeAnalyzerError::Configuration(
                    "skill dictionary contains an empty canonical name".to_string(),
                ));
            }
            if !seen.insert(canonical.clone()) {
                return Err(ResumeAnalyzerError::Configuration(format!(
                    "skill '{}' is defined more than once",
                    canonical
                )));
            }

            let mut variants: Vec<String> = Vec::with_capacity(entry.variants.len());
            for variant in entry.variants.iter().map(|v| normalize(v)) {
                if !variant.is_empty() && !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
            if variants.is_empty() {
                return Err(ResumeAnalyzerError::Configuration(format!(
                    "skill '{}' has no usable variants",
                    canonical
                )));
            }

            cleaned.push(SkillEntry { canonical, variants });
        }

        Ok(Self { entries: cleaned })
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.iter().any(|e| e.canonical == canonical)
    }

    fn builtin_entries() -> Vec<SkillEntry> {
        let table: &[(&str, &[&str])] = &[
            // Programming languages
            ("python", &["python"]),
            ("java", &["java"]),
            ("javascript", &["javascript", "js"]),
            ("typescript", &["typescript"]),
            ("c++", &["c++", "cpp"]),
            ("c#", &["c#", "c sharp"]),
            ("sql", &["sql", "mysql", "postgresql", "postgres", "sqlite"]),
            // Computer science fundamentals
            ("oop", &["oop", "object oriented programming", "object oriented"]),
            ("data structures", &["data structures"]),
            ("algorithms", &["algorithms", "algorithm design"]),
            // Data and analytics
            ("data analysis", &["data analysis", "data analytics", "data analyst"]),
            ("machine learning", &["machine learning", "ml"]),
            ("deep learning", &["deep learning", "dl"]),
            ("nlp", &["nlp", "natural language processing"]),
            ("statistics", &["statistics"]),
            ("pandas", &["pandas"]),
            ("numpy", &["numpy"]),
            // Visualization
            ("tableau", &["tableau"]),
            ("power bi", &["power bi", "powerbi"]),
            ("excel", &["excel", "ms excel", "spreadsheets"]),
            // Web and backend
            ("html", &["html"]),
            ("css", &["css"]),
            ("react", &["react", "reactjs"]),
            ("redux", &["redux"]),
            ("node.js", &["node.js", "nodejs"]),
            ("flask", &["flask"]),
            ("django", &["django"]),
            ("streamlit", &["streamlit"]),
            ("rest api", &["rest api", "restful api", "rest apis", "restful apis"]),
            // DevOps and cloud
            ("aws", &["aws", "amazon web services"]),
            ("docker", &["docker"]),
            ("kubernetes", &["kubernetes", "k8s"]),
            ("git", &["git", "github", "gitlab"]),
            ("ci/cd", &["ci/cd", "continuous integration"]),
            // Soft skills
            ("communication", &["communication", "presentations", "verbal communication"]),
            ("teamwork", &["teamwork", "collaboration", "cross functional"]),
            ("problem solving", &["problem solving"]),
        ];

        table
            .iter()
            .map(|(canonical, variants)| SkillEntry {
                canonical: canonical.to_string(),
                variants: variants.iter().map(|v| v.to_string()).collect(),
            })
            .collect()
    }
}

impl Default for SkillDictionary {
    fn default() -> Self {
        Self {
            entries: Self::builtin_entries()
                .into_iter()
                .map(|SkillEntry { canonical, variants }| SkillEntry {
                    canonical,
                    variants: variants.iter().map(|v| normalize(v)).collect(),
                })
                .collect(),
        }
    }
}

/// CORE and SECONDARY skill sets used to prioritise gaps
#[derive(Debug, Clone)]
pub struct PriorityTiers {
    core: BTreeSet<String>,
    secondary: BTreeSet<String>,
}

impl PriorityTiers {
    pub fn new<I, J>(core: I, secondary: J) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        let core: BTreeSet<String> = core.into_iter().map(|s| s.as_ref().trim().to_lowercase()).collect();
        let secondary: BTreeSet<String> =
            secondary.into_iter().map(|s| s.as_ref().trim().to_lowercase()).collect();

        let overlap: Vec<&String> = core.intersection(&secondary).collect();
        if !overlap.is_empty() {
            return Err(ResumeAnalyzerError::Configuration(format!(
                "skills cannot be both core and secondary: {}",
                overlap.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            )));
        }

        Ok(Self { core, secondary })
    }

    pub fn tier_of(&self, skill: &str) -> Tier {
        if self.core.contains(skill) {
            Tier::Critical
        } else if self.secondary.contains(skill) {
            Tier::Important
        } else {
            Tier::Optional
        }
    }

    pub fn core(&self) -> &BTreeSet<String> {
        &self.core
    }

    pub fn secondary(&self) -> &BTreeSet<String> {
        &self.secondary
    }
}

impl Default for PriorityTiers {
    fn default() -> Self {
        let core = [
            "python", "java", "javascript", "sql", "data analysis", "machine learning",
            "data structures", "algorithms", "oop", "git", "rest api",
        ];
        let secondary = [
            "pandas", "numpy", "excel", "docker", "aws", "flask", "django", "streamlit",
            "react", "nlp", "ci/cd",
        ];
        Self {
            core: core.iter().map(|s| s.to_string()).collect(),
            secondary: secondary.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// All read-only lookup tables the pipeline is built from
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    pub skills: SkillDictionary,
    pub tiers: PriorityTiers,
    pub sections: SectionHeaders,
    pub templates: RewriteTemplates,
}

/// On-disk override format. Any table left out keeps its built-in value.
#[derive(Debug, Clone, Default, Deserialize)]
struct DictionaryFile {
    skills: Option<Vec<SkillEntry>>,
    core: Option<Vec<String>>,
    secondary: Option<Vec<String>>,
    sections: Option<SectionHeaders>,
    templates: Option<RewriteTemplates>,
}

impl Dictionaries {
    /// Built-in tables, or the tables in `path` when one is configured
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dictionaries = Self::from_toml(&content).map_err(|e| match e {
            ResumeAnalyzerError::Configuration(msg) => {
                ResumeAnalyzerError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        info!(
            "Loaded dictionaries from {} ({} skills)",
            path.display(),
            dictionaries.skills.len()
        );
        Ok(dictionaries)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: DictionaryFile = toml::from_str(content)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("invalid dictionary file: {}", e)))?;

        let defaults = Self::default();

        let skills = match file.skills {
            Some(entries) => SkillDictionary::new(entries)?,
            None => defaults.skills,
        };

        let tiers = match (file.core, file.secondary) {
            (None, None) => defaults.tiers,
            (core, secondary) => PriorityTiers::new(
                core.unwrap_or_else(|| defaults.tiers.core().iter().cloned().collect()),
                secondary.unwrap_or_else(|| defaults.tiers.secondary().iter().cloned().collect()),
            )?,
        };

        Ok(Self {
            skills,
            tiers,
            sections: file.sections.unwrap_or(defaults.sections),
            templates: match file.templates {
                Some(overrides) => defaults.templates.merged_with(overrides),
                None => defaults.templates,
            },
        })
    }
}
