//! Predefined job descriptions selectable by role name

use crate::error::{Result, ResumeAnalyzerError};
use serde::Serialize;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint
const SUGGESTION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRole {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct JobLibrary {
    roles: Vec<JobRole>,
}

impl Default for JobLibrary {
    fn default() -> Self {
        let role = |name: &str, lines: &[&str]| JobRole {
            name: name.to_string(),
            description: lines.join("\n"),
        };

        Self {
            roles: vec![
                role(
                    "Software Engineer",
                    &[
                        "Required Skills:",
                        "- Python, Java, SQL",
                        "- Data Structures, Algorithms, OOP",
                        "- REST API, Git",
                        "Preferred:",
                        "- Docker, AWS, CI/CD, React",
                    ],
                ),
                role(
                    "Data Scientist",
                    &[
                        "Required Skills:",
                        "- Python, SQL, Machine Learning",
                        "- Data Analysis, Statistics",
                        "- Pandas, NumPy",
                        "Preferred:",
                        "- NLP, Tableau, Power BI, Deep Learning",
                    ],
                ),
                role(
                    "Frontend Developer",
                    &[
                        "Required Skills:",
                        "- JavaScript, HTML, CSS",
                        "- React, Git",
                        "Preferred:",
                        "- Redux, TypeScript, Testing Libraries",
                    ],
                ),
                role(
                    "Universal Resume Check",
                    &[
                        "Check for common job-ready skills:",
                        "- Communication, Teamwork, Python, SQL, Excel",
                        "- Basic project experience and structured resume format",
                    ],
                ),
            ],
        }
    }
}

impl JobLibrary {
    pub fn roles(&self) -> &[JobRole] {
        &self.roles
    }

    /// Case-insensitive lookup by role name
    pub fn get(&self, name: &str) -> Option<&JobRole> {
        let wanted = name.trim().to_lowercase();
        self.roles.iter().find(|r| r.name.to_lowercase() == wanted)
    }

    /// Like `get`, but an unknown name is an error carrying the closest role
    pub fn require(&self, name: &str) -> Result<&JobRole> {
        self.get(name).ok_or_else(|| {
            let hint = match self.closest(name) {
                Some(role) => format!(" Did you mean '{}'?", role.name),
                None => String::new(),
            };
            ResumeAnalyzerError::InvalidJobDescription(format!(
                "unknown role '{}'.{} Run `resume-analyzer roles` to list them.",
                name.trim(),
                hint
            ))
        })
    }

    pub fn closest(&self, name: &str) -> Option<&JobRole> {
        let wanted = name.trim().to_lowercase();
        self.roles
            .iter()
            .map(|r| (r, strsim::jaro_winkler(&wanted, &r.name.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(r, _)| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let library = JobLibrary::default();
        assert_eq!(library.roles().len(), 4);
        let role = library.get("  data scientist ").unwrap();
        assert_eq!(role.name, "Data Scientist");
        assert!(role.description.contains("Machine Learning"));
    }

    #[test]
    fn test_unknown_role_suggests_closest() {
        let library = JobLibrary::default();
        let err = library.require("Software Enginer").unwrap_err();
        assert!(err.to_string().contains("Did you mean 'Software Engineer'?"));
    }

    #[test]
    fn test_unrelated_role_has_no_hint() {
        let library = JobLibrary::default();
        assert!(library.closest("zzzz").is_none());
        let err = library.require("zzzz").unwrap_err();
        assert!(!err.to_string().contains("Did you mean"));
    }
}
