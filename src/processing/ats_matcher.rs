//! ATS (Applicant Tracking System) skill extraction

use crate::error::{Result, ResumeAnalyzerError};
use crate::processing::skills::SkillDictionary;
use crate::processing::text_processor::normalize;
use aho_corasick::AhoCorasick;
use std::collections::BTreeSet;

/// Maps free text to canonical skills with exact, word-boundary matching
pub struct SkillExtractor {
    matcher: AhoCorasick,
    /// Canonical skill for each pattern id
    pattern_skills: Vec<String>,
    dictionary: SkillDictionary,
}

impl SkillExtractor {
    pub fn new(dictionary: SkillDictionary) -> Result<Self> {
        let mut patterns: Vec<&str> = Vec::new();
        let mut pattern_skills = Vec::new();

        for entry in dictionary.entries() {
            for variant in &entry.variants {
                patterns.push(variant.as_str());
                pattern_skills.push(entry.canonical.clone());
            }
        }

        // Overlapping search needs the standard match kind so that a rejected
        // occurrence (e.g. "java" inside "javascript") never hides another one.
        let matcher = AhoCorasick::builder()
            .match_kind(aho_corasick::MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_skills,
            dictionary,
        })
    }

    /// Canonical skills mentioned in `text`, deduplicated and sorted
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let normalized = normalize(text);
        let bytes = normalized.as_bytes();
        let mut found = BTreeSet::new();

        for mat in self.matcher.find_overlapping_iter(&normalized) {
            let skill = &self.pattern_skills[mat.pattern().as_usize()];
            if found.contains(skill) {
                continue;
            }
            if is_boundary(bytes, mat.start(), mat.end()) {
                found.insert(skill.clone());
            }
        }

        found
    }

    pub fn skill_count(&self) -> usize {
        self.dictionary.len()
    }
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new(SkillDictionary::default()).expect("built-in skill dictionary is valid")
    }
}

/// A match is whole-word when neither neighbour is alphanumeric. Normalized
/// text is ASCII, so byte offsets are character offsets.
fn is_boundary(text: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !text[start - 1].is_ascii_alphanumeric();
    let after_ok = end >= text.len() || !text[end].is_ascii_alphanumeric();
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skills::SkillEntry;

    fn skills(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extractor_creation() {
        let extractor = SkillExtractor::default();
        assert!(extractor.skill_count() > 30);
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let extractor = SkillExtractor::default();

        let found = extractor.extract_skills("Backend work in Java and Spring.");
        assert!(found.contains("java"));
        assert!(!found.contains("javascript"));

        let found = extractor.extract_skills("Frontend work in JavaScript.");
        assert!(found.contains("javascript"));
        assert!(!found.contains("java"));
    }

    #[test]
    fn test_both_java_and_javascript() {
        let extractor = SkillExtractor::default();
        let found = extractor.extract_skills("JavaScript first, later Java");
        assert!(found.contains("java"));
        assert!(found.contains("javascript"));
    }

    #[test]
    fn test_synonyms_map_to_canonical() {
        let extractor = SkillExtractor::default();
        let found = extractor.extract_skills("Built ML pipelines on Amazon Web Services with PostgreSQL and K8s");
        assert_eq!(found, skills(&["aws", "kubernetes", "machine learning", "sql"]));
    }

    #[test]
    fn test_symbol_skills_are_distinct() {
        let extractor = SkillExtractor::default();

        let found = extractor.extract_skills("Game engines in C++.");
        assert_eq!(found, skills(&["c++"]));

        let found = extractor.extract_skills("Desktop apps in C#");
        assert_eq!(found, skills(&["c#"]));
    }

    #[test]
    fn test_multi_word_variants_need_contiguous_phrase() {
        let extractor = SkillExtractor::default();
        assert!(extractor.extract_skills("machine learning engineer").contains("machine learning"));
        assert!(!extractor
            .extract_skills("machine shop and learning center")
            .contains("machine learning"));
    }

    #[test]
    fn test_no_partial_word_matches() {
        let extractor = SkillExtractor::default();
        let found = extractor.extract_skills("Gitter chats, htmlish markup, awsome pandasaurus");
        assert!(found.is_empty(), "unexpected skills: {:?}", found);
    }

    #[test]
    fn test_punctuation_and_case() {
        let extractor = SkillExtractor::default();
        let found = extractor.extract_skills("SKILLS: Python, SQL; Git/GitHub; CI/CD.");
        assert_eq!(found, skills(&["ci/cd", "git", "python", "sql"]));
    }

    #[test]
    fn test_empty_text() {
        let extractor = SkillExtractor::default();
        assert!(extractor.extract_skills("").is_empty());
        assert!(extractor.extract_skills("   \n ").is_empty());
    }

    #[test]
    fn test_bare_node_is_not_nodejs() {
        let extractor = SkillExtractor::default();
        let found = extractor.extract_skills("Balanced a binary tree with node rotation; react quickly to incidents");
        assert!(!found.contains("node.js"));

        let found = extractor.extract_skills("APIs in Node.js, tooling on nodejs");
        assert!(found.contains("node.js"));
    }

    #[test]
    fn test_custom_dictionary() {
        let dictionary = SkillDictionary::new(vec![SkillEntry {
            canonical: "rust".to_string(),
            variants: vec!["rust".to_string(), "rustlang".to_string()],
        }])
        .unwrap();
        let extractor = SkillExtractor::new(dictionary).unwrap();

        assert_eq!(extractor.extract_skills("I write RustLang daily"), skills(&["rust"]));
        assert!(extractor.extract_skills("trusted rusty tools").is_empty());
    }
}
