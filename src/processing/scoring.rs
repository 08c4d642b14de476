//! ATS compatibility and resume strength scoring

use crate::processing::text_processor::word_count;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Percentage of job-description skills covered by the resume (0-100)
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Coverage of the job description's skills by the resume.
///
/// The operands are not interchangeable: the score is `|matched| / |jd|`,
/// and an empty job-description set scores 0.
pub fn score_match(resume_skills: &BTreeSet<String>, jd_skills: &BTreeSet<String>) -> MatchResult {
    let resume = lowercase_set(resume_skills);
    let jd = lowercase_set(jd_skills);

    let matched: Vec<String> = jd.intersection(&resume).cloned().collect();
    let missing: Vec<String> = jd.difference(&resume).cloned().collect();

    MatchResult {
        score: percentage(matched.len(), jd.len()),
        matched,
        missing,
    }
}

/// Round-half-up of `100 * part / whole` in integer arithmetic, 0 when `whole` is 0
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let value = (200 * part + whole) / (2 * whole);
    value.min(100) as u8
}

fn lowercase_set(skills: &BTreeSet<String>) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

const IDEAL_WORD_COUNT: f64 = 600.0;
const SHORT_RESUME_WORDS: usize = 250;
const SHORT_RESUME_PENALTY: f64 = 0.6;
const IDEAL_SKILL_COUNT: f64 = 20.0;
const LENGTH_WEIGHT: f64 = 0.6;
const SKILL_WEIGHT: f64 = 0.4;

/// Resume quality heuristic from length and skill density (0-100).
/// A resume with no words scores 0 regardless of its skills.
pub fn score_strength(resume_text: &str, resume_skills: &BTreeSet<String>) -> u8 {
    let words = word_count(resume_text);
    if words == 0 {
        return 0;
    }

    let mut length_score = (words as f64 / IDEAL_WORD_COUNT).min(1.0);
    if words < SHORT_RESUME_WORDS {
        length_score *= SHORT_RESUME_PENALTY;
    }
    let skill_score = (resume_skills.len() as f64 / IDEAL_SKILL_COUNT).min(1.0);

    let strength = 100.0 * (LENGTH_WEIGHT * length_score + SKILL_WEIGHT * skill_score);
    strength.round().clamp(0.0, 100.0) as u8
}
