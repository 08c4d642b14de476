//! Text normalization and lightweight keyword statistics

use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Lowercase `text`, replace everything outside `[a-z0-9+#./ ]` with a space,
/// collapse whitespace runs and trim.
///
/// The output alphabet is a subset of the kept characters, so applying the
/// function twice yields the same string.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '.' | '/')
}

/// Whitespace token count of the raw text
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Shorten `text` to at most `max_graphemes`, cutting at the last space when possible
pub fn truncate_preview(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let truncated = graphemes[..max_graphemes].concat();
    match truncated.rfind(' ') {
        Some(idx) if idx > 0 => format!("{}...", &truncated[..idx]),
        _ => format!("{}...", truncated),
    }
}

pub struct TextProcessor {
    stop_words: HashSet<String>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: Self::create_stop_words(),
        }
    }

    /// Frequency-ranked keywords of the normalized text.
    /// Ties are broken alphabetically so the ranking is reproducible.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let normalized = normalize(text);
        let mut word_freq: HashMap<&str, usize> = HashMap::new();

        for token in normalized.split(' ') {
            let token = token.trim_matches(|c| c == '.' || c == '/');
            if token.len() > 2 && !self.stop_words.contains(token) {
                *word_freq.entry(token).or_insert(0) += 1;
            }
        }

        let mut keywords: Vec<(&str, usize)> = word_freq.into_iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word.to_string())
            .collect()
    }

    fn create_stop_words() -> HashSet<String> {
        [
            "and", "or", "the", "with", "to", "for", "of", "in", "on", "a", "an", "is",
            "are", "as", "by", "from", "you", "our", "will", "have", "has", "this",
            "that", "who", "your", "can", "all", "any", "etc", "must", "should",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}
