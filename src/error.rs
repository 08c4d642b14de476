//! Error handling for the resume analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No usable text: extracted {chars} characters, at least {required} required")]
    InsufficientText { chars: usize, required: usize },

    #[error("Invalid job description: {0}")]
    InvalidJobDescription(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAnalyzerError>;

/// Convert anyhow errors from collaborator code into generation failures
impl From<anyhow::Error> for ResumeAnalyzerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeAnalyzerError::Generation(format!("{:#}", err))
    }
}

impl From<askama::Error> for ResumeAnalyzerError {
    fn from(err: askama::Error) -> Self {
        ResumeAnalyzerError::OutputFormatting(err.to_string())
    }
}

impl ResumeAnalyzerError {
    /// Terminal conditions the user has to fix before an analysis can run
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ResumeAnalyzerError::InsufficientText { .. }
                | ResumeAnalyzerError::InvalidJobDescription(_)
                | ResumeAnalyzerError::UnsupportedFormat(_)
                | ResumeAnalyzerError::PdfExtraction(_)
                | ResumeAnalyzerError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_text_message() {
        let err = ResumeAnalyzerError::InsufficientText { chars: 12, required: 200 };
        assert_eq!(
            err.to_string(),
            "No usable text: extracted 12 characters, at least 200 required"
        );
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err: ResumeAnalyzerError = anyhow::anyhow!("timeout")
            .context("request failed")
            .into();
        assert!(matches!(err, ResumeAnalyzerError::Generation(_)));
        assert!(err.to_string().contains("request failed"));
        assert!(err.to_string().contains("timeout"));
        assert!(!err.is_user_facing());
    }
}
