//! Append-only history of analysis results

use crate::error::{Result, ResumeAnalyzerError};
use crate::processing::analyzer::{AnalysisInput, AnalysisResult};
use crate::processing::text_processor::word_count;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One analysis about to be persisted
#[derive(Debug, Clone)]
pub struct HistoryEntry<'a> {
    pub candidate_name: &'a str,
    pub job_description: &'a str,
    pub score: u8,
    pub matched_skills: &'a [String],
    pub missing_skills: &'a [String],
    pub resume_words: usize,
    pub created_at: DateTime<Utc>,
}

impl<'a> HistoryEntry<'a> {
    pub fn from_result(result: &'a AnalysisResult, input: &'a AnalysisInput) -> Self {
        Self {
            candidate_name: &input.candidate_name,
            job_description: &input.job_description,
            score: result.match_score,
            matched_skills: &result.matched_skills,
            missing_skills: &result.missing_skills,
            resume_words: word_count(&input.resume_text),
            created_at: result.analyzed_at,
        }
    }
}

/// A stored analysis as read back from the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub candidate_name: String,
    pub job_description: String,
    pub score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume_words: usize,
    pub created_at: DateTime<Utc>,
}

/// Sink for completed analyses
pub trait ResultStore {
    /// Append one record and return its row id
    fn save(&self, entry: &HistoryEntry<'_>) -> Result<i64>;

    /// Most recent records first
    fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>>;
}

pub struct HistoryDatabase {
    conn: Connection,
    path: Option<PathBuf>,
}

impl HistoryDatabase {
    /// Open (or create) the database file, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.init()?;
        debug!("Opened history database at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                candidate_name TEXT NOT NULL,
                job_description TEXT NOT NULL,
                score INTEGER NOT NULL CHECK (score BETWEEN 0 AND 100),
                matched_skills TEXT NOT NULL,
                missing_skills TEXT NOT NULL,
                resume_words INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_results_created ON results(created_at);
            "#,
        )?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
        Ok(RawRecord {
            id: row.get(0)?,
            candidate_name: row.get(1)?,
            job_description: row.get(2)?,
            score: row.get(3)?,
            matched_skills: row.get(4)?,
            missing_skills: row.get(5)?,
            resume_words: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

/// Column values before JSON and timestamp decoding
struct RawRecord {
    id: i64,
    candidate_name: String,
    job_description: String,
    score: i64,
    matched_skills: String,
    missing_skills: String,
    resume_words: i64,
    created_at: String,
}

impl RawRecord {
    fn decode(self) -> Result<HistoryRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| {
                ResumeAnalyzerError::Storage(format!(
                    "record {} has an invalid timestamp '{}': {}",
                    self.id, self.created_at, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(HistoryRecord {
            id: self.id,
            candidate_name: self.candidate_name,
            job_description: self.job_description,
            score: self.score.clamp(0, 100) as u8,
            matched_skills: serde_json::from_str(&self.matched_skills)?,
            missing_skills: serde_json::from_str(&self.missing_skills)?,
            resume_words: self.resume_words.max(0) as usize,
            created_at,
        })
    }
}

impl ResultStore for HistoryDatabase {
    fn save(&self, entry: &HistoryEntry<'_>) -> Result<i64> {
        let matched = serde_json::to_string(entry.matched_skills)?;
        let missing = serde_json::to_string(entry.missing_skills)?;

        self.conn.execute(
            "INSERT INTO results
                (candidate_name, job_description, score, matched_skills, missing_skills, resume_words, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.candidate_name,
                entry.job_description,
                entry.score as i64,
                matched,
                missing,
                entry.resume_words as i64,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, candidate_name, job_description, score, matched_skills, missing_skills, resume_words, created_at
             FROM results ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], Self::row_to_record)?;
        let raw = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(RawRecord::decode).collect()
    }
}
