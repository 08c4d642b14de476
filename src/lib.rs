//! Resume analyzer library

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeAnalyzerError};
