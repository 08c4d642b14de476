//! Input processing module
//! Handles file detection, text extraction and job-description sources

pub mod file_detector;
pub mod text_extractor;
pub mod job_library;
pub mod manager;

pub use job_library::{JobLibrary, JobRole};
pub use manager::{InputManager, JobSource};
