//! Report rendering

pub mod formatter;

pub use formatter::{
    save_report_bytes, suggest_filename, OutputFormatter, PdfFormatter, ReportGenerator,
};
