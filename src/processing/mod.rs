//! Skill extraction, scoring and the analysis pipeline

pub mod text_processor;
pub mod skills;
pub mod ats_matcher;
pub mod sections;
pub mod scoring;
pub mod skill_gap;
pub mod analyzer;
