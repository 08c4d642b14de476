//! Rewrite suggestions, with an optional generative backend

pub mod prompts;
pub mod generator;
pub mod rewriter;
