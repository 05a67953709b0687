//! Core pipeline logic — manifest types, parsing, classification, rewriting, handoff.

pub mod classify;
pub mod context;
pub mod handoff;
pub mod parser;
pub mod rewriter;
pub mod types;
