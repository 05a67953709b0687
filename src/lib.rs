//! Plantilla — pre-build mustache rendering of typed binding sources.
//!
//! Classifies module sources by extension role, merges YAML type contexts,
//! expands templates in-process or through an external renderer, and
//! rewrites module source lists for the native-extension build step.

pub mod cli;
pub mod core;
pub mod render;
