//! PL-003: Source classification by extension role.
//!
//! Partitions a module's source list into context documents, templates, and
//! passthrough sources. Classification is total and non-overlapping: a
//! source matching more than one role set is a hard error, never a silent
//! last-filter-wins. Glob patterns in the declared list are expanded (with
//! sorted matches) before classification.

use super::types::{PipelineError, RoleConfig};
use std::path::PathBuf;

/// Classified sources for one module. Input order is preserved within
/// each partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub contexts: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
    pub passthrough: Vec<PathBuf>,
}

/// Strip the optional leading dot from a configured extension.
pub fn normalize_ext(ext: &str) -> &str {
    ext.trim_start_matches('.')
}

/// True when `ext` (dotless) is a member of a configured role set.
pub fn matches_role(set: &[String], ext: &str) -> bool {
    !ext.is_empty() && set.iter().any(|e| normalize_ext(e) == ext)
}

/// Partition sources by final extension. Pure — no filesystem access.
pub fn classify(sources: &[PathBuf], roles: &RoleConfig) -> Result<Classified, PipelineError> {
    let mut out = Classified::default();

    for source in sources {
        let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut matched: Vec<&str> = Vec::new();
        if matches_role(&roles.context, ext) {
            matched.push("context");
        }
        if matches_role(&roles.template, ext) {
            matched.push("template");
        }

        match matched.as_slice() {
            [] => out.passthrough.push(source.clone()),
            ["context"] => out.contexts.push(source.clone()),
            ["template"] => out.templates.push(source.clone()),
            _ => {
                return Err(PipelineError::Ambiguous {
                    path: source.clone(),
                    roles: matched.iter().map(|s| s.to_string()).collect(),
                })
            }
        }
    }

    Ok(out)
}

/// Expand glob patterns in a declared source list.
///
/// Literal entries pass through untouched whether or not they exist yet
/// (rendered artifacts may not). Pattern entries expand to their sorted
/// matches; a pattern matching nothing is an error (typo protection).
pub fn expand_sources(sources: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut out = Vec::new();

    for entry in sources {
        if !entry.contains(['*', '?', '[']) {
            out.push(PathBuf::from(entry));
            continue;
        }

        let mut matches = Vec::new();
        let paths =
            glob::glob(entry).map_err(|e| format!("bad glob pattern '{}': {}", entry, e))?;
        for path in paths {
            matches.push(path.map_err(|e| format!("glob error on '{}': {}", entry, e))?);
        }
        if matches.is_empty() {
            return Err(format!("glob pattern '{}' matched no files", entry));
        }
        matches.sort();
        out.extend(matches);
    }

    Ok(out)
}
