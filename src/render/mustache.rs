//! PL-006: In-process substitution engine.
//!
//! Expands mustache-style `{{key}}` markers against the active context
//! record. Dotted keys traverse nested mappings; values must resolve to
//! scalars. Substituted text is not re-scanned for markers.

use crate::core::types::{yaml_scalar_to_string, PipelineError};
use serde_yaml_ng::Value;
use std::path::Path;

/// Expand every marker in `template` against `context`.
pub fn expand(template: &str, context: &Value) -> Result<String, String> {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(open) = result[start..].find("{{") {
        let open = start + open;
        let close = result[open..]
            .find("}}")
            .ok_or_else(|| format!("unclosed marker at byte {}", open))?;
        let close = open + close + 2;
        let key = result[open + 2..close - 2].trim();
        if key.is_empty() {
            return Err(format!("empty marker at byte {}", open));
        }

        let value = lookup(context, key)?;
        let text = yaml_scalar_to_string(&value)
            .ok_or_else(|| format!("context key '{}' is not a scalar", key))?;

        result.replace_range(open..close, &text);
        start = open + text.len();
    }

    Ok(result)
}

/// Resolve a possibly-dotted key against a context record.
fn lookup(context: &Value, key: &str) -> Result<Value, String> {
    let mut current = context;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| format!("undefined context key '{}'", key))?;
    }
    Ok(current.clone())
}

/// Read, expand, and write a template. Re-rendering overwrites `dest`.
pub fn render_file(template: &Path, context: &Value, dest: &Path) -> Result<(), PipelineError> {
    let render_err = |reason: String| PipelineError::Render {
        template: template.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(template)
        .map_err(|e| render_err(format!("cannot read template: {}", e)))?;
    let rendered = expand(&text, context).map_err(render_err)?;
    std::fs::write(dest, rendered)
        .map_err(|e| render_err(format!("cannot write {}: {}", dest.display(), e)))
}
