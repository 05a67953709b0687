//! PL-004: Type-context loading.
//!
//! Reads each context document as a multi-document YAML stream and
//! concatenates all records, across all files, into one ordered sequence.
//! The caller selects the first record as the active rendering context.

use super::types::PipelineError;
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::path::PathBuf;

/// Load every record from the given context documents, in order.
///
/// Empty documents (null) are skipped. Zero total records is not an error
/// here; the renderer resolves against an empty mapping and fails on the
/// first key lookup instead, so the error names the missing key.
pub fn load_contexts(paths: &[PathBuf]) -> Result<Vec<Value>, PipelineError> {
    let mut records = Vec::new();

    for path in paths {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Load {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        for doc in serde_yaml_ng::Deserializer::from_str(&content) {
            let value = Value::deserialize(doc).map_err(|e| PipelineError::Load {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            if !value.is_null() {
                records.push(value);
            }
        }
    }

    Ok(records)
}
