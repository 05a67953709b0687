//! PL-002: Manifest parsing and validation.
//!
//! Parses plantilla.yaml and validates structural constraints:
//! - Version must be "1.0"
//! - At least one module, each with at least one source
//! - Extension role sets must be pairwise disjoint
//! - External strategy requires a renderer command

use super::classify::normalize_ext;
use super::types::*;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a plantilla.yaml file from disk.
pub fn parse_config_file(path: &Path) -> Result<PlantillaConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_config(&content)
}

/// Parse a plantilla.yaml from a string.
pub fn parse_config(yaml: &str) -> Result<PlantillaConfig, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed manifest. Returns a list of errors (empty = valid).
pub fn validate_config(config: &PlantillaConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Version check
    if config.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", config.version),
        });
    }

    // Name check
    if config.name.is_empty() {
        errors.push(ValidationError {
            message: "name must not be empty".to_string(),
        });
    }

    if config.modules.is_empty() {
        errors.push(ValidationError {
            message: "manifest declares no modules".to_string(),
        });
    }

    for (id, module) in &config.modules {
        if module.sources.is_empty() {
            errors.push(ValidationError {
                message: format!("module '{}' has no sources", id),
            });
        }
    }

    // Role sets must be pairwise disjoint so classification stays total
    let role_sets = [
        ("context", &config.roles.context),
        ("template", &config.roles.template),
        ("compiled", &config.roles.compiled),
    ];
    for (i, (name_a, set_a)) in role_sets.iter().enumerate() {
        for (name_b, set_b) in role_sets.iter().skip(i + 1) {
            for ext in set_a.iter() {
                let ext = normalize_ext(ext);
                if set_b.iter().any(|e| normalize_ext(e) == ext) {
                    errors.push(ValidationError {
                        message: format!(
                            "extension '{}' appears in both '{}' and '{}' role sets",
                            ext, name_a, name_b
                        ),
                    });
                }
            }
        }
    }

    if config.renderer.strategy == Strategy::External && config.renderer.command.is_empty() {
        errors.push(ValidationError {
            message: "renderer strategy is external but no command is set".to_string(),
        });
    }

    if let Some(ref build) = config.build {
        if build.command.is_empty() {
            errors.push(ValidationError {
                message: "build.command must not be empty".to_string(),
            });
        }
    }

    errors
}
