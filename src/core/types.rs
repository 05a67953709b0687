//! PL-001: All types from the plantilla manifest schema.
//!
//! Defines the YAML schema for modules, extension roles, renderer selection,
//! and the build handoff command, plus the pipeline error taxonomy. All
//! manifest types derive Serialize/Deserialize for YAML roundtripping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Top-level plantilla.yaml
// ============================================================================

/// Root manifest — the modules to render and hand off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantillaConfig {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Human-readable project name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Native-extension modules (order-preserving)
    pub modules: IndexMap<String, Module>,

    /// Renderer selection
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Extension role sets
    #[serde(default)]
    pub roles: RoleConfig,

    /// Optional build handoff command
    #[serde(default)]
    pub build: Option<BuildConfig>,
}

// ============================================================================
// Modules
// ============================================================================

/// A single native-extension module declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Ordered source list — literal paths or glob patterns
    pub sources: Vec<String>,

    /// Include search paths (static inputs, no platform discovery)
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Library search paths
    #[serde(default)]
    pub library_dirs: Vec<String>,
}

// ============================================================================
// Renderer selection
// ============================================================================

/// Which rendering strategy to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Strategy selector
    #[serde(default)]
    pub strategy: Strategy,

    /// External renderer binary (only used by the external strategy)
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            command: default_command(),
        }
    }
}

fn default_command() -> String {
    "mustache".to_string()
}

/// Rendering strategy kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    InProcess,
    External,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProcess => write!(f, "in_process"),
            Self::External => write!(f, "external"),
        }
    }
}

// ============================================================================
// Extension roles
// ============================================================================

/// Extension role sets driving source classification.
///
/// Extensions are accepted with or without a leading dot ("yml" == ".yml").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Context-document extensions
    #[serde(default = "default_context_exts")]
    pub context: Vec<String>,

    /// Template-marker extensions
    #[serde(default = "default_template_exts")]
    pub template: Vec<String>,

    /// Rendered extensions that re-enter the source list
    #[serde(default = "default_compiled_exts")]
    pub compiled: Vec<String>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            context: default_context_exts(),
            template: default_template_exts(),
            compiled: default_compiled_exts(),
        }
    }
}

fn default_context_exts() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

fn default_template_exts() -> Vec<String> {
    vec!["tpl".to_string()]
}

fn default_compiled_exts() -> Vec<String> {
    vec!["pyx".to_string()]
}

// ============================================================================
// Build handoff
// ============================================================================

/// External build command consuming finalized modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Argument vector (no shell interpolation)
    pub command: Vec<String>,
}

// ============================================================================
// Pipeline errors
// ============================================================================

/// Fatal pipeline error. All variants abort the run on first occurrence.
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// A context document could not be read or parsed.
    Load { path: PathBuf, reason: String },
    /// In-process rendering failed (undefined key, bad marker, write error).
    Render { template: PathBuf, reason: String },
    /// An external process could not be spawned or exited nonzero.
    /// `command` is the exact argument vector attempted, space-joined.
    ExternalCommand { command: String, reason: String },
    /// A source's extension matched more than one role set.
    Ambiguous { path: PathBuf, roles: Vec<String> },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, reason } => {
                write!(f, "cannot load context document {}: {}", path.display(), reason)
            }
            Self::Render { template, reason } => {
                write!(f, "render failed for {}: {}", template.display(), reason)
            }
            Self::ExternalCommand { command, reason } => {
                write!(f, "command `{}` failed: {}", command, reason)
            }
            Self::Ambiguous { path, roles } => {
                write!(
                    f,
                    "ambiguous source {}: extension matches roles {}",
                    path.display(),
                    roles.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}

// ============================================================================
// Template helper
// ============================================================================

/// Convert a scalar serde_yaml_ng::Value to its rendered string form.
/// Returns None for mappings and sequences — the substitution engine
/// rejects those as marker values.
pub fn yaml_scalar_to_string(val: &serde_yaml_ng::Value) -> Option<String> {
    match val {
        serde_yaml_ng::Value::String(s) => Some(s.clone()),
        serde_yaml_ng::Value::Number(n) => Some(n.to_string()),
        serde_yaml_ng::Value::Bool(b) => Some(b.to_string()),
        serde_yaml_ng::Value::Null => Some(String::new()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pl001_config_parse() {
        let yaml = r#"
version: "1.0"
name: pyfst
modules:
  fst._fst:
    sources:
      - fst/_fst.pyx.tpl
      - fst/libfst.pxd.tpl
      - fst/types.yml
    include_dirs: [/opt/local/include]
    library_dirs: [/opt/local/lib]
renderer:
  strategy: external
  command: mustache
build:
  command: [cythonize, --inplace]
"#;
        let config: PlantillaConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, "pyfst");
        assert_eq!(config.modules.len(), 1);
        assert_eq!(config.modules["fst._fst"].sources.len(), 3);
        assert_eq!(config.modules["fst._fst"].include_dirs, vec!["/opt/local/include"]);
        assert_eq!(config.renderer.strategy, Strategy::External);
        assert_eq!(config.build.unwrap().command, vec!["cythonize", "--inplace"]);
    }

    #[test]
    fn test_pl001_renderer_defaults() {
        let cfg = RendererConfig::default();
        assert_eq!(cfg.strategy, Strategy::InProcess);
        assert_eq!(cfg.command, "mustache");
    }

    #[test]
    fn test_pl001_role_defaults() {
        let roles = RoleConfig::default();
        assert_eq!(roles.context, vec!["yml", "yaml"]);
        assert_eq!(roles.template, vec!["tpl"]);
        assert_eq!(roles.compiled, vec!["pyx"]);
    }

    #[test]
    fn test_pl001_minimal_manifest_defaults() {
        let yaml = r#"
version: "1.0"
name: minimal
modules:
  m:
    sources: [a.pyx.tpl, types.yml]
"#;
        let config: PlantillaConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.renderer.strategy, Strategy::InProcess);
        assert_eq!(config.roles.compiled, vec!["pyx"]);
        assert!(config.build.is_none());
        assert!(config.modules["m"].include_dirs.is_empty());
    }

    #[test]
    fn test_pl001_strategy_display() {
        assert_eq!(Strategy::InProcess.to_string(), "in_process");
        assert_eq!(Strategy::External.to_string(), "external");
    }

    #[test]
    fn test_pl001_error_display_load() {
        let e = PipelineError::Load {
            path: PathBuf::from("fst/types.yml"),
            reason: "no such file".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("fst/types.yml"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_pl001_error_display_external() {
        let e = PipelineError::ExternalCommand {
            command: "mustache - t.pyx.tpl".to_string(),
            reason: "exit status 2".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("mustache - t.pyx.tpl"));
        assert!(msg.contains("exit status 2"));
    }

    #[test]
    fn test_pl001_error_display_ambiguous() {
        let e = PipelineError::Ambiguous {
            path: PathBuf::from("x.yml"),
            roles: vec!["context".to_string(), "template".to_string()],
        };
        let msg = e.to_string();
        assert!(msg.contains("x.yml"));
        assert!(msg.contains("context, template"));
    }

    #[test]
    fn test_pl001_yaml_scalar_to_string() {
        assert_eq!(
            yaml_scalar_to_string(&serde_yaml_ng::Value::String("hello".into())),
            Some("hello".to_string())
        );
        assert_eq!(
            yaml_scalar_to_string(&serde_yaml_ng::Value::Bool(true)),
            Some("true".to_string())
        );
        assert_eq!(
            yaml_scalar_to_string(&serde_yaml_ng::Value::Null),
            Some(String::new())
        );
        let num: serde_yaml_ng::Value = serde_yaml_ng::from_str("42").unwrap();
        assert_eq!(yaml_scalar_to_string(&num), Some("42".to_string()));
        let map: serde_yaml_ng::Value = serde_yaml_ng::from_str("a: 1").unwrap();
        assert_eq!(yaml_scalar_to_string(&map), None);
    }

    #[test]
    fn test_pl001_manifest_roundtrip() {
        let yaml = r#"
version: "1.0"
name: roundtrip
modules:
  m:
    sources: [t.pyx.tpl]
roles:
  context: [yml]
  template: [tpl]
  compiled: [pyx]
"#;
        let config: PlantillaConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let out = serde_yaml_ng::to_string(&config).unwrap();
        let config2: PlantillaConfig = serde_yaml_ng::from_str(&out).unwrap();
        assert_eq!(config2.name, "roundtrip");
        assert_eq!(config2.roles.context, vec!["yml"]);
    }
}
