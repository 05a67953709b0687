//! PL-005: Template rendering — strategy dispatch and output path derivation.
//!
//! Two interchangeable strategies honor the same contract: expand one
//! template against the module's context and write the result to the
//! destination derived by stripping the template-marker extension.

pub mod external;
pub mod mustache;

use crate::core::types::{PipelineError, RendererConfig, Strategy};
use serde_yaml_ng::Value;
use std::path::{Path, PathBuf};

/// Runtime rendering strategy, resolved from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Substitute markers with the built-in engine.
    InProcess,
    /// Pipe contexts into an external renderer process.
    External { command: String },
}

impl RenderStrategy {
    pub fn from_config(cfg: &RendererConfig) -> Self {
        match cfg.strategy {
            Strategy::InProcess => Self::InProcess,
            Strategy::External => Self::External {
                command: cfg.command.clone(),
            },
        }
    }
}

/// Derive the rendered output path by stripping the template-marker
/// extension: `name.pyx.tpl` → `name.pyx`, `name.tpl` → `name`.
pub fn rendered_path(template: &Path) -> PathBuf {
    template.with_extension("")
}

/// Render one template to `dest`.
///
/// `active` is the first merged context record (an empty mapping when the
/// module has no records) and drives the in-process engine. `context_files`
/// are the raw document paths the external strategy pipes to the renderer's
/// stdin; merging is the external tool's job there.
pub fn render(
    strategy: &RenderStrategy,
    template: &Path,
    context_files: &[PathBuf],
    active: &Value,
    dest: &Path,
) -> Result<(), PipelineError> {
    match strategy {
        RenderStrategy::InProcess => mustache::render_file(template, active, dest),
        RenderStrategy::External { command } => {
            external::render_file(command, template, context_files, dest)
        }
    }
}
