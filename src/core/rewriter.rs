//! PL-008: Module rewriting — the orchestration loop.
//!
//! For each module: expand globs → classify sources → load contexts once →
//! render every template sequentially → replace the source list with
//! passthrough sources plus rendered artifacts whose extension is in the
//! compiled allow-list. The list replacement is the last step, so any
//! earlier failure leaves the module untouched.

use super::classify;
use super::context;
use super::types::{Module, PlantillaConfig, RoleConfig};
use crate::render::{self, RenderStrategy};
use indexmap::IndexMap;
use serde_yaml_ng::Value;
use std::path::PathBuf;

/// Outcome of rewriting one module.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Every artifact written to disk, in template order
    pub rendered: Vec<PathBuf>,
    /// Rendered artifacts that re-entered the source list
    pub listed: Vec<PathBuf>,
    /// Artifacts written but not listed (declaration files the compiler
    /// toolchain picks up implicitly)
    pub inert: Vec<PathBuf>,
}

/// Rewrite a single module in place.
///
/// The final source list is passthrough sources in declaration order,
/// followed by qualifying rendered artifacts in template order. Context
/// documents and raw template paths never survive into it.
pub fn rewrite_module(
    module: &mut Module,
    roles: &RoleConfig,
    strategy: &RenderStrategy,
) -> Result<RewriteOutcome, String> {
    let expanded = classify::expand_sources(&module.sources)?;
    let classified = classify::classify(&expanded, roles).map_err(|e| e.to_string())?;

    // Load once per module. Only the first record drives rendering; the
    // external strategy hands the raw files to the renderer instead.
    let active = match strategy {
        RenderStrategy::InProcess => {
            let records =
                context::load_contexts(&classified.contexts).map_err(|e| e.to_string())?;
            records
                .into_iter()
                .next()
                .unwrap_or_else(|| Value::Mapping(Default::default()))
        }
        RenderStrategy::External { .. } => Value::Mapping(Default::default()),
    };

    let mut outcome = RewriteOutcome {
        rendered: Vec::new(),
        listed: Vec::new(),
        inert: Vec::new(),
    };

    for template in &classified.templates {
        let dest = render::rendered_path(template);
        render::render(strategy, template, &classified.contexts, &active, &dest)
            .map_err(|e| e.to_string())?;

        let ext = dest.extension().and_then(|e| e.to_str()).unwrap_or("");
        outcome.rendered.push(dest.clone());
        if classify::matches_role(&roles.compiled, ext) {
            outcome.listed.push(dest);
        } else {
            outcome.inert.push(dest);
        }
    }

    let mut new_sources: Vec<String> = classified
        .passthrough
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    new_sources.extend(outcome.listed.iter().map(|p| p.display().to_string()));
    module.sources = new_sources;

    Ok(outcome)
}

/// Rewrite every module, strictly sequentially, in manifest order.
/// The first error aborts the run; already-rewritten modules keep their
/// new source lists, but nothing is handed off after a failure.
pub fn rewrite_all(
    config: &mut PlantillaConfig,
    strategy: &RenderStrategy,
) -> Result<IndexMap<String, RewriteOutcome>, String> {
    let mut outcomes = IndexMap::new();
    for (name, module) in &mut config.modules {
        let outcome = rewrite_module(module, &config.roles, strategy)
            .map_err(|e| format!("module '{}': {}", name, e))?;
        outcomes.insert(name.clone(), outcome);
    }
    Ok(outcomes)
}
