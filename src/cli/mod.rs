//! PL-010: CLI subcommands — init, validate, render, build.

use crate::core::{classify, handoff, parser, rewriter, types};
use crate::render::{self, RenderStrategy};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a starter plantilla.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate plantilla.yaml without rendering
    Validate {
        /// Path to plantilla.yaml
        #[arg(short, long, default_value = "plantilla.yaml")]
        file: PathBuf,
    },

    /// Render templates and rewrite module source lists
    Render {
        /// Path to plantilla.yaml
        #[arg(short, long, default_value = "plantilla.yaml")]
        file: PathBuf,

        /// Target specific module
        #[arg(short, long)]
        module: Option<String>,

        /// Classify and report without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Render, then hand finalized modules to the build command
    Build {
        /// Path to plantilla.yaml
        #[arg(short, long, default_value = "plantilla.yaml")]
        file: PathBuf,

        /// Target specific module
        #[arg(short, long)]
        module: Option<String>,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Render {
            file,
            module,
            dry_run,
        } => cmd_render(&file, module.as_deref(), dry_run),
        Commands::Build { file, module } => cmd_build(&file, module.as_deref()),
    }
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let config_path = path.join("plantilla.yaml");
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }

    std::fs::create_dir_all(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;

    let template = r#"version: "1.0"
name: my-extension
description: "Rendered by plantilla"

modules:
  my._ext:
    sources:
      - src/_ext.pyx.tpl
      - src/types.yml
    include_dirs: []
    library_dirs: []

renderer:
  strategy: in_process

roles:
  context: [yml, yaml]
  template: [tpl]
  compiled: [pyx]
"#;
    std::fs::write(&config_path, template)
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))?;

    println!("Initialized plantilla project at {}", path.display());
    println!("  Created: {}", config_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let config = parser::parse_config_file(file)?;
    let errors = parser::validate_config(&config);

    if errors.is_empty() {
        println!(
            "OK: {} ({} modules, {} strategy)",
            config.name,
            config.modules.len(),
            config.renderer.strategy
        );
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}

fn cmd_render(file: &Path, module_filter: Option<&str>, dry_run: bool) -> Result<(), String> {
    let mut config = load_filtered(file, module_filter)?;
    let strategy = RenderStrategy::from_config(&config.renderer);

    if dry_run {
        return print_classification(&config);
    }

    let outcomes = rewriter::rewrite_all(&mut config, &strategy)?;
    for (name, outcome) in &outcomes {
        println!("{}:", name);
        for path in &outcome.listed {
            println!("  rendered {}", path.display());
        }
        for path in &outcome.inert {
            println!("  rendered {} (not listed)", path.display());
        }
        println!("  sources: {}", config.modules[name].sources.join(" "));
    }
    Ok(())
}

fn cmd_build(file: &Path, module_filter: Option<&str>) -> Result<(), String> {
    let mut config = load_filtered(file, module_filter)?;
    let build = config
        .build
        .clone()
        .ok_or_else(|| "manifest has no build section".to_string())?;

    let strategy = RenderStrategy::from_config(&config.renderer);
    rewriter::rewrite_all(&mut config, &strategy)?;

    for (name, module) in &config.modules {
        println!("Building {} ({} sources)", name, module.sources.len());
        handoff::run_build(&build, module).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Parse and validate a manifest, then narrow it to one module if requested.
fn load_filtered(
    file: &Path,
    module_filter: Option<&str>,
) -> Result<types::PlantillaConfig, String> {
    let mut config = parse_and_validate(file)?;
    if let Some(filter) = module_filter {
        if !config.modules.contains_key(filter) {
            return Err(format!("unknown module '{}'", filter));
        }
        config.modules.retain(|name, _| name.as_str() == filter);
    }
    Ok(config)
}

/// Parse and validate a plantilla manifest, returning errors if invalid.
fn parse_and_validate(file: &Path) -> Result<types::PlantillaConfig, String> {
    let config = parser::parse_config_file(file)?;
    let errors = parser::validate_config(&config);
    if errors.is_empty() {
        return Ok(config);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err("validation failed".to_string())
}

/// Report each module's classification without touching the filesystem.
fn print_classification(config: &types::PlantillaConfig) -> Result<(), String> {
    for (name, module) in &config.modules {
        let expanded = classify::expand_sources(&module.sources)?;
        let classified =
            classify::classify(&expanded, &config.roles).map_err(|e| e.to_string())?;

        println!("{}:", name);
        for t in &classified.templates {
            println!(
                "  template    {} -> {}",
                t.display(),
                render::rendered_path(t).display()
            );
        }
        for c in &classified.contexts {
            println!("  context     {}", c.display());
        }
        for p in &classified.passthrough {
            println!("  passthrough {}", p.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("t.pyx.tpl"), "value={{x}}").unwrap();
        std::fs::write(dir.join("types.yml"), "x: 42\n").unwrap();
        std::fs::write(dir.join("helper.c"), "").unwrap();
        let manifest = dir.join("plantilla.yaml");
        std::fs::write(
            &manifest,
            format!(
                r#"
version: "1.0"
name: cli-test
modules:
  m:
    sources: ["{t}", "{c}", "{h}"]
"#,
                t = dir.join("t.pyx.tpl").display(),
                c = dir.join("types.yml").display(),
                h = dir.join("helper.c").display(),
            ),
        )
        .unwrap();
        manifest
    }

    #[test]
    fn test_pl010_init_creates_manifest() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let config = parser::parse_config_file(&dir.path().join("plantilla.yaml")).unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_pl010_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let err = cmd_init(dir.path()).unwrap_err();
        assert!(err.contains("already exists"));
    }

    #[test]
    fn test_pl010_validate_ok() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        cmd_validate(&manifest).unwrap();
    }

    #[test]
    fn test_pl010_validate_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("plantilla.yaml");
        std::fs::write(&manifest, "version: \"2.0\"\nname: \"\"\nmodules: {}\n").unwrap();
        let err = cmd_validate(&manifest).unwrap_err();
        assert!(err.contains("validation error"));
    }

    #[test]
    fn test_pl010_render_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        cmd_render(&manifest, None, false).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("t.pyx")).unwrap(),
            "value=42"
        );
    }

    #[test]
    fn test_pl010_render_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        cmd_render(&manifest, None, true).unwrap();
        assert!(!dir.path().join("t.pyx").exists());
    }

    #[test]
    fn test_pl010_unknown_module_filter() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        let err = cmd_render(&manifest, Some("ghost"), false).unwrap_err();
        assert!(err.contains("unknown module 'ghost'"));
    }

    #[test]
    fn test_pl010_build_requires_build_section() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        let err = cmd_build(&manifest, None).unwrap_err();
        assert!(err.contains("no build section"));
    }

    #[test]
    fn test_pl010_build_hands_off() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.pyx.tpl"), "value={{x}}").unwrap();
        std::fs::write(dir.path().join("types.yml"), "x: 42\n").unwrap();
        let manifest = dir.path().join("plantilla.yaml");
        std::fs::write(
            &manifest,
            format!(
                r#"
version: "1.0"
name: build-test
modules:
  m:
    sources: ["{t}", "{c}"]
build:
  command: ["true"]
"#,
                t = dir.path().join("t.pyx.tpl").display(),
                c = dir.path().join("types.yml").display(),
            ),
        )
        .unwrap();
        cmd_build(&manifest, None).unwrap();
        assert!(dir.path().join("t.pyx").exists());
    }
}
