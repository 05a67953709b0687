//! PL-009: Build handoff — the external native-extension build step.
//!
//! Consumes a finalized module and spawns the configured build command as a
//! direct argument vector. Only the exit status is consumed; stdio is
//! inherited so compiler diagnostics reach the user untouched.

use super::types::{BuildConfig, Module, PipelineError};
use std::process::Command;

/// Invoke the build command for one finalized module.
///
/// Command line shape: `<command...> -I<dir>... -L<dir>... <sources...>`.
pub fn run_build(build: &BuildConfig, module: &Module) -> Result<(), PipelineError> {
    if build.command.is_empty() {
        return Err(PipelineError::ExternalCommand {
            command: String::new(),
            reason: "empty build command".to_string(),
        });
    }

    let mut argv: Vec<String> = build.command.clone();
    for dir in &module.include_dirs {
        argv.push(format!("-I{}", dir));
    }
    for dir in &module.library_dirs {
        argv.push(format!("-L{}", dir));
    }
    argv.extend(module.sources.iter().cloned());

    let cmdline = argv.join(" ");
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .map_err(|e| PipelineError::ExternalCommand {
            command: cmdline.clone(),
            reason: format!("failed to spawn: {}", e),
        })?;

    if !status.success() {
        return Err(PipelineError::ExternalCommand {
            command: cmdline,
            reason: format!("exit status {}", status.code().unwrap_or(-1)),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_with(sources: Vec<&str>) -> Module {
        Module {
            sources: sources.into_iter().map(String::from).collect(),
            include_dirs: vec![],
            library_dirs: vec![],
        }
    }

    #[test]
    fn test_pl009_zero_exit_succeeds() {
        let build = BuildConfig {
            command: vec!["true".to_string()],
        };
        run_build(&build, &module_with(vec!["a.pyx"])).unwrap();
    }

    #[test]
    fn test_pl009_nonzero_exit_carries_command_line() {
        let build = BuildConfig {
            command: vec!["false".to_string()],
        };
        let err = run_build(&build, &module_with(vec!["a.pyx"])).unwrap_err();
        match err {
            PipelineError::ExternalCommand { command, reason } => {
                assert_eq!(command, "false a.pyx");
                assert!(reason.contains("exit status 1"));
            }
            other => panic!("expected ExternalCommand, got {}", other),
        }
    }

    #[test]
    fn test_pl009_missing_binary() {
        let build = BuildConfig {
            command: vec!["plantilla-no-such-compiler".to_string()],
        };
        let err = run_build(&build, &module_with(vec![])).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pl009_argv_composition() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("argv.txt");
        // bash -c forwards everything after argv0 as "$@"
        let build = BuildConfig {
            command: vec![
                "bash".to_string(),
                "-c".to_string(),
                format!("printf '%s\\n' \"$@\" > {}", out.display()),
                "handoff".to_string(),
            ],
        };
        let module = Module {
            sources: vec!["fst/_fst.pyx".to_string(), "helper.c".to_string()],
            include_dirs: vec!["/opt/local/include".to_string()],
            library_dirs: vec!["/opt/local/lib".to_string()],
        };
        run_build(&build, &module).unwrap();

        let recorded = std::fs::read_to_string(&out).unwrap();
        let args: Vec<&str> = recorded.lines().collect();
        assert_eq!(
            args,
            vec![
                "-I/opt/local/include",
                "-L/opt/local/lib",
                "fst/_fst.pyx",
                "helper.c",
            ]
        );
    }
}
