//! PL-007: External-process renderer.
//!
//! Spawns `<command> - <template>` directly as an argument vector (no shell,
//! so paths with metacharacters need no quoting), pipes the raw bytes of all
//! context documents to the renderer's stdin in order, and writes captured
//! stdout to the destination only on a zero exit. Blocks until the process
//! terminates; there is no timeout.

use crate::core::types::PipelineError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Render one template through the external renderer.
pub fn render_file(
    command: &str,
    template: &Path,
    context_files: &[PathBuf],
    dest: &Path,
) -> Result<(), PipelineError> {
    let cmdline = format!("{} - {}", command, template.display());

    // Raw byte concatenation, cat-style. Document merging is the
    // external tool's job.
    let mut stdin_bytes = Vec::new();
    for path in context_files {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Load {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        stdin_bytes.extend_from_slice(&bytes);
    }

    let mut child = Command::new(command)
        .arg("-")
        .arg(template)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| PipelineError::ExternalCommand {
            command: cmdline.clone(),
            reason: format!("failed to spawn: {}", e),
        })?;

    if let Some(ref mut stdin) = child.stdin {
        stdin
            .write_all(&stdin_bytes)
            .map_err(|e| PipelineError::ExternalCommand {
                command: cmdline.clone(),
                reason: format!("stdin write error: {}", e),
            })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| PipelineError::ExternalCommand {
            command: cmdline.clone(),
            reason: format!("wait error: {}", e),
        })?;

    if !output.status.success() {
        return Err(PipelineError::ExternalCommand {
            command: cmdline,
            reason: format!(
                "exit status {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    std::fs::write(dest, &output.stdout).map_err(|e| PipelineError::Render {
        template: template.to_path_buf(),
        reason: format!("cannot write {}: {}", dest.display(), e),
    })
}
