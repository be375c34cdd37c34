// frbhost-core/src/infrastructure/adapters/process.rs

use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

use crate::infrastructure::error::InfrastructureError;

fn failed(command: &str, reason: impl Into<String>) -> InfrastructureError {
    InfrastructureError::CommandFailed {
        command: command.to_string(),
        reason: reason.into(),
    }
}

/// Run `command_line` (program plus leading arguments, whitespace separated)
/// followed by `args`. A non-zero exit status is an error carrying stderr.
pub fn run_tool(
    command_line: &str,
    args: &[String],
    cwd: Option<&Path>,
) -> Result<Output, InfrastructureError> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| failed(command_line, "empty command"))?;

    let mut cmd = Command::new(program);
    cmd.args(parts).args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    debug!(command = command_line, ?args, ?cwd, "Spawning external tool");

    let output = cmd
        .output()
        .map_err(|e| failed(command_line, format!("cannot start: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failed(
            command_line,
            format!(
                "exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        ));
    }
    Ok(output)
}
