//! Subprocess execution helper for the external collaborators
//! (git, pandoc).

use std::process::{Command, Output};

use tracing::debug;

use wikimill_shared::{Result, WikimillError};

/// Run a command to completion, capturing output. Non-zero exit becomes
/// a [`WikimillError::Subprocess`] carrying the trimmed stderr.
pub(crate) fn run(command: &mut Command) -> Result<Output> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(command = %program, "running external command");

    let output = command
        .output()
        .map_err(|e| WikimillError::subprocess(&program, format!("failed to spawn: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WikimillError::subprocess(
            &program,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(output)
}
