//! External tool discovery.
//!
//! Every run depends on external collaborators; a missing one is fatal
//! before any conversion work starts, with the tool named in the error.

use tracing::debug;

use wikimill_shared::{OutputKind, Result, WikimillError};

/// Tools a run of the given kind shells out to. `git` is only needed
/// when the checkout is being synced.
pub fn required_tools(kind: OutputKind, sync: bool) -> Vec<&'static str> {
    let mut tools = Vec::new();
    if sync {
        tools.push("git");
    }
    tools.push(wikimill_markdown::HTML2TEXT_BIN);
    match kind {
        OutputKind::Text => {}
        OutputKind::Man => tools.push("pandoc"),
        OutputKind::Pdf => {
            tools.push("pandoc");
            tools.push("xelatex");
        }
    }
    tools
}

/// Verify that every required tool resolves on `PATH`.
pub fn check(kind: OutputKind, sync: bool) -> Result<()> {
    for tool in required_tools(kind, sync) {
        which::which(tool).map_err(|_| WikimillError::Prerequisite { tool: tool.into() })?;
        debug!(tool, "prerequisite found");
    }
    Ok(())
}
