//! Wiki checkout synchronization.
//!
//! Clone-if-absent, pull-if-present, tracking the upstream mainline.
//! The pipeline only requires that the resulting tree match the
//! source-tree layout; all version-control semantics stay in git.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use wikimill_shared::Result;

use crate::exec;

/// Upstream wiki repository.
pub const DEFAULT_REMOTE: &str = "https://github.com/libsdl-org/sdlwiki";

/// Branch tracked on pull.
const MAINLINE_BRANCH: &str = "main";

/// Make the wiki checkout at `repo_root` available and up to date.
pub fn sync(repo_root: &Path, remote: &str) -> Result<()> {
    if repo_root.exists() {
        debug!(path = %repo_root.display(), "checkout exists, pulling latest changes");
        exec::run(
            Command::new("git")
                .arg("-C")
                .arg(repo_root)
                .args(["pull", "origin", MAINLINE_BRANCH]),
        )?;
    } else {
        debug!(path = %repo_root.display(), remote, "cloning wiki repository");
        exec::run(Command::new("git").arg("clone").arg(remote).arg(repo_root))?;
    }

    info!(path = %repo_root.display(), "wiki checkout is up to date");
    Ok(())
}
