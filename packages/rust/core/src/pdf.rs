//! PDF rendering of the combined document.
//!
//! Pandoc consumes the combined Markdown in one pass; paging depends on
//! the document's order, so this stage is deliberately single-threaded.

use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use wikimill_shared::{Result, WikimillError};

use crate::exec;
use crate::plan::PathPlan;

/// Fixed presentation flags handed to pandoc. Rendering correctness
/// beyond these is the backend's responsibility.
const PANDOC_FLAGS: [&str; 19] = [
    "--pdf-engine=xelatex",
    "--from",
    "markdown-raw_tex",
    "--strip-comments",
    "--wrap=preserve",
    "-V",
    "geometry:margin=0.5in",
    "-V",
    "geometry:a4paper",
    "-V",
    "mainfont=Noto Sans Mono",
    "-V",
    "fontsize=10pt",
    "-V",
    "linestretch=1.2",
    "-V",
    "colorlinks=true",
    "-V",
    "linkcolor=blue",
];

/// Render the combined document to PDF. The combined document must
/// already exist; a missing input is an aggregation failure rather than
/// a pandoc error.
pub fn render(plan: &PathPlan) -> Result<PathBuf> {
    let input = plan.combined_path()?;
    if !input.is_file() {
        return Err(WikimillError::aggregation(format!(
            "combined document {} missing, run text conversion first",
            input.display()
        )));
    }
    let output = plan.pdf_path()?;

    info!(input = %input.display(), output = %output.display(), "rendering PDF");

    let mut command = Command::new("pandoc");
    command.arg(&input).arg("-o").arg(&output).args(PANDOC_FLAGS);
    exec::run(&mut command)?;

    info!(path = %output.display(), "PDF written");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikimill_shared::CorpusVersion;

    #[test]
    fn missing_combined_document_is_an_aggregation_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);

        let err = render(&plan).unwrap_err();
        assert!(matches!(err, WikimillError::Aggregation { .. }));
    }
}
