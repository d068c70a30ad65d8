//! Deterministic concatenation of the IR tree.
//!
//! Conversion runs out of order; this stage bridges that to an ordered
//! output. Files are taken per IR tree in source-tree list order, and
//! within each tree sorted by full relative path, so the combined
//! document is byte-identical across runs for a fixed IR tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use wikimill_shared::{Result, WikimillError};

use crate::plan::PathPlan;

/// Concatenate every IR file into the combined document, fully
/// replacing any previous one. Returns the combined document path.
///
/// An unreadable IR file or an entirely empty IR tree is an aggregation
/// failure; the combined document is never written partially.
pub fn concatenate(plan: &PathPlan) -> Result<PathBuf> {
    let output_path = plan.combined_path()?;
    let mut body = String::new();
    let mut file_count = 0usize;

    for tree in plan.ir_trees()? {
        for file in sorted_markdown_files(&tree.root) {
            let content = std::fs::read_to_string(&file).map_err(|e| {
                WikimillError::aggregation(format!(
                    "cannot read IR file {}: {e}",
                    file.display()
                ))
            })?;
            debug!(file = %file.display(), "appending to combined document");
            body.push_str(&content);
            body.push('\n');
            file_count += 1;
        }
    }

    if file_count == 0 {
        return Err(WikimillError::aggregation(
            "IR tree is empty, nothing to concatenate (run conversion first)",
        ));
    }

    std::fs::write(&output_path, body).map_err(|e| WikimillError::io(&output_path, e))?;

    info!(
        files = file_count,
        path = %output_path.display(),
        "combined Markdown written"
    );
    Ok(output_path)
}

/// Enumerate `.md` files under one IR tree, sorted lexicographically by
/// their full relative path. Walk order never leaks into the output.
pub(crate) fn sorted_markdown_files(tree_root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(tree_root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some("md")
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort_by(|a, b| {
        let a_rel = a.strip_prefix(tree_root).unwrap_or(a);
        let b_rel = b.strip_prefix(tree_root).unwrap_or(b);
        a_rel.cmp(b_rel)
    });
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikimill_shared::CorpusVersion;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }

    #[test]
    fn orders_trees_then_relative_paths() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);
        let ir = plan.ir_root().expect("ir root");

        // Deliberately created out of order.
        write(&ir.join("SDL2_image/b.md"), "image-b");
        write(&ir.join("SDL2/b.md"), "core-b");
        write(&ir.join("SDL2/a.md"), "core-a");
        write(&ir.join("SDL2_image/a.md"), "image-a");

        let combined = concatenate(&plan).expect("concatenate");
        let content = std::fs::read_to_string(combined).expect("read");
        assert_eq!(content, "core-a\ncore-b\nimage-a\nimage-b\n");
    }

    #[test]
    fn sorts_by_full_relative_path_within_a_tree() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);
        let ir = plan.ir_root().expect("ir root");

        write(&ir.join("SDL2/api/z.md"), "z");
        write(&ir.join("SDL2/guide/a.md"), "a");
        write(&ir.join("SDL2/README.md"), "readme");

        let combined = concatenate(&plan).expect("concatenate");
        let content = std::fs::read_to_string(combined).expect("read");
        assert_eq!(content, "readme\nz\na\n");
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);
        let ir = plan.ir_root().expect("ir root");
        write(&ir.join("SDL2/x.md"), "x-content");
        write(&ir.join("SDL2_ttf/y.md"), "y-content");

        let first = std::fs::read(concatenate(&plan).expect("first run")).expect("read");
        let second = std::fs::read(concatenate(&plan).expect("second run")).expect("read");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_ir_tree_is_an_aggregation_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);

        let err = concatenate(&plan).unwrap_err();
        assert!(matches!(err, WikimillError::Aggregation { .. }));
    }

    #[test]
    fn ignores_non_markdown_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("repo"), tmp.path(), CorpusVersion::V2);
        let ir = plan.ir_root().expect("ir root");
        write(&ir.join("SDL2/page.md"), "page");
        write(&ir.join("SDL2/notes.txt"), "ignored");

        let combined = concatenate(&plan).expect("concatenate");
        let content = std::fs::read_to_string(combined).expect("read");
        assert_eq!(content, "page\n");
    }
}
