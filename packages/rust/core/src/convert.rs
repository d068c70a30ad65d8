//! Parallel conversion of source files into the IR tree.
//!
//! Discovery walks every source tree into one flat work list; one task
//! per file runs under a semaphore-bounded pool. Conversion order is
//! unspecified and irrelevant: no two workers ever target the same IR
//! path (the SourceFile→IRFile mapping is a bijection on relative
//! path), and the downstream concatenation imposes its own total order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use wikimill_markdown::{HtmlConverter, canonicalize};
use wikimill_shared::{Result, SourceTree, WikimillError};

use crate::pipeline::ProgressReporter;
use crate::plan::PathPlan;

/// Minimum worker count when CPU detection fails.
const MIN_WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Work items and outcomes
// ---------------------------------------------------------------------------

/// One discovered file under a source tree.
#[derive(Debug, Clone)]
pub struct SourceFileEntry {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Path relative to the wiki checkout (module name included), used
    /// to re-root the file under the IR tree.
    pub relative: PathBuf,
}

/// Per-file conversion outcome. Used only for aggregate counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The IR file was written.
    Written,
    /// Unsupported extension, nothing written.
    Skipped,
}

/// Aggregate counts for a parallel batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub written: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Resolve the worker pool size: an explicit non-zero setting wins,
/// otherwise the number of available processing units, falling back to
/// a sane minimum if that cannot be determined.
pub fn worker_count(configured: usize) -> usize {
    if configured > 0 {
        return configured;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_WORKERS)
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Recursively collect every file (any extension) under the given
/// source trees into one flat work list. Discovery order carries no
/// meaning; the list only needs to be complete.
pub fn discover_files(trees: &[SourceTree]) -> Vec<SourceFileEntry> {
    let mut files = Vec::new();

    for tree in trees {
        if !tree.root.is_dir() {
            warn!(tree = %tree.name, root = %tree.root.display(), "source tree missing, skipping");
            continue;
        }

        for entry in WalkDir::new(&tree.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(tree = %tree.name, error = %e, "walk error, skipping entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&tree.root)
                .expect("walked path is under its tree root")
                .to_path_buf();

            files.push(SourceFileEntry {
                path: entry.path().to_path_buf(),
                relative: Path::new(&tree.name).join(relative),
            });
        }
    }

    files
}

// ---------------------------------------------------------------------------
// Per-file worker
// ---------------------------------------------------------------------------

/// Convert one source file into its IR file.
///
/// The IR path is the source's relative path re-rooted under `ir_root`
/// with the extension forced to `.md`. The write fully replaces any
/// prior content. Every error is returned to the aggregation point and
/// counted there; a single file's failure never aborts the batch.
pub fn process_file(
    entry: &SourceFileEntry,
    ir_root: &Path,
    converter: &dyn HtmlConverter,
) -> Result<ConversionOutcome> {
    let extension = entry.path.extension().and_then(|e| e.to_str());

    let raw = match extension {
        Some("html") => converter.convert(&entry.path)?,
        Some("md") => std::fs::read_to_string(&entry.path)
            .map_err(|e| WikimillError::io(&entry.path, e))?,
        _ => {
            debug!(file = %entry.path.display(), "unsupported extension, skipping");
            return Ok(ConversionOutcome::Skipped);
        }
    };

    let target = ir_root.join(&entry.relative).with_extension("md");
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WikimillError::io(parent, e))?;
    }

    let content = format!("{}\n", canonicalize(&raw));
    std::fs::write(&target, content).map_err(|e| WikimillError::io(&target, e))?;

    debug!(
        source = %entry.path.display(),
        target = %target.display(),
        "wrote IR file"
    );
    Ok(ConversionOutcome::Written)
}

// ---------------------------------------------------------------------------
// Parallel dispatch
// ---------------------------------------------------------------------------

/// Convert every discovered source file, `jobs` files at a time.
///
/// Waits for every task before returning. Counts are aggregated only at
/// the single-threaded join point; worker errors (including panics) are
/// counted as failed and logged with the source path, never propagated.
pub async fn convert_all(
    plan: &PathPlan,
    converter: Arc<dyn HtmlConverter>,
    jobs: usize,
    progress: &dyn ProgressReporter,
) -> Result<BatchStats> {
    let files = discover_files(&plan.source_trees());
    let total = files.len();
    let ir_root = plan.ir_root()?;

    info!(files = total, jobs, "starting parallel conversion");

    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(total);

    for entry in files {
        let semaphore = semaphore.clone();
        let converter = converter.clone();
        let ir_root = ir_root.clone();
        let source_path = entry.path.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let outcome =
                tokio::task::spawn_blocking(move || process_file(&entry, &ir_root, converter.as_ref()))
                    .await
                    .unwrap_or_else(|e| {
                        Err(WikimillError::Conversion(format!("worker panicked: {e}")))
                    });
            (source_path, outcome)
        }));
    }

    let mut stats = BatchStats::default();
    let mut current = 0usize;

    for handle in handles {
        current += 1;
        match handle.await {
            Ok((path, Ok(ConversionOutcome::Written))) => {
                stats.written += 1;
                progress.file_converted(&path.display().to_string(), current, total);
            }
            Ok((path, Ok(ConversionOutcome::Skipped))) => {
                stats.skipped += 1;
                debug!(file = %path.display(), "skipped unsupported file");
            }
            Ok((path, Err(e))) => {
                stats.failed += 1;
                warn!(file = %path.display(), error = %e, "conversion failed");
            }
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, "conversion task aborted");
            }
        }
    }

    info!(
        written = stats.written,
        failed = stats.failed,
        skipped = stats.skipped,
        "conversion completed"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_prefers_explicit_setting() {
        assert_eq!(worker_count(2), 2);
        assert!(worker_count(0) >= 1);
    }

    #[test]
    fn discovery_skips_missing_trees() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let trees = vec![SourceTree {
            name: "SDL2".into(),
            root: tmp.path().join("SDL2"),
        }];
        assert!(discover_files(&trees).is_empty());
    }

    #[test]
    fn discovery_collects_all_files_with_module_relative_paths() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("SDL2");
        std::fs::create_dir_all(root.join("api")).expect("mkdir");
        std::fs::write(root.join("README.md"), "a").expect("write");
        std::fs::write(root.join("api/Init.html"), "b").expect("write");
        std::fs::write(root.join("CNAME"), "c").expect("write");

        let trees = vec![SourceTree {
            name: "SDL2".into(),
            root,
        }];
        let mut relatives: Vec<_> = discover_files(&trees)
            .into_iter()
            .map(|f| f.relative)
            .collect();
        relatives.sort();

        assert_eq!(
            relatives,
            vec![
                PathBuf::from("SDL2/CNAME"),
                PathBuf::from("SDL2/README.md"),
                PathBuf::from("SDL2/api/Init.html"),
            ]
        );
    }

    #[test]
    fn process_file_rewrites_and_appends_newline() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let source = tmp.path().join("Quote.md");
        std::fs::write(&source, "Hello \u{201C}world\u{201D}\n").expect("write");

        let entry = SourceFileEntry {
            path: source,
            relative: PathBuf::from("SDL2/Quote.md"),
        };
        let ir_root = tmp.path().join("ir");
        let outcome = process_file(&entry, &ir_root, &wikimill_markdown::Html2TextConverter)
            .expect("process");

        assert_eq!(outcome, ConversionOutcome::Written);
        let written = std::fs::read_to_string(ir_root.join("SDL2/Quote.md")).expect("read");
        assert_eq!(written, "Hello \"world\"\n");
    }

    #[test]
    fn process_file_skips_unsupported_extension() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let source = tmp.path().join("CNAME");
        std::fs::write(&source, "wiki.libsdl.org").expect("write");

        let entry = SourceFileEntry {
            path: source,
            relative: PathBuf::from("SDL2/CNAME"),
        };
        let outcome = process_file(
            &entry,
            &tmp.path().join("ir"),
            &wikimill_markdown::Html2TextConverter,
        )
        .expect("process");

        assert_eq!(outcome, ConversionOutcome::Skipped);
        assert!(!tmp.path().join("ir").exists());
    }

    #[test]
    fn process_file_overwrites_previous_content() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let source = tmp.path().join("Page.md");
        let entry = SourceFileEntry {
            path: source.clone(),
            relative: PathBuf::from("SDL2/Page.md"),
        };
        let ir_root = tmp.path().join("ir");

        std::fs::write(&source, "first").expect("write");
        process_file(&entry, &ir_root, &wikimill_markdown::Html2TextConverter).expect("process");
        std::fs::write(&source, "second").expect("write");
        process_file(&entry, &ir_root, &wikimill_markdown::Html2TextConverter).expect("process");

        let written = std::fs::read_to_string(ir_root.join("SDL2/Page.md")).expect("read");
        assert_eq!(written, "second\n");
    }
}
