//! Man page generation from the IR tree.
//!
//! Each IR file becomes one gzip-compressed section-3 page via pandoc.
//! The only content inspection done here is metadata extraction from
//! the page's first heading; rendering correctness is pandoc's
//! responsibility.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use wikimill_shared::{Result, WikimillError};

use crate::concat::sorted_markdown_files;
use crate::convert::BatchStats;
use crate::exec;
use crate::pipeline::ProgressReporter;
use crate::plan::PathPlan;

/// Manual section for every generated page.
pub const MAN_SECTION: &str = "3";
/// `source` metadata field passed to pandoc.
pub const MAN_SOURCE: &str = "SDL Wiki";
/// `manual` metadata field passed to pandoc.
pub const MAN_MANUAL: &str = "SDL Library Manual";

// ---------------------------------------------------------------------------
// Metadata extraction
// ---------------------------------------------------------------------------

/// Per-page metadata derived from one IR file, computed on demand and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Remainder of the first `# ` heading line, trimmed. `None` when
    /// the page has no first-level heading; not an error; generation
    /// substitutes the file stem and warns.
    pub title: Option<String>,
    /// First non-empty line after the heading.
    pub description: Option<String>,
}

/// Extract [`PageMetadata`] from one IR file.
///
/// Failing to read an IR file here means the tree the caller enumerated
/// is incomplete, which is an aggregation failure.
pub fn extract_metadata(ir_file: &Path) -> Result<PageMetadata> {
    let content = std::fs::read_to_string(ir_file).map_err(|e| {
        WikimillError::aggregation(format!("cannot read IR file {}: {e}", ir_file.display()))
    })?;

    let mut title = None;
    let mut description = None;

    for line in content.lines() {
        if title.is_none() {
            if let Some(rest) = line.strip_prefix("# ") {
                title = Some(rest.trim().to_string());
            }
            continue;
        }
        if !line.trim().is_empty() {
            description = Some(line.trim().to_string());
            break;
        }
    }

    Ok(PageMetadata { title, description })
}

// ---------------------------------------------------------------------------
// Page generation
// ---------------------------------------------------------------------------

/// Assign an output page name to every IR file.
///
/// Names default to the file stem. When the same stem appears in more
/// than one entry (`README.md` in two module trees, say), every holder
/// of that stem is prefixed with its tree name so no page silently
/// overwrites another. Residual collisions are warned about.
fn assign_page_names(files: &[(String, PathBuf)]) -> Vec<String> {
    let stems: Vec<String> = files
        .iter()
        .map(|(_, path)| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let names: Vec<String> = stems
        .iter()
        .zip(files)
        .map(|(stem, (tree, _))| {
            if counts[stem.as_str()] > 1 {
                format!("{tree}-{stem}")
            } else {
                stem.clone()
            }
        })
        .collect();

    let mut seen = HashSet::new();
    for (name, (_, path)) in names.iter().zip(files) {
        if !seen.insert(name.as_str()) {
            warn!(file = %path.display(), page = %name, "man page name collision");
        }
    }
    names
}

/// Gzip-compress a generated page to `<page>.gz`, removing the
/// uncompressed file. Returns the compressed path.
fn compress_page(man_file: &Path) -> Result<PathBuf> {
    let compressed = PathBuf::from(format!("{}.gz", man_file.display()));

    let mut source = File::open(man_file).map_err(|e| WikimillError::io(man_file, e))?;
    let target = File::create(&compressed).map_err(|e| WikimillError::io(&compressed, e))?;
    let mut encoder = GzEncoder::new(target, Compression::default());
    std::io::copy(&mut source, &mut encoder).map_err(|e| WikimillError::io(&compressed, e))?;
    encoder
        .finish()
        .map_err(|e| WikimillError::io(&compressed, e))?;

    std::fs::remove_file(man_file).map_err(|e| WikimillError::io(man_file, e))?;
    debug!(path = %compressed.display(), "man page compressed");
    Ok(compressed)
}

/// Render one IR file to `<man_dir>/<page_name>.3.gz` via pandoc.
fn generate_page(md_file: &Path, man_dir: &Path, page_name: &str) -> Result<()> {
    let man_file = man_dir.join(format!("{page_name}.{MAN_SECTION}"));

    let metadata = extract_metadata(md_file)?;
    let title = metadata.title.unwrap_or_else(|| {
        warn!(file = %md_file.display(), "no heading found, using file stem as title");
        md_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| page_name.to_string())
    });
    let description = metadata.description.unwrap_or_default();
    let date = chrono::Local::now().date_naive().to_string();

    debug!(source = %md_file.display(), target = %man_file.display(), "generating man page");

    let mut command = Command::new("pandoc");
    command
        .arg(md_file)
        .args(["-s", "-t", "man", "-o"])
        .arg(&man_file);
    for (key, value) in [
        ("title", title.as_str()),
        ("name", title.as_str()),
        ("description", description.as_str()),
        ("section", MAN_SECTION),
        ("date", date.as_str()),
        ("source", MAN_SOURCE),
        ("manual", MAN_MANUAL),
    ] {
        command.arg("--metadata").arg(format!("{key}={value}"));
    }

    exec::run(&mut command).map_err(|e| WikimillError::Conversion(e.to_string()))?;
    compress_page(&man_file)?;
    Ok(())
}

/// Generate a man page for every IR file, `jobs` pages at a time.
///
/// Mirrors the conversion stage's discipline: per-file failures are
/// counted and logged at the join point, never propagated. An empty IR
/// tree is an aggregation failure.
pub async fn generate_all(
    plan: &PathPlan,
    jobs: usize,
    progress: &dyn ProgressReporter,
) -> Result<BatchStats> {
    let man_dir = plan.man_dir()?;
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for tree in plan.ir_trees()? {
        files.extend(
            sorted_markdown_files(&tree.root)
                .into_iter()
                .map(|file| (tree.name.clone(), file)),
        );
    }

    if files.is_empty() {
        return Err(WikimillError::aggregation(
            "IR tree is empty, no man pages to generate (run conversion first)",
        ));
    }

    let total = files.len();
    info!(files = total, jobs, path = %man_dir.display(), "starting man page generation");

    let names = assign_page_names(&files);
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(total);

    for ((_, file), name) in files.into_iter().zip(names) {
        let semaphore = semaphore.clone();
        let man_dir = man_dir.clone();
        let source_path = file.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let outcome =
                tokio::task::spawn_blocking(move || generate_page(&file, &man_dir, &name))
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
            Ok((path, Ok(()))) => {
                stats.written += 1;
                progress.file_converted(&path.display().to_string(), current, total);
            }
            Ok((path, Err(e))) => {
                stats.failed += 1;
                warn!(file = %path.display(), error = %e, "man page generation failed");
            }
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, "man page task aborted");
            }
        }
    }

    info!(
        written = stats.written,
        failed = stats.failed,
        "man page generation completed"
    );
    Ok(stats)
}
