//! End-to-end batch pipeline: prerequisites → sync → convert → output.
//!
//! One-shot by design: no component holds cross-call state, a re-run
//! repairs any partially-updated IR tree, and there is no incremental
//! or watch mode.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use wikimill_markdown::{Html2TextConverter, HtmlConverter};
use wikimill_shared::{CorpusVersion, OutputKind, Result, WikimillError};

use crate::convert::{self, BatchStats};
use crate::plan::PathPlan;
use crate::{concat, man, pdf, prereq, repo};

// ---------------------------------------------------------------------------
// Configuration and result
// ---------------------------------------------------------------------------

/// Configuration for one run: constructed once, immutable afterwards,
/// passed by reference into every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Corpus version selecting the participating source trees.
    pub version: CorpusVersion,
    /// Artifact to produce.
    pub kind: OutputKind,
    /// Wiki checkout location.
    pub repo_root: PathBuf,
    /// Root directory for all output.
    pub output_root: PathBuf,
    /// Worker pool size; `0` means "detect from available CPUs".
    pub jobs: usize,
    /// Whether to clone/pull the wiki checkout before converting.
    pub sync: bool,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Artifact kind that was produced.
    pub kind: OutputKind,
    /// Final output location (combined document, PDF, or man directory).
    pub output_path: PathBuf,
    /// Conversion counts.
    pub converted: BatchStats,
    /// Man page generation counts (man runs only).
    pub man_pages: Option<BatchStats>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a file is converted or rendered.
    fn file_converted(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &RunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_converted(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &RunResult) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full pipeline with the real `html2text` converter.
pub async fn run(config: &RunConfig, progress: &dyn ProgressReporter) -> Result<RunResult> {
    progress.phase("Checking prerequisites");
    prereq::check(config.kind, config.sync)?;
    run_with(config, Arc::new(Html2TextConverter), progress).await
}

/// Run the pipeline with an injected HTML converter.
///
/// Prerequisite probing is the caller's concern here; tests use this
/// entry point with a stub converter and no external tools installed.
#[instrument(skip_all, fields(version = %config.version, kind = %config.kind))]
pub async fn run_with(
    config: &RunConfig,
    converter: Arc<dyn HtmlConverter>,
    progress: &dyn ProgressReporter,
) -> Result<RunResult> {
    let start = Instant::now();

    if config.sync {
        progress.phase("Syncing wiki checkout");
        repo::sync(&config.repo_root, repo::DEFAULT_REMOTE)?;
    }

    let plan = PathPlan::new(&config.repo_root, &config.output_root, config.version);
    let jobs = convert::worker_count(config.jobs);

    progress.phase("Converting sources");
    let converted = convert::convert_all(&plan, converter, jobs, progress).await?;

    if converted.written == 0 {
        return Err(WikimillError::aggregation(
            "no source files were converted, refusing to produce empty output",
        ));
    }
    if converted.failed > 0 {
        warn!(
            failed = converted.failed,
            "some files failed to convert; downstream output is best-effort"
        );
    }

    let (output_path, man_pages) = match config.kind {
        OutputKind::Text => {
            progress.phase("Concatenating Markdown");
            (concat::concatenate(&plan)?, None)
        }
        OutputKind::Pdf => {
            progress.phase("Concatenating Markdown");
            concat::concatenate(&plan)?;
            progress.phase("Rendering PDF");
            (pdf::render(&plan)?, None)
        }
        OutputKind::Man => {
            progress.phase("Generating man pages");
            let stats = man::generate_all(&plan, jobs, progress).await?;
            (plan.man_dir()?, Some(stats))
        }
    };

    let result = RunResult {
        kind: config.kind,
        output_path,
        converted,
        man_pages,
        elapsed: start.elapsed(),
    };

    info!(
        kind = %result.kind,
        written = result.converted.written,
        failed = result.converted.failed,
        skipped = result.converted.skipped,
        elapsed_ms = result.elapsed.as_millis(),
        output = %result.output_path.display(),
        "run completed"
    );
    progress.done(&result);
    Ok(result)
}
