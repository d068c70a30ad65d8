//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use wikimill_core::pipeline::{self, ProgressReporter, RunConfig, RunResult};
use wikimill_shared::{CorpusVersion, OutputKind, config_file_path, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// wikimill: turn a wiki documentation tree into text, PDF, or man pages.
#[derive(Parser)]
#[command(
    name = "wikimill",
    version,
    about = "Convert wiki documentation to a combined Markdown document, a PDF, or man pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert the wiki and produce the selected output artifact.
    Build {
        /// Output kind: text, pdf, or man.
        #[arg(short, long, default_value = "text")]
        kind: OutputKind,

        /// Corpus version: 2 or 3.
        #[arg(short = 'c', long, default_value = "2")]
        corpus: CorpusVersion,

        /// Wiki checkout location (defaults to the configured path).
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Output root directory (defaults to the configured path).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Worker pool size (defaults to available CPUs).
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Skip cloning/pulling the wiki checkout.
        #[arg(long)]
        no_sync: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create a default config file.
    Init,
    /// Print the config file path.
    Path,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "wikimill=info",
        1 => "wikimill=debug",
        _ => "wikimill=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            kind,
            corpus,
            repo,
            out,
            jobs,
            no_sync,
        } => cmd_build(kind, corpus, repo, out, jobs, no_sync).await,
        Command::Config { action } => cmd_config(action),
    }
}

async fn cmd_build(
    kind: OutputKind,
    corpus: CorpusVersion,
    repo: Option<PathBuf>,
    out: Option<PathBuf>,
    jobs: Option<usize>,
    no_sync: bool,
) -> Result<()> {
    let app_config = load_config()?;
    let defaults = app_config.defaults;

    let config = RunConfig {
        version: corpus,
        kind,
        repo_root: repo.unwrap_or_else(|| PathBuf::from(defaults.repo)),
        output_root: out.unwrap_or_else(|| PathBuf::from(defaults.output_dir)),
        jobs: jobs.unwrap_or(defaults.jobs),
        sync: !no_sync,
    };

    info!(version = %config.version, kind = %config.kind, "starting build");

    let progress = CliProgress::default();
    let result = pipeline::run(&config, &progress).await?;

    println!(
        "Converted {} file(s), {} failed, {} skipped.",
        result.converted.written, result.converted.failed, result.converted.skipped
    );
    if let Some(man) = &result.man_pages {
        println!("Generated {} man page(s), {} failed.", man.written, man.failed);
    }
    println!("Output: {}", result.output_path.display());

    if result.converted.failed > 0 {
        println!("Note: some files failed to convert; output is best-effort. Re-run with -v for details.");
    }

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = init_config()?;
            println!("Created {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_file_path()?.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress display
// ---------------------------------------------------------------------------

/// Terminal progress display backed by `indicatif`.
#[derive(Default)]
struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        let mut bar = self.bar.lock().expect("progress lock poisoned");
        if let Some(bar) = bar.take() {
            bar.finish_and_clear();
        }
        eprintln!("==> {name}");
    }

    fn file_converted(&self, path: &str, current: usize, total: usize) {
        let mut bar = self.bar.lock().expect("progress lock poisoned");
        let bar = bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                    .expect("valid progress template"),
            );
            bar
        });
        bar.set_position(current as u64);
        bar.set_message(path.to_string());
    }

    fn done(&self, _result: &RunResult) {
        let mut bar = self.bar.lock().expect("progress lock poisoned");
        if let Some(bar) = bar.take() {
            bar.finish_and_clear();
        }
    }
}
