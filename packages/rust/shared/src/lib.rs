//! Shared types, error model, and configuration for wikimill.
//!
//! This crate is the foundation depended on by the other wikimill crates.
//! It provides:
//! - [`WikimillError`] - the unified error type
//! - Domain types ([`CorpusVersion`], [`OutputKind`], [`SourceTree`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{Result, WikimillError};
pub use types::{CorpusVersion, EXTENSION_MODULES, OutputKind, SourceTree};
