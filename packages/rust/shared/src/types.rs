//! Core domain types for the wikimill conversion pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::WikimillError;

/// Suffixes of the extension modules that ship alongside the core wiki
/// module. Order matters: it fixes the concatenation order of the
/// combined document.
pub const EXTENSION_MODULES: [&str; 4] = ["_image", "_mixer", "_net", "_ttf"];

// ---------------------------------------------------------------------------
// CorpusVersion
// ---------------------------------------------------------------------------

/// Which major version of the wiki corpus participates in a run.
///
/// The tag selects the set of source sub-trees (e.g. `SDL2`, `SDL2_image`,
/// ...) and parameterizes output file names. Immutable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorpusVersion {
    V2,
    V3,
}

impl CorpusVersion {
    /// The bare version tag, e.g. `"2"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "2",
            Self::V3 => "3",
        }
    }

    /// Directory-name prefix of the corpus modules, e.g. `"SDL2"`.
    pub fn prefix(&self) -> String {
        format!("SDL{}", self.as_str())
    }

    /// Ordered module directory names for this version: the core module
    /// first, then the fixed list of extension modules.
    pub fn module_dirs(&self) -> Vec<String> {
        let prefix = self.prefix();
        std::iter::once(prefix.clone())
            .chain(EXTENSION_MODULES.iter().map(|ext| format!("{prefix}{ext}")))
            .collect()
    }
}

impl std::fmt::Display for CorpusVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CorpusVersion {
    type Err = WikimillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Self::V2),
            "3" => Ok(Self::V3),
            other => Err(WikimillError::config(format!(
                "invalid corpus version: {other} (expected 2 or 3)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputKind
// ---------------------------------------------------------------------------

/// Which downstream artifact a run produces from the IR tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// The combined Markdown document.
    Text,
    /// The combined document rendered to PDF via pandoc/xelatex.
    Pdf,
    /// One man page per IR file via pandoc.
    Man,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Man => "man",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputKind {
    type Err = WikimillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "man" => Ok(Self::Man),
            other => Err(WikimillError::config(format!(
                "invalid output kind: {other} (expected text, pdf, or man)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceTree
// ---------------------------------------------------------------------------

/// One logical input directory of the documentation corpus: the core
/// module or one named extension module. Derived once at plan time,
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    /// Module directory name, e.g. `SDL2_image`.
    pub name: String,
    /// Absolute root path of the module inside the wiki checkout.
    pub root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_supported_tags() {
        assert_eq!("2".parse::<CorpusVersion>().unwrap(), CorpusVersion::V2);
        assert_eq!("3".parse::<CorpusVersion>().unwrap(), CorpusVersion::V3);
    }

    #[test]
    fn version_rejects_unknown_tag() {
        let err = "4".parse::<CorpusVersion>().unwrap_err();
        assert!(err.to_string().contains("invalid corpus version"));
    }

    #[test]
    fn module_dirs_keep_core_first() {
        let dirs = CorpusVersion::V2.module_dirs();
        assert_eq!(
            dirs,
            vec!["SDL2", "SDL2_image", "SDL2_mixer", "SDL2_net", "SDL2_ttf"]
        );
    }

    #[test]
    fn output_kind_roundtrip() {
        for kind in [OutputKind::Text, OutputKind::Pdf, OutputKind::Man] {
            assert_eq!(kind.as_str().parse::<OutputKind>().unwrap(), kind);
        }
        assert!("html".parse::<OutputKind>().is_err());
    }
}
