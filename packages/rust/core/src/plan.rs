//! Path planning for one conversion run.
//!
//! Every directory and file location used by the pipeline derives from
//! the triple `(repo root, corpus version, output root)`:
//!
//! ```text
//! <repo>/<module>/<file>                         # source input
//! <out>/text/intermediate/<module>/<file>.md     # IR
//! <out>/text/SDL-Wiki-v{N}.md                    # combined document
//! <out>/pdf/SDL-Wiki-v{N}.pdf                    # rendered PDF
//! <out>/man/<page>.3                             # man pages
//! ```

use std::path::{Path, PathBuf};

use wikimill_shared::{CorpusVersion, Result, SourceTree, WikimillError};

/// Immutable path plan for one run. Owns no data beyond the three
/// inputs; directory creation happens lazily when a caller asks for an
/// output location, and is idempotent.
#[derive(Debug, Clone)]
pub struct PathPlan {
    repo_root: PathBuf,
    output_root: PathBuf,
    version: CorpusVersion,
}

impl PathPlan {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        version: CorpusVersion,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            output_root: output_root.into(),
            version,
        }
    }

    pub fn version(&self) -> CorpusVersion {
        self.version
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Ordered source trees for this version: the core module first,
    /// then the fixed extension modules. The order fixes the
    /// concatenation order of the combined document.
    pub fn source_trees(&self) -> Vec<SourceTree> {
        self.version
            .module_dirs()
            .into_iter()
            .map(|name| SourceTree {
                root: self.repo_root.join(&name),
                name,
            })
            .collect()
    }

    /// IR root directory, created on demand.
    pub fn ir_root(&self) -> Result<PathBuf> {
        ensure_dir(self.output_root.join("text").join("intermediate"))
    }

    /// Per-module IR trees, mirroring [`Self::source_trees`] in the same
    /// order. The directories themselves are created by the conversion
    /// workers as files are written.
    pub fn ir_trees(&self) -> Result<Vec<SourceTree>> {
        let ir_root = self.ir_root()?;
        Ok(self
            .version
            .module_dirs()
            .into_iter()
            .map(|name| SourceTree {
                root: ir_root.join(&name),
                name,
            })
            .collect())
    }

    /// Path of the combined Markdown document, its directory created on
    /// demand.
    pub fn combined_path(&self) -> Result<PathBuf> {
        let text_dir = ensure_dir(self.output_root.join("text"))?;
        Ok(text_dir.join(format!("SDL-Wiki-v{}.md", self.version)))
    }

    /// Path of the rendered PDF, its directory created on demand.
    pub fn pdf_path(&self) -> Result<PathBuf> {
        let pdf_dir = ensure_dir(self.output_root.join("pdf"))?;
        Ok(pdf_dir.join(format!("SDL-Wiki-v{}.pdf", self.version)))
    }

    /// Man page output directory, created on demand.
    pub fn man_dir(&self) -> Result<PathBuf> {
        ensure_dir(self.output_root.join("man"))
    }
}

/// Create a directory (and parents) if absent. Safe to call repeatedly.
fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&path).map_err(|e| WikimillError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(version: CorpusVersion) -> (tempfile::TempDir, PathPlan) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = PathPlan::new(tmp.path().join("sdlwiki"), tmp.path().join("out"), version);
        (tmp, plan)
    }

    #[test]
    fn source_trees_ordered_core_first() {
        let (_tmp, plan) = plan(CorpusVersion::V3);
        let names: Vec<_> = plan.source_trees().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["SDL3", "SDL3_image", "SDL3_mixer", "SDL3_net", "SDL3_ttf"]
        );
    }

    #[test]
    fn ir_trees_mirror_source_trees() {
        let (_tmp, plan) = plan(CorpusVersion::V2);
        let ir_trees = plan.ir_trees().expect("ir trees");
        let source_trees = plan.source_trees();
        assert_eq!(ir_trees.len(), source_trees.len());
        for (ir, src) in ir_trees.iter().zip(&source_trees) {
            assert_eq!(ir.name, src.name);
            assert!(ir.root.ends_with(Path::new("intermediate").join(&ir.name)));
        }
    }

    #[test]
    fn output_paths_parameterized_by_version() {
        let (_tmp, plan) = plan(CorpusVersion::V2);
        let combined = plan.combined_path().expect("combined path");
        assert!(combined.ends_with("text/SDL-Wiki-v2.md"));
        let pdf = plan.pdf_path().expect("pdf path");
        assert!(pdf.ends_with("pdf/SDL-Wiki-v2.pdf"));
    }

    #[test]
    fn directory_creation_is_idempotent() {
        let (_tmp, plan) = plan(CorpusVersion::V2);
        let first = plan.ir_root().expect("first ensure");
        let second = plan.ir_root().expect("second ensure");
        assert_eq!(first, second);
        assert!(first.is_dir());
    }
}
