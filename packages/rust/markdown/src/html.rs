//! HTML-to-Markdown conversion seam.
//!
//! The actual conversion is delegated to the external `html2text` tool.
//! The trait keeps the conversion pipeline testable without the tool
//! installed: tests substitute a stub converter.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use wikimill_shared::{Result, WikimillError};

/// Name of the external converter binary.
pub const HTML2TEXT_BIN: &str = "html2text";

/// Converts one HTML file into raw Markdown text.
///
/// Treated as a pure function from file to text; any failure is reported
/// per file by the caller and never aborts a batch.
pub trait HtmlConverter: Send + Sync {
    fn convert(&self, html_file: &Path) -> Result<String>;
}

/// [`HtmlConverter`] backed by the `html2text` subprocess.
///
/// Invoked with fixed conversion options: links unwrapped, tables
/// wrapped, images rendered as their alt text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html2TextConverter;

impl HtmlConverter for Html2TextConverter {
    fn convert(&self, html_file: &Path) -> Result<String> {
        debug!(file = %html_file.display(), "converting HTML to Markdown");

        let output = Command::new(HTML2TEXT_BIN)
            .arg("--no-wrap-links")
            .arg("--wrap-tables")
            .arg("--images-to-alt")
            .arg(html_file)
            .output()
            .map_err(|e| {
                WikimillError::Conversion(format!(
                    "failed to spawn {HTML2TEXT_BIN} for {}: {e}",
                    html_file.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WikimillError::Conversion(format!(
                "{HTML2TEXT_BIN} failed for {} ({}): {}",
                html_file.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failure_is_a_conversion_error() {
        // Point at a binary that cannot exist to exercise the spawn path.
        struct Broken;
        impl HtmlConverter for Broken {
            fn convert(&self, html_file: &Path) -> Result<String> {
                let output = Command::new("wikimill-no-such-binary")
                    .arg(html_file)
                    .output();
                match output {
                    Ok(_) => Ok(String::new()),
                    Err(e) => Err(WikimillError::Conversion(e.to_string())),
                }
            }
        }

        let err = Broken.convert(Path::new("x.html")).unwrap_err();
        assert!(matches!(err, WikimillError::Conversion(_)));
    }
}
