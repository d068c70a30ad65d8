//! Text canonicalization for the wikimill IR.
//!
//! Every file that enters the intermediate representation passes through
//! the same two-stage pipeline: Unicode normalization ([`normalize`]),
//! then the ordered line-level rewrite table ([`sanitize`]). HTML inputs
//! are first turned into raw Markdown through the [`HtmlConverter`] seam.

mod html;
mod normalize;
mod sanitize;

pub use html::{HTML2TEXT_BIN, Html2TextConverter, HtmlConverter};
pub use normalize::normalize;
pub use sanitize::{HR_PLACEHOLDER, sanitize};

/// Canonicalize a raw text blob for the IR: normalize, then sanitize.
///
/// This is the invariant every IR file satisfies: its content is always
/// `canonicalize(raw_or_converted_text)` plus a single trailing newline.
pub fn canonicalize(text: &str) -> String {
    sanitize(&normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_runs_both_stages() {
        let input = "  # Title\n\nHello \u{201C}world\u{201D}\n\n";
        assert_eq!(canonicalize(input), "# Title\n\nHello \"world\"");
    }

    #[test]
    fn canonicalize_idempotent() {
        let input = "\u{FB01}rst [link](http://x)\n----\ndone ()";
        let once = canonicalize(input);
        assert_eq!(canonicalize(&once), once);
    }
}
