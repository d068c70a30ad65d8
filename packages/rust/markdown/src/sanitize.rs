//! Line-level sanitization of normalized Markdown.
//!
//! Every rewrite rule operates on a single line, and the rule order is
//! load-bearing: horizontal-rule lines must be rewritten before anything
//! else touches them (the pattern matches the whole line), and the link
//! rules must run before the empty-parentheses cleanup. Changing the
//! order changes the output.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder left behind for `----` lines. Literal horizontal rules
/// render inconsistently in the PDF and man backends.
pub const HR_PLACEHOLDER: &str = "<!-- Horizontal line omitted for PDF and MAN -->";

/// The ordered per-line rewrite table.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Curly quotes to straight quotes, for portability across backends.
        (r"\u{201C}", "\""),
        (r"\u{201D}", "\""),
        // A line that is only a horizontal rule.
        (r"^----\s*$", HR_PLACEHOLDER),
        // Inline links: keep the visible text.
        (r"\[(.*?)\]\(.*?\)", "$1"),
        // Reference-style links: keep the visible text.
        (r"\[([^\]]+)\]\[[^\]]+\]", "$1"),
        // A line that is only a link-reference definition.
        (r"^\[.*?\]:\s?.*$", ""),
        // Empty parentheses left behind by link stripping.
        (r"\(\)", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// Apply the rewrite table to every line of `text`, rejoining with `\n`.
///
/// Idempotent by construction: no rule's output can re-trigger any rule.
pub fn sanitize(text: &str) -> String {
    text.lines()
        .map(sanitize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn sanitize_line(line: &str) -> String {
    let mut line = line.to_string();
    for (pattern, replacement) in RULES.iter() {
        line = pattern.replace_all(&line, *replacement).into_owned();
    }
    line
}
