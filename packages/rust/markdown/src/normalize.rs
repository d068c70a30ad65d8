//! Unicode normalization of raw text blobs.

use unicode_normalization::UnicodeNormalization;

/// Normalize text to NFKC form and trim leading/trailing whitespace
/// of the whole blob.
///
/// Pure, total, and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  hello world \n\n"), "hello world");
    }

    #[test]
    fn applies_compatibility_decomposition() {
        // U+FB01 LATIN SMALL LIGATURE FI decomposes under NFKC.
        assert_eq!(normalize("\u{FB01}le"), "file");
        // U+2460 CIRCLED DIGIT ONE becomes plain "1".
        assert_eq!(normalize("\u{2460}"), "1");
    }

    #[test]
    fn composes_combining_sequences() {
        // "e" + COMBINING ACUTE ACCENT composes to U+00E9.
        assert_eq!(normalize("e\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn idempotent() {
        let inputs = ["", "plain", "  \u{FB01}le e\u{0301} \u{2460}  ", "a\nb\nc"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }
}
