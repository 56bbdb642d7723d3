//! Plain-text extraction for hover labels, accessibility text and measurements.

use crate::convert;

/// Suffix appended when [`plain_text`] truncates.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextOptions {
    /// Maximum length in characters, including [`ELLIPSIS`] when truncated.
    pub max_len: Option<usize>,
}

/// Returns the visible text of a label with markup removed. Lines are joined with `\n`.
pub fn plain_text(input: &str, options: &PlainTextOptions) -> String {
    let text = convert(input)
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n");
    match options.max_len {
        Some(max_len) => truncate(text, max_len),
        None => text,
    }
}

fn truncate(text: String, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text;
    }
    let suffix_len = ELLIPSIS.len().min(max_len);
    let mut out: String = text.chars().take(max_len - suffix_len).collect();
    out.push_str(&ELLIPSIS[..suffix_len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_joins_lines() {
        let opts = PlainTextOptions::default();
        assert_eq!(
            plain_text("be <b>Bold<br>and<br><i>Strong</i></b>", &opts),
            "be Bold\nand\nStrong"
        );
        assert_eq!(plain_text("SO<sub>4</sub><sup>2-</sup>", &opts), "SO42-");
        assert_eq!(plain_text("a &lt;b&gt;", &opts), "a <b>");
    }

    #[test]
    fn truncates_with_ellipsis() {
        let opts = PlainTextOptions { max_len: Some(8) };
        assert_eq!(plain_text("<b>0123456789</b>", &opts), "01234...");
        assert_eq!(plain_text("short", &opts), "short");
        assert_eq!(plain_text("0123456789", &PlainTextOptions { max_len: Some(2) }), "..");
        assert_eq!(plain_text("μμμμμμμμμμ", &PlainTextOptions { max_len: Some(4) }), "μ...");
    }
}
