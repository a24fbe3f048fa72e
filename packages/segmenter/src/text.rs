//! Text measurement and normalization utilities.

use unicode_normalization::UnicodeNormalization;

use crate::config::CHARS_PER_TOKEN;

/// Estimate the token count of a text (`chars / 3`).
///
/// # Examples
/// ```
/// use legal_segmenter::text::estimate_tokens;
///
/// assert_eq!(estimate_tokens("第一条"), 1);
/// assert_eq!(estimate_tokens("ab"), 0);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    char_count(text) / CHARS_PER_TOKEN
}

/// Number of Unicode scalar values in `text`.
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of `text`, on a char boundary.
#[must_use]
pub fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Split text into paragraphs separated by blank lines.
///
/// A blank line is any line that is empty after trimming (this covers
/// `\r\n` line endings and ideographic spaces). Returned paragraphs are
/// trimmed and never empty.
#[must_use]
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current.join("\n").trim().to_string());
    }

    result.retain(|p| !p.is_empty());
    result
}

/// Normalize extracted document text before splitting.
///
/// - Converts `\r\n` and lone `\r` to `\n`
/// - Applies NFKC, folding full-width digits and punctuation (`１２．` → `12.`)
///   and ideographic spaces (U+3000) into their ASCII forms
///
/// Extraction tools disagree on both, and the structural patterns are
/// simpler against one canonical form.
#[must_use]
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.nfkc().collect()
}
