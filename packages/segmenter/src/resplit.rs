//! Recursive text re-splitter.
//!
//! Guarantees that no returned piece exceeds the token budget. Text is split
//! on the highest-priority separator that occurs in it, pieces are greedily
//! merged back up to the budget, and anything still oversized is processed
//! again one separator level down. When no separator is left, text is cut
//! into fixed-width character windows.

use crate::config::{SplitterConfig, CHARS_PER_TOKEN};
use crate::patterns::SEPARATORS;
use crate::text::{char_count, tail_chars};

/// Splits text into pieces within a token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveSplitter {
    max_tokens: usize,
    overlap: usize,
}

impl RecursiveSplitter {
    /// Create a re-splitter.
    ///
    /// A zero budget is raised to one token and an overlap that would stall
    /// the forced cut is clamped just below the window width.
    #[must_use]
    pub fn new(max_tokens: usize, overlap: usize) -> Self {
        let max_tokens = max_tokens.max(1);
        let window = max_tokens.saturating_mul(CHARS_PER_TOKEN);
        let overlap = if overlap >= window {
            tracing::warn!(overlap, window, "Overlap not smaller than window, clamping");
            window - 1
        } else {
            overlap
        };
        Self {
            max_tokens,
            overlap,
        }
    }

    /// Create a re-splitter from a splitter configuration.
    #[must_use]
    pub fn from_config(config: &SplitterConfig) -> Self {
        Self::new(config.max_tokens, config.overlap)
    }

    /// The effective token budget.
    #[must_use]
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// The effective overlap in characters.
    #[must_use]
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Width in characters of a forced cut.
    #[must_use]
    pub fn window_chars(&self) -> usize {
        self.max_tokens.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Whether `text` is within the token budget.
    #[must_use]
    pub fn fits(&self, text: &str) -> bool {
        self.fits_chars(char_count(text))
    }

    fn fits_chars(&self, chars: usize) -> bool {
        chars / CHARS_PER_TOKEN <= self.max_tokens
    }

    /// Split `text` into trimmed, non-empty pieces within the budget.
    ///
    /// Text that already fits comes back as a single trimmed piece; blank
    /// text yields no pieces.
    ///
    /// # Examples
    /// ```
    /// use legal_segmenter::resplit::RecursiveSplitter;
    ///
    /// let splitter = RecursiveSplitter::new(2, 0);
    /// let pieces = splitter.split_text("甲方付款。乙方交货。");
    /// assert_eq!(pieces, vec!["甲方付款。", "乙方交货。"]);
    /// ```
    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.split_from(text, 0)
    }

    fn split_from(&self, text: &str, level: usize) -> Vec<String> {
        if self.fits(text) {
            let trimmed = text.trim();
            return if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            };
        }

        let next = SEPARATORS
            .iter()
            .enumerate()
            .skip(level)
            .find(|(_, separator)| separator.occurs_in(text));

        match next {
            Some((index, separator)) => {
                let pieces = separator.split_inclusive(text);
                self.merge(&pieces, index + 1)
            }
            None => self.force_split(text),
        }
    }

    /// Greedily merge pieces up to the budget, seeding each new buffer with
    /// the tail of the previous one.
    fn merge(&self, pieces: &[&str], next_level: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut buffer = String::new();
        let mut buffer_chars = 0;
        // Whether the buffer holds text that has not been emitted yet
        let mut fresh = false;

        for piece in pieces {
            let piece_chars = char_count(piece);

            if piece.trim().is_empty() {
                if self.fits_chars(buffer_chars + piece_chars) {
                    buffer.push_str(piece);
                    buffer_chars += piece_chars;
                }
                continue;
            }

            if self.fits_chars(buffer_chars + piece_chars) {
                buffer.push_str(piece);
                buffer_chars += piece_chars;
                fresh = true;
                continue;
            }

            if fresh {
                out.extend(self.split_from(&buffer, next_level));
                let seed = tail_chars(buffer.trim_end(), self.overlap).to_string();
                buffer_chars = char_count(&seed);
                buffer = seed;
                fresh = false;
            }

            if !self.fits_chars(buffer_chars + piece_chars) {
                buffer.clear();
                buffer_chars = 0;
            }

            if self.fits_chars(piece_chars) {
                buffer.push_str(piece);
                buffer_chars += piece_chars;
                fresh = true;
            } else {
                out.extend(self.split_from(piece, next_level));
                buffer.clear();
                buffer_chars = 0;
            }
        }

        if fresh {
            out.extend(self.split_from(&buffer, next_level));
        }

        out
    }

    /// Cut text into windows of `window_chars` characters, advancing by
    /// `window_chars - overlap`.
    fn force_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let window = self.window_chars();
        let step = window - self.overlap;

        let mut out = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + window).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        tracing::debug!(
            chars = chars.len(),
            window,
            pieces = out.len(),
            "Forced character split"
        );
        out
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::from_config(&SplitterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::estimate_tokens;

    fn strip_ws(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn assert_within_budget(splitter: &RecursiveSplitter, pieces: &[String]) {
        for piece in pieces {
            assert!(
                estimate_tokens(piece) <= splitter.max_tokens(),
                "piece over budget ({} tokens): {piece:?}",
                estimate_tokens(piece)
            );
            assert!(!piece.trim().is_empty());
            assert_eq!(piece.trim(), piece);
        }
    }

    #[test]
    fn test_fitting_text_is_returned_unchanged() {
        let splitter = RecursiveSplitter::new(100, 10);
        let text = "  第一条 本法适用于中华人民共和国境内的民事活动。 ";
        assert_eq!(splitter.split_text(text), vec![text.trim()]);
    }

    #[test]
    fn test_resplit_is_idempotent() {
        let splitter = RecursiveSplitter::new(5, 2);
        let text = "甲方应当按期付款。乙方应当按期交货。双方应当诚信履约。".repeat(3);
        for piece in splitter.split_text(&text) {
            assert_eq!(splitter.split_text(&piece), vec![piece.clone()]);
        }
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        let splitter = RecursiveSplitter::new(10, 0);
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\t ").is_empty());
    }

    #[test]
    fn test_paragraphs_split_first() {
        let splitter = RecursiveSplitter::new(4, 0);
        let pieces = splitter.split_text("第一段内容较长。\n\n第二段内容较长。");
        assert_eq!(pieces, vec!["第一段内容较长。", "第二段内容较长。"]);
    }

    #[test]
    fn test_merges_small_pieces_up_to_budget() {
        let splitter = RecursiveSplitter::new(3, 0);
        // Six sentences of three chars each, three fit in the eleven-char budget
        let pieces = splitter.split_text("一二。三四。五六。七八。九十。甲乙。");
        assert_eq!(pieces, vec!["一二。三四。五六。", "七八。九十。甲乙。"]);
    }

    #[test]
    fn test_overlap_seeds_next_piece() {
        let splitter = RecursiveSplitter::new(3, 2);
        let pieces = splitter.split_text("一二。三四。五六。七八。");
        assert_within_budget(&splitter, &pieces);
        assert!(pieces.len() >= 2);
        // Second piece starts with the tail of the first
        let tail = tail_chars(&pieces[0], 2);
        assert!(pieces[1].starts_with(tail), "{pieces:?}");
    }

    #[test]
    fn test_no_overlap_reconstructs_text() {
        let splitter = RecursiveSplitter::new(8, 0);
        let text = "第一条 为了保护民事主体的合法权益，调整民事关系，维护社会和经济秩序。\n\
                    第二条 民法调整平等主体的自然人、法人和非法人组织之间的人身关系和财产关系。\n\n\
                    第三条 民事主体的人身权利、财产权利以及其他合法权益受法律保护。";
        let pieces = splitter.split_text(text);
        assert_within_budget(&splitter, &pieces);
        assert_eq!(strip_ws(&pieces.concat()), strip_ws(text));
    }

    #[test]
    fn test_force_split_without_separators() {
        let splitter = RecursiveSplitter::new(2, 0);
        let pieces = splitter.split_text("abcdefghijklmnop");
        assert_eq!(pieces, vec!["abcdef", "ghijkl", "mnop"]);
    }

    #[test]
    fn test_force_split_with_overlap() {
        let splitter = RecursiveSplitter::new(2, 2);
        let pieces = splitter.split_text("abcdefghij");
        assert_eq!(pieces, vec!["abcdef", "efghij"]);
        assert_within_budget(&splitter, &pieces);
    }

    #[test]
    fn test_clamps_degenerate_config() {
        let splitter = RecursiveSplitter::new(0, 100);
        assert_eq!(splitter.max_tokens(), 1);
        assert_eq!(splitter.overlap(), 2);

        // Still terminates, one new char per window
        let pieces = splitter.split_text("abcdef");
        assert_eq!(pieces, vec!["abc", "bcd", "cde", "def"]);
    }

    #[test]
    fn test_long_unbroken_cjk_run_is_bounded() {
        let splitter = RecursiveSplitter::new(10, 5);
        let text = "当".repeat(1000);
        let pieces = splitter.split_text(&text);
        assert_within_budget(&splitter, &pieces);
        assert!(pieces.len() > 30);
    }

    #[test]
    fn test_mixed_text_stays_within_budget() {
        let splitter = RecursiveSplitter::new(20, 15);
        let sentence = "承租人应当按照约定的方法使用租赁物，\
                        对租赁物的使用未约定或者约定不明确的，应当根据租赁物的性质使用；";
        let text = format!(
            "{}\n{}\n\n{}",
            sentence.repeat(4),
            "a".repeat(200),
            sentence.repeat(2)
        );
        let pieces = splitter.split_text(&text);
        assert_within_budget(&splitter, &pieces);
        assert!(pieces.iter().any(|p| p.contains("承租人")));
    }

    #[test]
    fn test_pieces_preserve_order() {
        let splitter = RecursiveSplitter::new(4, 0);
        let text = "甲甲甲甲甲。乙乙乙乙乙。丙丙丙丙丙。丁丁丁丁丁。";
        let pieces = splitter.split_text(text);
        let mut cursor = 0;
        for piece in &pieces {
            let found = text[cursor..].find(piece.as_str()).expect("piece in order");
            cursor += found + piece.len();
        }
    }
}
