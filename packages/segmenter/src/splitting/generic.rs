//! Structure-agnostic splitter.

use serde_json::Value;

use crate::config::SplitterConfig;
use crate::metadata::merge_base;
use crate::resplit::RecursiveSplitter;
use crate::types::{keys, Document, Metadata, Segment, SplitType};

use super::strategy::{DocumentSplitter, SplitterKind};
use super::types::number_segments;

/// Splits any text with the recursive re-splitter alone.
#[derive(Debug, Clone)]
pub struct GenericSplitter {
    config: SplitterConfig,
    resplitter: RecursiveSplitter,
}

impl GenericSplitter {
    /// Create a generic splitter.
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self {
            resplitter: RecursiveSplitter::from_config(&config),
            config,
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }
}

impl Default for GenericSplitter {
    fn default() -> Self {
        Self::new(SplitterConfig::generic())
    }
}

impl DocumentSplitter for GenericSplitter {
    fn split(&self, document: &Document) -> Vec<Segment> {
        let mut segments: Vec<Segment> = self
            .resplitter
            .split_text(&document.text)
            .into_iter()
            .map(|piece| {
                let mut metadata = Metadata::new();
                metadata.insert(
                    keys::SPLIT_TYPE.into(),
                    Value::from(SplitType::RecursiveWindow.as_str()),
                );
                Segment::new(piece, metadata)
            })
            .collect();

        number_segments(&mut segments);
        for segment in &mut segments {
            merge_base(&mut segment.metadata, &document.base_metadata);
        }
        segments
    }

    fn kind(&self) -> SplitterKind {
        SplitterKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_segment() {
        let segments = GenericSplitter::default().split(&Document::new("  判决书正文。 "));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "判决书正文。");
        assert_eq!(segments[0].split_type(), Some("recursive_window"));
        assert_eq!(segments[0].meta_u64(keys::SEGMENT_INDEX), Some(0));
        assert_eq!(segments[0].meta_u64(keys::TOTAL_SEGMENTS), Some(1));
    }

    #[test]
    fn test_ignores_article_markers() {
        let splitter = GenericSplitter::default();
        let segments = splitter.split(&Document::new("第一条 甲\n第二条 乙"));
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].metadata.contains_key(keys::ARTICLE_NUMBER));
    }

    #[test]
    fn test_long_text_is_windowed() {
        let splitter =
            GenericSplitter::new(SplitterConfig::generic().with_max_tokens(10).with_overlap(3));
        let text = "本院认为，被告的行为构成违约，应当承担相应责任。".repeat(6);
        let segments = splitter.split(&Document::new(text).with_metadata("case_id", 42));

        assert!(segments.len() > 1);
        for (i, segment) in segments.iter().enumerate() {
            assert!(segment.text.chars().count() / 3 <= 10);
            assert_eq!(segment.meta_u64(keys::SEGMENT_INDEX), Some(i as u64));
            assert_eq!(segment.meta_u64("case_id"), Some(42));
        }
    }

    #[test]
    fn test_blank_input() {
        assert!(GenericSplitter::default().split(&Document::new("\n")).is_empty());
    }
}
