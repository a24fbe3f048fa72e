//! Splitter for statutes and regulations.
//!
//! Tries, in order: the hierarchy-tracking walk, a flat split before every
//! article marker, one segment per paragraph, and finally fixed windows over
//! the whole text. The first strategy that produces segments wins.

use serde_json::Value;

use crate::config::SplitterConfig;
use crate::metadata::{law_metadata, merge_base};
use crate::patterns::{match_article, split_before_articles};
use crate::resplit::RecursiveSplitter;
use crate::text::paragraphs;
use crate::types::{keys, Document, Metadata, Segment, SplitType};

use super::hierarchy::walk;
use super::strategy::{DocumentSplitter, Ladder, SplitterKind};
use super::types::{expand_unit, LegalUnit, PartNumbering, SplitContext};

/// Article-aware splitter for legal texts.
#[derive(Debug, Clone)]
pub struct LegalSplitter {
    config: SplitterConfig,
    resplitter: RecursiveSplitter,
}

impl LegalSplitter {
    /// Create a legal splitter.
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

    fn ladder(&self) -> Ladder<Self> {
        let ladder = Ladder::new();
        let ladder = if self.config.hierarchical {
            ladder.then("hierarchical", Self::split_hierarchical)
        } else {
            ladder
        };
        ladder
            .then("article", Self::split_articles)
            .then("paragraph", Self::split_paragraphs)
            .then("forced", Self::split_forced)
    }

    /// Hierarchy-tracking walk. Declines when no article marker opens a line.
    fn split_hierarchical(&self, document: &Document) -> Option<Vec<Segment>> {
        let units = walk(&document.text);
        let articles = units.iter().filter(|u| u.is_article()).count();
        if articles == 0 {
            return None;
        }

        tracing::debug!(units = units.len(), articles, "Hierarchy walk complete");
        let law = document_law_metadata(document);
        Some(
            units
                .iter()
                .flat_map(|unit| {
                    self.unit_segments(unit, SplitType::ArticleHierarchical, law.as_ref())
                })
                .collect(),
        )
    }

    /// Flat split immediately before every article marker in the text.
    fn split_articles(&self, document: &Document) -> Option<Vec<Segment>> {
        let pieces = split_before_articles(&document.text)?;
        let law = document_law_metadata(document);

        let units = pieces.into_iter().filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            let first_line = piece.lines().next().unwrap_or(piece);
            Some(match match_article(first_line) {
                Some(marker) => LegalUnit::article(marker.label, SplitContext::new(), piece),
                None => LegalUnit::preamble(SplitContext::new(), piece),
            })
        });

        Some(
            units
                .flat_map(|unit| self.unit_segments(&unit, SplitType::Article, law.as_ref()))
                .collect(),
        )
    }

    /// One segment per blank-line separated paragraph. Needs two paragraphs.
    fn split_paragraphs(&self, document: &Document) -> Option<Vec<Segment>> {
        let paragraphs = paragraphs(&document.text);
        if paragraphs.len() < 2 {
            return None;
        }

        let law = document_law_metadata(document);
        Some(
            paragraphs
                .iter()
                .flat_map(|paragraph| {
                    let metadata = with_law(tagged(SplitType::FallbackParagraph), law.as_ref());
                    expand_unit(
                        &self.resplitter,
                        paragraph,
                        metadata,
                        PartNumbering::Fragments,
                        None,
                    )
                })
                .collect(),
        )
    }

    /// Fixed windows over the whole text.
    fn split_forced(&self, document: &Document) -> Option<Vec<Segment>> {
        let law = document_law_metadata(document);
        let metadata = with_law(tagged(SplitType::FallbackForced), law.as_ref());
        Some(expand_unit(
            &self.resplitter,
            &document.text,
            metadata,
            PartNumbering::Fragments,
            None,
        ))
    }

    fn unit_segments(
        &self,
        unit: &LegalUnit,
        article_type: SplitType,
        law: Option<&Metadata>,
    ) -> Vec<Segment> {
        let (split_type, part_type) = if unit.is_article() {
            (article_type, Some(SplitType::ArticlePart))
        } else {
            (SplitType::Preamble, None)
        };

        let metadata = with_law(unit.metadata(split_type), law);
        expand_unit(
            &self.resplitter,
            &unit.text,
            metadata,
            PartNumbering::Parts,
            part_type,
        )
    }
}

impl Default for LegalSplitter {
    fn default() -> Self {
        Self::new(SplitterConfig::legal())
    }
}

impl DocumentSplitter for LegalSplitter {
    fn split(&self, document: &Document) -> Vec<Segment> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        let mut segments = self.ladder().run(self, document);
        for segment in &mut segments {
            merge_base(&mut segment.metadata, &document.base_metadata);
        }

        tracing::debug!(segments = segments.len(), "Legal split complete");
        segments
    }

    fn kind(&self) -> SplitterKind {
        SplitterKind::Legal
    }
}

fn tagged(split_type: SplitType) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(keys::SPLIT_TYPE.into(), Value::from(split_type.as_str()));
    metadata
}

fn document_law_metadata(document: &Document) -> Option<Metadata> {
    document.original_filename().map(law_metadata)
}

fn with_law(mut metadata: Metadata, law: Option<&Metadata>) -> Metadata {
    if let Some(law) = law {
        for (key, value) in law {
            metadata.insert(key.clone(), value.clone());
        }
    }
    metadata
}
