//! Types shared by the splitters.

use serde_json::Value;

use crate::config::HIERARCHY_SEPARATOR;
use crate::metadata::insert_opt;
use crate::numerals::marker_ordinal;
use crate::resplit::RecursiveSplitter;
use crate::types::{keys, Metadata, Segment, SplitType};

/// Ancestor markers active at a point in a statute.
///
/// Carries state through the line walk. Setting a level clears every level
/// below it, so a context never mixes sections of different chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitContext {
    /// Current book marker (`第一编`).
    pub book: Option<String>,

    /// Current chapter marker (`第三章`).
    pub chapter: Option<String>,

    /// Heading text following the chapter marker (`总则`).
    pub chapter_title: Option<String>,

    /// Current section marker (`第二节`).
    pub section: Option<String>,
}

impl SplitContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new book: resets chapter and section.
    #[must_use]
    pub fn with_book(&self, book: impl Into<String>) -> Self {
        Self {
            book: Some(book.into()),
            ..Self::default()
        }
    }

    /// Enter a new chapter: keeps the book, resets the section.
    #[must_use]
    pub fn with_chapter(&self, chapter: impl Into<String>, title: &str) -> Self {
        Self {
            book: self.book.clone(),
            chapter: Some(chapter.into()),
            chapter_title: (!title.is_empty()).then(|| title.to_string()),
            section: None,
        }
    }

    /// Enter a new section: keeps book and chapter.
    #[must_use]
    pub fn with_section(&self, section: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            ..self.clone()
        }
    }

    /// Whether no level is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.book.is_none() && self.chapter.is_none() && self.section.is_none()
    }

    /// Ancestor markers followed by `own`, joined with `" > "`.
    ///
    /// Returns `None` when there is nothing to join.
    #[must_use]
    pub fn hierarchy_path(&self, own: Option<&str>) -> Option<String> {
        let parts: Vec<&str> = [
            self.book.as_deref(),
            self.chapter.as_deref(),
            self.section.as_deref(),
            own,
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(HIERARCHY_SEPARATOR))
        }
    }

    /// Write the ancestor keys into `metadata`.
    pub fn write_to(&self, metadata: &mut Metadata) {
        insert_opt(metadata, keys::BOOK, self.book.as_deref());
        insert_opt(metadata, keys::CHAPTER, self.chapter.as_deref());
        insert_opt(metadata, keys::CHAPTER_TITLE, self.chapter_title.as_deref());
        insert_opt(metadata, keys::SECTION, self.section.as_deref());
    }
}

/// One logical unit of a statute: an article, or the text before one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalUnit {
    /// Article marker, `None` for preamble text.
    pub article_number: Option<String>,

    /// Ancestors active when the unit started.
    pub context: SplitContext,

    /// Unit text, marker line included.
    pub text: String,
}

impl LegalUnit {
    /// Create an article unit.
    #[must_use]
    pub fn article(
        number: impl Into<String>,
        context: SplitContext,
        text: impl Into<String>,
    ) -> Self {
        Self {
            article_number: Some(number.into()),
            context,
            text: text.into(),
        }
    }

    /// Create a preamble unit.
    #[must_use]
    pub fn preamble(context: SplitContext, text: impl Into<String>) -> Self {
        Self {
            article_number: None,
            context,
            text: text.into(),
        }
    }

    /// Whether this unit is an article.
    #[must_use]
    pub fn is_article(&self) -> bool {
        self.article_number.is_some()
    }

    /// Structural metadata for this unit.
    #[must_use]
    pub fn metadata(&self, split_type: SplitType) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(keys::SPLIT_TYPE.into(), Value::from(split_type.as_str()));

        if let Some(number) = self.article_number.as_deref() {
            metadata.insert(keys::ARTICLE_NUMBER.into(), Value::from(number));
            if let Some(index) = marker_ordinal(number) {
                metadata.insert(keys::ARTICLE_INDEX.into(), Value::from(index));
            }
        }

        self.context.write_to(&mut metadata);
        if let Some(path) = self
            .context
            .hierarchy_path(self.article_number.as_deref())
        {
            metadata.insert(keys::HIERARCHY_PATH.into(), Value::from(path));
        }

        metadata
    }
}

/// How siblings produced from one oversized unit are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartNumbering {
    /// `part` (1-based) / `total_parts`, for structural units.
    Parts,

    /// `fragment_index` (0-based) / `total_fragments`, for paragraphs and windows.
    Fragments,
}

/// Turn one unit into one or more segments within the budget.
///
/// A unit that fits yields exactly one segment carrying `metadata`. An
/// oversized unit yields one segment per re-split piece, each carrying a copy
/// of `metadata` plus its position; `part_type` replaces `split_type` on those
/// pieces when given.
#[must_use]
pub fn expand_unit(
    resplitter: &RecursiveSplitter,
    text: &str,
    metadata: Metadata,
    numbering: PartNumbering,
    part_type: Option<SplitType>,
) -> Vec<Segment> {
    let mut pieces = resplitter.split_text(text);
    if pieces.len() <= 1 {
        return pieces
            .pop()
            .map(|piece| Segment::new(piece, metadata))
            .into_iter()
            .collect();
    }

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let mut metadata = metadata.clone();
            match numbering {
                PartNumbering::Parts => {
                    metadata.insert(keys::PART.into(), Value::from(i + 1));
                    metadata.insert(keys::TOTAL_PARTS.into(), Value::from(total));
                }
                PartNumbering::Fragments => {
                    metadata.insert(keys::FRAGMENT_INDEX.into(), Value::from(i));
                    metadata.insert(keys::TOTAL_FRAGMENTS.into(), Value::from(total));
                }
            }
            if let Some(part_type) = part_type {
                metadata.insert(keys::SPLIT_TYPE.into(), Value::from(part_type.as_str()));
            }
            Segment::new(piece, metadata)
        })
        .collect()
}

/// Tag every segment with `segment_index` (0-based) and `total_segments`.
pub fn number_segments(segments: &mut [Segment]) {
    let total = segments.len();
    for (i, segment) in segments.iter_mut().enumerate() {
        segment
            .metadata
            .insert(keys::SEGMENT_INDEX.into(), Value::from(i));
        segment
            .metadata
            .insert(keys::TOTAL_SEGMENTS.into(), Value::from(total));
    }
}
