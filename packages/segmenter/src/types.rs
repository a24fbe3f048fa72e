//! Core data types for the segmenter.
//!
//! A [`Document`] goes in, an ordered list of [`Segment`]s comes out. Segment
//! metadata is an opaque JSON object so the ingestion pipeline can store it
//! next to the embedded vector without knowing its keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value metadata attached to documents and segments.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata keys produced by the splitters.
pub mod keys {
    pub const SPLIT_TYPE: &str = "split_type";
    pub const ARTICLE_NUMBER: &str = "article_number";
    pub const ARTICLE_INDEX: &str = "article_index";
    pub const CLAUSE_NUMBER: &str = "clause_number";
    pub const BOOK: &str = "book";
    pub const CHAPTER: &str = "chapter";
    pub const CHAPTER_TITLE: &str = "chapter_title";
    pub const SECTION: &str = "section";
    pub const HIERARCHY_PATH: &str = "hierarchy_path";
    pub const LAW_NAME: &str = "law_name";
    pub const LAW_CATEGORY: &str = "law_category";
    pub const PART: &str = "part";
    pub const TOTAL_PARTS: &str = "total_parts";
    pub const FRAGMENT_INDEX: &str = "fragment_index";
    pub const TOTAL_FRAGMENTS: &str = "total_fragments";
    pub const SEGMENT_INDEX: &str = "segment_index";
    pub const TOTAL_SEGMENTS: &str = "total_segments";

    /// Base metadata key carrying the uploaded file name.
    pub const ORIGINAL_FILENAME: &str = "original_filename";
}

/// Which strategy produced a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    /// Article found by the hierarchy-tracking walk.
    ArticleHierarchical,

    /// Article found by the flat lookahead split.
    Article,

    /// Fragment of an oversized article.
    ArticlePart,

    /// Text preceding the first article of a document or heading.
    Preamble,

    /// Clause or chapter unit of a structured contract.
    ContractStructured,

    /// Paragraph of an unstructured contract.
    ContractParagraph,

    /// Paragraph of a document without article markers.
    FallbackParagraph,

    /// Window of a document that is a single paragraph.
    FallbackForced,

    /// Window produced by the generic splitter.
    RecursiveWindow,
}

impl SplitType {
    /// Get the string value stored under `split_type`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArticleHierarchical => "article_hierarchical",
            Self::Article => "article",
            Self::ArticlePart => "article_part",
            Self::Preamble => "preamble",
            Self::ContractStructured => "contract_structured",
            Self::ContractParagraph => "contract_paragraph",
            Self::FallbackParagraph => "fallback_paragraph",
            Self::FallbackForced => "fallback_forced",
            Self::RecursiveWindow => "recursive_window",
        }
    }
}

impl std::fmt::Display for SplitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw document text plus caller-supplied metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,

    #[serde(default)]
    pub base_metadata: Metadata,
}

impl Document {
    /// Create a document without base metadata.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            base_metadata: Metadata::new(),
        }
    }

    /// Add a base metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base_metadata.insert(key.into(), value.into());
        self
    }

    /// The `original_filename` base metadata entry, if it is a string.
    #[must_use]
    pub fn original_filename(&self) -> Option<&str> {
        self.base_metadata
            .get(keys::ORIGINAL_FILENAME)
            .and_then(Value::as_str)
    }
}

/// A bounded unit of text plus metadata, the output atom of every splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub metadata: Metadata,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Look up a string metadata value.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Look up an integer metadata value.
    #[must_use]
    pub fn meta_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(Value::as_u64)
    }

    /// The `split_type` tag of this segment.
    #[must_use]
    pub fn split_type(&self) -> Option<&str> {
        self.meta_str(keys::SPLIT_TYPE)
    }
}
