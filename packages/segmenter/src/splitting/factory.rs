//! Splitter selection by document type or file name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SegmenterSettings;
use crate::metadata::{contains_keyword, ends_with_keyword, file_stem, infer_law_name};
use crate::types::{Document, Segment};

use super::contract::ContractSplitter;
use super::generic::GenericSplitter;
use super::legal::LegalSplitter;
use super::strategy::{DocumentSplitter, SplitterKind};

/// Document type tag supplied by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Statute (法律).
    Law,

    /// Administrative regulation or rule (法规, 规章).
    Regulation,

    /// Contract template (合同范本).
    ContractTemplate,

    /// Signed contract.
    Contract,

    /// Court case or judgment.
    Case,

    /// Anything else.
    Unknown,
}

impl DocumentType {
    /// All document types.
    pub const ALL: [Self; 6] = [
        Self::Law,
        Self::Regulation,
        Self::ContractTemplate,
        Self::Contract,
        Self::Case,
        Self::Unknown,
    ];

    /// Get the tag string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Law => "LAW",
            Self::Regulation => "REGULATION",
            Self::ContractTemplate => "CONTRACT_TEMPLATE",
            Self::Contract => "CONTRACT",
            Self::Case => "CASE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a tag, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|doc_type| doc_type.as_str().eq_ignore_ascii_case(tag))
    }

    /// Which splitter family handles this type.
    #[must_use]
    pub fn splitter_kind(&self) -> SplitterKind {
        match self {
            Self::Law | Self::Regulation => SplitterKind::Legal,
            Self::Contract | Self::ContractTemplate => SplitterKind::Contract,
            Self::Case | Self::Unknown => SplitterKind::Generic,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(DocumentType::as_str).collect();
            format!("unknown document type '{s}', expected one of {}", known.join(", "))
        })
    }
}

/// Name endings that mark a file as a statute or regulation.
static LEGAL_SUFFIXES: &[&str] = &[
    "法", "法典", "条例", "规定", "办法", "细则", "解释", "law", "regulation", "regulations",
];

/// Keywords that mark a file as a contract.
static CONTRACT_KEYWORDS: &[&str] = &["合同", "协议", "契约", "contract", "agreement"];

/// Keywords that mark a file as legal text.
static LEGAL_KEYWORDS: &[&str] = &[
    "法", "条例", "规章", "司法解释", "law", "regulation", "statute", "act",
];

/// Guess the splitter family from a file name.
///
/// A legal name ending wins over contract keywords, so `合同法.txt` is a
/// statute while `劳动合同范本.docx` is a contract. English keywords only
/// match whole words of the name.
///
/// # Examples
/// ```
/// use legal_segmenter::splitting::{kind_for_filename, SplitterKind};
///
/// assert_eq!(kind_for_filename("中华人民共和国合同法.txt"), SplitterKind::Legal);
/// assert_eq!(kind_for_filename("房屋租赁合同.docx"), SplitterKind::Contract);
/// assert_eq!(kind_for_filename("会议纪要.txt"), SplitterKind::Generic);
/// ```
#[must_use]
pub fn kind_for_filename(filename: &str) -> SplitterKind {
    let name = infer_law_name(filename).to_lowercase();
    let stem = file_stem(filename).to_lowercase();

    if LEGAL_SUFFIXES.iter().any(|suffix| ends_with_keyword(&name, suffix)) {
        SplitterKind::Legal
    } else if CONTRACT_KEYWORDS.iter().any(|keyword| contains_keyword(&stem, keyword)) {
        SplitterKind::Contract
    } else if LEGAL_KEYWORDS.iter().any(|keyword| contains_keyword(&stem, keyword)) {
        SplitterKind::Legal
    } else {
        SplitterKind::Generic
    }
}

/// A splitter of any family, selected at runtime.
#[derive(Debug, Clone)]
pub enum SplitterHandle {
    Legal(LegalSplitter),
    Contract(ContractSplitter),
    Generic(GenericSplitter),
}

impl DocumentSplitter for SplitterHandle {
    fn split(&self, document: &Document) -> Vec<Segment> {
        match self {
            Self::Legal(splitter) => splitter.split(document),
            Self::Contract(splitter) => splitter.split(document),
            Self::Generic(splitter) => splitter.split(document),
        }
    }

    fn kind(&self) -> SplitterKind {
        match self {
            Self::Legal(splitter) => splitter.kind(),
            Self::Contract(splitter) => splitter.kind(),
            Self::Generic(splitter) => splitter.kind(),
        }
    }
}

/// Builds splitters from a set of per-family configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitterFactory {
    settings: SegmenterSettings,
}

impl SplitterFactory {
    /// Create a factory handing out splitters with the given settings.
    #[must_use]
    pub fn new(settings: SegmenterSettings) -> Self {
        Self { settings }
    }

    /// The settings in effect.
    #[must_use]
    pub fn settings(&self) -> &SegmenterSettings {
        &self.settings
    }

    /// Build the splitter for a family.
    #[must_use]
    pub fn splitter(&self, kind: SplitterKind) -> SplitterHandle {
        match kind {
            SplitterKind::Legal => SplitterHandle::Legal(LegalSplitter::new(self.settings.legal)),
            SplitterKind::Contract => {
                SplitterHandle::Contract(ContractSplitter::new(self.settings.contract))
            }
            SplitterKind::Generic => {
                SplitterHandle::Generic(GenericSplitter::new(self.settings.generic))
            }
        }
    }

    /// Resolve a document type tag or a file name to a splitter family.
    ///
    /// Known type tags win; anything else is treated as a file name.
    #[must_use]
    pub fn resolve(type_or_filename: &str) -> SplitterKind {
        match DocumentType::parse(type_or_filename) {
            Some(doc_type) => doc_type.splitter_kind(),
            None => kind_for_filename(type_or_filename),
        }
    }

    /// Select a splitter by document type tag or file name. Never fails.
    #[must_use]
    pub fn select(&self, type_or_filename: &str) -> SplitterHandle {
        let kind = Self::resolve(type_or_filename);
        tracing::debug!(input = type_or_filename, %kind, "Selected splitter");
        self.splitter(kind)
    }
}

/// Select a default-configured splitter by document type tag or file name.
#[must_use]
pub fn select_splitter(type_or_filename: &str) -> SplitterHandle {
    SplitterFactory::default().select(type_or_filename)
}
