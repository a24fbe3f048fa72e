//! Legal Segmenter - Split Chinese statutes and contracts into retrieval-sized segments.
//!
//! This crate turns raw legal text into an ordered list of segments, each
//! within a token budget and annotated with where it sits in the document
//! (book, chapter, section, article or clause).
//!
//! # Example
//!
//! ```
//! use legal_segmenter::{select_splitter, Document, DocumentSplitter};
//!
//! let text = "第一章 总则\n第一条 内容A\n第二条 内容B\n第二章 分则\n第三条 内容C";
//! let segments = select_splitter("LAW").split(&Document::new(text));
//!
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[0].meta_str("hierarchy_path"), Some("第一章 > 第一条"));
//! assert_eq!(segments[2].meta_str("chapter"), Some("第二章"));
//! ```
//!
//! # Architecture
//!
//! - [`patterns`]: Structural marker matchers and re-split separators
//! - [`resplit`]: Recursive re-splitter enforcing the token budget
//! - [`splitting`]: Legal, contract and generic splitters plus the factory
//! - [`numerals`]: CJK numeral conversion for article ordinals
//! - [`metadata`]: Law name and category inference, metadata merging
//! - [`text`]: Token estimation, paragraphs and normalization
//! - [`types`]: Documents, segments and metadata keys
//! - [`config`]: Splitter configuration and settings files
//! - [`error`]: Error types and Result alias
//! - [`output`]: JSON and YAML segment reports
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod numerals;
pub mod output;
pub mod patterns;
pub mod resplit;
pub mod splitting;
pub mod text;
pub mod types;

// Re-export commonly used items
pub use config::{SegmenterSettings, SplitterConfig};
pub use error::{Result, SegmenterError};
pub use resplit::RecursiveSplitter;
pub use splitting::{
    select_splitter, DocumentSplitter, DocumentType, SplitterFactory, SplitterHandle, SplitterKind,
};
pub use types::{Document, Metadata, Segment, SplitType};
