//! Document splitters for Chinese legal texts.
//!
//! Three splitter families share the [`DocumentSplitter`] contract:
//! [`LegalSplitter`] for statutes, [`ContractSplitter`] for contracts and
//! [`GenericSplitter`] for everything else. [`SplitterFactory`] picks one by
//! document type tag or file name.

mod contract;
mod factory;
mod generic;
mod hierarchy;
mod legal;
mod strategy;
mod types;

pub use contract::ContractSplitter;
pub use factory::{
    kind_for_filename, select_splitter, DocumentType, SplitterFactory, SplitterHandle,
};
pub use generic::GenericSplitter;
pub use hierarchy::{walk, HierarchyState};
pub use legal::LegalSplitter;
pub use strategy::{DocumentSplitter, Ladder, Rung, SplitterKind};
pub use types::{expand_unit, number_segments, LegalUnit, PartNumbering, SplitContext};
