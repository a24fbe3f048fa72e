//! The splitter contract and first-success strategy ladders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Document, Segment};

/// Common interface of every document splitter.
///
/// Splitting is total: any input yields a (possibly empty) list of segments,
/// never an error.
pub trait DocumentSplitter {
    /// Split a document into ordered segments.
    fn split(&self, document: &Document) -> Vec<Segment>;

    /// Which splitter family this is.
    fn kind(&self) -> SplitterKind;
}

/// The splitter families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// Statutes and regulations.
    Legal,

    /// Contracts and contract templates.
    Contract,

    /// Everything else.
    Generic,
}

impl SplitterKind {
    /// Get the lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Contract => "contract",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for SplitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strategy of a ladder.
///
/// `None` or an empty result means the strategy does not apply and the next
/// rung is tried.
pub type Rung<S> = fn(&S, &Document) -> Option<Vec<Segment>>;

/// An ordered list of strategies where the first non-empty result wins.
pub struct Ladder<S> {
    rungs: Vec<(&'static str, Rung<S>)>,
}

impl<S> Ladder<S> {
    /// Create an empty ladder.
    #[must_use]
    pub fn new() -> Self {
        Self { rungs: Vec::new() }
    }

    /// Append a strategy.
    #[must_use]
    pub fn then(mut self, name: &'static str, rung: Rung<S>) -> Self {
        self.rungs.push((name, rung));
        self
    }

    /// Names of the rungs, in order.
    #[cfg(test)]
    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rungs.iter().map(|(name, _)| *name)
    }

    /// Run rungs in order and return the first non-empty result.
    ///
    /// Returns an empty list when every rung declines.
    pub fn run(&self, splitter: &S, document: &Document) -> Vec<Segment> {
        for (name, rung) in &self.rungs {
            match rung(splitter, document) {
                Some(segments) if !segments.is_empty() => {
                    tracing::debug!(strategy = name, segments = segments.len(), "Strategy applied");
                    return segments;
                }
                _ => tracing::debug!(strategy = name, "Strategy declined"),
            }
        }
        Vec::new()
    }
}

impl<S> Default for Ladder<S> {
    fn default() -> Self {
        Self::new()
    }
}
