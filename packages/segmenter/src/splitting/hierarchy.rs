//! Hierarchy-tracking walk over statute lines.
//!
//! The walk is a fold: [`HierarchyState::step`] consumes one line and returns
//! the next state plus the unit closed by that line, if any. Books reset
//! chapter and section, chapters reset section, and every article marker
//! closes the open unit.

use crate::patterns::{classify_legal_line, LegalLine};

use super::types::{LegalUnit, SplitContext};

/// A unit still receiving lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenUnit {
    article_number: Option<String>,
    context: SplitContext,
    lines: Vec<String>,
}

impl OpenUnit {
    fn close(self) -> LegalUnit {
        LegalUnit {
            article_number: self.article_number,
            context: self.context,
            text: self.lines.join("\n"),
        }
    }
}

/// State of the hierarchy walk between two lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyState {
    context: SplitContext,
    open: Option<OpenUnit>,
}

impl HierarchyState {
    /// Start a walk at the top of a document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ancestors currently in effect.
    #[cfg(test)]
    fn context(&self) -> &SplitContext {
        &self.context
    }

    /// Consume one line.
    ///
    /// Blank lines are ignored. Heading lines update the context and close
    /// the open unit; they are not part of any unit text. Text before the
    /// first article of a heading opens a preamble unit.
    #[must_use]
    pub fn step(self, line: &str) -> (Self, Option<LegalUnit>) {
        let line = line.trim();
        if line.is_empty() {
            return (self, None);
        }

        let Self { context, open } = self;
        match classify_legal_line(line) {
            LegalLine::Book(marker) => (
                Self {
                    context: context.with_book(marker.label),
                    open: None,
                },
                open.map(OpenUnit::close),
            ),
            LegalLine::Chapter(marker) => (
                Self {
                    context: context.with_chapter(marker.label, marker.rest),
                    open: None,
                },
                open.map(OpenUnit::close),
            ),
            LegalLine::Section(marker) => (
                Self {
                    context: context.with_section(marker.label),
                    open: None,
                },
                open.map(OpenUnit::close),
            ),
            LegalLine::Article(marker) => {
                let next = OpenUnit {
                    article_number: Some(marker.label.to_string()),
                    context: context.clone(),
                    lines: vec![line.to_string()],
                };
                (
                    Self {
                        context,
                        open: Some(next),
                    },
                    open.map(OpenUnit::close),
                )
            }
            LegalLine::Text(text) => {
                let open = match open {
                    Some(mut unit) => {
                        unit.lines.push(text.to_string());
                        unit
                    }
                    None => OpenUnit {
                        article_number: None,
                        context: context.clone(),
                        lines: vec![text.to_string()],
                    },
                };
                (
                    Self {
                        context,
                        open: Some(open),
                    },
                    None,
                )
            }
        }
    }

    /// Close the walk, returning the unit still open.
    #[must_use]
    pub fn finish(self) -> Option<LegalUnit> {
        self.open.map(OpenUnit::close)
    }
}

/// Walk every line of `text` and collect the closed units in order.
#[must_use]
pub fn walk(text: &str) -> Vec<LegalUnit> {
    let (state, mut units) =
        text.lines()
            .fold((HierarchyState::new(), Vec::new()), |(state, mut units), line| {
                let (state, closed) = state.step(line);
                units.extend(closed);
                (state, units)
            });
    units.extend(state.finish());
    units
}
