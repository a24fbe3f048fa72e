//! Structural pattern library.
//!
//! Pure matchers for hierarchy markers at the start of a line and for the
//! boundary characters used when re-splitting oversized text. Matchers take a
//! line, trim leading whitespace, and return the captured marker plus the rest
//! of the line. No matcher has side effects.

use regex::Regex;
use std::sync::LazyLock;

/// Character class of a numeral run: CJK digits and units, ASCII and full-width digits.
macro_rules! numeral {
    () => {
        "[零〇一二两三四五六七八九十百千万0-9０-９]+"
    };
}

/// Book marker: `第二编`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BOOK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"^(第", numeral!(), r"编)\s*(.*)$")).expect("valid regex")
});

/// Chapter marker: `第三章`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"^(第", numeral!(), r"章)\s*(.*)$")).expect("valid regex")
});

/// Section marker: `第一节`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"^(第", numeral!(), r"节)\s*(.*)$")).expect("valid regex")
});

/// Article marker: `第十二条`, `第十条之一`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(第",
        numeral!(),
        r"条(?:之",
        numeral!(),
        r")?)\s*(.*)$"
    ))
    .expect("valid regex")
});

/// Article marker anywhere in running text, preceded by a boundary.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_ANYWHERE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:^|[\s。；;])(第",
        numeral!(),
        r"条(?:之",
        numeral!(),
        r")?)"
    ))
    .expect("valid regex")
});

/// Contract clause marker: `第二款`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLAUSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"^(第", numeral!(), r"款)\s*(.*)$")).expect("valid regex")
});

/// Contract chapter marker: `第一章` or `第一部分`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTRACT_CHAPTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"^(第", numeral!(), r"(?:章|部分))\s*(.*)$")).expect("valid regex")
});

/// Numbered list item: `1.`, `2、`, `3)`, `４）`. Decimals such as `1.5` are not items.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBERED_ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9０-９]+[.．、)）])([^0-9０-９].*)?$").expect("valid regex")
});

/// A structural marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// The marker itself, e.g. `第十二条`.
    pub label: &'a str,

    /// The remainder of the line after the marker, trimmed.
    pub rest: &'a str,
}

fn match_line<'a>(pattern: &Regex, line: &'a str) -> Option<Marker<'a>> {
    let caps = pattern.captures(line.trim())?;
    let label = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str().trim());
    Some(Marker { label, rest })
}

/// Match a book marker (`第X编`).
#[must_use]
pub fn match_book(line: &str) -> Option<Marker<'_>> {
    match_line(&BOOK_PATTERN, line)
}

/// Match a chapter marker (`第X章`).
#[must_use]
pub fn match_chapter(line: &str) -> Option<Marker<'_>> {
    match_line(&CHAPTER_PATTERN, line)
}

/// Match a section marker (`第X节`).
#[must_use]
pub fn match_section(line: &str) -> Option<Marker<'_>> {
    match_line(&SECTION_PATTERN, line)
}

/// Match an article marker (`第X条`, `第X条之Y`).
///
/// # Examples
/// ```
/// use legal_segmenter::patterns::match_article;
///
/// let marker = match_article("第十二条 合同当事人的法律地位平等。").unwrap();
/// assert_eq!(marker.label, "第十二条");
/// assert_eq!(marker.rest, "合同当事人的法律地位平等。");
/// assert!(match_article("依照本法第十二条").is_none());
/// ```
#[must_use]
pub fn match_article(line: &str) -> Option<Marker<'_>> {
    match_line(&ARTICLE_PATTERN, line)
}

/// Match a contract article marker (`第X条`).
#[must_use]
pub fn match_contract_article(line: &str) -> Option<Marker<'_>> {
    match_line(&ARTICLE_PATTERN, line)
}

/// Match a contract clause marker (`第X款`).
#[must_use]
pub fn match_contract_clause(line: &str) -> Option<Marker<'_>> {
    match_line(&CLAUSE_PATTERN, line)
}

/// Match a contract chapter marker (`第X章`, `第X部分`).
#[must_use]
pub fn match_contract_chapter(line: &str) -> Option<Marker<'_>> {
    match_line(&CONTRACT_CHAPTER_PATTERN, line)
}

/// Match a numbered list item (`1.`, `2、`, `3)`).
#[must_use]
pub fn match_numbered_item(line: &str) -> Option<Marker<'_>> {
    match_line(&NUMBERED_ITEM_PATTERN, line)
}

/// Classification of a line of statute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalLine<'a> {
    Book(Marker<'a>),
    Chapter(Marker<'a>),
    Section(Marker<'a>),
    Article(Marker<'a>),
    Text(&'a str),
}

/// Classify a line of statute text, highest level first.
#[must_use]
pub fn classify_legal_line(line: &str) -> LegalLine<'_> {
    if let Some(marker) = match_book(line) {
        LegalLine::Book(marker)
    } else if let Some(marker) = match_chapter(line) {
        LegalLine::Chapter(marker)
    } else if let Some(marker) = match_section(line) {
        LegalLine::Section(marker)
    } else if let Some(marker) = match_article(line) {
        LegalLine::Article(marker)
    } else {
        LegalLine::Text(line.trim())
    }
}

/// Classification of a line of contract text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractLine<'a> {
    Chapter(Marker<'a>),
    Article(Marker<'a>),
    Clause(Marker<'a>),
    NumberedItem(Marker<'a>),
    Text(&'a str),
}

/// Classify a line of contract text.
#[must_use]
pub fn classify_contract_line(line: &str) -> ContractLine<'_> {
    if let Some(marker) = match_contract_chapter(line) {
        ContractLine::Chapter(marker)
    } else if let Some(marker) = match_contract_article(line) {
        ContractLine::Article(marker)
    } else if let Some(marker) = match_contract_clause(line) {
        ContractLine::Clause(marker)
    } else if let Some(marker) = match_numbered_item(line) {
        ContractLine::NumberedItem(marker)
    } else {
        ContractLine::Text(line.trim())
    }
}

/// Byte offsets at which an article marker starts, anywhere in `text`.
///
/// A marker counts when it opens the text or follows whitespace or `。；`.
/// Splitting at these offsets keeps each marker at the head of its piece.
#[must_use]
pub fn article_starts(text: &str) -> Vec<usize> {
    ARTICLE_ANYWHERE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.start()))
        .collect()
}

/// Split `text` immediately before every article marker.
///
/// The first piece holds whatever precedes the first marker and may be
/// blank. Returns `None` when the text contains no article marker.
#[must_use]
pub fn split_before_articles(text: &str) -> Option<Vec<&str>> {
    let starts = article_starts(text);
    if starts.is_empty() {
        return None;
    }

    let mut pieces = Vec::with_capacity(starts.len() + 1);
    let mut prev = 0;
    for start in starts {
        pieces.push(&text[prev..start]);
        prev = start;
    }
    pieces.push(&text[prev..]);
    Some(pieces)
}

/// Number of structural markers found in a contract, per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCounts {
    pub chapters: usize,
    pub articles: usize,
    pub numbered_items: usize,
}

impl MarkerCounts {
    /// Combined count over all types.
    #[must_use]
    pub fn total(&self) -> usize {
        self.chapters + self.articles + self.numbered_items
    }
}

/// Count chapter, article and numbered-item lines, at most `cap` per type.
#[must_use]
pub fn count_contract_markers(text: &str, cap: usize) -> MarkerCounts {
    let mut counts = MarkerCounts::default();

    for line in text.lines() {
        if match_contract_chapter(line).is_some() {
            counts.chapters = (counts.chapters + 1).min(cap);
        } else if match_contract_article(line).is_some() {
            counts.articles = (counts.articles + 1).min(cap);
        } else if match_numbered_item(line).is_some() {
            counts.numbered_items = (counts.numbered_items + 1).min(cap);
        }

        if counts.chapters >= cap && counts.articles >= cap && counts.numbered_items >= cap {
            break;
        }
    }

    counts
}

/// A boundary used by the recursive re-splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// A literal string such as a paragraph break.
    Literal(&'static str),

    /// Any one of a set of punctuation characters.
    AnyOf(&'static [char]),

    /// Any Unicode whitespace character.
    Whitespace,
}

impl Separator {
    /// Whether the separator occurs in `text`.
    #[must_use]
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Self::Literal(s) => text.contains(s),
            Self::AnyOf(chars) => text.contains(|c: char| chars.contains(&c)),
            Self::Whitespace => text.contains(char::is_whitespace),
        }
    }

    /// Split `text` after every occurrence, keeping the separator on the left piece.
    ///
    /// Concatenating the pieces reproduces `text` exactly.
    #[must_use]
    pub fn split_inclusive<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal(s) => text.split_inclusive(*s).collect(),
            Self::AnyOf(chars) => text.split_inclusive(|c: char| chars.contains(&c)).collect(),
            Self::Whitespace => text.split_inclusive(char::is_whitespace).collect(),
        }
    }
}

/// Sentence-ending punctuation.
pub const SENTENCE_ENDINGS: &[char] = &['。', '！', '？', '!', '?', '；'];

/// Clause-level punctuation.
pub const CLAUSE_MARKS: &[char] = &['；', ';', '，', ',', '、'];

/// Re-split separators, highest priority first.
pub const SEPARATORS: &[Separator] = &[
    Separator::Literal("\n\n"),
    Separator::Literal("\n"),
    Separator::AnyOf(SENTENCE_ENDINGS),
    Separator::AnyOf(CLAUSE_MARKS),
    Separator::Whitespace,
];
