//! Splitter for contracts and contract templates.
//!
//! A contract counts as structured when at least three chapter, article or
//! numbered-item lines are found. Structured contracts are walked line by
//! line, buffering text until the next chapter, article or clause marker.
//! Anything else is split into paragraphs.

use serde_json::Value;

use crate::config::{
    SplitterConfig, CONTRACT_MARKER_SCAN_CAP, CONTRACT_MIN_MARKERS, HIERARCHY_SEPARATOR,
};
use crate::metadata::{insert_opt, merge_base};
use crate::patterns::{classify_contract_line, count_contract_markers, ContractLine};
use crate::resplit::RecursiveSplitter;
use crate::text::paragraphs;
use crate::types::{keys, Document, Metadata, Segment, SplitType};

use super::strategy::{DocumentSplitter, Ladder, SplitterKind};
use super::types::{expand_unit, number_segments, PartNumbering};

/// Clause-aware splitter for contracts.
#[derive(Debug, Clone)]
pub struct ContractSplitter {
    config: SplitterConfig,
    resplitter: RecursiveSplitter,
}

impl ContractSplitter {
    /// Create a contract splitter.
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

    fn ladder() -> Ladder<Self> {
        Ladder::new()
            .then("structured", Self::split_structured)
            .then("paragraph", Self::split_paragraphs)
    }

    fn split_structured(&self, document: &Document) -> Option<Vec<Segment>> {
        let counts = count_contract_markers(&document.text, CONTRACT_MARKER_SCAN_CAP);
        if counts.total() < CONTRACT_MIN_MARKERS {
            tracing::debug!(
                markers = counts.total(),
                "Too few contract markers for structured split"
            );
            return None;
        }

        let mut walk = ClauseWalk::new(&self.resplitter);
        for line in document.text.lines() {
            walk.push_line(line);
        }
        Some(walk.finish())
    }

    fn split_paragraphs(&self, document: &Document) -> Option<Vec<Segment>> {
        Some(
            paragraphs(&document.text)
                .iter()
                .flat_map(|paragraph| {
                    let mut metadata = Metadata::new();
                    metadata.insert(
                        keys::SPLIT_TYPE.into(),
                        Value::from(SplitType::ContractParagraph.as_str()),
                    );
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
}

impl Default for ContractSplitter {
    fn default() -> Self {
        Self::new(SplitterConfig::contract())
    }
}

impl DocumentSplitter for ContractSplitter {
    fn split(&self, document: &Document) -> Vec<Segment> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        let mut segments = Self::ladder().run(self, document);
        number_segments(&mut segments);
        for segment in &mut segments {
            merge_base(&mut segment.metadata, &document.base_metadata);
        }

        tracing::debug!(segments = segments.len(), "Contract split complete");
        segments
    }

    fn kind(&self) -> SplitterKind {
        SplitterKind::Contract
    }
}

/// Line walk over a structured contract.
struct ClauseWalk<'a> {
    resplitter: &'a RecursiveSplitter,
    chapter: Option<String>,
    chapter_title: Option<String>,
    article: Option<String>,
    clause: Option<String>,
    buffer: Vec<String>,
    segments: Vec<Segment>,
}

impl<'a> ClauseWalk<'a> {
    fn new(resplitter: &'a RecursiveSplitter) -> Self {
        Self {
            resplitter,
            chapter: None,
            chapter_title: None,
            article: None,
            clause: None,
            buffer: Vec::new(),
            segments: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match classify_contract_line(line) {
            ContractLine::Chapter(marker) => {
                self.flush();
                self.chapter = Some(marker.label.to_string());
                self.chapter_title = (!marker.rest.is_empty()).then(|| marker.rest.to_string());
                self.article = None;
                self.clause = None;
                self.buffer.push(line.to_string());
            }
            ContractLine::Article(marker) => {
                self.flush();
                self.article = Some(marker.label.to_string());
                self.clause = None;
                self.buffer.push(line.to_string());
            }
            ContractLine::Clause(marker) => {
                self.flush();
                self.clause = Some(marker.label.to_string());
                self.buffer.push(line.to_string());
            }
            ContractLine::NumberedItem(_) => {
                // Items stay with their clause unless it has already overflowed
                if self.over_budget() {
                    self.flush();
                }
                self.buffer.push(line.to_string());
            }
            ContractLine::Text(text) => {
                self.buffer.push(text.to_string());
                if self.over_budget() {
                    self.flush();
                }
            }
        }
    }

    fn over_budget(&self) -> bool {
        !self.buffer.is_empty() && !self.resplitter.fits(&self.buffer.join("\n"))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(
            keys::SPLIT_TYPE.into(),
            Value::from(SplitType::ContractStructured.as_str()),
        );
        insert_opt(&mut metadata, keys::CHAPTER, self.chapter.as_deref());
        insert_opt(&mut metadata, keys::CHAPTER_TITLE, self.chapter_title.as_deref());
        insert_opt(&mut metadata, keys::ARTICLE_NUMBER, self.article.as_deref());
        insert_opt(
            &mut metadata,
            keys::CLAUSE_NUMBER,
            self.clause.as_deref().or(self.article.as_deref()),
        );

        let path: Vec<&str> = [
            self.chapter.as_deref(),
            self.article.as_deref(),
            self.clause.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !path.is_empty() {
            metadata.insert(
                keys::HIERARCHY_PATH.into(),
                Value::from(path.join(HIERARCHY_SEPARATOR)),
            );
        }
        metadata
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = self.buffer.join("\n");
        self.buffer.clear();
        let metadata = self.metadata();
        self.segments.extend(expand_unit(
            self.resplitter,
            &text,
            metadata,
            PartNumbering::Parts,
            None,
        ));
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn split(text: &str) -> Vec<Segment> {
        ContractSplitter::default().split(&Document::new(text))
    }

    #[test]
    fn test_structured_contract() {
        let text = "第一章 总则\n\
                    第一条 合同标的\n\
                    甲方向乙方出售设备一台。\n\
                    第二条 价款\n\
                    1. 首付款人民币十万元；\n\
                    2. 尾款人民币五万元。\n\
                    第二章 违约责任\n\
                    第三条 违约金\n\
                    逾期交付的，每日支付千分之一违约金。";
        let segments = split(text);

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "第一章 总则",
                "第一条 合同标的\n甲方向乙方出售设备一台。",
                "第二条 价款\n1. 首付款人民币十万元；\n2. 尾款人民币五万元。",
                "第二章 违约责任",
                "第三条 违约金\n逾期交付的，每日支付千分之一违约金。",
            ]
        );

        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.split_type(), Some("contract_structured"));
            assert_eq!(segment.meta_u64(keys::SEGMENT_INDEX), Some(i as u64));
            assert_eq!(segment.meta_u64(keys::TOTAL_SEGMENTS), Some(5));
        }

        assert_eq!(segments[2].meta_str(keys::CLAUSE_NUMBER), Some("第二条"));
        assert_eq!(segments[2].meta_str(keys::CHAPTER), Some("第一章"));
        assert_eq!(segments[4].meta_str(keys::CHAPTER), Some("第二章"));
        assert_eq!(segments[4].meta_str(keys::CHAPTER_TITLE), Some("违约责任"));
        assert_eq!(segments[4].meta_str(keys::HIERARCHY_PATH), Some("第二章 > 第三条"));
        assert!(!segments[0].metadata.contains_key(keys::CLAUSE_NUMBER));
    }

    #[test]
    fn test_clause_lines_refine_clause_number() {
        let text = "第一条 付款\n第一款 首付\n第二款 尾款\n第二条 交付\n第三条 验收";
        let segments = split(text);

        assert_eq!(segments[1].meta_str(keys::ARTICLE_NUMBER), Some("第一条"));
        assert_eq!(segments[1].meta_str(keys::CLAUSE_NUMBER), Some("第一款"));
        assert_eq!(
            segments[2].meta_str(keys::HIERARCHY_PATH),
            Some("第一条 > 第二款")
        );
        assert_eq!(segments[3].meta_str(keys::CLAUSE_NUMBER), Some("第二条"));
    }

    #[test]
    fn test_two_markers_use_paragraph_mode() {
        let text = "第一条 标的\n设备一台。\n\n第二条 价款\n十万元。";
        let segments = split(text);

        assert_eq!(segments.len(), 2);
        for segment in &segments {
            assert_eq!(segment.split_type(), Some("contract_paragraph"));
        }
        assert_eq!(segments[0].text, "第一条 标的\n设备一台。");
        assert_eq!(segments[1].meta_u64(keys::TOTAL_SEGMENTS), Some(2));
    }

    #[test]
    fn test_three_markers_use_structured_mode() {
        let text = "第一条 标的\n设备一台。\n\n第二条 价款\n十万元。\n第三条 交付\n当日交付。";
        let segments = split(text);

        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert_eq!(segment.split_type(), Some("contract_structured"));
        }
    }

    #[test]
    fn test_numbered_items_count_toward_gate() {
        let text = "付款安排如下：\n1. 首付\n2. 中期款\n3. 尾款";
        let segments = split(text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].split_type(), Some("contract_structured"));
        assert_eq!(segments[0].text, "付款安排如下：\n1. 首付\n2. 中期款\n3. 尾款");
    }

    #[test]
    fn test_overflowing_text_is_flushed() {
        let splitter =
            ContractSplitter::new(SplitterConfig::contract().with_max_tokens(10).with_overlap(0));
        let text = "第一条 标的\n第二条 价款\n第三条 交付\n\
                    甲方应当在合同签订后三日内交付全部设备。\n\
                    乙方应当在收到设备后五日内完成验收。\n\
                    验收合格后乙方支付全部价款。";
        let segments = splitter.split(&Document::new(text));

        for segment in &segments {
            assert!(segment.text.chars().count() / 3 <= 10, "{}", segment.text);
            assert!(segment.meta_str(keys::CLAUSE_NUMBER).is_some());
        }
        let last = segments.last().unwrap();
        assert_eq!(last.meta_str(keys::CLAUSE_NUMBER), Some("第三条"));
    }

    #[test]
    fn test_numbered_item_after_overflowing_article_starts_new_segment() {
        let splitter =
            ContractSplitter::new(SplitterConfig::contract().with_max_tokens(5).with_overlap(0));
        let text = "第一条 甲方应当按照本合同约定的期限支付全部价款\n1. 首付\n2. 尾款";
        let segments = splitter.split(&Document::new(text));

        assert!(segments.len() >= 3);
        let (items, article) = segments.split_last().unwrap();
        for part in article {
            assert_eq!(part.meta_str(keys::CLAUSE_NUMBER), Some("第一条"));
            assert!(part.meta_u64(keys::PART).is_some());
            assert!(!part.text.contains("首付"));
        }

        assert_eq!(items.text, "1. 首付\n2. 尾款");
        assert_eq!(items.split_type(), Some("contract_structured"));
        assert_eq!(items.meta_str(keys::CLAUSE_NUMBER), Some("第一条"));
        assert_eq!(items.meta_str(keys::ARTICLE_NUMBER), Some("第一条"));
        assert!(!items.metadata.contains_key(keys::PART));
    }

    #[test]
    fn test_oversized_paragraph_is_fragmented() {
        let splitter =
            ContractSplitter::new(SplitterConfig::contract().with_max_tokens(5).with_overlap(0));
        let text = "本协议由双方友好协商订立。双方应当遵守协议约定。";
        let segments = splitter.split(&Document::new(text));

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].meta_u64(keys::FRAGMENT_INDEX), Some(0));
        assert_eq!(segments[1].meta_u64(keys::TOTAL_FRAGMENTS), Some(2));
        assert_eq!(segments[1].meta_u64(keys::SEGMENT_INDEX), Some(1));
    }

    #[test]
    fn test_base_metadata_is_merged() {
        let document = Document::new("甲乙双方协商一致。").with_metadata("tenant", "acme");
        let segments = ContractSplitter::default().split(&document);
        assert_eq!(segments[0].meta_str("tenant"), Some("acme"));
    }

    #[test]
    fn test_blank_input() {
        assert!(split("").is_empty());
        assert!(split("\n\n  \n").is_empty());
    }
}
