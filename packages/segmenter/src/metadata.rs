//! Law name and category inference, and metadata merging.
//!
//! The category table is a static, ordered keyword list: the first keyword
//! contained in the file name decides the category, so more specific
//! keywords (`诉讼` in `民事诉讼法`) are listed before broader ones (`民事`).

use regex::Regex;
use std::sync::LazyLock;

use serde_json::Value;

use crate::types::{keys, Metadata};

/// Category used when a file name matches no keyword.
pub const DEFAULT_LAW_CATEGORY: &str = "其他";

/// Keyword → law category, checked in order.
static LAW_CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("宪法", "宪法"),
    ("constitution", "宪法"),
    ("诉讼", "诉讼与非诉讼程序法"),
    ("仲裁", "诉讼与非诉讼程序法"),
    ("procedure", "诉讼与非诉讼程序法"),
    ("刑法", "刑法"),
    ("刑事", "刑法"),
    ("criminal", "刑法"),
    ("专利", "知识产权法"),
    ("商标", "知识产权法"),
    ("著作权", "知识产权法"),
    ("知识产权", "知识产权法"),
    ("patent", "知识产权法"),
    ("trademark", "知识产权法"),
    ("copyright", "知识产权法"),
    ("劳动", "社会法"),
    ("社会保险", "社会法"),
    ("就业", "社会法"),
    ("labor", "社会法"),
    ("labour", "社会法"),
    ("公司", "商法"),
    ("证券", "商法"),
    ("保险", "商法"),
    ("票据", "商法"),
    ("破产", "商法"),
    ("合伙", "商法"),
    ("company", "商法"),
    ("securities", "商法"),
    ("税", "经济法"),
    ("预算", "经济法"),
    ("银行", "经济法"),
    ("反垄断", "经济法"),
    ("tax", "经济法"),
    ("行政", "行政法"),
    ("治安", "行政法"),
    ("许可", "行政法"),
    ("处罚", "行政法"),
    ("administrative", "行政法"),
    ("民法", "民法"),
    ("民事", "民法"),
    ("物权", "民法"),
    ("合同", "民法"),
    ("婚姻", "民法"),
    ("继承", "民法"),
    ("侵权", "民法"),
    ("civil", "民法"),
];

/// Trailing version annotation such as `（2020年修正）` or `(2018)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TRAILING_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[（(\[【][^（()）\[\]【】]*[)）\]】]\s*$").expect("valid regex")
});

/// File name without directories and without a short ASCII extension.
///
/// # Examples
/// ```
/// use legal_segmenter::metadata::file_stem;
///
/// assert_eq!(file_stem("uploads/民法典.pdf"), "民法典");
/// assert_eq!(file_stem(r"C:\laws\劳动法.docx"), "劳动法");
/// assert_eq!(file_stem("合同v1.2版"), "合同v1.2版");
/// ```
#[must_use]
pub fn file_stem(filename: &str) -> &str {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

/// Infer the law name from a file name, dropping version annotations.
///
/// # Examples
/// ```
/// use legal_segmenter::metadata::infer_law_name;
///
/// assert_eq!(infer_law_name("中华人民共和国民法典（2020年）.pdf"), "中华人民共和国民法典");
/// ```
#[must_use]
pub fn infer_law_name(filename: &str) -> String {
    let mut name = file_stem(filename).to_string();
    loop {
        let stripped = TRAILING_ANNOTATION.replace(&name, "").to_string();
        if stripped == name || stripped.is_empty() {
            break;
        }
        name = stripped;
    }
    name.trim().to_string()
}

/// ASCII words of a file name, split on anything that is not a letter or digit.
fn ascii_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Whether `text` contains `keyword`.
///
/// CJK keywords match anywhere; ASCII keywords only match a whole word, so
/// `law` matches `labor_law` but not `lawn_care`.
///
/// # Examples
/// ```
/// use legal_segmenter::metadata::contains_keyword;
///
/// assert!(contains_keyword("中华人民共和国刑法", "刑法"));
/// assert!(contains_keyword("service_agreement", "agreement"));
/// assert!(!contains_keyword("transaction_log", "act"));
/// ```
#[must_use]
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        ascii_words(text).any(|word| word == keyword)
    } else {
        text.contains(keyword)
    }
}

/// Whether `text` ends with `keyword`, as a whole word for ASCII keywords.
#[must_use]
pub fn ends_with_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        ascii_words(text).last() == Some(keyword)
    } else {
        text.ends_with(keyword)
    }
}

/// Infer the law category from a file name via the keyword table.
#[must_use]
pub fn infer_law_category(filename: &str) -> &'static str {
    let name = file_stem(filename).to_lowercase();
    LAW_CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| contains_keyword(&name, keyword))
        .map_or(DEFAULT_LAW_CATEGORY, |(_, category)| category)
}

/// `law_name` and `law_category` entries for a file name.
#[must_use]
pub fn law_metadata(filename: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(keys::LAW_NAME.into(), Value::from(infer_law_name(filename)));
    metadata.insert(
        keys::LAW_CATEGORY.into(),
        Value::from(infer_law_category(filename)),
    );
    metadata
}

/// Copy base metadata into `metadata` without overwriting existing keys.
///
/// Structural keys set by a splitter always win over caller keys.
pub fn merge_base(metadata: &mut Metadata, base: &Metadata) {
    for (key, value) in base {
        metadata
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// Insert a string entry when a value is present.
pub fn insert_opt(metadata: &mut Metadata, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), Value::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("民法典.txt"), "民法典");
        assert_eq!(file_stem("/tmp/a/b/刑法.PDF"), "刑法");
        assert_eq!(file_stem("no_extension"), "no_extension");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_infer_law_name_strips_annotations() {
        assert_eq!(
            infer_law_name("中华人民共和国公司法（2023年修订）.docx"),
            "中华人民共和国公司法"
        );
        assert_eq!(infer_law_name("劳动合同法 (2012) [现行有效].txt"), "劳动合同法");
        assert_eq!(infer_law_name("治安管理处罚法.txt"), "治安管理处罚法");
    }

    #[test]
    fn test_infer_law_name_keeps_annotation_only_names() {
        assert_eq!(infer_law_name("（草案）.txt"), "（草案）");
    }

    #[test]
    fn test_infer_law_category() {
        assert_eq!(infer_law_category("中华人民共和国民法典.pdf"), "民法");
        assert_eq!(infer_law_category("民事诉讼法.pdf"), "诉讼与非诉讼程序法");
        assert_eq!(infer_law_category("刑法修正案（十一）.txt"), "刑法");
        assert_eq!(infer_law_category("劳动合同法.txt"), "社会法");
        assert_eq!(infer_law_category("Patent_Law.txt"), "知识产权法");
        assert_eq!(infer_law_category("个人所得税法.txt"), "经济法");
        assert_eq!(infer_law_category("会议纪要.txt"), DEFAULT_LAW_CATEGORY);
        assert_eq!(infer_law_category("syntax_notes.txt"), DEFAULT_LAW_CATEGORY);
    }

    #[test]
    fn test_ascii_keywords_match_whole_words() {
        assert!(contains_keyword("labor_law", "law"));
        assert!(contains_keyword("civil law 2020", "law"));
        assert!(contains_keyword("民法典law", "law"));
        assert!(!contains_keyword("lawn_care", "law"));
        assert!(!contains_keyword("impact_report", "act"));

        assert!(ends_with_keyword("contract_law", "law"));
        assert!(!ends_with_keyword("law_firm_notes", "law"));
        assert!(!ends_with_keyword("outlaw", "law"));
        assert!(ends_with_keyword("合同法", "法"));
    }

    #[test]
    fn test_law_metadata() {
        let metadata = law_metadata("uploads/中华人民共和国刑法(2020).pdf");
        assert_eq!(metadata[keys::LAW_NAME], "中华人民共和国刑法");
        assert_eq!(metadata[keys::LAW_CATEGORY], "刑法");
    }

    #[test]
    fn test_merge_base_never_overwrites() {
        let mut metadata = Metadata::new();
        metadata.insert(keys::CHAPTER.into(), "第一章".into());

        let mut base = Metadata::new();
        base.insert(keys::CHAPTER.into(), "caller value".into());
        base.insert("source".into(), "upload".into());

        merge_base(&mut metadata, &base);
        assert_eq!(metadata[keys::CHAPTER], "第一章");
        assert_eq!(metadata["source"], "upload");
    }

    #[test]
    fn test_insert_opt() {
        let mut metadata = Metadata::new();
        insert_opt(&mut metadata, keys::BOOK, None);
        insert_opt(&mut metadata, keys::SECTION, Some("第一节"));
        assert!(!metadata.contains_key(keys::BOOK));
        assert_eq!(metadata[keys::SECTION], "第一节");
    }
}
