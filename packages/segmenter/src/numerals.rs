//! Conversion of CJK numerals in structural markers to integers.
//!
//! Only used for display metadata (`article_index`). Markers are always
//! kept verbatim, so a numeral that does not parse is not an error.

/// Value of a single digit character (CJK, ASCII or full-width).
fn digit_value(c: char) -> Option<u32> {
    match c {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

/// Multiplier of a unit character below 万.
fn unit_value(c: char) -> Option<u32> {
    match c {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        _ => None,
    }
}

/// Parse a numeral such as `十二`, `一百零五`, `二〇二〇`, `12` or `１２`.
///
/// # Examples
/// ```
/// use legal_segmenter::numerals::parse_numeral;
///
/// assert_eq!(parse_numeral("十二"), Some(12));
/// assert_eq!(parse_numeral("一千二百六十"), Some(1260));
/// assert_eq!(parse_numeral("甲"), None);
/// ```
#[must_use]
pub fn parse_numeral(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Positional form: every character is a digit ("12", "二〇二〇")
    if text.chars().all(|c| digit_value(c).is_some()) {
        return text.chars().try_fold(0u32, |acc, c| {
            acc.checked_mul(10)?.checked_add(digit_value(c)?)
        });
    }

    let mut total: u32 = 0;
    let mut section: u32 = 0;
    let mut digit: Option<u32> = None;

    for c in text.chars() {
        if let Some(d) = digit_value(c) {
            digit = Some(d);
        } else if let Some(unit) = unit_value(c) {
            // A bare unit ("十二") implies a leading one
            let d = digit.take().unwrap_or(1);
            section = section.checked_add(d.checked_mul(unit)?)?;
        } else if c == '万' {
            section = section.checked_add(digit.take().unwrap_or(0))?;
            let section_value = section.max(1).checked_mul(10_000)?;
            total = total.checked_add(section_value)?;
            section = 0;
        } else {
            return None;
        }
    }

    total.checked_add(section)?.checked_add(digit.unwrap_or(0))
}

/// Extract the ordinal from a structural marker such as `第十二条`.
///
/// Strips the leading `第`, the level character and any `之一` suffix.
///
/// # Examples
/// ```
/// use legal_segmenter::numerals::marker_ordinal;
///
/// assert_eq!(marker_ordinal("第十二条"), Some(12));
/// assert_eq!(marker_ordinal("第三章"), Some(3));
/// assert_eq!(marker_ordinal("第十条之一"), Some(10));
/// ```
#[must_use]
pub fn marker_ordinal(marker: &str) -> Option<u32> {
    let body = marker.trim().strip_prefix('第')?;
    let body = body.split('之').next().unwrap_or(body);
    let mut chars = body.chars();
    chars.next_back()?;
    parse_numeral(chars.as_str())
}
