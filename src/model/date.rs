//! Date element formatting.

use chrono::DateTime;

/// Render an RFC 3339 timestamp with a `yyyy-MM-dd hh:mm:ss` style pattern.
///
/// Values that do not parse are shown unchanged.
pub fn format_date(value: &str, pattern: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => date.format(&to_chrono_pattern(pattern)).to_string(),
        Err(e) => {
            log::debug!("Date value {:?} is not RFC 3339: {}", value, e);
            value.to_string()
        }
    }
}

/// Translate a `yyyy-MM-dd hh:mm:ss` style pattern into chrono's `%` syntax.
pub fn to_chrono_pattern(pattern: &str) -> String {
    const TOKENS: [(&str, &str); 8] = [
        ("yyyy", "%Y"),
        ("yy", "%y"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("hh", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                result.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                result.push_str("%%");
            } else {
                result.push(ch);
            }
        }
        rest = chars.as_str();
    }
    result
}
