// src/utils/text.rs

//! Numeric extraction from scraped element text.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};

static LEADING_FLOAT: OnceLock<Regex> = OnceLock::new();
static DIGIT_RUN: OnceLock<Regex> = OnceLock::new();

/// Parse the leading numeric prefix of a rating string.
///
/// Trailing non-numeric content is ignored (`"4.7 out of 5"` parses as
/// 4.7). Text with no numeric prefix parses as 0.0, matching tolerant
/// float conversion.
pub fn parse_leading_float(text: &str) -> f64 {
    let re = LEADING_FLOAT.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d+)?|\.\d+)").expect("leading-float pattern is valid")
    });
    re.find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Extract the review count from element text.
///
/// Thousands separators are discarded first, then the first contiguous
/// digit run is taken: `"1,234 ratings"` yields 1234. Text with no digits
/// is an extraction failure.
pub fn parse_review_count(text: &str) -> Result<u64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let re = DIGIT_RUN.get_or_init(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

    let run = re.find(&cleaned).ok_or_else(|| {
        AppError::extraction(format!("No digits in review count text '{}'", text.trim()))
    })?;

    run.as_str()
        .parse()
        .map_err(|_| AppError::extraction(format!("Review count out of range: '{}'", run.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_float() {
        assert_eq!(parse_leading_float("4.7"), 4.7);
        assert_eq!(parse_leading_float("4.7 out of 5"), 4.7);
        assert_eq!(parse_leading_float("  3 stars"), 3.0);
        assert_eq!(parse_leading_float(".5"), 0.5);
    }

    #[test]
    fn test_leading_float_defaults_to_zero() {
        assert_eq!(parse_leading_float("no rating yet"), 0.0);
        assert_eq!(parse_leading_float(""), 0.0);
    }

    #[test]
    fn test_review_count_strips_separators() {
        assert_eq!(parse_review_count("1,234 reviews").unwrap(), 1234);
        assert_eq!(parse_review_count("87 ratings").unwrap(), 87);
        assert_eq!(parse_review_count("(2,048)").unwrap(), 2048);
    }

    #[test]
    fn test_review_count_without_digits_fails() {
        let err = parse_review_count("reviews: none").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
