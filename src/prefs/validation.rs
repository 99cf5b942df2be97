//! Validation rules that can be applied to a preference.
//!
//! Each rule is a stateless function from raw response text to a [`Verdict`]:
//! pass/fail plus the failure message shown to the user on a re-prompt. The
//! rules double as the built-in validator assets (see `assets::builtin`).

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("alphabetic pattern compiles"));

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s]+$").expect("alphanumeric pattern compiles"));

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d*\.?\d+$").expect("numeric pattern compiles"));

/// Date formats accepted by [`date`]. Tried in order, first parse wins.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Outcome of one validation rule applied to one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the response passed the rule.
    pub is_valid: bool,
    /// Failure message shown to the user when the rule did not pass.
    pub message: String,
}

impl Verdict {
    fn new(is_valid: bool, message: String) -> Self {
        Self { is_valid, message }
    }
}

/// Letters and whitespace only.
pub fn alphabetic(text: &str) -> Verdict {
    Verdict::new(
        ALPHABETIC.is_match(text),
        format!("Response is not alphabetic: {}", text),
    )
}

/// Letters, digits, and whitespace only.
pub fn alphanumeric(text: &str) -> Verdict {
    Verdict::new(
        ALPHANUMERIC.is_match(text),
        format!("Response is not alphanumeric: {}", text),
    )
}

/// Parses as a calendar date in one of [`DATE_FORMATS`].
pub fn date(text: &str) -> Verdict {
    let parsed = DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).is_ok());
    Verdict::new(parsed, format!("Response is not a date: {}", text))
}

/// Present and non-empty.
pub fn non_nil(text: &str) -> Verdict {
    Verdict::new(!text.is_empty(), "Nil text not allowed".to_string())
}

/// Optional sign, digits, optional decimal point.
pub fn numeric(text: &str) -> Verdict {
    Verdict::new(
        NUMERIC.is_match(text),
        format!("Response is not a number: {}", text),
    )
}

/// Parses as an absolute URI.
pub fn url(text: &str) -> Verdict {
    Verdict::new(
        Url::parse(text).is_ok(),
        format!("Response is not a url: {}", text),
    )
}
