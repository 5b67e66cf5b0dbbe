//! Date shape patterns, in priority order.
//!
//! All expressions run against lowercased text.

use lazy_static::lazy_static;
use regex::Regex;

use super::{DateFormat, PatternSpec};

/// Expiry vocabulary that may directly precede a date inside anchored patterns.
const ANCHOR: &str = r"(?:exp|expiry|expiration|expires|best before|use by)[:\s]*";

const MONTH_ABBR: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

const MONTH_FULL: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

lazy_static! {
    pub static ref DATE_PATTERNS: Vec<PatternSpec> = vec![
        // DD/MM/YYYY or DD-MM-YYYY
        PatternSpec::new("dmy_slash", r"\b(\d{2}[/-]\d{2}[/-]\d{4})\b", DateFormat::Dmy),
        // YYYY/MM/DD or YYYY-MM-DD
        PatternSpec::new("ymd_slash", r"\b(\d{4}[/-]\d{2}[/-]\d{2})\b", DateFormat::Ymd),
        // Glued to a keyword, e.g. "exp12/04/2025"
        PatternSpec::new(
            "anchored_dmy",
            &format!(r"{ANCHOR}(\d{{2}}[/-]\d{{2}}[/-]\d{{4}})"),
            DateFormat::Dmy,
        ),
        PatternSpec::new(
            "anchored_ymd",
            &format!(r"{ANCHOR}(\d{{4}}[/-]\d{{2}}[/-]\d{{2}})"),
            DateFormat::Ymd,
        ),
        PatternSpec::new("dmy_dot", r"\b(\d{2}\.\d{2}\.\d{4})\b", DateFormat::Dmy),
        PatternSpec::new("ymd_dot", r"\b(\d{4}\.\d{2}\.\d{2})\b", DateFormat::Ymd),
        // 12 mar 2025, 12-mar-2025
        PatternSpec::new(
            "dmy_month_abbr",
            &format!(r"\b(\d{{2}}[\s-](?:{MONTH_ABBR})[\s-]\d{{4}})\b"),
            DateFormat::DmyMonthName,
        ),
        PatternSpec::new(
            "dmy_month_full",
            &format!(r"\b(\d{{2}}[\s-](?:{MONTH_FULL})[\s-]\d{{4}})\b"),
            DateFormat::DmyMonthName,
        ),
        PatternSpec::new(
            "anchored_month_year",
            &format!(r"{ANCHOR}(\d{{2}}[/-]\d{{4}})\b"),
            DateFormat::MonthYear,
        ),
        PatternSpec::new(
            "anchored_year_month",
            &format!(r"{ANCHOR}(\d{{4}}[/-]\d{{2}})\b"),
            DateFormat::YearMonth,
        ),
        // OCR often turns separators into spaces, commas or dots
        PatternSpec::new("dmy_loose", r"\b(\d{2}[ ,.]\d{2}[ ,.]\d{4})\b", DateFormat::Dmy),
        PatternSpec::new(
            "dmy_short_year",
            r"\b(\d{2}[/-]\d{2}[/-]\d{2})\b",
            DateFormat::DmyShortYear,
        ),
        PatternSpec::new("month_year", r"\b(\d{2}[/-]\d{4})\b", DateFormat::MonthYear),
        PatternSpec::new("year_month", r"\b(\d{4}[/-]\d{2})\b", DateFormat::YearMonth),
        PatternSpec::new(
            "month_short_year",
            r"\b(\d{2}[/-]\d{2})\b",
            DateFormat::MonthShortYear,
        )
        .keyword_only(),
    ];

    // Whole-string shapes used by the resolver's fixed-format strategies.
    pub static ref MONTH_YEAR_EXACT: Regex = Regex::new(r"^(\d{2})[/-](\d{4})$").unwrap();

    pub static ref YEAR_MONTH_EXACT: Regex = Regex::new(r"^(\d{4})[/-](\d{2})$").unwrap();

    pub static ref SHORT_YEAR_EXACT: Regex =
        Regex::new(r"^(\d{2})[/-](\d{2})[/-](\d{2})$").unwrap();

    pub static ref MONTH_SHORT_YEAR_EXACT: Regex = Regex::new(r"^(\d{2})[/-](\d{2})$").unwrap();
}

/// Look up a pattern by name.
pub fn pattern_by_name(name: &str) -> Option<&'static PatternSpec> {
    DATE_PATTERNS.iter().find(|p| p.name == name)
}
