//! Rule tables and the two rule-driven stages: candidate extraction and date resolution.

pub mod candidates;
pub mod keywords;
pub mod patterns;
pub mod resolver;

pub use candidates::{Candidate, CandidateExtractor};
pub use keywords::{Keyword, KeywordSet, DEFAULT_KEYWORDS};
pub use patterns::{pattern_by_name, DATE_PATTERNS};
pub use resolver::{
    check_plausible, expand_two_digit_year, plausibility_limit, DateResolver, MIN_PLAUSIBLE_YEAR,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape of a date pattern, used for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// Day, month, four-digit year.
    Dmy,
    /// Four-digit year, month, day.
    Ymd,
    /// Day, month name, four-digit year.
    DmyMonthName,
    /// Month and four-digit year.
    MonthYear,
    /// Four-digit year and month.
    YearMonth,
    /// Day, month, two-digit year.
    DmyShortYear,
    /// Month and two-digit year.
    MonthShortYear,
}

/// One recognizable date shape.
#[derive(Debug)]
pub struct PatternSpec {
    /// Stable identifier, e.g. `dmy_slash`.
    pub name: &'static str,
    /// Matching rule. Capture group 1 is the date substring.
    pub regex: Regex,
    /// Format tag.
    pub format: DateFormat,
    /// Only used on keyword lines; too noisy for a whole-text scan.
    pub keyword_only: bool,
}

impl PatternSpec {
    /// Compile a pattern. The expressions are fixed literals, so failure is a programming error.
    pub fn new(name: &'static str, pattern: &str, format: DateFormat) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            format,
            keyword_only: false,
        }
    }

    /// Restrict this pattern to the keyword pass.
    pub fn keyword_only(mut self) -> Self {
        self.keyword_only = true;
        self
    }

    /// First match of this pattern in `text`, as the span of the date substring.
    pub fn find_in<'t>(&self, text: &'t str) -> Option<regex::Match<'t>> {
        self.regex.captures(text).and_then(|caps| caps.get(1))
    }

    /// Every match of this pattern in `text`.
    pub fn find_all_in<'t>(&self, text: &'t str) -> Vec<regex::Match<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .collect()
    }
}
