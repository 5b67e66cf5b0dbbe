//! Date resolution: turn a candidate substring into a calendar date.

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::models::config::DayOrder;

use super::DateFormat;
use super::patterns::{
    MONTH_SHORT_YEAR_EXACT, MONTH_YEAR_EXACT, SHORT_YEAR_EXACT, YEAR_MONTH_EXACT,
};

/// Four-digit years below this are treated as OCR garbage.
pub const MIN_PLAUSIBLE_YEAR: i32 = 1900;

type Resolution = std::result::Result<NaiveDate, ResolveError>;

type Strategy = fn(&DateResolver, &str, NaiveDate) -> Resolution;

/// Resolution strategies with the shapes each can parse, tried in order;
/// first success wins.
const STRATEGIES: &[(&str, &[DateFormat], Strategy)] = &[
    (
        "flexible",
        &[DateFormat::Dmy, DateFormat::Ymd, DateFormat::DmyMonthName],
        DateResolver::resolve_flexible,
    ),
    (
        "month_year",
        &[DateFormat::MonthYear, DateFormat::YearMonth],
        DateResolver::resolve_month_year,
    ),
    ("short_year", &[DateFormat::DmyShortYear], DateResolver::resolve_short_year),
    (
        "month_short_year",
        &[DateFormat::MonthShortYear],
        DateResolver::resolve_month_short_year,
    ),
];

/// Resolves date substrings with a fixed disambiguation policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    day_order: DayOrder,
}

impl DateResolver {
    /// Create a day-first resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the day/month order for all-numeric dates.
    pub fn with_day_order(mut self, day_order: DayOrder) -> Self {
        self.day_order = day_order;
        self
    }

    pub fn day_order(&self) -> DayOrder {
        self.day_order
    }

    /// Resolve `text` relative to `today` (used for two-digit years), trying
    /// every strategy.
    ///
    /// When every strategy fails, the most specific failure is returned.
    pub fn resolve(&self, text: &str, today: NaiveDate) -> Resolution {
        self.run(text, None, today)
    }

    /// Resolve a candidate whose shape is already known, skipping strategies
    /// that cannot parse `format`.
    pub fn resolve_as(&self, text: &str, format: DateFormat, today: NaiveDate) -> Resolution {
        self.run(text, Some(format), today)
    }

    fn run(&self, text: &str, format: Option<DateFormat>, today: NaiveDate) -> Resolution {
        let text = text.trim();
        let mut failure = ResolveError::Unparseable(text.to_string());

        let applicable = STRATEGIES
            .iter()
            .filter(|(_, formats, _)| format.is_none_or(|f| formats.contains(&f)));

        for (name, _, strategy) in applicable {
            match strategy(self, text, today) {
                Ok(date) => {
                    debug!("Resolved {:?} to {} via {}", text, date, name);
                    return Ok(date);
                }
                Err(e) => {
                    trace!("Strategy {} rejected {:?}: {}", name, text, e);
                    if !matches!(e, ResolveError::Unparseable(_)) {
                        failure = e;
                    }
                }
            }
        }

        Err(failure)
    }

    /// Day/month/year with noise tolerated around the components.
    ///
    /// Needs a four-digit year plus either two numbers or a number and a month
    /// name. A leading year means year-month-day.
    fn resolve_flexible(&self, text: &str, _today: NaiveDate) -> Resolution {
        let unparseable = || ResolveError::Unparseable(text.to_string());

        let tokens = tokenize(text);
        let months: Vec<u32> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Month(m) => Some(*m),
                Token::Number(_) => None,
            })
            .collect();
        let numbers: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Number(n) => Some(*n),
                Token::Month(_) => None,
            })
            .collect();

        match (months.as_slice(), numbers.as_slice()) {
            ([month], [a, b]) => {
                let (year, day) = match (a.len(), b.len()) {
                    (1 | 2, 4) => (*b, *a),
                    (4, 1 | 2) => (*a, *b),
                    _ => return Err(unparseable()),
                };
                build_date(parse_num(year)?, *month, parse_num(day)?)
            }
            ([], [a, b, c]) if a.len() == 4 && b.len() <= 2 && c.len() <= 2 => {
                build_date(parse_num(a)?, parse_num(b)?, parse_num(c)?)
            }
            ([], [a, b, c]) if c.len() == 4 && a.len() <= 2 && b.len() <= 2 => {
                let (day, month) = self.order(parse_num(a)?, parse_num(b)?);
                build_date(parse_num(c)?, month, day)
            }
            _ => Err(unparseable()),
        }
    }

    /// `MM/YYYY` or `YYYY/MM`, day 1.
    fn resolve_month_year(&self, text: &str, _today: NaiveDate) -> Resolution {
        if let Some(caps) = MONTH_YEAR_EXACT.captures(text) {
            return build_date(parse_num(&caps[2])?, parse_num(&caps[1])?, 1);
        }
        if let Some(caps) = YEAR_MONTH_EXACT.captures(text) {
            return build_date(parse_num(&caps[1])?, parse_num(&caps[2])?, 1);
        }
        Err(ResolveError::Unparseable(text.to_string()))
    }

    /// `DD/MM/YY` with century rollover.
    fn resolve_short_year(&self, text: &str, today: NaiveDate) -> Resolution {
        let caps = SHORT_YEAR_EXACT
            .captures(text)
            .ok_or_else(|| ResolveError::Unparseable(text.to_string()))?;

        let (day, month) = self.order(parse_num(&caps[1])?, parse_num(&caps[2])?);
        let year = expand_two_digit_year(parse_num(&caps[3])?, today);
        build_date(year, month, day)
    }

    /// `MM/YY`, day 1, with century rollover.
    fn resolve_month_short_year(&self, text: &str, today: NaiveDate) -> Resolution {
        let caps = MONTH_SHORT_YEAR_EXACT
            .captures(text)
            .ok_or_else(|| ResolveError::Unparseable(text.to_string()))?;

        let month = parse_num(&caps[1])?;
        let year = expand_two_digit_year(parse_num(&caps[2])?, today);
        build_date(year, month, 1)
    }

    /// Map two leading numbers to (day, month).
    fn order(&self, first: u32, second: u32) -> (u32, u32) {
        match self.day_order {
            DayOrder::DayFirst => (first, second),
            DayOrder::MonthFirst => (second, first),
        }
    }
}

/// Expand a two-digit year into the current century, rolling back one
/// century when that lands more than 50 years after `today`.
pub fn expand_two_digit_year(short: u32, today: NaiveDate) -> i32 {
    let current = today.year();
    let full = current / 100 * 100 + short as i32;
    if full > current + 50 { full - 100 } else { full }
}

/// First date rejected by the fallback-pass plausibility filter.
pub fn plausibility_limit(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX)
}

/// Reject dates at or beyond `today + years`.
pub fn check_plausible(date: NaiveDate, today: NaiveDate, years: u32) -> Resolution {
    let limit = plausibility_limit(today, years);
    if date < limit {
        Ok(date)
    } else {
        Err(ResolveError::BeyondWindow { date, limit })
    }
}

fn build_date(year: i32, month: u32, day: u32) -> Resolution {
    if year < MIN_PLAUSIBLE_YEAR {
        return Err(ResolveError::ImplausibleYear(year));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ResolveError::InvalidDate { year, month, day })
}

fn parse_num<T: std::str::FromStr>(s: &str) -> std::result::Result<T, ResolveError> {
    s.parse().map_err(|_| ResolveError::Unparseable(s.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Month(u32),
}

/// Split into digit runs and month names; every other character is noise.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(|c: char| c.is_ascii_alphanumeric()) {
        rest = &rest[start..];
        let is_digit = rest.starts_with(|c: char| c.is_ascii_digit());
        let end = rest
            .find(|c: char| {
                if is_digit {
                    !c.is_ascii_digit()
                } else {
                    !c.is_ascii_alphabetic()
                }
            })
            .unwrap_or(rest.len());

        let run = &rest[..end];
        if is_digit {
            tokens.push(Token::Number(run));
        } else if let Some(month) = month_from_name(run) {
            tokens.push(Token::Month(month));
        }
        rest = &rest[end..];
    }

    tokens
}

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Full English month names, three-letter abbreviations, and `sept`.
fn month_from_name(word: &str) -> Option<u32> {
    let word = word.to_ascii_lowercase();
    if word == "sept" {
        return Some(9);
    }
    MONTH_NAMES
        .iter()
        .position(|name| *name == word || (word.len() == 3 && name.starts_with(word.as_str())))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    #[test]
    fn test_day_first_default() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("03/04/2025", today()), Ok(date(2025, 4, 3)));
        assert_eq!(resolver.resolve("12.04.2025", today()), Ok(date(2025, 4, 12)));
        assert_eq!(resolver.resolve("12 04 2025", today()), Ok(date(2025, 4, 12)));
        assert_eq!(resolver.resolve("12,04,2025", today()), Ok(date(2025, 4, 12)));
    }

    #[test]
    fn test_month_first_option() {
        let resolver = DateResolver::new().with_day_order(DayOrder::MonthFirst);
        assert_eq!(resolver.resolve("03/04/2025", today()), Ok(date(2025, 3, 4)));
        assert_eq!(resolver.resolve("05/04/23", today()), Ok(date(2023, 5, 4)));
    }

    #[test]
    fn test_year_first() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("2025-04-12", today()), Ok(date(2025, 4, 12)));
        assert_eq!(resolver.resolve("2025.04.12", today()), Ok(date(2025, 4, 12)));
    }

    #[test]
    fn test_month_names() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("05-mar-2026", today()), Ok(date(2026, 3, 5)));
        assert_eq!(resolver.resolve("05 september 2026", today()), Ok(date(2026, 9, 5)));
        assert_eq!(resolver.resolve("exp: 05 Sept 2026.", today()), Ok(date(2026, 9, 5)));
    }

    #[test]
    fn test_fuzzy_noise() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("exp: 12/04/2025 lot", today()), Ok(date(2025, 4, 12)));
    }

    #[test]
    fn test_month_year() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("2026-01", today()), Ok(date(2026, 1, 1)));
        assert_eq!(resolver.resolve("06/2027", today()), Ok(date(2027, 6, 1)));
        assert_eq!(
            resolver.resolve("13/2027", today()),
            Err(ResolveError::InvalidDate { year: 2027, month: 13, day: 1 })
        );
    }

    #[test]
    fn test_two_digit_year() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("05/04/23", today()), Ok(date(2023, 4, 5)));
        assert_eq!(resolver.resolve("05/04/75", today()), Ok(date(2075, 4, 5)));
        assert_eq!(resolver.resolve("05/04/76", today()), Ok(date(1976, 4, 5)));
    }

    #[test]
    fn test_two_digit_year_round_trip() {
        let resolver = DateResolver::new();
        for short in ["01/02/00", "28/02/25", "31/12/75", "15/07/99"] {
            let first = resolver.resolve(short, today()).unwrap();
            let long = first.format("%d/%m/%Y").to_string();
            assert_eq!(resolver.resolve(&long, today()), Ok(first), "{short} -> {long}");
        }
    }

    #[test]
    fn test_month_short_year() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.resolve("05/23", today()), Ok(date(2023, 5, 1)));
        assert_eq!(resolver.resolve("12/99", today()), Ok(date(1999, 12, 1)));
    }

    #[test]
    fn test_resolve_as_runs_only_matching_strategies() {
        let resolver = DateResolver::new();
        assert_eq!(
            resolver.resolve_as("05/04/23", DateFormat::DmyShortYear, today()),
            Ok(date(2023, 4, 5))
        );
        assert_eq!(
            resolver.resolve_as("05/23", DateFormat::MonthShortYear, today()),
            Ok(date(2023, 5, 1))
        );
        assert_eq!(
            resolver.resolve_as("2026-01", DateFormat::YearMonth, today()),
            Ok(date(2026, 1, 1))
        );
        assert_eq!(
            resolver.resolve_as("12 mar 2025", DateFormat::DmyMonthName, today()),
            Ok(date(2025, 3, 12))
        );

        // A month-year candidate is never read as MM/YY, even though that strategy would take it.
        assert_eq!(
            resolver.resolve_as("05/23", DateFormat::MonthYear, today()),
            Err(ResolveError::Unparseable("05/23".to_string()))
        );
        assert_eq!(
            resolver.resolve_as("05/04/23", DateFormat::Dmy, today()),
            Err(ResolveError::Unparseable("05/04/23".to_string()))
        );
    }

    #[test]
    fn test_resolve_as_keeps_specific_failure() {
        let resolver = DateResolver::new();
        assert_eq!(
            resolver.resolve_as("31/02/2025", DateFormat::Dmy, today()),
            Err(ResolveError::InvalidDate { year: 2025, month: 2, day: 31 })
        );
    }

    #[test]
    fn test_expand_two_digit_year() {
        assert_eq!(expand_two_digit_year(23, date(2025, 1, 1)), 2023);
        assert_eq!(expand_two_digit_year(75, date(2025, 1, 1)), 2075);
        assert_eq!(expand_two_digit_year(76, date(2025, 1, 1)), 1976);
        assert_eq!(expand_two_digit_year(10, date(2099, 1, 1)), 2010);
    }

    #[test]
    fn test_malformed() {
        let resolver = DateResolver::new();
        assert_eq!(
            resolver.resolve("13/13/2024", today()),
            Err(ResolveError::InvalidDate { year: 2024, month: 13, day: 13 })
        );
        assert_eq!(
            resolver.resolve("31/02/2025", today()),
            Err(ResolveError::InvalidDate { year: 2025, month: 2, day: 31 })
        );
        assert_eq!(resolver.resolve("99/99/0000", today()), Err(ResolveError::ImplausibleYear(0)));
        assert!(matches!(resolver.resolve("lot abc", today()), Err(ResolveError::Unparseable(_))));
        assert!(matches!(resolver.resolve("", today()), Err(ResolveError::Unparseable(_))));
    }

    #[test]
    fn test_plausibility_window() {
        let today = date(2026, 10, 17);
        assert_eq!(plausibility_limit(today, 5), date(2031, 10, 17));
        assert!(check_plausible(date(2031, 10, 16), today, 5).is_ok());
        assert!(check_plausible(date(2031, 10, 17), today, 5).is_err());
        assert!(check_plausible(date(2040, 1, 1), today, 5).is_err());
    }

    #[test]
    fn test_plausibility_leap_day() {
        let today = date(2024, 2, 29);
        assert_eq!(plausibility_limit(today, 5), date(2029, 2, 28));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("12-mar-2025"),
            vec![Token::Number("12"), Token::Month(3), Token::Number("2025")]
        );
        assert_eq!(tokenize("lot: ab"), vec![]);
    }
}
