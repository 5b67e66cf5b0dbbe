//! Expiry finder combining candidate extraction and date resolution.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::config::{DayOrder, ExtractionConfig};
use crate::models::expiry::{ExpiryMatch, ExtractionPass};

use super::rules::{check_plausible, Candidate, CandidateExtractor, DateResolver, KeywordSet};
use super::ExpiryDetector;

/// Finds the expiry date in OCR text.
///
/// Keyword-line candidates are trusted as soon as they resolve. Only when none
/// of them resolves is the whole text scanned, and then a date must also fall
/// inside the plausibility window.
#[derive(Debug, Clone)]
pub struct ExpiryFinder {
    extractor: CandidateExtractor<'static>,
    resolver: DateResolver,
    plausibility_years: u32,
}

impl ExpiryFinder {
    /// Create a finder with default settings.
    pub fn new() -> Self {
        Self {
            extractor: CandidateExtractor::new(),
            resolver: DateResolver::new(),
            plausibility_years: 5,
        }
    }

    /// Create a finder from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_keywords(KeywordSet::new(&config.keywords))
            .with_day_order(config.day_order)
            .with_plausibility_years(config.plausibility_years)
    }

    /// Set the keyword set.
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.extractor = self.extractor.with_keywords(keywords);
        self
    }

    /// Set the day/month order.
    pub fn with_day_order(mut self, day_order: DayOrder) -> Self {
        self.resolver = self.resolver.with_day_order(day_order);
        self
    }

    /// Set the fallback-pass plausibility window.
    pub fn with_plausibility_years(mut self, years: u32) -> Self {
        self.plausibility_years = years;
        self
    }

    /// Find the expiry date relative to `today`.
    pub fn find(&self, text: &str, today: NaiveDate) -> Option<ExpiryMatch> {
        let found = self
            .extractor
            .keyword_candidates(text)
            .iter()
            .find_map(|c| self.accept(c, today))
            .or_else(|| {
                self.extractor
                    .fallback_candidates(text)
                    .iter()
                    .find_map(|c| self.accept(c, today))
            });

        match &found {
            Some(m) => info!("Detected expiry date {} ({:?} pass)", m.date, m.pass),
            None => info!("No valid expiry date found"),
        }

        found
    }

    /// Find the expiry date relative to the local calendar date.
    pub fn find_today(&self, text: &str) -> Option<ExpiryMatch> {
        self.find(text, super::today())
    }

    fn accept(&self, candidate: &Candidate<'_>, today: NaiveDate) -> Option<ExpiryMatch> {
        let resolved = self
            .resolver
            .resolve_as(&candidate.text, candidate.pattern.format, today)
            .and_then(|date| match candidate.pass {
                ExtractionPass::Keyword => Ok(date),
                ExtractionPass::Fallback => check_plausible(date, today, self.plausibility_years),
            });

        match resolved {
            Ok(date) => Some(ExpiryMatch {
                date,
                source: candidate.text.clone(),
                pattern: candidate.pattern.name.to_string(),
                format: candidate.pattern.format,
                pass: candidate.pass,
                line: candidate.line,
            }),
            Err(e) => {
                debug!(
                    "Skipping {:?} candidate {:?} ({}): {}",
                    candidate.pass, candidate.text, candidate.pattern.name, e
                );
                None
            }
        }
    }
}

impl Default for ExpiryFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpiryDetector for ExpiryFinder {
    fn detect(&self, text: &str, today: NaiveDate) -> Option<ExpiryMatch> {
        self.find(text, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expiry::ExpiryStatus;
    use chrono::Days;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    fn find(text: &str) -> Option<NaiveDate> {
        ExpiryFinder::new().find(text, today()).map(|m| m.date)
    }

    #[test]
    fn test_best_before_scenario() {
        let text = "Best Before: 12/04/2025\nBatch: 99/99/0000";
        let found = ExpiryFinder::new().find(text, today()).unwrap();

        assert_eq!(found.date, date(2025, 4, 12));
        assert_eq!(found.pass, ExtractionPass::Keyword);
        assert_eq!(found.pattern, "dmy_slash");
        assert_eq!(found.line, 0);
    }

    #[test]
    fn test_keyword_wins_over_other_dates() {
        let text = "MFG 01/01/2025\nLOT 2024-11-30\nEXP 03/09/2026\n15/08/2025";
        assert_eq!(find(text), Some(date(2026, 9, 3)));
    }

    #[test]
    fn test_keyword_result_bypasses_plausibility() {
        assert_eq!(find("expiry 01/01/2099"), Some(date(2099, 1, 1)));
    }

    #[test]
    fn test_month_year_without_keyword() {
        assert_eq!(find("random text 2026-01"), Some(date(2026, 1, 1)));
    }

    #[test]
    fn test_two_digit_year_with_keyword() {
        assert_eq!(find("exp 05/23"), Some(date(2023, 5, 1)));
        assert_eq!(find("exp 05/04/23"), Some(date(2023, 4, 5)));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(find(""), None);
        assert_eq!(find("  \n "), None);
        assert_eq!(find("no dates here"), None);
    }

    #[test]
    fn test_malformed_candidates_skipped() {
        assert_eq!(find("13/13/2024"), None);
        assert_eq!(find("13/13/2024 then 01/07/2025"), Some(date(2025, 7, 1)));
        assert_eq!(find("use by 31/02/2025\nlot 10/10/2025"), Some(date(2025, 10, 10)));
    }

    #[test]
    fn test_plausibility_window_boundary() {
        let today = date(2026, 10, 17);
        let finder = ExpiryFinder::new();

        let inside = date(2031, 10, 17).checked_sub_days(Days::new(1)).unwrap();
        let text = format!("lot {}", inside.format("%d/%m/%Y"));
        assert_eq!(finder.find(&text, today).map(|m| m.date), Some(inside));

        assert_eq!(finder.find("lot 17/10/2031", today), None);
        assert_eq!(finder.find("lot 01/01/2040", today), None);
    }

    #[test]
    fn test_unresolvable_keyword_line_yields_to_next_keyword_line() {
        let text = "best before 31/02/2025 lot 2025-05-01\nbest before 01/01/2026";
        let found = ExpiryFinder::new().find(text, today()).unwrap();

        assert_eq!(found.date, date(2026, 1, 1));
        assert_eq!(found.pass, ExtractionPass::Keyword);
        assert_eq!(found.line, 1);
    }

    #[test]
    fn test_keyword_inside_longer_word() {
        let today = date(2026, 10, 17);
        let finder = ExpiryFinder::new();
        let find = |text: &str| finder.find(text, today).map(|m| (m.date, m.pass));

        assert_eq!(find("Expires: 01/01/2035"), Some((date(2035, 1, 1), ExtractionPass::Keyword)));
        assert_eq!(find("Expires 05/23"), Some((date(2023, 5, 1), ExtractionPass::Keyword)));
        assert_eq!(find("EXP12/04/2035"), Some((date(2035, 4, 12), ExtractionPass::Keyword)));
        assert_eq!(find("Expired 02/2024"), Some((date(2024, 2, 1), ExtractionPass::Keyword)));
    }

    #[test]
    fn test_short_keyword_inside_word_is_ignored() {
        // "packed" is not the "ed" keyword, so the far date has to pass the window.
        assert_eq!(find("packed 01/01/2035"), None);
        assert_eq!(find("ED 01/01/2035"), Some(date(2035, 1, 1)));
    }

    #[test]
    fn test_implausible_skipped_for_next_candidate() {
        let text = "ref 01/01/2090\nmade 05/05/2024";
        assert_eq!(find(text), Some(date(2024, 5, 5)));
    }

    #[test]
    fn test_keyword_failure_falls_back() {
        let text = "best before 99/99/2025\n10/11/2025";
        let found = ExpiryFinder::new().find(text, today()).unwrap();
        assert_eq!(found.date, date(2025, 11, 10));
        assert_eq!(found.pass, ExtractionPass::Fallback);
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            keywords: vec!["mhd".to_string()],
            day_order: DayOrder::MonthFirst,
            plausibility_years: 1,
        };
        let finder = ExpiryFinder::from_config(&config);

        assert_eq!(finder.find("MHD 03/04/2030", today()).map(|m| m.date), Some(date(2030, 3, 4)));
        assert_eq!(finder.find("lot 03/04/2027", today()), None);
        assert_eq!(finder.find("lot 03/04/2026", today()).map(|m| m.date), Some(date(2026, 3, 4)));
    }

    #[test]
    fn test_report() {
        let finder = ExpiryFinder::new();
        let report = finder.report("EXP 12/04/2025", today());
        assert_eq!(report.status, Some(ExpiryStatus::Expired));

        let report = finder.report("EXP 12/04/2026", today());
        assert_eq!(report.status, Some(ExpiryStatus::NotExpired));

        let report = finder.report("", today());
        assert!(!report.found());
    }
}
