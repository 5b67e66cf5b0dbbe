//! Expiry date detection.

mod finder;
pub mod rules;

pub use finder::ExpiryFinder;

use chrono::NaiveDate;

use crate::models::expiry::{ExpiryMatch, ExpiryReport};

/// Trait for expiry date detectors.
pub trait ExpiryDetector {
    /// Find the expiry date in OCR text, relative to `today`.
    fn detect(&self, text: &str, today: NaiveDate) -> Option<ExpiryMatch>;

    /// Detect and compare against `today`.
    fn report(&self, text: &str, today: NaiveDate) -> ExpiryReport {
        ExpiryReport::new(self.detect(text, today), today)
    }
}

/// Whether `date` is strictly before `today`.
pub fn is_expired(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Whether `date` is strictly before the local calendar date.
pub fn is_expired_now(date: NaiveDate) -> bool {
    is_expired(date, today())
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
