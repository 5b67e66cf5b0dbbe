//! Expiry detection result models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::expiry::rules::DateFormat;

/// Which extraction pass produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPass {
    /// Found on a line carrying an expiry keyword.
    Keyword,
    /// Found anywhere in the text, no keyword nearby.
    Fallback,
}

/// Whether a product is past its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    NotExpired,
}

impl ExpiryStatus {
    pub fn is_expired(self) -> bool {
        self == ExpiryStatus::Expired
    }
}

/// A resolved expiry date together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryMatch {
    /// Resolved calendar date.
    pub date: NaiveDate,
    /// Substring the date was resolved from.
    pub source: String,
    /// Name of the pattern that matched.
    pub pattern: String,
    /// Format tag of that pattern.
    pub format: DateFormat,
    /// Pass that produced the candidate.
    pub pass: ExtractionPass,
    /// Zero-based line index in the OCR text.
    pub line: usize,
}

/// Final report handed to callers and printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryReport {
    /// Date the check was made against.
    pub checked_on: NaiveDate,
    /// Detected expiry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<ExpiryMatch>,
    /// Expiry status; absent when no date was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpiryStatus>,
}

impl ExpiryReport {
    /// Build a report from an optional match.
    pub fn new(expiry: Option<ExpiryMatch>, checked_on: NaiveDate) -> Self {
        let status = expiry.as_ref().map(|m| {
            if crate::expiry::is_expired(m.date, checked_on) {
                ExpiryStatus::Expired
            } else {
                ExpiryStatus::NotExpired
            }
        });
        Self {
            checked_on,
            expiry,
            status,
        }
    }

    /// Whether a date was found.
    pub fn found(&self) -> bool {
        self.expiry.is_some()
    }
}
