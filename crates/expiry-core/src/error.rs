//! Error types for the expiry-core library.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the expiry library.
#[derive(Error, Debug)]
pub enum ExpiryError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to image filtering and OCR.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Reasons a single candidate substring did not become a date.
///
/// These never leave the finder; they are logged and the next candidate is tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No strategy recognised the shape of the substring.
    #[error("unparseable date text: {0:?}")]
    Unparseable(String),

    /// Components were recognised but do not form a calendar date.
    #[error("invalid date components: year {year}, month {month}, day {day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The year is below the plausibility floor.
    #[error("implausible year: {0}")]
    ImplausibleYear(i32),

    /// The date is at or past the end of the plausibility window.
    #[error("{date} is not before the plausibility limit {limit}")]
    BeyondWindow { date: NaiveDate, limit: NaiveDate },
}

/// Result type for the expiry library.
pub type Result<T> = std::result::Result<T, ExpiryError>;
