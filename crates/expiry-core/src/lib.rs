//! Core library for reading expiry dates off packaging photos.
//!
//! This crate provides:
//! - Candidate extraction from OCR text, keyword lines first
//! - Date resolution for expiry-label formats (two-digit years, month-only dates)
//! - Expiry checks against the current date
//! - Image filter pipeline and OCR seam, with a `pure-onnx-ocr` engine

pub mod error;
pub mod expiry;
pub mod models;
pub mod ocr;
pub mod scan;

pub use error::{ExpiryError, OcrError, ResolveError, Result};
pub use expiry::rules::{Candidate, CandidateExtractor, DateFormat, DateResolver, KeywordSet};
pub use expiry::{is_expired, is_expired_now, today, ExpiryDetector, ExpiryFinder};
pub use models::config::{DayOrder, ExpiryConfig};
pub use models::expiry::{ExpiryMatch, ExpiryReport, ExpiryStatus, ExtractionPass};
pub use ocr::{FilterPipeline, ImageFilter, RecognitionMode, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use scan::{ExpiryScanner, ScanResult};
