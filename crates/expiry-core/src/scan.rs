//! Image-to-report pipeline: filter, recognize, find, check.

use std::time::Instant;

use chrono::NaiveDate;
use image::DynamicImage;
use tracing::{debug, info};

use crate::error::Result;
use crate::expiry::{ExpiryDetector, ExpiryFinder};
use crate::models::config::ExpiryConfig;
use crate::models::expiry::ExpiryReport;
use crate::ocr::{FilterPipeline, ImageFilter, RecognitionMode, TextRecognizer};

/// Output of one scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Raw OCR text.
    pub text: String,
    /// Detection outcome.
    pub report: ExpiryReport,
    /// Filtering plus recognition time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs an image through a filter, a recognizer and the expiry finder.
pub struct ExpiryScanner<F, R> {
    filter: F,
    recognizer: R,
    finder: ExpiryFinder,
    mode: RecognitionMode,
}

impl<R: TextRecognizer> ExpiryScanner<FilterPipeline, R> {
    /// Build a scanner from configuration around an existing recognizer.
    pub fn from_config(config: &ExpiryConfig, recognizer: R) -> Self {
        Self::new(FilterPipeline::from_config(&config.preprocessing), recognizer)
            .with_finder(ExpiryFinder::from_config(&config.extraction))
            .with_mode(config.ocr.mode)
    }
}

impl<F: ImageFilter, R: TextRecognizer> ExpiryScanner<F, R> {
    /// Create a scanner with the default finder and recognition mode.
    pub fn new(filter: F, recognizer: R) -> Self {
        Self {
            filter,
            recognizer,
            finder: ExpiryFinder::new(),
            mode: RecognitionMode::default(),
        }
    }

    /// Set the expiry finder.
    pub fn with_finder(mut self, finder: ExpiryFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Set the recognition mode.
    pub fn with_mode(mut self, mode: RecognitionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Filter and recognize `image`, returning the raw text.
    pub fn read_text(&self, image: &DynamicImage) -> Result<String> {
        let filtered = self.filter.apply(image)?;
        debug!("Filtered image with {}", self.filter.name());
        Ok(self.recognizer.recognize(&filtered, self.mode)?)
    }

    /// Scan `image` and check the detected date against `today`.
    pub fn scan(&self, image: &DynamicImage, today: NaiveDate) -> Result<ScanResult> {
        let start = Instant::now();
        let text = self.read_text(image)?;
        let processing_time_ms = start.elapsed().as_millis() as u64;

        debug!("OCR text:\n{}", text);

        let report = self.finder.report(&text, today);
        info!(
            "Scan finished in {}ms, expiry found: {}",
            processing_time_ms,
            report.found()
        );

        Ok(ScanResult {
            text,
            report,
            processing_time_ms,
        })
    }
}
