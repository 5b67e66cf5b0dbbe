//! Configuration structures for the expiry pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::expiry::rules::keywords::DEFAULT_KEYWORDS;

/// Main configuration for the expiry pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryConfig {
    /// Candidate extraction and date resolution configuration.
    pub extraction: ExtractionConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessingConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Order of the day and month fields in all-numeric dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOrder {
    /// `03/04/2025` is 3 April.
    #[default]
    DayFirst,
    /// `03/04/2025` is 4 March.
    MonthFirst,
}

/// Candidate extraction and date resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Expiry keywords, in priority order. Matched case-insensitively on word boundaries.
    pub keywords: Vec<String>,

    /// Day/month order for ambiguous numeric dates.
    pub day_order: DayOrder,

    /// Fallback-pass dates must fall before today plus this many years.
    pub plausibility_years: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            day_order: DayOrder::DayFirst,
            plausibility_years: 5,
        }
    }
}

/// Which filter chain to run before OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterVariant {
    /// Grayscale, Gaussian blur, adaptive Gaussian threshold.
    #[default]
    Adaptive,
    /// Grayscale only.
    Grayscale,
    /// Pass the image through untouched.
    None,
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Filter chain to apply.
    pub variant: FilterVariant,

    /// Sigma of the Gaussian blur (1.1 matches a 5x5 kernel).
    pub blur_sigma: f32,

    /// Neighbourhood size of the adaptive threshold (odd, >= 3).
    pub threshold_block_size: u32,

    /// Constant subtracted from the local weighted mean.
    pub threshold_offset: f32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            variant: FilterVariant::Adaptive,
            blur_sigma: 1.1,
            threshold_block_size: 11,
            threshold_offset: 2.0,
        }
    }
}

/// Page segmentation hint handed to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionMode {
    /// Rows of text boxes become lines, boxes on a row are joined with spaces.
    #[default]
    Auto,
    /// Treat the image as a single line of text.
    SingleLine,
    /// Every detected box becomes its own line.
    Sparse,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Segmentation mode.
    pub mode: RecognitionMode,

    /// Directory containing `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub model_dir: PathBuf,

    /// Keep `[UNK]` tokens in recognized text.
    pub keep_unk: bool,

    /// Give up on recognition after this many seconds (0 = no limit).
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            mode: RecognitionMode::Auto,
            model_dir: PathBuf::from("models"),
            keep_unk: false,
            timeout_secs: 60,
        }
    }
}

impl ExpiryConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ExpiryConfig::default();
        assert_eq!(config.extraction.day_order, DayOrder::DayFirst);
        assert_eq!(config.extraction.plausibility_years, 5);
        assert_eq!(config.extraction.keywords.first().map(String::as_str), Some("expiry"));
        assert_eq!(config.preprocessing.threshold_block_size, 11);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExpiryConfig =
            serde_json::from_str(r#"{"extraction": {"day_order": "month_first"}}"#).unwrap();
        assert_eq!(config.extraction.day_order, DayOrder::MonthFirst);
        assert_eq!(config.extraction.plausibility_years, 5);
        assert_eq!(config.ocr.mode, RecognitionMode::Auto);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ExpiryConfig::default();
        config.extraction.keywords = vec!["mhd".to_string()];
        config.save(&path).unwrap();

        let loaded = ExpiryConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.keywords, vec!["mhd".to_string()]);
    }
}
