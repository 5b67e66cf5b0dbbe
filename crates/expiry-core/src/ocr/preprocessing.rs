//! Image filters applied before OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::{FilterVariant, PreprocessingConfig};

/// An image-to-image filter.
pub trait ImageFilter {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Apply the filter.
    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError>;
}

/// Convert to 8-bit luminance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl ImageFilter for Grayscale {
    fn name(&self) -> &str {
        "grayscale"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        Ok(DynamicImage::ImageLuma8(image.to_luma8()))
    }
}

/// Gaussian blur to knock down sensor noise before thresholding.
#[derive(Debug, Clone, Copy)]
pub struct GaussianBlur {
    pub sigma: f32,
}

impl ImageFilter for GaussianBlur {
    fn name(&self) -> &str {
        "gaussian_blur"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        if self.sigma.is_nan() || self.sigma <= 0.0 {
            return Err(OcrError::Preprocessing(format!(
                "blur sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(image.blur(self.sigma))
    }
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel turns white when it is brighter than the weighted mean of its
/// `block_size` neighbourhood minus `offset`, black otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveThreshold {
    pub block_size: u32,
    pub offset: f32,
}

impl AdaptiveThreshold {
    /// Gaussian sigma for a square kernel of `block_size` pixels.
    fn sigma(&self) -> f32 {
        0.3 * ((self.block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

impl ImageFilter for AdaptiveThreshold {
    fn name(&self) -> &str {
        "adaptive_threshold"
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(OcrError::Preprocessing(format!(
                "threshold block size must be odd and >= 3, got {}",
                self.block_size
            )));
        }

        let gray = image.to_luma8();
        let local = image::imageops::blur(&gray, self.sigma());

        let (width, height) = gray.dimensions();
        let mut out = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let threshold = local.get_pixel(x, y)[0] as f32 - self.offset;
            let value = if pixel[0] as f32 > threshold { 255 } else { 0 };
            out.put_pixel(x, y, Luma([value]));
        }

        Ok(DynamicImage::ImageLuma8(out))
    }
}

/// A named chain of filters, applied in order.
pub struct FilterPipeline {
    name: String,
    filters: Vec<Box<dyn ImageFilter + Send + Sync>>,
}

impl FilterPipeline {
    /// Create an empty pipeline (passes images through).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: Vec::new(),
        }
    }

    /// Append a filter.
    pub fn with_filter(mut self, filter: impl ImageFilter + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Grayscale, blur, adaptive threshold.
    pub fn adaptive(config: &PreprocessingConfig) -> Self {
        Self::new("adaptive")
            .with_filter(Grayscale)
            .with_filter(GaussianBlur { sigma: config.blur_sigma })
            .with_filter(AdaptiveThreshold {
                block_size: config.threshold_block_size,
                offset: config.threshold_offset,
            })
    }

    /// Build the pipeline selected by configuration.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        match config.variant {
            FilterVariant::Adaptive => Self::adaptive(config),
            FilterVariant::Grayscale => Self::new("grayscale").with_filter(Grayscale),
            FilterVariant::None => Self::new("none"),
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl ImageFilter for FilterPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("empty image {}x{}", width, height)));
        }

        let mut current = image.clone();
        for filter in &self.filters {
            debug!("Applying filter {} ({})", filter.name(), self.name);
            current = filter.apply(&current)?;
        }
        Ok(current)
    }
}
