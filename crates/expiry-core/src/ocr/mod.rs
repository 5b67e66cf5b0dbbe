//! Image filtering and text recognition seams.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::{AdaptiveThreshold, FilterPipeline, GaussianBlur, Grayscale, ImageFilter};
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

pub use crate::models::config::RecognitionMode;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that turns an image into text.
pub trait TextRecognizer {
    /// Recognize the text in `image`, segmented according to `mode`.
    fn recognize(&self, image: &DynamicImage, mode: RecognitionMode) -> Result<String, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    /// Reading-order row, grouping boxes whose tops fall in the same 20px band.
    fn row(&self) -> i32 {
        let (_, y, _, _) = self.rect();
        (y / 20.0) as i32
    }
}

/// Sort boxes by reading order and join them into text according to `mode`.
pub fn assemble_text(boxes: &mut [TextBox], mode: RecognitionMode) -> String {
    boxes.sort_by(|a, b| {
        a.row().cmp(&b.row()).then_with(|| {
            let (ax, _, _, _) = a.rect();
            let (bx, _, _, _) = b.rect();
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    let texts = boxes.iter().map(|b| b.text.trim()).filter(|t| !t.is_empty());

    match mode {
        RecognitionMode::SingleLine => texts.collect::<Vec<_>>().join(" "),
        RecognitionMode::Sparse => texts.collect::<Vec<_>>().join("\n"),
        RecognitionMode::Auto => {
            let mut lines: Vec<(i32, Vec<&str>)> = Vec::new();
            for b in boxes.iter() {
                let text = b.text.trim();
                if text.is_empty() {
                    continue;
                }
                match lines.last_mut() {
                    Some((row, words)) if *row == b.row() => words.push(text),
                    _ => lines.push((b.row(), vec![text])),
                }
            }
            lines
                .into_iter()
                .map(|(_, words)| words.join(" "))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 15.0, x, y + 15.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    fn label() -> Vec<TextBox> {
        vec![
            text_box("12/04/2025", 120.0, 42.0),
            text_box("Batch", 10.0, 80.0),
            text_box("Best Before:", 10.0, 45.0),
            text_box("  ", 10.0, 120.0),
        ]
    }

    #[test]
    fn test_assemble_auto_groups_rows() {
        let mut boxes = label();
        assert_eq!(
            assemble_text(&mut boxes, RecognitionMode::Auto),
            "Best Before: 12/04/2025\nBatch"
        );
    }

    #[test]
    fn test_assemble_sparse_and_single_line() {
        let mut boxes = label();
        assert_eq!(
            assemble_text(&mut boxes, RecognitionMode::Sparse),
            "Best Before:\n12/04/2025\nBatch"
        );
        assert_eq!(
            assemble_text(&mut boxes, RecognitionMode::SingleLine),
            "Best Before: 12/04/2025 Batch"
        );
    }

    #[test]
    fn test_rect() {
        let b = text_box("x", 5.0, 7.0);
        assert_eq!(b.rect(), (5.0, 7.0, 55.0, 22.0));
    }
}
