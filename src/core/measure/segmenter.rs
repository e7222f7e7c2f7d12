//! Global-threshold foreground segmentation.
//!
//! The threshold maximises the between-class variance of the intensity
//! histogram (Otsu's method):
//! 1. Build a 256-bin histogram
//! 2. For each t in 1..=255 split into [0, t) and [t, 255]
//! 3. Score w0 * w1 * (m0 - m1)^2 and keep the first best t

use image::{GrayImage, Luma};

/// Mask value for walnut pixels
pub const FOREGROUND: u8 = 255;
/// Mask value for background pixels
pub const BACKGROUND: u8 = 0;

/// Splits a grayscale view into walnut and background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    background_is_bright: bool,
}

impl Segmenter {
    pub fn new(background_is_bright: bool) -> Self {
        Self {
            background_is_bright,
        }
    }

    /// Produce a binary mask where walnut pixels are [`FOREGROUND`]
    pub fn segment(&self, gray: &GrayImage) -> GrayImage {
        let threshold = Self::threshold(gray);

        let mut mask = GrayImage::new(gray.width(), gray.height());
        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = pixel[0];
            let is_foreground = if self.background_is_bright {
                value < threshold
            } else {
                value > threshold
            };
            if is_foreground {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }

        mask
    }

    /// Threshold with maximum between-class variance, or 0 when every
    /// candidate leaves one class empty
    pub fn threshold(gray: &GrayImage) -> u8 {
        let mut histogram = [0u64; 256];
        for pixel in gray.pixels() {
            histogram[pixel[0] as usize] += 1;
        }

        let total: u64 = histogram.iter().sum();
        if total == 0 {
            return 0;
        }

        let total_f = total as f64;
        let intensity_sum: f64 = histogram
            .iter()
            .enumerate()
            .map(|(i, &count)| i as f64 * count as f64)
            .sum();

        let mut best_threshold = 0u8;
        let mut max_variance = 0.0;

        // Running totals for class 0 (bins below t)
        let mut count_below = 0u64;
        let mut sum_below = 0.0;

        for t in 1..256usize {
            count_below += histogram[t - 1];
            sum_below += (t - 1) as f64 * histogram[t - 1] as f64;

            let count_above = total - count_below;
            if count_below == 0 || count_above == 0 {
                continue;
            }

            let w0 = count_below as f64 / total_f;
            let w1 = count_above as f64 / total_f;
            let m0 = sum_below / count_below as f64;
            let m1 = (intensity_sum - sum_below) / count_above as f64;

            let variance = w0 * w1 * (m0 - m1).powi(2);
            if variance > max_variance {
                max_variance = variance;
                best_threshold = t as u8;
            }
        }

        best_threshold
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(true)
    }
}
