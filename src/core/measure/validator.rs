//! Plausibility check for a detected box relative to its frame.

use super::MeasuredView;

/// Accepts boxes whose extents fill a sane share of the image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSizeValidator {
    min_ratio: f64,
    max_ratio: f64,
}

impl PixelSizeValidator {
    pub const DEFAULT_MIN_RATIO: f64 = 0.2;
    pub const DEFAULT_MAX_RATIO: f64 = 0.8;

    pub fn new(min_ratio: f64, max_ratio: f64) -> Self {
        Self {
            min_ratio,
            max_ratio,
        }
    }

    /// Both `width_px / image_width` and `height_px / image_height` must lie
    /// in `[min_ratio, max_ratio]`. A zero image dimension gives ratio 0.
    pub fn is_plausible(&self, view: MeasuredView, image_width: u32, image_height: u32) -> bool {
        let ratio = |extent: f64, size: u32| {
            if size == 0 {
                0.0
            } else {
                extent / size as f64
            }
        };

        let range = self.min_ratio..=self.max_ratio;
        range.contains(&ratio(view.width_px, image_width))
            && range.contains(&ratio(view.height_px, image_height))
    }
}

impl Default for PixelSizeValidator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_RATIO, Self::DEFAULT_MAX_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_box_in_range() {
        let validator = PixelSizeValidator::default();
        assert!(validator.is_plausible(MeasuredView::new(300.0, 300.0), 1000, 1000));
    }

    #[test]
    fn rejects_tiny_and_oversized_boxes() {
        let validator = PixelSizeValidator::default();
        assert!(!validator.is_plausible(MeasuredView::new(50.0, 300.0), 1000, 1000));
        assert!(!validator.is_plausible(MeasuredView::new(300.0, 900.0), 1000, 1000));
    }

    #[test]
    fn bounds_are_inclusive() {
        let validator = PixelSizeValidator::default();
        assert!(validator.is_plausible(MeasuredView::new(200.0, 800.0), 1000, 1000));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let validator = PixelSizeValidator::default();
        assert!(!validator.is_plausible(MeasuredView::new(300.0, 300.0), 0, 1000));
    }

    #[test]
    fn custom_bounds_apply() {
        let validator = PixelSizeValidator::new(0.05, 0.95);
        assert!(validator.is_plausible(MeasuredView::new(50.0, 900.0), 1000, 1000));
    }
}
