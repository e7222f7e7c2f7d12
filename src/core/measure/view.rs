//! Single-view measurement.

use super::bbox::BoundingBoxEstimator;
use super::contour::ContourExtractor;
use super::debug::DebugArtifacts;
use super::segmenter::Segmenter;
use super::validator::PixelSizeValidator;
use super::{MeasureConfig, MeasuredView};
use crate::core::decode::FastDecoder;
use crate::core::object::SourceImage;
use crate::error::DecodeError;
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

const RED_WEIGHT: f64 = 0.2989;
const GREEN_WEIGHT: f64 = 0.5870;
const BLUE_WEIGHT: f64 = 0.1140;

/// Grayscale conversion with fixed luma weights, truncated to u8.
///
/// Gray inputs (with or without alpha, any depth) keep their luma values.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => return gray.clone(),
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
            return image.to_luma8();
        }
        _ => {}
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let value = RED_WEIGHT * r as f64 + GREEN_WEIGHT * g as f64 + BLUE_WEIGHT * b as f64;
        gray.put_pixel(x, y, Luma([value as u8]));
    }
    gray
}

/// Measures the walnut's pixel extents in one photograph
#[derive(Debug, Clone)]
pub struct ViewMeasurer {
    segmenter: Segmenter,
    extractor: ContourExtractor,
    validator: PixelSizeValidator,
    save_intermediate: bool,
}

impl ViewMeasurer {
    pub fn new(config: &MeasureConfig) -> Self {
        Self {
            segmenter: Segmenter::new(config.background_is_bright),
            extractor: ContourExtractor::new(config.min_contour_size),
            validator: PixelSizeValidator::new(config.min_bbox_ratio, config.max_bbox_ratio),
            save_intermediate: config.save_intermediate,
        }
    }

    /// Decode `source` from disk and measure it
    pub fn measure(&self, source: &SourceImage) -> Result<MeasuredView, DecodeError> {
        let image = FastDecoder::decode(source.path())?;
        Ok(self.measure_decoded(&image, Some(source)))
    }

    /// Measure an already decoded view.
    ///
    /// `source` is only used to place debug artifacts.
    pub fn measure_decoded(&self, image: &DynamicImage, source: Option<&SourceImage>) -> MeasuredView {
        let artifacts = source
            .filter(|_| self.save_intermediate)
            .map(|s| DebugArtifacts::new(s.path(), s.side()));
        let view = self.run(image, artifacts.as_ref());

        if let Some(source) = source {
            debug!(
                side = %source.side(),
                width_px = view.width_px,
                height_px = view.height_px,
                "measured view"
            );
        }
        view
    }

    fn run(&self, image: &DynamicImage, artifacts: Option<&DebugArtifacts>) -> MeasuredView {
        let gray = to_grayscale(image);
        if let Some(artifacts) = artifacts {
            artifacts.save_grayscale(&gray);
        }

        let mask = self.segmenter.segment(&gray);
        if let Some(artifacts) = artifacts {
            artifacts.save_mask(&mask);
        }

        let Some(region) = self.extractor.largest_region(&mask) else {
            return MeasuredView::NONE;
        };
        if let Some(artifacts) = artifacts {
            artifacts.save_contour(image, &mask, &region);
        }

        let view = BoundingBoxEstimator::estimate(region.points());
        if let Some(artifacts) = artifacts {
            artifacts.save_bbox(image, &region);
        }
        if !view.is_measured() {
            return MeasuredView::NONE;
        }

        if !self.validator.is_plausible(view, image.width(), image.height()) {
            debug!(
                width_px = view.width_px,
                height_px = view.height_px,
                "bounding box outside plausible ratio"
            );
            return MeasuredView::NONE;
        }

        view
    }
}

impl Default for ViewMeasurer {
    fn default() -> Self {
        Self::new(&MeasureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA, Rgb, RgbImage};

    /// Dark rectangle spanning `[x0, x1] x [y0, y1]` on a light background
    fn walnut_photo(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> DynamicImage {
        let image: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Rgb([90, 60, 30])
            } else {
                Rgb([235, 235, 230])
            }
        });
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn grayscale_uses_luma_weights() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([100, 200, 50])));
        // 29.89 + 117.4 + 5.7 = 152.99 truncated
        assert_eq!(to_grayscale(&image).get_pixel(0, 0)[0], 152);
    }

    #[test]
    fn grayscale_input_is_untouched() {
        let gray = GrayImage::from_pixel(3, 3, Luma([77]));
        let result = to_grayscale(&DynamicImage::ImageLuma8(gray.clone()));
        assert_eq!(result, gray);
    }

    #[test]
    fn gray_with_alpha_keeps_luma() {
        let image = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(2, 2, LumaA([200, 128])));
        assert_eq!(to_grayscale(&image).get_pixel(1, 1)[0], 200);

        let deep = DynamicImage::ImageLuma16(ImageBuffer::from_pixel(2, 2, Luma([u16::MAX])));
        assert_eq!(to_grayscale(&deep).get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn measures_dark_walnut_on_light_background() {
        let image = walnut_photo(200, 200, 50, 40, 150, 110);
        let view = ViewMeasurer::default().measure_decoded(&image, None);
        assert_eq!(view, MeasuredView::new(70.0, 100.0));
    }

    #[test]
    fn blank_photo_is_sentinel() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([240, 240, 240])));
        assert_eq!(ViewMeasurer::default().measure_decoded(&image, None), MeasuredView::NONE);
    }

    #[test]
    fn implausibly_small_walnut_is_rejected() {
        // 20 / 400 = 0.05 of the frame
        let image = walnut_photo(400, 400, 100, 100, 120, 130);
        assert_eq!(ViewMeasurer::default().measure_decoded(&image, None), MeasuredView::NONE);
    }

    #[test]
    fn looser_ratio_bounds_accept_small_walnut() {
        let image = walnut_photo(400, 400, 100, 100, 120, 130);
        let config = MeasureConfig::new().bbox_ratio(0.01, 0.9);
        let view = ViewMeasurer::new(&config).measure_decoded(&image, None);
        assert_eq!(view, MeasuredView::new(20.0, 30.0));
    }
}
