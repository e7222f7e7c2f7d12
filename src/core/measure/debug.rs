//! Intermediate images for inspecting a single view measurement.
//!
//! For `<dir>/W1_front.jpg` the four artifacts land in
//! `<dir>/_intermediate/W1_front_intermediate_{step}_front.jpg`.
//! Write failures are logged and never abort the measurement.

use super::contour::Region;
use super::segmenter::FOREGROUND;
use crate::core::side::Side;
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const BOX_THICKNESS: u32 = 2;
const CENTER_RADIUS: i32 = 5;

/// Name of the directory created next to the source image
pub const INTERMEDIATE_DIR: &str = "_intermediate";

/// Pipeline stage an artifact captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugStep {
    Grayscale,
    Mask,
    Contour,
    BoundingBox,
}

impl DebugStep {
    pub const ALL: [DebugStep; 4] = [
        DebugStep::Grayscale,
        DebugStep::Mask,
        DebugStep::Contour,
        DebugStep::BoundingBox,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DebugStep::Grayscale => "01_grayscale",
            DebugStep::Mask => "02_mask",
            DebugStep::Contour => "03_contour",
            DebugStep::BoundingBox => "04_bbox",
        }
    }
}

/// Writes the artifacts for one source image
#[derive(Debug, Clone)]
pub struct DebugArtifacts {
    source: PathBuf,
    side: Side,
}

impl DebugArtifacts {
    pub fn new(source: &Path, side: Side) -> Self {
        Self {
            source: source.to_path_buf(),
            side,
        }
    }

    /// Destination for one step's artifact
    pub fn path_for(&self, step: DebugStep) -> PathBuf {
        let dir = self.source.parent().unwrap_or_else(|| Path::new("."));
        let stem = self
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = self
            .source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| ".png".to_string());

        dir.join(INTERMEDIATE_DIR).join(format!(
            "{}_intermediate_{}_{}{}",
            stem,
            step.code(),
            self.side,
            suffix
        ))
    }

    pub fn save_grayscale(&self, gray: &GrayImage) {
        self.write(DebugStep::Grayscale, &DynamicImage::ImageLuma8(gray.clone()));
    }

    pub fn save_mask(&self, mask: &GrayImage) {
        self.write(DebugStep::Mask, &DynamicImage::ImageLuma8(mask.clone()));
    }

    /// Source image with the region's boundary pixels painted red
    pub fn save_contour(&self, image: &DynamicImage, mask: &GrayImage, region: &Region) {
        let mut canvas = image.to_rgb8();
        for &(x, y) in region.points() {
            if is_boundary(mask, x, y) {
                canvas.put_pixel(x, y, CONTOUR_COLOR);
            }
        }
        self.write(DebugStep::Contour, &DynamicImage::ImageRgb8(canvas));
    }

    /// Source image with the region's box outlined and its center marked
    pub fn save_bbox(&self, image: &DynamicImage, region: &Region) {
        let mut canvas = image.to_rgb8();
        let (min_x, min_y, max_x, max_y) = region.bounds();
        draw_box(&mut canvas, min_x, min_y, max_x, max_y);
        let center = (((min_x + max_x) / 2) as i32, ((min_y + max_y) / 2) as i32);
        draw_filled_circle_mut(&mut canvas, center, CENTER_RADIUS, CENTER_COLOR);
        self.write(DebugStep::BoundingBox, &DynamicImage::ImageRgb8(canvas));
    }

    fn write(&self, step: DebugStep, image: &DynamicImage) {
        let path = self.path_for(step);
        if let Some(dir) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!(path = %dir.display(), error = %e, "cannot create intermediate directory");
                return;
            }
        }

        match image.save(&path) {
            Ok(()) => debug!(path = %path.display(), step = step.code(), "saved intermediate"),
            Err(e) => warn!(path = %path.display(), error = %e, "cannot save intermediate"),
        }
    }
}

/// Foreground pixel with an 8-neighbour that is background or off-image
fn is_boundary(mask: &GrayImage, x: u32, y: u32) -> bool {
    let (width, height) = mask.dimensions();
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                return true;
            }
            if mask.get_pixel(nx as u32, ny as u32)[0] != FOREGROUND {
                return true;
            }
        }
    }
    false
}

/// Outline `BOX_THICKNESS` pixels wide, growing inward from the bounds
fn draw_box(canvas: &mut RgbImage, min_x: u32, min_y: u32, max_x: u32, max_y: u32) {
    let width = max_x.saturating_sub(min_x) + 1;
    let height = max_y.saturating_sub(min_y) + 1;
    for inset in 0..BOX_THICKNESS {
        if width <= 2 * inset || height <= 2 * inset {
            break;
        }
        let rect = Rect::at((min_x + inset) as i32, (min_y + inset) as i32)
            .of_size(width - 2 * inset, height - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measure::ContourExtractor;
    use image::Luma;
    use tempfile::TempDir;

    #[test]
    fn artifact_path_follows_naming_scheme() {
        let artifacts = DebugArtifacts::new(Path::new("/data/W1/W1_front.jpg"), Side::Front);
        assert_eq!(
            artifacts.path_for(DebugStep::Mask),
            PathBuf::from("/data/W1/_intermediate/W1_front_intermediate_02_mask_front.jpg")
        );
        assert_eq!(
            artifacts.path_for(DebugStep::BoundingBox),
            PathBuf::from("/data/W1/_intermediate/W1_front_intermediate_04_bbox_front.jpg")
        );
    }

    #[test]
    fn writes_all_four_steps() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("W2_top.png");
        let artifacts = DebugArtifacts::new(&source, Side::Top);

        let mut mask = GrayImage::new(60, 60);
        for y in 20..40 {
            for x in 15..45 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        let image = DynamicImage::ImageLuma8(mask.clone());
        let region = ContourExtractor::new(0).largest_region(&mask).unwrap();

        artifacts.save_grayscale(&mask);
        artifacts.save_mask(&mask);
        artifacts.save_contour(&image, &mask, &region);
        artifacts.save_bbox(&image, &region);

        for step in DebugStep::ALL {
            assert!(artifacts.path_for(step).exists(), "missing {}", step.code());
        }
    }

    #[test]
    fn contour_marks_edges_only() {
        let mut mask = GrayImage::new(10, 10);
        for y in 2..8 {
            for x in 2..8 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        assert!(is_boundary(&mask, 2, 2));
        assert!(is_boundary(&mask, 7, 4));
        assert!(!is_boundary(&mask, 4, 4));
    }

    #[test]
    fn box_outline_is_two_pixels_wide() {
        let mut canvas = RgbImage::new(40, 40);
        draw_box(&mut canvas, 10, 10, 29, 29);

        assert_eq!(*canvas.get_pixel(10, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(11, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(29, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(28, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(12, 20), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(9, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn box_for_tiny_region_stays_in_bounds() {
        let mut canvas = RgbImage::new(4, 4);
        draw_box(&mut canvas, 3, 3, 3, 3);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn bbox_artifact_marks_center() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("W3_left.png");
        let artifacts = DebugArtifacts::new(&source, Side::Left);

        let mut mask = GrayImage::new(60, 60);
        for y in 10..50 {
            for x in 10..50 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        let region = ContourExtractor::new(0).largest_region(&mask).unwrap();
        artifacts.save_bbox(&DynamicImage::ImageLuma8(mask), &region);

        let saved = image::open(artifacts.path_for(DebugStep::BoundingBox))
            .unwrap()
            .to_rgb8();
        assert_eq!(*saved.get_pixel(29, 29), CENTER_COLOR);
        assert_eq!(*saved.get_pixel(10, 30), BOX_COLOR);
    }
}
