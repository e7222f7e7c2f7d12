//! # Object Module
//!
//! A walnut as the engine sees it: six photographs plus whatever has been
//! learned about it so far (embeddings, dimensions).
//!
//! ## Lifecycle
//! 1. [`SourceImage::from_path`] for each side
//! 2. [`MeasurableObject::from_images`] checks that all six sides are present
//! 3. Optionally attach one embedding per side
//! 4. [`MeasurableObject::estimate_dimensions`] measures and validates

use crate::core::decode::{pixel_checksum, FastDecoder, ImageFormat};
use crate::core::dimension::DimensionValue;
use crate::core::measure::{CameraSetup, SixViewEstimator};
use crate::core::side::{Side, SideMap};
use crate::error::{ObjectError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One photograph of one side of an object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceImage {
    side: Side,
    path: PathBuf,
    width: u32,
    height: u32,
    format: ImageFormat,
    checksum: String,
    camera: CameraSetup,
    #[serde(skip)]
    embedding: Option<Vec<f32>>,
}

impl SourceImage {
    /// Largest accepted image edge in pixels
    pub const MAX_DIMENSION: u32 = 10_000;

    /// Decode `path` once to record its size, format and pixel checksum
    pub fn from_path(path: impl AsRef<Path>, side: Side, camera: CameraSetup) -> Result<Self> {
        let path = path.as_ref();
        let image = FastDecoder::decode(path)?;

        let source = Self::new(
            side,
            path.to_path_buf(),
            image.width(),
            image.height(),
            ImageFormat::from_path(path),
            pixel_checksum(&image),
            camera,
        )?;
        Ok(source)
    }

    /// Build from already known metadata; validates before returning
    pub fn new(
        side: Side,
        path: PathBuf,
        width: u32,
        height: u32,
        format: ImageFormat,
        checksum: String,
        camera: CameraSetup,
    ) -> std::result::Result<Self, ObjectError> {
        let image = Self {
            side,
            path,
            width,
            height,
            format,
            checksum,
            camera,
            embedding: None,
        };
        image.validate()?;
        Ok(image)
    }

    pub fn validate(&self) -> std::result::Result<(), ObjectError> {
        let invalid = |reason: String| ObjectError::InvalidImage {
            side: self.side,
            reason,
        };

        if self.path.as_os_str().is_empty() {
            return Err(invalid("path must not be empty".to_string()));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > Self::MAX_DIMENSION {
                return Err(invalid(format!(
                    "{} {}px is outside (0, {}]",
                    name,
                    value,
                    Self::MAX_DIMENSION
                )));
            }
        }
        if !self.format.is_accepted() {
            return Err(invalid(format!("unsupported format {}", self.format)));
        }
        Ok(())
    }

    /// Copy of this image carrying `embedding`
    pub fn with_embedding(&self, embedding: Vec<f32>) -> Self {
        Self {
            embedding: Some(embedding),
            ..self.clone()
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn camera(&self) -> CameraSetup {
        self.camera
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }
}

/// A walnut with exactly one image per side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurableObject {
    id: String,
    images: SideMap<SourceImage>,
    dimensions: Option<DimensionValue>,
}

impl MeasurableObject {
    /// Validates the id and every image; each image must be filed under its own side
    pub fn new(id: impl Into<String>, images: SideMap<SourceImage>) -> std::result::Result<Self, ObjectError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ObjectError::EmptyId);
        }

        for (side, image) in images.iter() {
            if image.side() != side {
                return Err(ObjectError::InvalidImage {
                    side,
                    reason: format!("image is tagged as {}", image.side()),
                });
            }
            image.validate()?;
        }

        Ok(Self {
            id,
            images,
            dimensions: None,
        })
    }

    /// Collect loose images into a complete object.
    ///
    /// Reports every missing side at once.
    pub fn from_images(
        id: impl Into<String>,
        images: Vec<SourceImage>,
    ) -> std::result::Result<Self, ObjectError> {
        let mut slots: SideMap<Option<SourceImage>> = SideMap::default();
        for image in images {
            let side = image.side();
            if slots[side].is_some() {
                return Err(ObjectError::DuplicateSide { side });
            }
            slots[side] = Some(image);
        }

        let missing: Vec<Side> = slots
            .iter()
            .filter(|(_, image)| image.is_none())
            .map(|(side, _)| side)
            .collect();
        if !missing.is_empty() {
            return Err(ObjectError::MissingSides { missing });
        }

        let images = SideMap::try_from_fn(|side| {
            slots[side]
                .take()
                .ok_or(ObjectError::MissingSides { missing: vec![side] })
        })?;
        Self::new(id, images)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn images(&self) -> &SideMap<SourceImage> {
        &self.images
    }

    pub fn image(&self, side: Side) -> &SourceImage {
        &self.images[side]
    }

    /// Replace the image for `side` with one carrying `embedding`
    pub fn attach_embedding(&mut self, side: Side, embedding: Vec<f32>) {
        self.images[side] = self.images[side].with_embedding(embedding);
    }

    pub fn embedding(&self, side: Side) -> Option<&[f32]> {
        self.images[side].embedding()
    }

    /// Per-side view of the attached embeddings
    pub fn embeddings(&self) -> SideMap<Option<&[f32]>> {
        SideMap::from_fn(|side| self.embedding(side))
    }

    pub fn has_all_embeddings(&self) -> bool {
        self.images.iter().all(|(_, image)| image.embedding().is_some())
    }

    pub fn set_dimensions(&mut self, dimensions: DimensionValue) {
        self.dimensions = Some(dimensions);
    }

    pub fn dimensions(&self) -> Option<DimensionValue> {
        self.dimensions
    }

    /// Measure all six views and store the validated result
    pub fn estimate_dimensions(&mut self, estimator: &SixViewEstimator) -> Result<DimensionValue> {
        let raw = estimator.estimate(&self.images)?;
        let dimensions = raw.validate()?;
        self.dimensions = Some(dimensions);
        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalnutPairError;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn source(side: Side) -> SourceImage {
        SourceImage::new(
            side,
            PathBuf::from(format!("W1/W1_{}.jpg", side)),
            640,
            480,
            ImageFormat::Jpeg,
            "0000000000000000".to_string(),
            CameraSetup::default(),
        )
        .unwrap()
    }

    fn all_sources() -> Vec<SourceImage> {
        Side::ALL.into_iter().map(source).collect()
    }

    #[test]
    fn from_path_reads_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("W1_left.png");
        RgbImage::from_pixel(64, 48, Rgb([200, 200, 200])).save(&path).unwrap();

        let image = SourceImage::from_path(&path, Side::Left, CameraSetup::default()).unwrap();
        assert_eq!((image.width(), image.height()), (64, 48));
        assert_eq!(image.format(), ImageFormat::Png);
        assert_eq!(image.checksum().len(), 16);
        assert!(image.embedding().is_none());
    }

    #[test]
    fn from_path_missing_file_is_decode_error() {
        let result = SourceImage::from_path("/nonexistent/W1_left.png", Side::Left, CameraSetup::default());
        assert!(matches!(result, Err(WalnutPairError::Decode(_))));
    }

    #[test]
    fn unsupported_format_is_invalid() {
        let result = SourceImage::new(
            Side::Left,
            PathBuf::from("W1_left.webp"),
            64,
            64,
            ImageFormat::WebP,
            String::new(),
            CameraSetup::default(),
        );
        assert!(matches!(result, Err(ObjectError::InvalidImage { side: Side::Left, .. })));
    }

    #[test]
    fn oversized_image_is_invalid() {
        let result = SourceImage::new(
            Side::Top,
            PathBuf::from("W1_top.jpg"),
            10_001,
            100,
            ImageFormat::Jpeg,
            String::new(),
            CameraSetup::default(),
        );
        assert!(matches!(result, Err(ObjectError::InvalidImage { side: Side::Top, .. })));
    }

    #[test]
    fn with_embedding_leaves_original_untouched() {
        let original = source(Side::Front);
        let embedded = original.with_embedding(vec![1.0, 0.0]);
        assert!(original.embedding().is_none());
        assert_eq!(embedded.embedding(), Some(&[1.0, 0.0][..]));
    }

    #[test]
    fn from_images_accepts_any_order() {
        let mut images = all_sources();
        images.reverse();
        let object = MeasurableObject::from_images("W1", images).unwrap();
        assert_eq!(object.image(Side::Right).side(), Side::Right);
        assert!(object.dimensions().is_none());
    }

    #[test]
    fn from_images_lists_all_missing_sides() {
        let images: Vec<_> = all_sources()
            .into_iter()
            .filter(|image| !matches!(image.side(), Side::Back | Side::Down))
            .collect();

        let error = MeasurableObject::from_images("W1", images).unwrap_err();
        assert_eq!(
            error,
            ObjectError::MissingSides {
                missing: vec![Side::Back, Side::Down]
            }
        );
    }

    #[test]
    fn from_images_rejects_duplicates() {
        let mut images = all_sources();
        images.push(source(Side::Top));
        assert_eq!(
            MeasurableObject::from_images("W1", images),
            Err(ObjectError::DuplicateSide { side: Side::Top })
        );
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(
            MeasurableObject::from_images("  ", all_sources()),
            Err(ObjectError::EmptyId)
        );
    }

    #[test]
    fn misfiled_image_is_rejected() {
        let mut images = SideMap::from_fn(source);
        images.left = source(Side::Right);
        assert!(matches!(
            MeasurableObject::new("W1", images),
            Err(ObjectError::InvalidImage { side: Side::Left, .. })
        ));
    }

    #[test]
    fn embeddings_attach_per_side() {
        let mut object = MeasurableObject::from_images("W1", all_sources()).unwrap();
        assert!(!object.has_all_embeddings());

        for side in Side::ALL {
            object.attach_embedding(side, vec![side as u8 as f32]);
        }
        assert!(object.has_all_embeddings());
        assert_eq!(object.embedding(Side::Back), Some(&[1.0][..]));
        assert_eq!(object.embeddings().down, Some(&[5.0][..]));
    }

    #[test]
    fn dimensions_can_be_set() {
        let mut object = MeasurableObject::from_images("W1", all_sources()).unwrap();
        let dims = DimensionValue::new(34.0, 32.0, 30.0).unwrap();
        object.set_dimensions(dims);
        assert_eq!(object.dimensions(), Some(dims));
    }
}
