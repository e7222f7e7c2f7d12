//! # Scanner Module
//!
//! Discovers object folders on disk.
//!
//! ## Layout
//! ```text
//! walnuts/
//!   W001/
//!     W001_front.jpg  W001_back.jpg  W001_left.jpg
//!     W001_right.jpg  W001_top.jpg   W001_down.jpg
//!   W002/
//!     ...
//! ```
//! Each immediate sub-directory of a root is one object; its name is the
//! object id. A photo's side comes from the `_<side>` suffix of its file
//! stem (case-insensitive). Accepted formats are JPEG, PNG, BMP and TIFF.
//!
//! Folders missing a side are reported as errors without stopping the scan.
//!
//! ## Example
//! ```rust,ignore
//! use walnut_pair::core::scanner::{ObjectScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/data/walnuts".into()]);
//! ```

mod filter;
mod walker;

pub use filter::SideFileFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::core::measure::CameraSetup;
use crate::core::object::{MeasurableObject, SourceImage};
use crate::core::side::{Side, SideMap};
use crate::error::{ScanError, WalnutPairError};
use crate::events::EventSender;
use serde::Serialize;
use std::path::PathBuf;

/// A folder holding one photo per side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectFolder {
    /// Folder name
    pub id: String,
    /// Folder path
    pub path: PathBuf,
    /// Photo for each side
    pub files: SideMap<PathBuf>,
}

impl ObjectFolder {
    /// Decode every photo and assemble the object
    pub fn load(&self, camera: CameraSetup) -> Result<MeasurableObject, WalnutPairError> {
        let images = Side::ALL
            .into_iter()
            .map(|side| SourceImage::from_path(&self.files[side], side, camera))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MeasurableObject::from_images(self.id.clone(), images)?)
    }
}

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Complete object folders
    pub objects: Vec<ObjectFolder>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for object folder scanners
pub trait ObjectScanner: Send + Sync {
    /// Scan root directories for object folders
    fn scan(&self, roots: &[PathBuf]) -> ScanResult;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn folder_loads_into_object() {
        let dir = TempDir::new().unwrap();
        let files = SideMap::from_fn(|side| {
            let path = dir.path().join(format!("W9_{}.png", side));
            RgbImage::from_pixel(32, 24, Rgb([120, 80, 40])).save(&path).unwrap();
            path
        });
        let folder = ObjectFolder {
            id: "W9".to_string(),
            path: dir.path().to_path_buf(),
            files,
        };

        let object = folder.load(CameraSetup::default()).unwrap();
        assert_eq!(object.id(), "W9");
        assert_eq!(object.image(Side::Down).width(), 32);
    }

    #[test]
    fn unreadable_photo_fails_load() {
        let dir = TempDir::new().unwrap();
        let folder = ObjectFolder {
            id: "W9".to_string(),
            path: dir.path().to_path_buf(),
            files: SideMap::from_fn(|side| dir.path().join(format!("W9_{}.png", side))),
        };

        assert!(matches!(
            folder.load(CameraSetup::default()),
            Err(WalnutPairError::Decode(_))
        ));
    }
}
