//! Recognises which side of an object a photo shows.

use crate::core::decode::ImageFormat;
use crate::core::side::Side;
use std::path::Path;

/// Matches files named `<anything>_<side>.<image ext>`
pub struct SideFileFilter {
    include_hidden: bool,
}

impl SideFileFilter {
    pub fn new() -> Self {
        Self {
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
    }

    /// Side shown by `path`, or `None` if the file is not a side photo.
    ///
    /// The suffix match ignores case: `W1_FRONT.JPG` is the front view.
    pub fn side_of(&self, path: &Path) -> Option<Side> {
        if !self.include_hidden && Self::is_hidden(path) {
            return None;
        }
        if !ImageFormat::from_path(path).is_accepted() {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let (prefix, suffix) = stem.rsplit_once('_')?;
        if prefix.is_empty() {
            return None;
        }
        Side::parse(suffix)
    }
}

impl Default for SideFileFilter {
    fn default() -> Self {
        Self::new()
    }
}
