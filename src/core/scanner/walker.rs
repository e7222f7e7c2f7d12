//! Object folder discovery using walkdir.

use super::filter::SideFileFilter;
use super::{ObjectFolder, ObjectScanner, ScanResult};
use crate::core::side::{Side, SideMap};
use crate::error::{ObjectError, ScanError};
use crate::events::{Event, EventSender, ScanEvent};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for the folder scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: SideFileFilter,
}

impl WalkDirScanner {
    pub fn new(config: ScanConfig) -> Self {
        let filter = SideFileFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Read one object folder.
    ///
    /// The folder name is the object id. Only files directly inside it count.
    pub fn scan_object_dir(&self, dir: &Path) -> Result<ObjectFolder, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut slots: SideMap<Option<PathBuf>> = SideMap::default();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| ScanError::ReadDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(side) = self.filter.side_of(entry.path()) else {
                continue;
            };
            if slots[side].is_some() {
                return Err(incomplete(dir, ObjectError::DuplicateSide { side }));
            }
            slots[side] = Some(entry.path().to_path_buf());
        }

        let missing: Vec<Side> = slots
            .iter()
            .filter(|(_, path)| path.is_none())
            .map(|(side, _)| side)
            .collect();
        if !missing.is_empty() {
            return Err(incomplete(dir, ObjectError::MissingSides { missing }));
        }

        let files = SideMap::try_from_fn(|side| {
            slots[side]
                .take()
                .ok_or_else(|| incomplete(dir, ObjectError::MissingSides { missing: vec![side] }))
        })?;

        Ok(ObjectFolder {
            id: folder_id(dir),
            path: dir.to_path_buf(),
            files,
        })
    }

    /// Every immediate sub-directory of `root` is a candidate object
    fn scan_root(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut result = ScanResult::default();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let error = ScanError::ReadDirectory {
                        path: root.to_path_buf(),
                        source,
                    };
                    report(events, root, &error);
                    result.errors.push(error);
                    continue;
                }
            };

            let dir = entry.path();
            if !entry.file_type().is_dir() {
                continue;
            }
            if !self.config.include_hidden && SideFileFilter::is_hidden(dir) {
                continue;
            }

            match self.scan_object_dir(dir) {
                Ok(folder) => {
                    events.send(Event::Scan(ScanEvent::ObjectFound {
                        id: folder.id.clone(),
                        path: folder.path.clone(),
                    }));
                    result.objects.push(folder);
                }
                Err(ScanError::IncompleteObject {
                    source: ObjectError::MissingSides { missing },
                    ..
                }) if missing.len() == Side::ALL.len() => {
                    debug!(path = %dir.display(), "no side photos, skipping folder");
                }
                Err(error) => {
                    report(events, dir, &error);
                    result.errors.push(error);
                }
            }
        }

        Ok(result)
    }
}

impl ObjectScanner for WalkDirScanner {
    fn scan(&self, roots: &[PathBuf]) -> ScanResult {
        self.scan_with_events(roots, &crate::events::null_sender())
    }

    fn scan_with_events(&self, roots: &[PathBuf], events: &EventSender) -> ScanResult {
        events.send(Event::Scan(ScanEvent::Started {
            paths: roots.to_vec(),
        }));

        let mut all = ScanResult::default();
        for root in roots {
            match self.scan_root(root, events) {
                Ok(result) => {
                    all.objects.extend(result.objects);
                    all.errors.extend(result.errors);
                }
                Err(error) => {
                    report(events, root, &error);
                    all.errors.push(error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_objects: all.objects.len(),
        }));
        all
    }
}

fn folder_id(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

fn incomplete(dir: &Path, source: ObjectError) -> ScanError {
    ScanError::IncompleteObject {
        path: dir.to_path_buf(),
        source,
    }
}

fn report(events: &EventSender, path: &Path, error: &ScanError) {
    events.send(Event::Scan(ScanEvent::Error {
        path: path.to_path_buf(),
        message: error.to_string(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn object_dir(root: &Path, id: &str, sides: &[Side]) -> PathBuf {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        for side in sides {
            File::create(dir.join(format!("{}_{}.jpg", id, side))).unwrap();
        }
        dir
    }

    #[test]
    fn complete_folder_becomes_object() {
        let root = TempDir::new().unwrap();
        let dir = object_dir(root.path(), "W001", &Side::ALL);
        File::create(dir.join("notes.txt")).unwrap();

        let folder = WalkDirScanner::new(ScanConfig::default())
            .scan_object_dir(&dir)
            .unwrap();
        assert_eq!(folder.id, "W001");
        assert!(folder.files.top.ends_with("W001_top.jpg"));
    }

    #[test]
    fn incomplete_folder_lists_missing_sides() {
        let root = TempDir::new().unwrap();
        let dir = object_dir(root.path(), "W002", &[Side::Front, Side::Back, Side::Left, Side::Right]);

        let error = WalkDirScanner::new(ScanConfig::default())
            .scan_object_dir(&dir)
            .unwrap_err();
        match error {
            ScanError::IncompleteObject {
                source: ObjectError::MissingSides { missing },
                ..
            } => assert_eq!(missing, vec![Side::Top, Side::Down]),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn duplicate_side_is_reported() {
        let root = TempDir::new().unwrap();
        let dir = object_dir(root.path(), "W003", &Side::ALL);
        File::create(dir.join("W003_FRONT.png")).unwrap();

        let error = WalkDirScanner::new(ScanConfig::default())
            .scan_object_dir(&dir)
            .unwrap_err();
        assert!(matches!(
            error,
            ScanError::IncompleteObject {
                source: ObjectError::DuplicateSide { side: Side::Front },
                ..
            }
        ));
    }

    #[test]
    fn root_scan_collects_objects_and_errors() {
        let root = TempDir::new().unwrap();
        object_dir(root.path(), "W001", &Side::ALL);
        object_dir(root.path(), "W002", &Side::ALL);
        object_dir(root.path(), "W003", &[Side::Front]);
        object_dir(root.path(), ".cache", &Side::ALL);
        fs::create_dir(root.path().join("empty")).unwrap();

        let result = WalkDirScanner::new(ScanConfig::default()).scan(&[root.path().to_path_buf()]);

        let ids: Vec<&str> = result.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["W001", "W002"]);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].to_string().contains("W003"));
    }

    #[test]
    fn missing_root_is_non_fatal() {
        let result =
            WalkDirScanner::new(ScanConfig::default()).scan(&[PathBuf::from("/nonexistent/walnuts")]);
        assert!(result.objects.is_empty());
        assert!(matches!(result.errors[0], ScanError::DirectoryNotFound { .. }));
    }
}
