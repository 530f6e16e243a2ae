//! Resources backed by a directory on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::resources::{ResourceError, ResourceResult, Resources};

/// Serves resources from a root directory.
#[derive(Debug, Clone)]
pub struct DiskResources {
    root: PathBuf,
}

impl DiskResources {
    /// Create a resource tree rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn io_error(path: &Path, source: std::io::Error) -> ResourceError {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound(path.display().to_string())
        } else {
            ResourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl Resources for DiskResources {
    fn exists(&self, path: &Path) -> bool {
        self.absolute(path).is_file()
    }

    fn read_bytes(&self, path: &Path) -> ResourceResult<Vec<u8>> {
        fs::read(self.absolute(path)).map_err(|e| Self::io_error(path, e))
    }

    fn last_modified(&self, path: &Path) -> ResourceResult<SystemTime> {
        fs::metadata(self.absolute(path))
            .and_then(|meta| meta.modified())
            .map_err(|e| Self::io_error(path, e))
    }
}
