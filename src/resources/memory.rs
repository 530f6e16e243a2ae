//! In-memory resources, for embedding assets in the binary and for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::resources::{sanitize, ResourceError, ResourceResult, Resources};

#[derive(Debug, Clone)]
struct MemoryEntry {
    content: Vec<u8>,
    last_modified: SystemTime,
}

/// A fixed set of resources held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: HashMap<PathBuf, MemoryEntry>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource stamped with the current time.
    pub fn with_file(self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.with_file_modified(name, content, SystemTime::now())
    }

    /// Add a resource with an explicit modification time.
    ///
    /// Names that would escape the root are ignored.
    pub fn with_file_modified(
        mut self,
        name: &str,
        content: impl Into<Vec<u8>>,
        last_modified: SystemTime,
    ) -> Self {
        if let Some(path) = sanitize(name) {
            self.entries.insert(
                path,
                MemoryEntry {
                    content: content.into(),
                    last_modified,
                },
            );
        } else {
            tracing::warn!(name = %name, "Ignoring resource outside of root");
        }
        self
    }

    fn entry(&self, path: &Path) -> ResourceResult<&MemoryEntry> {
        self.entries
            .get(path)
            .ok_or_else(|| ResourceError::NotFound(path.display().to_string()))
    }
}

impl Resources for MemoryResources {
    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn read_bytes(&self, path: &Path) -> ResourceResult<Vec<u8>> {
        Ok(self.entry(path)?.content.clone())
    }

    fn last_modified(&self, path: &Path) -> ResourceResult<SystemTime> {
        Ok(self.entry(path)?.last_modified)
    }
}
