//! Resource access subsystem.
//!
//! # Data Flow
//! ```text
//! logical name ("/css/style", "about/")
//!     → resolve_path (candidate list, first existing wins)
//!     → relative resource path ("css/style.less")
//!     → read_bytes / read_text / last_modified
//! ```
//!
//! # Design Decisions
//! - Resource paths are always relative to the resource root
//! - `..` and `.` segments never resolve (no escape from the root)
//! - A name ending in `/` resolves to the directory's `index.html`
//! - A name without trailing slash never resolves to a directory index, so
//!   the route evaluator can redirect `/dir` to `/dir/`

pub mod disk;
pub mod memory;

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

pub use disk::DiskResources;
pub use memory::MemoryResources;

/// Errors raised by resource access.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The logical name has no backing resource.
    #[error("no resource for {0}")]
    NotFound(String),

    /// The resource exists but could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Read access to the tree of files served by the application.
pub trait Resources: Send + Sync + fmt::Debug {
    /// Whether a relative resource path exists as a file.
    fn exists(&self, path: &Path) -> bool;

    /// Read raw bytes.
    fn read_bytes(&self, path: &Path) -> ResourceResult<Vec<u8>>;

    /// Modification timestamp.
    fn last_modified(&self, path: &Path) -> ResourceResult<SystemTime>;

    /// Read UTF-8 text.
    fn read_text(&self, path: &Path) -> ResourceResult<String> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| ResourceError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }

    /// Map a logical name to the first existing resource path.
    fn resolve_path(&self, logical_name: &str) -> ResourceResult<PathBuf> {
        candidates(logical_name)
            .into_iter()
            .find(|candidate| self.exists(candidate))
            .ok_or_else(|| ResourceError::NotFound(logical_name.to_string()))
    }
}

/// Candidate resource paths for a logical name, in lookup order.
pub fn candidates(logical_name: &str) -> Vec<PathBuf> {
    let trimmed = logical_name.trim_start_matches('/');

    let names = if trimmed.is_empty() || trimmed.ends_with('/') {
        vec![format!("{}index.html", trimmed)]
    } else {
        vec![trimmed.to_string(), format!("{}.html", trimmed)]
    };

    names.iter().filter_map(|name| sanitize(name)).collect()
}

/// Normalize a relative name, refusing anything that could leave the root.
pub fn sanitize(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(segment) => path.push(segment),
            Component::RootDir => {}
            _ => return None,
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
