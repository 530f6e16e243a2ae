//! Source compiler subsystem.
//!
//! # Data Flow
//! ```text
//! text resource (style.less, app.coffee)
//!     → registry.rs (lookup by extension, cache by modification time)
//!     → Compiler::compile(path, source)
//!     → compiled text, or CompileError
//! ```
//!
//! # Design Decisions
//! - Registry is built at startup and read-only afterwards
//! - Extensions without a compiler pass the source through unchanged
//! - Compile failures are never masked; they surface as server errors

pub mod external;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use external::ExternalCompiler;
pub use registry::CompilerRegistry;

/// A compiler failed to turn source text into its served form.
#[derive(Debug, Error)]
#[error("unable to compile {}: {message}", path.display())]
pub struct CompileError {
    pub path: PathBuf,
    pub message: String,
}

impl CompileError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Text-to-text source compiler.
pub trait Compiler: Send + Sync + fmt::Debug {
    fn compile(&self, path: &Path, source: &str) -> Result<String, CompileError>;
}
