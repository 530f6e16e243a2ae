//! Extension-keyed compiler table with a compiled-output cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;

use crate::compilers::{CompileError, Compiler};
use crate::observability::metrics;

/// Compiled output of one resource, valid for one modification time.
#[derive(Debug, Clone)]
struct CacheEntry {
    last_modified: SystemTime,
    content: String,
}

/// Maps file extensions to compilers.
#[derive(Debug, Default)]
pub struct CompilerRegistry {
    compilers: HashMap<String, Arc<dyn Compiler>>,
    cache: DashMap<PathBuf, CacheEntry>,
}

impl CompilerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the compiler used for an extension.
    pub fn with_compiler(mut self, extension: &str, compiler: impl Compiler + 'static) -> Self {
        self.compilers.insert(
            extension.trim_start_matches('.').to_lowercase(),
            Arc::new(compiler),
        );
        self
    }

    /// Whether some compiler handles this path.
    pub fn handles(&self, path: &Path) -> bool {
        self.compiler_for(path).is_some()
    }

    /// Compile `source` with the compiler registered for the path's extension.
    pub fn compile(&self, path: &Path, source: &str) -> Result<String, CompileError> {
        match self.compiler_for(path) {
            Some(compiler) => compiler.compile(path, source),
            None => Ok(source.to_string()),
        }
    }

    /// Like [`compile`](Self::compile), reusing the previous output while the
    /// resource's modification time is unchanged.
    pub fn compile_cached(
        &self,
        path: &Path,
        source: &str,
        last_modified: SystemTime,
    ) -> Result<String, CompileError> {
        let Some((extension, compiler)) = self.entry_for(path) else {
            return Ok(source.to_string());
        };

        if let Some(entry) = self.cache.get(path) {
            if entry.last_modified == last_modified {
                tracing::trace!(path = %path.display(), "Compile cache hit");
                metrics::record_compile(extension, "hit");
                return Ok(entry.content.clone());
            }
        }

        let content = compiler.compile(path, source).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Compilation failed");
        })?;
        metrics::record_compile(extension, "miss");

        self.cache.insert(
            path.to_path_buf(),
            CacheEntry {
                last_modified,
                content: content.clone(),
            },
        );
        Ok(content)
    }

    fn compiler_for(&self, path: &Path) -> Option<&Arc<dyn Compiler>> {
        self.entry_for(path).map(|(_, compiler)| compiler)
    }

    fn entry_for(&self, path: &Path) -> Option<(&str, &Arc<dyn Compiler>)> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        self.compilers
            .get_key_value(&extension)
            .map(|(ext, compiler)| (ext.as_str(), compiler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Debug, Default)]
    struct Upper {
        calls: Arc<AtomicUsize>,
    }

    impl Compiler for Upper {
        fn compile(&self, _path: &Path, source: &str) -> Result<String, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(source.to_uppercase())
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Compiler for Broken {
        fn compile(&self, path: &Path, _source: &str) -> Result<String, CompileError> {
            Err(CompileError::new(path, "syntax error on line 1"))
        }
    }

    #[test]
    fn test_compile_by_extension() {
        let registry = CompilerRegistry::new().with_compiler("less", Upper::default());

        assert!(registry.handles(Path::new("style.LESS")));
        assert_eq!(registry.compile(Path::new("style.less"), "a{}").unwrap(), "A{}");
        // No compiler: passthrough.
        assert_eq!(registry.compile(Path::new("app.js"), "var a;").unwrap(), "var a;");
    }

    #[test]
    fn test_compile_error_propagates() {
        let registry = CompilerRegistry::new().with_compiler("less", Broken);
        let err = registry.compile(Path::new("style.less"), "a{").unwrap_err();
        assert_eq!(err.path, PathBuf::from("style.less"));
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_cache_keyed_on_last_modified() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = CompilerRegistry::new().with_compiler(
            "less",
            Upper {
                calls: calls.clone(),
            },
        );
        let path = Path::new("style.less");
        let t1 = UNIX_EPOCH + Duration::from_secs(10);
        let t2 = UNIX_EPOCH + Duration::from_secs(20);

        assert_eq!(registry.compile_cached(path, "a", t1).unwrap(), "A");
        assert_eq!(registry.compile_cached(path, "a", t1).unwrap(), "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(registry.compile_cached(path, "b", t2).unwrap(), "B");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
