//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and request limits.
    pub server: ServerConfig,

    /// Where resources (pages, assets, templates) are read from.
    pub resources: ResourcesConfig,

    /// Template lookup directories.
    pub templating: TemplatingConfig,

    /// External compilers, one per source extension.
    pub compilers: Vec<CompilerConfig>,

    /// Extra entries for the content type table.
    pub content_types: Vec<ContentTypeConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest accepted request body, in bytes.
    pub max_body_size: usize,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 2 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// Resource tree configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Root directory of the resource tree.
    pub root: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            root: "app".to_string(),
        }
    }
}

/// Template configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplatingConfig {
    /// Directory, under the root, holding partials.
    pub includes_dir: String,

    /// Directory, under the root, holding layouts.
    pub layouts_dir: String,
}

impl Default for TemplatingConfig {
    fn default() -> Self {
        Self {
            includes_dir: "_includes".to_string(),
            layouts_dir: "_layouts".to_string(),
        }
    }
}

/// An external compiler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Source extension handled, without the dot (e.g., "less").
    pub extension: String,

    /// Program and arguments. Source arrives on stdin, output is read from stdout.
    pub command: Vec<String>,
}

/// A content type table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentTypeConfig {
    /// Extension without the dot.
    pub extension: String,

    /// Full content type, including charset when relevant.
    pub mime: String,

    /// Served as raw bytes.
    #[serde(default)]
    pub binary: bool,

    /// Rendered through the template engine.
    #[serde(default)]
    pub templating: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_size, 2 * 1024 * 1024);
        assert_eq!(config.resources.root, "app");
        assert_eq!(config.templating.layouts_dir, "_layouts");
        assert!(config.compilers.is_empty());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_full_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1:3000"
            request_timeout_secs = 5

            [resources]
            root = "site"

            [[compilers]]
            extension = "less"
            command = ["lessc", "-"]

            [[content_types]]
            extension = "md"
            mime = "text/markdown;charset=UTF-8"
            templating = true

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.server.max_body_size, 2 * 1024 * 1024);
        assert_eq!(config.resources.root, "site");
        assert_eq!(config.compilers[0].command, vec!["lessc", "-"]);
        assert!(config.content_types[0].templating);
        assert!(!config.content_types[0].binary);
        assert_eq!(config.observability.log_level, "debug");
    }
}
