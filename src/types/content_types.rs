//! Extension → content type table.

use std::collections::HashMap;
use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const HTML_UTF8: &str = "text/html;charset=UTF-8";
pub const JSON_UTF8: &str = "application/json;charset=UTF-8";
pub const TEXT_UTF8: &str = "text/plain;charset=UTF-8";

/// How files of one extension are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentKind {
    /// Value of the `Content-Type` header.
    pub mime: String,
    /// Read as raw bytes, never compiled.
    pub binary: bool,
    /// Rendered through the template engine.
    pub templating: bool,
}

impl ContentKind {
    pub fn text(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            binary: false,
            templating: false,
        }
    }

    pub fn binary(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            binary: true,
            templating: false,
        }
    }

    pub fn template(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            binary: false,
            templating: true,
        }
    }
}

/// Maps resource paths to content types.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    by_extension: HashMap<String, ContentKind>,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self::empty()
            .with_type("html", ContentKind::template(HTML_UTF8))
            .with_type("htm", ContentKind::template(HTML_UTF8))
            .with_type("xml", ContentKind::template("application/xml;charset=UTF-8"))
            .with_type("txt", ContentKind::text(TEXT_UTF8))
            .with_type("json", ContentKind::text(JSON_UTF8))
            .with_type("css", ContentKind::text("text/css;charset=UTF-8"))
            // Style sources are served as their compiled output.
            .with_type("less", ContentKind::text("text/css;charset=UTF-8"))
            .with_type("map", ContentKind::text(JSON_UTF8))
            .with_type("js", ContentKind::text("application/javascript;charset=UTF-8"))
            .with_type("coffee", ContentKind::text("application/javascript;charset=UTF-8"))
            .with_type("svg", ContentKind::text("image/svg+xml"))
            .with_type("png", ContentKind::binary("image/png"))
            .with_type("jpg", ContentKind::binary("image/jpeg"))
            .with_type("jpeg", ContentKind::binary("image/jpeg"))
            .with_type("gif", ContentKind::binary("image/gif"))
            .with_type("ico", ContentKind::binary("image/x-icon"))
            .with_type("pdf", ContentKind::binary("application/pdf"))
            .with_type("zip", ContentKind::binary("application/zip"))
            .with_type("woff", ContentKind::binary("application/font-woff"))
            .with_type("woff2", ContentKind::binary("font/woff2"))
            .with_type("ttf", ContentKind::binary("application/x-font-ttf"))
            .with_type("eot", ContentKind::binary("application/vnd.ms-fontobject"))
    }
}

impl ContentTypes {
    /// A table with no entries; every lookup falls back to `mime_guess`.
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
        }
    }

    /// Register (or replace) the kind served for an extension.
    pub fn with_type(mut self, extension: &str, kind: ContentKind) -> Self {
        self.by_extension
            .insert(extension.trim_start_matches('.').to_lowercase(), kind);
        self
    }

    /// Content type for a resource path.
    pub fn get(&self, path: &Path) -> String {
        self.kind(path).mime
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        self.kind(path).binary
    }

    pub fn supports_templating(&self, path: &Path) -> bool {
        self.kind(path).templating
    }

    /// Full classification for a resource path.
    pub fn kind(&self, path: &Path) -> ContentKind {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        if let Some(kind) = extension.as_deref().and_then(|ext| self.by_extension.get(ext)) {
            return kind.clone();
        }

        match mime_guess::from_path(path).first() {
            Some(mime) if is_textual(&mime) => ContentKind::text(mime.essence_str()),
            Some(mime) => ContentKind::binary(mime.essence_str()),
            None => ContentKind::binary(OCTET_STREAM),
        }
    }
}

fn is_textual(mime: &mime_guess::mime::Mime) -> bool {
    mime.type_() == mime_guess::mime::TEXT
        || matches!(mime.subtype().as_str(), "json" | "xml" | "javascript")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        let types = ContentTypes::default();

        assert_eq!(types.get(Path::new("index.html")), HTML_UTF8);
        assert!(types.supports_templating(Path::new("index.html")));
        assert!(!types.is_binary(Path::new("index.html")));

        assert_eq!(types.get(Path::new("css/style.less")), "text/css;charset=UTF-8");
        assert_eq!(
            types.get(Path::new("css/style.less")),
            types.get(Path::new("css/style.css"))
        );

        assert!(types.is_binary(Path::new("img/LOGO.PNG")));
        assert_eq!(types.get(Path::new("img/LOGO.PNG")), "image/png");
    }

    #[test]
    fn test_fallbacks() {
        let types = ContentTypes::default();

        let kind = types.kind(Path::new("notes.csv"));
        assert_eq!(kind.mime, "text/csv");
        assert!(!kind.binary);

        let kind = types.kind(Path::new("archive.unknownext"));
        assert_eq!(kind.mime, OCTET_STREAM);
        assert!(kind.binary);

        let kind = types.kind(Path::new("LICENSE"));
        assert_eq!(kind.mime, OCTET_STREAM);
    }

    #[test]
    fn test_registered_type_overrides() {
        let types = ContentTypes::default().with_type(".md", ContentKind::template(HTML_UTF8));
        assert!(types.supports_templating(Path::new("post.md")));
        assert_eq!(types.get(Path::new("post.md")), HTML_UTF8);
    }
}
