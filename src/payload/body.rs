//! Turns produced content into response bytes.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::compilers::CompilerRegistry;
use crate::error::{PayloadError, PayloadResult};
use crate::payload::Content;
use crate::resources::{ResourceError, Resources};
use crate::templating::{BracketTemplates, Model, TemplateEngine, TemplateError};
use crate::types::content_types::{HTML_UTF8, JSON_UTF8, OCTET_STREAM};
use crate::types::ContentTypes;

/// Resolves content type, body bytes and `Last-Modified` for a [`Content`].
///
/// All collaborators are immutable after startup and shared between
/// requests.
#[derive(Debug, Clone)]
pub struct BodyResolver {
    content_types: Arc<ContentTypes>,
    compilers: Arc<CompilerRegistry>,
    resources: Arc<dyn Resources>,
    templates: Arc<dyn TemplateEngine>,
}

impl BodyResolver {
    pub fn new(
        content_types: Arc<ContentTypes>,
        compilers: Arc<CompilerRegistry>,
        resources: Arc<dyn Resources>,
        templates: Arc<dyn TemplateEngine>,
    ) -> Self {
        Self {
            content_types,
            compilers,
            resources,
            templates,
        }
    }

    /// Default tables, no compilers, `[[ ]]` templates over `resources`.
    pub fn with_resources(resources: Arc<dyn Resources>) -> Self {
        let templates = Arc::new(BracketTemplates::new(resources.clone()));
        Self::new(
            Arc::new(ContentTypes::default()),
            Arc::new(CompilerRegistry::new()),
            resources,
            templates,
        )
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    pub fn resources(&self) -> &Arc<dyn Resources> {
        &self.resources
    }

    /// Content type derived from the kind of content.
    pub fn content_type(&self, content: &Content) -> PayloadResult<String> {
        let content_type = match content {
            Content::File(path) => self.content_types.get(path),
            Content::View(view) => {
                let path = self.resources.resolve_path(&view.view).map_err(|e| match e {
                    ResourceError::NotFound(_) => {
                        PayloadError::Template(TemplateError::MissingView(view.view.clone()))
                    }
                    other => other.into(),
                })?;
                self.content_types.get(&path)
            }
            Content::Text(_) => HTML_UTF8.to_string(),
            Content::Empty | Content::Bytes(_) | Content::Stream(_) => OCTET_STREAM.to_string(),
            Content::Object(_) => JSON_UTF8.to_string(),
        };
        Ok(content_type)
    }

    /// Body bytes; `None` when there is no body at all.
    pub fn body(&self, content: Content) -> PayloadResult<Option<Vec<u8>>> {
        let bytes = match content {
            Content::Empty => return Ok(None),
            Content::Bytes(bytes) => bytes,
            Content::Text(text) => text.into_bytes(),
            Content::Stream(stream) => stream.drain().map_err(|source| PayloadError::Io {
                resource: "stream".to_string(),
                source,
            })?,
            Content::File(path) => self.for_path(&path)?,
            Content::View(view) => self.templates.render(&view.view, &view.model)?.into_bytes(),
            Content::Object(object) => object.encode()?,
        };
        Ok(Some(bytes))
    }

    /// `Last-Modified` value, only for resource-backed content.
    pub fn last_modified(&self, content: &Content) -> PayloadResult<Option<String>> {
        match content {
            Content::File(path) => Ok(Some(http_date(self.resources.last_modified(path)?))),
            _ => Ok(None),
        }
    }

    fn for_path(&self, path: &Path) -> PayloadResult<Vec<u8>> {
        if self.content_types.is_binary(path) {
            return Ok(self.resources.read_bytes(path)?);
        }

        if self.content_types.supports_templating(path) {
            let view = path.to_string_lossy();
            return Ok(self.templates.render(&view, &Model::new())?.into_bytes());
        }

        if !self.compilers.handles(path) {
            return Ok(self.resources.read_text(path)?.into_bytes());
        }

        // The timestamp is taken before the read: an edit in between leaves an
        // older cache key, never newer output paired with older source.
        let last_modified = self.resources.last_modified(path)?;
        let source = self.resources.read_text(path)?;
        let compiled = self.compilers.compile_cached(path, &source, last_modified)?;
        Ok(compiled.into_bytes())
    }
}

/// Format a timestamp as an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilers::{CompileError, Compiler};
    use crate::payload::Payload;
    use crate::resources::MemoryResources;
    use crate::templating::ModelAndView;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Debug)]
    struct FakeLess;

    impl Compiler for FakeLess {
        fn compile(&self, path: &Path, source: &str) -> Result<String, CompileError> {
            if source.contains('@') {
                Ok(format!("/* {} */{}", path.display(), source.replace("@c", "red")))
            } else {
                Err(CompileError::new(path, "expected variable"))
            }
        }
    }

    fn stamp() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    fn resolver() -> BodyResolver {
        let resources: Arc<dyn Resources> = Arc::new(
            MemoryResources::new()
                .with_file_modified("css/style.less", "a{color:@c}", stamp())
                .with_file_modified("css/broken.less", "a{", stamp())
                .with_file_modified("css/plain.css", "b{}", stamp())
                .with_file_modified("img/logo.png", vec![0x89, b'P', b'N', b'G'], stamp())
                .with_file_modified("page.html", "<p>[[missing]]page</p>", stamp())
                .with_file("_includes/nav.html", "nav")
                .with_file("list.html", "[[#items]][[.]][[/items]]"),
        );
        BodyResolver::new(
            Arc::new(ContentTypes::default()),
            Arc::new(CompilerRegistry::new().with_compiler("less", FakeLess)),
            resources.clone(),
            Arc::new(BracketTemplates::new(resources)),
        )
    }

    #[test]
    fn test_http_date() {
        assert_eq!(http_date(stamp()), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_less_is_compiled_and_served_as_css() {
        let response = Payload::new(PathBuf::from("css/style.less"))
            .serialize(&resolver())
            .unwrap();

        assert_eq!(response.header("Content-Type"), Some("text/css;charset=UTF-8"));
        assert_eq!(
            response.body.as_deref(),
            Some(&b"/* css/style.less */a{color:red}"[..])
        );
        assert_eq!(response.header("Last-Modified"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    }

    #[test]
    fn test_compile_error_propagates() {
        let result = Payload::new(PathBuf::from("css/broken.less")).serialize(&resolver());
        assert!(matches!(result, Err(PayloadError::Compile(_))));
    }

    #[test]
    fn test_plain_text_file_passes_through() {
        let body = resolver().body(Content::file("css/plain.css")).unwrap();
        assert_eq!(body, Some(b"b{}".to_vec()));
    }

    #[test]
    fn test_binary_file_read_raw() {
        let resolver = resolver();
        let content = Content::file("img/logo.png");
        assert_eq!(resolver.content_type(&content).unwrap(), "image/png");
        assert_eq!(resolver.body(content).unwrap(), Some(vec![0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_templated_file_rendered_with_empty_model() {
        let response = Payload::new(PathBuf::from("page.html"))
            .serialize(&resolver())
            .unwrap();
        assert_eq!(response.body.as_deref(), Some(&b"<p>page</p>"[..]));
        assert_eq!(response.header("Content-Type"), Some("text/html;charset=UTF-8"));
        assert!(response.header("Last-Modified").is_some());
    }

    #[test]
    fn test_view_rendering() {
        let resolver = resolver();
        let view = Content::View(ModelAndView::of(
            "list",
            Model::of("items", serde_json::json!(["a", "b"])),
        ));
        assert_eq!(resolver.content_type(&view).unwrap(), HTML_UTF8);
        assert_eq!(resolver.body(view).unwrap(), Some(b"ab".to_vec()));
    }

    #[test]
    fn test_missing_view_is_template_error() {
        let resolver = resolver();
        let view = Content::View(ModelAndView::view("ghost"));
        assert!(matches!(
            resolver.content_type(&view),
            Err(PayloadError::Template(TemplateError::MissingView(_)))
        ));
        assert!(matches!(
            resolver.body(view),
            Err(PayloadError::Template(TemplateError::MissingView(_)))
        ));
    }

    #[test]
    fn test_stream_is_drained() {
        let resolver = resolver();
        let content = Content::stream(Cursor::new(b"streamed".to_vec()));
        assert_eq!(resolver.content_type(&content).unwrap(), OCTET_STREAM);
        assert_eq!(resolver.body(content).unwrap(), Some(b"streamed".to_vec()));
    }

    /// A single `.less` file edited right after its first read.
    #[derive(Debug, Default)]
    struct EditedAfterFirstRead {
        reads: std::sync::Mutex<u32>,
    }

    impl EditedAfterFirstRead {
        fn edited(&self) -> bool {
            *self.reads.lock().unwrap() > 0
        }
    }

    impl Resources for EditedAfterFirstRead {
        fn exists(&self, _path: &Path) -> bool {
            true
        }

        fn read_bytes(&self, _path: &Path) -> crate::resources::ResourceResult<Vec<u8>> {
            let mut reads = self.reads.lock().unwrap();
            let content = if *reads == 0 { "@c v1" } else { "@c v2" };
            *reads += 1;
            Ok(content.as_bytes().to_vec())
        }

        fn last_modified(&self, _path: &Path) -> crate::resources::ResourceResult<SystemTime> {
            let secs = if self.edited() { 2 } else { 1 };
            Ok(UNIX_EPOCH + Duration::from_secs(secs))
        }
    }

    #[test]
    fn test_edit_during_compile_is_picked_up() {
        let resources: Arc<dyn Resources> = Arc::new(EditedAfterFirstRead::default());
        let resolver = BodyResolver::new(
            Arc::new(ContentTypes::default()),
            Arc::new(CompilerRegistry::new().with_compiler("less", FakeLess)),
            resources.clone(),
            Arc::new(BracketTemplates::new(resources)),
        );
        let body = |resolver: &BodyResolver| {
            let bytes = resolver.body(Content::file("a.less")).unwrap().unwrap();
            String::from_utf8(bytes).unwrap()
        };

        assert_eq!(body(&resolver), "/* a.less */red v1");
        assert_eq!(body(&resolver), "/* a.less */red v2");
        assert_eq!(body(&resolver), "/* a.less */red v2");
    }

    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk failure"))
        }
    }

    #[test]
    fn test_stream_failure_is_io_error() {
        let result = resolver().body(Content::stream(FailingReader));
        assert!(matches!(result, Err(PayloadError::Io { .. })));
    }
}
