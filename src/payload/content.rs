//! Values a route can produce.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::templating::ModelAndView;

/// Any value serializable as the response body.
pub trait StructuredObject: Send + Sync {
    fn encode(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T: Serialize + Send + Sync> StructuredObject for T {
    fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A readable stream drained once, when the body is requested.
///
/// Clones share the underlying reader: the first drain consumes it and
/// later drains see an empty stream.
#[derive(Clone)]
pub struct ByteStream {
    reader: Arc<Mutex<Option<Box<dyn Read + Send>>>>,
}

impl ByteStream {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(Some(Box::new(reader)))),
        }
    }

    /// Read the stream to its end. The reader is dropped (closed) before
    /// returning, on success and on failure.
    pub fn drain(&self) -> std::io::Result<Vec<u8>> {
        let reader = match self.reader.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        let mut bytes = Vec::new();
        if let Some(mut reader) = reader {
            reader.read_to_end(&mut bytes)?;
        }
        Ok(bytes)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream")
    }
}

/// The not-yet-serialized value carried by a payload.
#[derive(Clone, Default)]
pub enum Content {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes, served as-is.
    Bytes(Vec<u8>),
    /// Text, served as UTF-8 HTML.
    Text(String),
    /// A stream drained at serialization.
    Stream(ByteStream),
    /// A path in the resource tree.
    File(PathBuf),
    /// A view rendered at serialization.
    View(ModelAndView),
    /// Any other value, encoded as JSON.
    Object(Arc<dyn StructuredObject>),
}

impl Content {
    /// Wrap a serializable value.
    pub fn object(value: impl Serialize + Send + Sync + 'static) -> Self {
        Content::Object(Arc::new(value))
    }

    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Content::Stream(ByteStream::new(reader))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Content::File(path.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Empty => f.write_str("Empty"),
            Content::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Stream(stream) => f.debug_tuple("Stream").field(stream).finish(),
            Content::File(path) => f.debug_tuple("File").field(path).finish(),
            Content::View(view) => f.debug_tuple("View").field(view).finish(),
            Content::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(bytes)
    }
}

impl From<&[u8]> for Content {
    fn from(bytes: &[u8]) -> Self {
        Content::Bytes(bytes.to_vec())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<PathBuf> for Content {
    fn from(path: PathBuf) -> Self {
        Content::File(path)
    }
}

impl From<ModelAndView> for Content {
    fn from(view: ModelAndView) -> Self {
        Content::View(view)
    }
}

impl From<serde_json::Value> for Content {
    fn from(value: serde_json::Value) -> Self {
        Content::object(value)
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
