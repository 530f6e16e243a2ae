//! Route serving the resource tree.

use std::sync::Arc;

use axum::http::Method;

use crate::error::PayloadResult;
use crate::http::Context;
use crate::payload::Content;
use crate::resources::Resources;
use crate::routing::{Reply, Route};

/// Serves any public resource for GET and HEAD.
///
/// Segments starting with `_` or `.` are private (layouts, includes,
/// dotfiles) and never served.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    resources: Arc<dyn Resources>,
}

impl StaticFiles {
    pub fn new(resources: Arc<dyn Resources>) -> Self {
        Self { resources }
    }
}

fn is_private(uri: &str) -> bool {
    uri.split('/')
        .any(|segment| segment.starts_with('_') || segment.starts_with('.'))
}

impl Route for StaticFiles {
    fn match_uri(&self, uri: &str) -> bool {
        !is_private(uri) && self.resources.resolve_path(uri).is_ok()
    }

    fn match_method(&self, method: &Method) -> bool {
        *method == Method::GET || *method == Method::HEAD
    }

    fn parse_parameters(&self, _uri: &str, _context: &Context) -> Vec<String> {
        Vec::new()
    }

    fn body(&self, context: &Context, _parameters: &[String]) -> PayloadResult<Reply> {
        let path = self.resources.resolve_path(context.uri())?;
        tracing::trace!(uri = %context.uri(), path = %path.display(), "Serving resource");
        Ok(Content::File(path).into())
    }
}
