//! Route evaluation.

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::error::PayloadResult;
use crate::http::Context;
use crate::payload::Payload;
use crate::routing::{Reply, RouteOutcome, UriPattern};
use crate::templating::ModelAndView;

/// A registered route.
///
/// Implementors provide the matching primitives and the handler body;
/// [`apply`](Route::apply) combines them into an outcome.
pub trait Route: Send + Sync + fmt::Debug {
    fn match_uri(&self, uri: &str) -> bool;

    fn match_method(&self, method: &Method) -> bool;

    fn parse_parameters(&self, uri: &str, context: &Context) -> Vec<String>;

    fn body(&self, context: &Context, parameters: &[String]) -> PayloadResult<Reply>;

    /// Classify the request against this route, running the handler only on
    /// a full match.
    fn apply(&self, uri: &str, context: &Context) -> PayloadResult<RouteOutcome> {
        if !self.match_uri(uri) {
            if !uri.ends_with('/') {
                let with_slash = format!("{}/", uri);
                if self.match_uri(&with_slash) {
                    return Ok(RouteOutcome::TrailingSlashRedirect(with_slash));
                }
            }
            return Ok(RouteOutcome::NotFound);
        }

        if !self.match_method(context.method()) {
            return Ok(RouteOutcome::MethodNotAllowed);
        }

        let parameters = self.parse_parameters(uri, context);
        let payload = match self.body(context, &parameters)? {
            Reply::Payload(payload) => payload,
            Reply::Model(model) => Payload::new(ModelAndView::of(uri, model)),
            Reply::Content(content) => Payload::new(content),
        };
        Ok(RouteOutcome::Matched(payload))
    }
}

/// Route handler: request context and path parameters in, reply out.
pub type Handler = Arc<dyn Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync>;

/// A route bound to one method and one URI pattern.
#[derive(Clone)]
pub struct HandlerRoute {
    method: Method,
    pattern: UriPattern,
    handler: Handler,
}

impl HandlerRoute {
    pub fn new<F>(method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        Self {
            method,
            pattern: UriPattern::new(pattern),
            handler: Arc::new(handler),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &UriPattern {
        &self.pattern
    }
}

impl fmt::Debug for HandlerRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRoute")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl Route for HandlerRoute {
    fn match_uri(&self, uri: &str) -> bool {
        self.pattern.matches(uri)
    }

    fn match_method(&self, method: &Method) -> bool {
        *method == self.method || (*method == Method::HEAD && self.method == Method::GET)
    }

    fn parse_parameters(&self, uri: &str, _context: &Context) -> Vec<String> {
        self.pattern.parameters(uri)
    }

    fn body(&self, context: &Context, parameters: &[String]) -> PayloadResult<Reply> {
        (self.handler)(context, parameters)
    }
}
