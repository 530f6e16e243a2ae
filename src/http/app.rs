//! Request dispatch, independent of the transport.

use axum::http::{HeaderMap, Method};

use crate::error::{PayloadError, PayloadResult};
use crate::http::Context;
use crate::payload::{BodyResolver, Payload, SerializedResponse};
use crate::routing::RouteCollection;

/// Routes plus the resolver that turns their payloads into bytes.
#[derive(Debug)]
pub struct WebApp {
    routes: RouteCollection,
    resolver: BodyResolver,
}

impl WebApp {
    pub fn new(routes: RouteCollection, resolver: BodyResolver) -> Self {
        Self { routes, resolver }
    }

    pub fn routes(&self) -> &RouteCollection {
        &self.routes
    }

    pub fn resolver(&self) -> &BodyResolver {
        &self.resolver
    }

    /// Dispatch a request and serialize the winning payload.
    pub fn dispatch(
        &self,
        method: Method,
        uri: &str,
        query: Vec<(String, String)>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> PayloadResult<SerializedResponse> {
        let context = Context::new(method, uri)
            .with_query(query)
            .with_headers(headers)
            .with_body(body);
        self.handle(&context)
    }

    /// `NotFound` and `MethodNotAllowed` errors become 404 and 405 responses;
    /// every other error is returned to the transport.
    pub fn handle(&self, context: &Context) -> PayloadResult<SerializedResponse> {
        let payload = match self.routes.dispatch(context) {
            Ok(outcome) => outcome.into_payload(),
            Err(e) => recover(context, e)?,
        };
        match payload.serialize(&self.resolver) {
            Ok(response) => Ok(response),
            Err(e) => recover(context, e)?.serialize(&self.resolver),
        }
    }
}

fn recover(context: &Context, error: PayloadError) -> PayloadResult<Payload> {
    match error {
        PayloadError::NotFound(what) => {
            tracing::debug!(uri = %context.uri(), missing = %what, "Not found");
            Ok(Payload::not_found())
        }
        PayloadError::MethodNotAllowed(what) => {
            tracing::debug!(uri = %context.uri(), method = %context.method(), route = %what, "Method not allowed");
            Ok(Payload::method_not_allowed())
        }
        other => Err(other),
    }
}
