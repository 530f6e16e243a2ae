//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Evaluate every route against a request
//! - Return the best outcome, or an explicit NotFound
//!
//! # Design Decisions
//! - Immutable after construction (shared between workers without locks)
//! - O(n) scan over routes, stopping at the first full match
//! - Ties keep the earliest registered route

use std::sync::Arc;

use axum::http::Method;

use crate::error::PayloadResult;
use crate::http::Context;
use crate::resources::Resources;
use crate::routing::{HandlerRoute, OutcomeRank, Reply, Route, RouteOutcome, StaticFiles};

/// The application's routes.
#[derive(Debug, Default)]
pub struct RouteCollection {
    routes: Vec<Box<dyn Route>>,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register any route.
    pub fn add(mut self, route: impl Route + 'static) -> Self {
        self.routes.push(Box::new(route));
        self
    }

    /// Register a handler for one method and pattern.
    pub fn route<F>(self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        self.add(HandlerRoute::new(method, pattern, handler))
    }

    pub fn get<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Context, &[String]) -> PayloadResult<Reply> + Send + Sync + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Serve the resource tree after every other route.
    pub fn static_files(self, resources: Arc<dyn Resources>) -> Self {
        self.add(StaticFiles::new(resources))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Evaluate all routes for the request and keep the best outcome.
    pub fn dispatch(&self, context: &Context) -> PayloadResult<RouteOutcome> {
        let uri = context.uri();
        let mut best = RouteOutcome::NotFound;

        for route in &self.routes {
            let outcome = route.apply(uri, context)?;
            if outcome.is_better(&best) {
                best = outcome;
                if best.rank() == OutcomeRank::Matched {
                    break;
                }
            }
        }

        tracing::debug!(
            method = %context.method(),
            uri = %uri,
            outcome = ?best.rank(),
            "Route dispatch complete"
        );
        Ok(best)
    }
}
