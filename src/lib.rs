//! Response construction and route dispatch for resource-backed web apps.
//!
//! A request is evaluated against every registered route; the best outcome
//! (match, wrong method, missing trailing slash, not found) becomes a
//! [`payload::Payload`], which the [`payload::BodyResolver`] serializes into
//! status, headers and body bytes.

pub mod compilers;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payload;
pub mod resources;
pub mod routing;
pub mod templating;
pub mod types;

pub use config::AppConfig;
pub use error::{PayloadError, PayloadResult};
pub use http::{Context, HttpServer, WebApp};
pub use lifecycle::Shutdown;
pub use payload::Payload;
pub use routing::RouteCollection;
