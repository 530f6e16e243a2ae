//! HTTP subsystem: request context, dispatch and the Axum adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, body limit)
//!     → app.rs (WebApp::dispatch builds a Context)
//!     → routing (best RouteOutcome → Payload)
//!     → payload (serialize via BodyResolver)
//!     → server.rs (status, headers, Set-Cookie, body)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Dispatch is synchronous and runs on a blocking worker
//! - The adapter owns no routing logic; `WebApp` is usable without a socket

pub mod app;
pub mod context;
pub mod request;
pub mod server;

pub use app::WebApp;
pub use context::Context;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
