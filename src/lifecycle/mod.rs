//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     AppConfig → resources → content types → compilers → templates
//!         → BodyResolver + RouteCollection (static files last) → WebApp
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Shutdown::trigger → server stops accepting → drains → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then collaborators, then listeners
//! - Every collaborator is immutable once built and shared through `Arc`

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::build_app;
