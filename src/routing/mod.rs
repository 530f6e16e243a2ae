//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, uri)
//!     → router.rs (ask every registered route, keep the best outcome)
//!     → route.rs (per route: uri match? trailing slash? method? handler)
//!     → matcher.rs (segment-wise pattern matching, path parameters)
//!     → outcome.rs (Matched > MethodMismatch > TrailingSlashRedirect > rest)
//!     → Payload for the winning outcome
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex: patterns are literal segments and `:name` parameters
//! - Every route is consulted so a wrong verb or a missing trailing slash
//!   can win over a plain 404; the scan stops at the first match
//! - Outcomes are compared by rank, not by raw status code

pub mod matcher;
pub mod outcome;
pub mod reply;
pub mod route;
pub mod router;
pub mod static_files;

pub use matcher::UriPattern;
pub use outcome::{OutcomeRank, RouteOutcome};
pub use reply::Reply;
pub use route::{Handler, HandlerRoute, Route};
pub use router::RouteCollection;
pub use static_files::StaticFiles;
