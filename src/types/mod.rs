//! Content type resolution.
//!
//! # Design Decisions
//! - Lookup tables built once at startup and shared via `Arc`
//! - Extension table wins over `mime_guess`; unknown types are binary
//! - Each extension also records whether its files are binary and whether
//!   they are rendered as templates

pub mod content_types;

pub use content_types::{ContentKind, ContentTypes};
