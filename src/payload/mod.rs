//! Response construction subsystem.
//!
//! # Data Flow
//! ```text
//! route handler result
//!     → payload.rs (status, headers, cookies, produced Content)
//!     → body.rs (BodyResolver: content type, bytes, Last-Modified)
//!         ├─ types::ContentTypes      (extension → type, binary, templating)
//!         ├─ compilers::CompilerRegistry (style/script sources)
//!         └─ templating::TemplateEngine  (views)
//!     → serialized.rs (SerializedResponse handed to the transport)
//! ```
//!
//! # Design Decisions
//! - Produced values are a closed sum type resolved by exhaustive match
//! - A Payload has a single owner until serialization consumes it
//! - Lookup tables are injected into the resolver, never global

pub mod body;
pub mod content;
pub mod cookie;
pub mod headers;
#[allow(clippy::module_inception)]
pub mod payload;
pub mod serialized;

pub use body::BodyResolver;
pub use content::{ByteStream, Content, StructuredObject};
pub use cookie::Cookie;
pub use headers::Headers;
pub use payload::Payload;
pub use serialized::SerializedResponse;
