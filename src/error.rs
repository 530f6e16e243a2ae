//! Error taxonomy for response construction and dispatch.
//!
//! `NotFound` and `MethodNotAllowed` are recovered by the dispatcher and
//! turned into 404/405 payloads. Everything else propagates to the transport
//! layer, which answers with a 500.

use thiserror::Error;

use crate::compilers::CompileError;
use crate::resources::ResourceError;
use crate::templating::TemplateError;

/// Errors raised while dispatching a request or serializing a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// No route or resource matches.
    #[error("not found: {0}")]
    NotFound(String),

    /// A route matched the URI but not the verb.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Style/script compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// View rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Structured-object serialization failed.
    #[error("unable to encode body: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Reading a resource or stream failed.
    #[error("unable to read {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

impl PayloadError {
    /// Status code the transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PayloadError::NotFound(_) => 404,
            PayloadError::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }
}

impl From<ResourceError> for PayloadError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(name) => PayloadError::NotFound(name),
            ResourceError::Io { path, source } => PayloadError::Io {
                resource: path.display().to_string(),
                source,
            },
        }
    }
}

/// Result type for payload operations.
pub type PayloadResult<T> = Result<T, PayloadError>;
