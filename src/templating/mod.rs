//! View rendering subsystem.
//!
//! # Data Flow
//! ```text
//! ModelAndView { view, model }
//!     → engine.rs (resolve view resource, read source)
//!     → front_matter.rs (split `---` header: bindings + layout)
//!     → layout.rs (wrap the view body into its layout)
//!     → syntax.rs (parse `[[ ]]` tags, render against bindings)
//!     → text
//! ```
//!
//! # Design Decisions
//! - `[[`/`]]` delimiters so templates coexist with client-side `{{ }}`
//! - Partials resolve from the includes directory, layouts from the
//!   layouts directory, both through the same `Resources`
//! - Model bindings override front-matter bindings

pub mod engine;
pub mod front_matter;
pub mod layout;
pub mod model;
pub mod syntax;

use std::fmt;

use thiserror::Error;

use crate::resources::ResourceError;

pub use engine::BracketTemplates;
pub use layout::Layout;
pub use model::{Model, ModelAndView};

/// Errors raised while rendering a view.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No resource backs the view name.
    #[error("no view named {0}")]
    MissingView(String),

    /// The template source could not be parsed or expanded.
    #[error("invalid template {view}: {message}")]
    Syntax { view: String, message: String },

    /// The view exists but could not be read.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Renders a named view with variable bindings.
pub trait TemplateEngine: Send + Sync + fmt::Debug {
    fn render(&self, view: &str, bindings: &Model) -> Result<String, TemplateError>;
}
