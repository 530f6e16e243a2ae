//! Page layouts.

/// Placeholder replaced by the wrapped content.
pub const BODY_PLACEHOLDER: &str = "[[body]]";

/// A layout wraps a view body at its `[[body]]` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    source: String,
}

impl Layout {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Substitute `content` for the placeholder.
    pub fn apply(&self, content: &str) -> String {
        self.source.replace(BODY_PLACEHOLDER, content)
    }
}
