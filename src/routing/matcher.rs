//! URI pattern matching.
//!
//! # Design Decisions
//! - Segment count must match exactly, so `/foo` and `/foo/` differ
//! - Literal segments are case-sensitive
//! - `:name` matches exactly one non-empty segment

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern such as `/items/:id/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl UriPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let segments = raw
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the `:name` parameters, in order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Whether the URI path matches this pattern.
    pub fn matches(&self, uri: &str) -> bool {
        let parts: Vec<&str> = uri.split('/').collect();
        parts.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(parts)
                .all(|(segment, part)| match segment {
                    Segment::Literal(literal) => literal == part,
                    Segment::Param(_) => !part.is_empty(),
                })
    }

    /// Values bound to the parameters, in pattern order. Empty when the URI
    /// does not match.
    pub fn parameters(&self, uri: &str) -> Vec<String> {
        if !self.matches(uri) {
            return Vec::new();
        }
        self.segments
            .iter()
            .zip(uri.split('/'))
            .filter_map(|(segment, part)| match segment {
                Segment::Param(_) => Some(part.to_string()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}
