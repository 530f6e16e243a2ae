//! The response under construction.

use crate::payload::{BodyResolver, Content, Cookie, Headers, SerializedResponse};
use crate::error::PayloadResult;
use crate::routing::OutcomeRank;

/// An HTTP response before byte serialization.
///
/// A payload has a single owner: it is built by the route that produced it,
/// adjusted through the consuming `with_*` calls, then handed to
/// [`serialize`](Payload::serialize), which consumes it.
#[derive(Debug, Clone)]
pub struct Payload {
    content_type: Option<String>,
    content: Content,
    code: u16,
    headers: Headers,
    cookies: Vec<Cookie>,
}

impl Payload {
    /// A 200 payload carrying `content`.
    pub fn new(content: impl Into<Content>) -> Self {
        Self::with_content_type(None, content, 200)
    }

    /// A payload with an explicit content type (or `None` to derive it).
    pub fn with_content_type(
        content_type: Option<String>,
        content: impl Into<Content>,
        code: u16,
    ) -> Self {
        Self {
            content_type,
            content: content.into(),
            code,
            headers: Headers::new(),
            cookies: Vec::new(),
        }
    }

    /// A payload with a status and no body.
    pub fn status(code: u16) -> Self {
        Self::with_content_type(None, Content::Empty, code)
    }

    /// Copy `wrapped`, overriding its content type only when one is given.
    /// Headers and cookies are copied, so the two payloads evolve independently.
    pub fn wrap(content_type: Option<String>, wrapped: &Payload) -> Self {
        Self {
            content_type: content_type.or_else(|| wrapped.content_type.clone()),
            content: wrapped.content.clone(),
            code: wrapped.code,
            headers: wrapped.headers.clone(),
            cookies: wrapped.cookies.clone(),
        }
    }

    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn moved_permanently(url: &str) -> Self {
        Self::status(301).with_header("Location", url)
    }

    pub fn see_other(url: &str) -> Self {
        Self::status(303).with_header("Location", url)
    }

    pub fn unauthorized(realm: &str) -> Self {
        Self::status(401).with_header("WWW-Authenticate", format!("Basic realm=\"{}\"", realm))
    }

    pub fn forbidden() -> Self {
        Self::status(403)
    }

    pub fn not_found() -> Self {
        Self::status(404)
    }

    pub fn method_not_allowed() -> Self {
        Self::status(405)
    }

    /// Set a header, replacing any previous value for the same key.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Append a cookie scoped to `/`, secure.
    pub fn with_cookie(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_cookie_descriptor(Cookie::new(name, value))
    }

    pub fn with_cookie_descriptor(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn raw_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn raw_content(&self) -> &Content {
        &self.content
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is_error(&self) -> bool {
        (400..=599).contains(&self.code)
    }

    /// Rank of this payload's status among candidate route outcomes.
    pub fn rank(&self) -> OutcomeRank {
        OutcomeRank::for_status(self.code)
    }

    /// Whether this payload should replace `other` as the answer for a URI.
    ///
    /// 200 beats everything else, 405 beats all but 200, 303 beats all but
    /// 200 and 405; no other status ever wins. Equal ranks never replace.
    pub fn is_better(&self, other: &Payload) -> bool {
        let rank = self.rank();
        rank != OutcomeRank::Unranked && rank > other.rank()
    }

    /// Resolve the body and headers into the bytes sent to the client.
    pub fn serialize(self, resolver: &BodyResolver) -> PayloadResult<SerializedResponse> {
        let mut headers = self.headers;

        if let Some(last_modified) = resolver.last_modified(&self.content)? {
            headers.set("Last-Modified", last_modified);
        }

        let content_type = match (&self.content_type, &self.content) {
            (_, Content::Empty) => None,
            (Some(explicit), _) => Some(explicit.clone()),
            (None, content) => Some(resolver.content_type(content)?),
        };

        let body = resolver.body(self.content)?;
        match (&body, content_type) {
            (Some(bytes), Some(content_type)) => {
                headers.set("Content-Type", content_type);
                headers.set("Content-Length", bytes.len().to_string());
            }
            _ => headers.set("Content-Length", "0"),
        }

        Ok(SerializedResponse {
            status: self.code,
            headers: headers.into_vec(),
            cookies: self.cookies,
            body,
        })
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::ok()
    }
}
