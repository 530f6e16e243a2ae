//! Fully resolved response handed to the transport.

use crate::payload::Cookie;

/// Status, headers, cookies and body bytes of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<Cookie>,
    /// `None` when the response has no body (`Content-Length: 0`).
    pub body: Option<Vec<u8>>,
}

impl SerializedResponse {
    /// First header with this exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Body bytes, empty when there is none.
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}
