//! Per-request data handed to routes and handlers.

use axum::http::{HeaderMap, Method};
use serde::de::DeserializeOwned;

use crate::error::{PayloadError, PayloadResult};

/// The request as seen by a route: method, path, query, headers and body.
#[derive(Debug, Clone)]
pub struct Context {
    method: Method,
    uri: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Context {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path, without the query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// First value of a query parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All values of a repeated query parameter, in request order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key)?.trim().parse().ok()
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.trim().parse().ok()
    }

    /// `true`/`false` (any case). Anything else is `None`.
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn key_values(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value of a request header. Non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw request body.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    /// Request body decoded as JSON.
    pub fn payload_json<T: DeserializeOwned>(&self) -> PayloadResult<T> {
        serde_json::from_slice(&self.body).map_err(PayloadError::Encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde::Deserialize;

    fn context() -> Context {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("text/html"));
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));

        Context::new(Method::GET, "/search")
            .with_query(vec![
                ("q".into(), "rust".into()),
                ("page".into(), "3".into()),
                ("ratio".into(), "0.5".into()),
                ("exact".into(), "TRUE".into()),
                ("q".into(), "axum".into()),
            ])
            .with_headers(headers)
    }

    #[test]
    fn test_query_access() {
        let context = context();
        assert_eq!(context.get("q"), Some("rust"));
        assert_eq!(context.get_all("q"), vec!["rust", "axum"]);
        assert_eq!(context.get_integer("page"), Some(3));
        assert_eq!(context.get_integer("q"), None);
        assert_eq!(context.get_float("ratio"), Some(0.5));
        assert_eq!(context.get_boolean("exact"), Some(true));
        assert_eq!(context.get_boolean("q"), None);
        assert_eq!(context.get("missing"), None);
        assert_eq!(context.key_values().len(), 5);
    }

    #[test]
    fn test_headers() {
        let context = context();
        assert_eq!(context.header("Accept"), Some("text/html"));
        assert_eq!(context.header_values("x-tag"), vec!["a", "b"]);
        assert!(context.header("missing").is_none());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_json_body() {
        let context = Context::new(Method::POST, "/items").with_body(r#"{"name":"pen"}"#);
        assert_eq!(context.payload(), br#"{"name":"pen"}"#);
        assert_eq!(context.payload_json::<Item>().unwrap(), Item { name: "pen".into() });

        let broken = Context::new(Method::POST, "/items").with_body("{");
        assert!(matches!(broken.payload_json::<Item>(), Err(PayloadError::Encoding(_))));
    }
}
