use http::{HeaderMap, Method};
use serde_json::Value;

/// Which requests an expectation answers.
///
/// Every criterion that is set must hold; an empty matcher accepts
/// everything.
#[derive(Debug, Clone, Default)]
pub struct RequestMatcher {
    pub(crate) method: Option<Method>,
    pub(crate) path: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body_json: Option<Value>,
    pub(crate) json_fields: Vec<(String, Value)>,
}

impl RequestMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `POST` to `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new().method(Method::POST).path(path)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Exact, case-sensitive path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Header with exactly this value. Header names are case-insensitive.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Whole body equal to `body` as JSON (whitespace and key order ignored).
    pub fn body_json(mut self, body: Value) -> Self {
        self.body_json = Some(body);
        self
    }

    /// Body is a JSON object whose `key` equals `value`; other keys are ignored.
    pub fn json_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.json_fields.push((key.into(), value.into()));
        self
    }

    pub fn matches(&self, method: &Method, path: &str, headers: &HeaderMap, body: &[u8]) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }

        if self.path.as_deref().is_some_and(|p| p != path) {
            return false;
        }

        let headers_ok = self
            .headers
            .iter()
            .all(|(k, v)| headers.get(k.as_str()).is_some_and(|actual| actual == v.as_str()));
        if !headers_ok {
            return false;
        }

        if self.body_json.is_none() && self.json_fields.is_empty() {
            return true;
        }

        let Ok(actual) = serde_json::from_slice::<Value>(body) else {
            return false;
        };

        if self.body_json.as_ref().is_some_and(|expected| *expected != actual) {
            return false;
        }

        self.json_fields
            .iter()
            .all(|(key, expected)| actual.get(key) == Some(expected))
    }
}
