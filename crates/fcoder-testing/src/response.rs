use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use crate::matcher::RequestMatcher;

/// How many calls an expectation should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Times {
    pub fn admits(&self, calls: usize) -> bool {
        match *self {
            Times::Exactly(n) => calls == n,
            Times::AtLeast(n) => calls >= n,
            Times::Any => true,
        }
    }
}

/// A scripted answer to matching requests.
#[derive(Debug, Clone)]
pub(crate) struct Expectation {
    pub matcher: RequestMatcher,
    pub response: MockResponse,
    pub times: Times,
    pub calls: usize,
}

impl Expectation {
    pub fn new(matcher: RequestMatcher) -> Self {
        Self {
            matcher,
            response: MockResponse::default(),
            times: Times::Exactly(1),
            calls: 0,
        }
    }
}

/// Response returned by the mock backend.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) delay: Option<Duration>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            delay: None,
        }
    }
}

impl MockResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a header. Invalid names or values are skipped with a warning.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(key, value, "ignoring invalid mock header"),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn json(mut self, body: &Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Bytes::from(body.to_string());
        self
    }

    /// Hold the response back for `delay` before sending it.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `200` with the login token body.
    pub fn token(token: &str) -> Self {
        Self::new().json(&json!({ "token": token }))
    }

    /// `201` with an empty JSON object, as the register endpoint answers.
    pub fn created() -> Self {
        Self::new().status(StatusCode::CREATED).json(&json!({}))
    }

    /// Failure with a top-level `message`.
    pub fn failure(status: StatusCode, message: &str) -> Self {
        Self::new().status(status).json(&json!({ "message": message }))
    }

    /// `400` carrying per-field `validationErrors`.
    pub fn validation_errors<'a>(errors: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries: Vec<Value> = errors
            .into_iter()
            .map(|(field, message)| json!({ "field": field, "message": message }))
            .collect();
        Self::new()
            .status(StatusCode::BAD_REQUEST)
            .json(&json!({ "validationErrors": entries }))
    }
}
