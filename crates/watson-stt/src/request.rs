use bytes::Bytes;
use http::Method;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything outside unreserved characters gets escaped, so identifiers
/// containing spaces or slashes cannot break out of their path segment
const PATH_VAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path variable before substitution into a URL
/// template
pub(crate) fn encode_path_var(value: &str) -> String {
    utf8_percent_encode(value, PATH_VAR).to_string()
}

/// Query parameters under the omission rule: a value is recorded only when
/// it was explicitly provided, so absent parameters never reach the wire as
/// empty or null. An explicit `false` still serializes.
#[derive(Debug, Default)]
pub(crate) struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter unconditionally
    pub fn push(&mut self, name: &'static str, value: impl ToString) {
        self.0.push((name, value.to_string()));
    }

    /// Record a parameter only if a value was provided
    pub fn push_opt(&mut self, name: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Record a list-valued parameter as a single comma-joined value
    /// rather than repeated query keys
    pub fn push_list(&mut self, name: &'static str, values: Option<&[String]>) {
        if let Some(values) = values {
            self.push(name, values.join(","));
        }
    }

    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.0
    }
}

/// Request body variants produced by the client
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// JSON body, sent with `application/json`
    Json(serde_json::Value),
    /// Raw bytes (audio or corpus data); the content type travels in the
    /// header list
    Binary(Bytes),
}

/// One named section of a multipart/form-data body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub name: &'static str,
    /// Filename hint; multipart parts without one omit the attribute
    pub filename: Option<String>,
    /// Content type of this part
    pub content_type: String,
    /// Part payload
    pub data: Bytes,
}

/// A fully specified HTTP request descriptor: everything the transport
/// needs to perform one exchange. The path already contains
/// percent-encoded path variables and the query list has absent entries
/// stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    /// HTTP method
    pub method: Method,
    /// Relative URL, path variables already encoded
    pub path: String,
    /// Header overrides (content type, transfer encoding)
    pub headers: Vec<(&'static str, String)>,
    /// Query parameters, absent entries already stripped
    pub query: Vec<(&'static str, String)>,
    /// Request body
    pub body: RequestBody,
    /// Multipart parts, in wire order; empty for non-multipart requests
    pub parts: Vec<FilePart>,
}

impl WireRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub(crate) fn query(mut self, params: Params) -> Self {
        self.query = params.into_pairs();
        self
    }

    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    #[must_use]
    pub fn binary(mut self, data: Bytes) -> Self {
        self.body = RequestBody::Binary(data);
        self
    }

    #[must_use]
    pub fn part(mut self, part: FilePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Look up a query parameter by name
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}
