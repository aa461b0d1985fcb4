use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, SttError};
use crate::http_client::http_client;
use crate::request::{RequestBody, WireRequest};

/// Lazy sequence of raw response chunks, driven by the remote connection's
/// lifetime. Dropping the stream abandons the connection.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// The component that performs the actual network exchange for a
/// [`WireRequest`]: authentication and connection pooling live here, not
/// in the request-shaping layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange and parse the response as JSON
    ///
    /// An empty 2xx body (DELETE responses) yields `Value::Null`.
    async fn execute(&self, request: WireRequest) -> Result<serde_json::Value>;

    /// Perform one exchange and expose the response body as a chunk stream
    async fn execute_stream(&self, request: WireRequest) -> Result<ChunkStream>;
}

/// Default reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, SecretString)>,
}

impl HttpTransport {
    /// Create a transport for the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self {
            client: http_client(),
            base_url,
            credentials: None,
        }
    }

    /// Set the service credentials for basic authentication
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), SecretString::from(password.into())));
        self
    }

    fn build(&self, request: WireRequest) -> Result<reqwest::RequestBuilder> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(request.method, url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some((username, password)) = &self.credentials {
            builder = builder.basic_auth(username, Some(password.expose_secret()));
        }

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Binary(data) => builder.body(data),
        };

        if !request.parts.is_empty() {
            let mut form = reqwest::multipart::Form::new();

            for part in request.parts {
                let mut piece = reqwest::multipart::Part::bytes(part.data.to_vec())
                    .mime_str(&part.content_type)
                    .map_err(|e| SttError::Config(format!("invalid part content type: {e}")))?;

                if let Some(filename) = part.filename {
                    piece = piece.file_name(filename);
                }

                form = form.part(part.name, piece);
            }

            builder = builder.multipart(form);
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: WireRequest) -> Result<serde_json::Value> {
        tracing::debug!("{} {}", request.method, request.path);

        let response = self.build(request)?.send().await?;
        let response = handle_error(response).await?;

        let body = response.text().await?;
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse service response: {e}");
            SttError::Parse(format!("invalid JSON from service: {e}"))
        })
    }

    async fn execute_stream(&self, request: WireRequest) -> Result<ChunkStream> {
        tracing::debug!("{} {} (streaming)", request.method, request.path);

        let response = self.build(request)?.send().await?;
        let response = handle_error(response).await?;

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(SttError::Http));

        Ok(Box::pin(chunks))
    }
}

/// Check an HTTP response for errors, passing the remote status and body
/// through unchanged
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_body(&body);

    tracing::error!("Service error ({status}): {message}");

    Err(SttError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extract the message from a service error body
fn parse_error_body(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "error_message", "message"] {
            if let Some(message) = json[key].as_str() {
                return message.to_owned();
            }
        }
    }

    body.to_owned()
}
