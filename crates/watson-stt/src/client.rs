use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use serde_json::Value;

use crate::error::{Result, SttError};
use crate::request::{FilePart, Params, WireRequest, encode_path_var};
use crate::transport::{ChunkStream, HttpTransport, Transport};
use crate::types::{
    CustomWord, RecognizeOptions, SessionOptions, SessionRecognition, WordRef, WordSort, WordType,
};

/// Default endpoint for the Speech to Text service
pub const DEFAULT_URL: &str = "https://stream.watsonplatform.net/speech-to-text/api";

/// Base model used when `create_custom_model` is not given one
pub const DEFAULT_BASE_MODEL: &str = "en-US_BroadbandModel";

/// Content type assumed for session recognition when none is given
const DEFAULT_SESSION_CONTENT_TYPE: &str = "audio/basic";

/// Typed client for the Speech to Text service
///
/// Each method shapes exactly one HTTP request descriptor and hands it to
/// the [`Transport`]; responses come back as decoded JSON values. The
/// client holds no mutable state, so one instance can serve concurrent
/// calls.
///
/// Credentials and base URL live on the transport:
///
/// ```no_run
/// use std::sync::Arc;
/// use watson_stt::{HttpTransport, SpeechToText, DEFAULT_URL};
///
/// let transport = HttpTransport::new(DEFAULT_URL).with_basic_auth("user", "secret");
/// let speech_to_text = SpeechToText::with_transport(Arc::new(transport));
/// ```
#[derive(Clone)]
pub struct SpeechToText {
    transport: Arc<dyn Transport>,
}

impl SpeechToText {
    /// Create an unauthenticated client against [`DEFAULT_URL`]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_URL)
    }

    /// Create an unauthenticated client against a specific service URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(base_url)))
    }

    /// Create a client over an explicit transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    // -- sessionless recognition --

    /// Recognize speech in the given audio
    ///
    /// `content_type` describes the audio format and becomes the
    /// `content-type` header; every option is forwarded as a query
    /// parameter only when set.
    pub async fn recognize(
        &self,
        audio: Bytes,
        content_type: &str,
        options: &RecognizeOptions,
    ) -> Result<Value> {
        let request = recognize_request(audio, content_type, options);
        self.transport.execute(request).await
    }

    /// Recognize speech, exposing the response as a lazy chunk stream
    ///
    /// Useful with `interim_results`, where the service writes results
    /// incrementally over the lifetime of the connection.
    pub async fn recognize_stream(
        &self,
        audio: Bytes,
        content_type: &str,
        options: &RecognizeOptions,
    ) -> Result<ChunkStream> {
        let request = recognize_request(audio, content_type, options);
        self.transport.execute_stream(request).await
    }

    // -- models --

    /// List the base models available to `recognize`
    pub async fn list_models(&self) -> Result<Value> {
        self.transport
            .execute(WireRequest::new(Method::GET, "/v1/models"))
            .await
    }

    /// Get information about one base model
    pub async fn get_model(&self, model_id: &str) -> Result<Value> {
        let path = format!("/v1/models/{}", encode_path_var(model_id));
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    // -- sessions --

    /// Create a recognition session
    pub async fn create_session(&self, options: &SessionOptions) -> Result<Value> {
        let mut params = Params::new();
        options.append_to(&mut params);

        let request = WireRequest::new(Method::POST, "/v1/sessions").query(params);
        self.transport.execute(request).await
    }

    /// Check whether a session is ready to accept a new recognition task
    pub async fn get_session(&self, session_id: &str) -> Result<Value> {
        require_id("session_id", session_id)?;

        let path = format!("/v1/sessions/{}/recognize", encode_path_var(session_id));
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    /// Delete a session
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        require_id("session_id", session_id)?;

        let path = format!("/v1/sessions/{}", encode_path_var(session_id));
        self.transport
            .execute(WireRequest::new(Method::DELETE, path))
            .await?;

        Ok(())
    }

    /// Send audio for recognition within a session
    ///
    /// The payload shape is the caller's choice: populate
    /// `recognition.audio` for a non-multipart request, or
    /// `recognition.metadata` and `recognition.upload` for a multipart
    /// one (see [`SessionRecognition`]).
    pub async fn recognize_session(
        &self,
        session_id: &str,
        recognition: SessionRecognition,
    ) -> Result<Value> {
        require_id("session_id", session_id)?;

        let content_type = recognition
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_CONTENT_TYPE.to_owned());

        let mut params = Params::new();
        recognition.append_to(&mut params);

        let path = format!("/v1/sessions/{}/recognize", encode_path_var(session_id));
        let mut request = WireRequest::new(Method::POST, path)
            .header("content-type", content_type)
            .query(params);

        if let Some(transfer_encoding) = recognition.transfer_encoding {
            request = request.header("Transfer-Encoding", transfer_encoding);
        }

        if let Some(audio) = recognition.audio {
            tracing::debug!("Session recognition request: {} audio bytes", audio.len());
            request = request.binary(audio);
        }

        // Multipart shape: the metadata part must come first
        if let Some(metadata) = recognition.metadata {
            request = request.part(FilePart {
                name: "metadata",
                filename: None,
                content_type: "text/plain".to_owned(),
                data: Bytes::from(metadata),
            });
        }

        if let Some(upload) = recognition.upload {
            request = request.part(FilePart {
                name: "upload",
                filename: upload.filename,
                content_type: upload
                    .content_type
                    .unwrap_or_else(|| "application/octet-stream".to_owned()),
                data: upload.data,
            });
        }

        self.transport.execute(request).await
    }

    // -- custom language models --

    /// Create a custom language model on top of a base model
    ///
    /// `base_model` defaults to [`DEFAULT_BASE_MODEL`]. The service
    /// requires `name`; that constraint is left to the remote validation.
    pub async fn create_custom_model(
        &self,
        name: &str,
        description: &str,
        base_model: Option<&str>,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "base_model_name": base_model.unwrap_or(DEFAULT_BASE_MODEL),
        });

        let request = WireRequest::new(Method::POST, "/v1/customizations").json(body);
        self.transport.execute(request).await
    }

    /// Start training a custom language model
    pub async fn train_custom_model(
        &self,
        customization_id: &str,
        customization_weight: Option<f64>,
        word_type: Option<&str>,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push_opt("customization_weight", customization_weight);
        params.push_opt("word_type", word_type);

        let path = format!("/v1/customizations/{}/train", encode_path_var(customization_id));
        let request = WireRequest::new(Method::POST, path).query(params);
        self.transport.execute(request).await
    }

    /// List custom language models owned by the caller
    pub async fn list_custom_models(&self) -> Result<Value> {
        self.transport
            .execute(WireRequest::new(Method::GET, "/v1/customizations"))
            .await
    }

    /// Get information about one custom language model
    pub async fn get_custom_model(&self, customization_id: &str) -> Result<Value> {
        let path = format!("/v1/customizations/{}", encode_path_var(customization_id));
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    /// Delete a custom language model
    pub async fn delete_custom_model(&self, customization_id: &str) -> Result<Value> {
        let path = format!("/v1/customizations/{}", encode_path_var(customization_id));
        self.transport
            .execute(WireRequest::new(Method::DELETE, path))
            .await
    }

    // -- corpora --

    /// List the corpora of a custom language model
    pub async fn list_corpora(&self, customization_id: &str) -> Result<Value> {
        let path = format!("/v1/customizations/{}/corpora", encode_path_var(customization_id));
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    /// Add a corpus text file to a custom language model
    ///
    /// `allow_overwrite` is injected as `false` when not supplied; this is
    /// the one operation with a non-omission default.
    pub async fn add_corpus(
        &self,
        customization_id: &str,
        corpus_name: &str,
        corpus: Bytes,
        allow_overwrite: Option<bool>,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.push("allow_overwrite", allow_overwrite.unwrap_or(false));

        let path = format!(
            "/v1/customizations/{}/corpora/{}",
            encode_path_var(customization_id),
            encode_path_var(corpus_name),
        );

        let request = WireRequest::new(Method::POST, path)
            .header("Content-Type", "application/octet-stream")
            .query(params)
            .binary(corpus);

        self.transport.execute(request).await
    }

    /// Get the status of one corpus
    pub async fn get_corpus(&self, customization_id: &str, corpus_name: &str) -> Result<Value> {
        let path = format!(
            "/v1/customizations/{}/corpora/{}",
            encode_path_var(customization_id),
            encode_path_var(corpus_name),
        );
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    /// Delete a corpus from a custom language model
    pub async fn delete_corpus(&self, customization_id: &str, corpus_name: &str) -> Result<Value> {
        let path = format!(
            "/v1/customizations/{}/corpora/{}",
            encode_path_var(customization_id),
            encode_path_var(corpus_name),
        );
        self.transport
            .execute(WireRequest::new(Method::DELETE, path))
            .await
    }

    // -- custom words --

    /// Add several words to a custom language model in one request
    ///
    /// The body is `{"words": [...]}` with each entry's full projection,
    /// in input order.
    pub async fn add_custom_words(
        &self,
        customization_id: &str,
        words: &[CustomWord],
    ) -> Result<Value> {
        let body = serde_json::json!({ "words": words });

        let path = format!("/v1/customizations/{}/words", encode_path_var(customization_id));
        let request = WireRequest::new(Method::POST, path).json(body);
        self.transport.execute(request).await
    }

    /// Add or update a single word in a custom language model
    ///
    /// The word itself is a path variable; the body carries only the
    /// `{sounds_like, display_as}` fragment. This asymmetry with
    /// `add_custom_words` mirrors the service's per-endpoint contracts.
    pub async fn add_custom_word(&self, customization_id: &str, word: &CustomWord) -> Result<Value> {
        let path = format!(
            "/v1/customizations/{}/words/{}",
            encode_path_var(customization_id),
            encode_path_var(&word.word),
        );

        let request = WireRequest::new(Method::PUT, path).json(word.fragment());
        self.transport.execute(request).await
    }

    /// List the vocabulary of a custom language model
    ///
    /// `word_type` must be one of `all`, `user`, or `corpora`; `sort` one
    /// of `alphabetical` or `count`. Any other value fails before a
    /// request is built.
    pub async fn list_custom_words(
        &self,
        customization_id: &str,
        word_type: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Value> {
        let word_type = word_type.map(str::parse::<WordType>).transpose()?;
        let sort = sort.map(str::parse::<WordSort>).transpose()?;

        let mut params = Params::new();
        params.push_opt("word_type", word_type.map(WordType::as_str));
        params.push_opt("sort", sort.map(WordSort::as_str));

        let path = format!("/v1/customizations/{}/words", encode_path_var(customization_id));
        let request = WireRequest::new(Method::GET, path).query(params);
        self.transport.execute(request).await
    }

    /// Get one word from a custom language model's vocabulary
    ///
    /// Accepts either a bare word string or a [`CustomWord`] record.
    pub async fn get_custom_word(
        &self,
        customization_id: &str,
        word: impl Into<WordRef> + Send,
    ) -> Result<Value> {
        let word = word.into();
        let path = format!(
            "/v1/customizations/{}/words/{}",
            encode_path_var(customization_id),
            encode_path_var(word.as_str()),
        );
        self.transport.execute(WireRequest::new(Method::GET, path)).await
    }

    /// Delete one word from a custom language model's vocabulary
    ///
    /// Accepts either a bare word string or a [`CustomWord`] record.
    pub async fn delete_custom_word(
        &self,
        customization_id: &str,
        word: impl Into<WordRef> + Send,
    ) -> Result<Value> {
        let word = word.into();
        let path = format!(
            "/v1/customizations/{}/words/{}",
            encode_path_var(customization_id),
            encode_path_var(word.as_str()),
        );
        self.transport
            .execute(WireRequest::new(Method::DELETE, path))
            .await
    }
}

impl Default for SpeechToText {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape the sessionless recognition descriptor shared by the parsed and
/// streaming variants
fn recognize_request(audio: Bytes, content_type: &str, options: &RecognizeOptions) -> WireRequest {
    tracing::debug!("Recognition request: {} bytes, {content_type}", audio.len());

    let mut params = Params::new();
    options.append_to(&mut params);

    WireRequest::new(Method::POST, "/v1/recognize")
        .header("content-type", content_type)
        .query(params)
        .binary(audio)
}

/// A required identifier must be present; the request is never built when
/// it is missing
fn require_id(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SttError::InvalidArgument(format!("{name} must be provided")));
    }
    Ok(())
}
