#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the IBM Watson Speech to Text service
//!
//! Covers sessionless and session-based recognition, base model listing,
//! and custom language model management (corpora and custom words). The
//! client shapes each call into a single request descriptor and delegates
//! the exchange to a [`Transport`]; the default [`HttpTransport`] carries
//! the base URL and basic-auth credentials.

mod client;
mod error;
mod http_client;
mod request;
mod transport;
mod types;

pub use client::{DEFAULT_BASE_MODEL, DEFAULT_URL, SpeechToText};
pub use error::{Result, SttError};
pub use request::{FilePart, RequestBody, WireRequest};
pub use transport::{ChunkStream, HttpTransport, Transport};
pub use types::{
    AudioUpload, CustomWord, RecognizeOptions, SessionOptions, SessionRecognition, WordRef,
    WordSort, WordType,
};
