use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::SttError;
use crate::request::Params;

/// A custom-vocabulary entry for a custom language model
///
/// Immutable after construction. The serde projection is the canonical
/// `{word, sounds_like, display_as}` mapping used both for the bulk
/// `words` payload and (minus `word`) for the single-word PUT fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomWord {
    /// The word being added; identifies the entry
    pub word: String,
    /// Phonetic hints for how the word is pronounced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sounds_like: Option<Vec<String>>,
    /// Override for how the word is displayed in transcripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_as: Option<String>,
}

impl CustomWord {
    /// Create an entry with no phonetic hints or display override
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            sounds_like: None,
            display_as: None,
        }
    }

    #[must_use]
    pub fn sounds_like(mut self, sounds_like: Vec<String>) -> Self {
        self.sounds_like = Some(sounds_like);
        self
    }

    #[must_use]
    pub fn display_as(mut self, display_as: impl Into<String>) -> Self {
        self.display_as = Some(display_as.into());
        self
    }

    /// The `{sounds_like, display_as}` fragment for the single-word PUT,
    /// where the word itself travels as a path variable rather than body
    /// data. Unset fields are omitted, never sent as null.
    pub fn fragment(&self) -> serde_json::Value {
        let mut fragment = serde_json::Map::new();
        if let Some(sounds_like) = &self.sounds_like {
            fragment.insert("sounds_like".to_owned(), serde_json::json!(sounds_like));
        }
        if let Some(display_as) = &self.display_as {
            fragment.insert("display_as".to_owned(), serde_json::json!(display_as));
        }
        serde_json::Value::Object(fragment)
    }
}

/// Anything that identifies a custom word: a bare word string or a full
/// [`CustomWord`] record. Lookup and delete operations accept either and
/// resolve to the word string at the boundary.
#[derive(Debug, Clone)]
pub enum WordRef {
    /// A bare word string
    Name(String),
    /// A full record; only its `word` field is used
    Word(CustomWord),
}

impl WordRef {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(word) => word,
            Self::Word(record) => &record.word,
        }
    }
}

impl From<&str> for WordRef {
    fn from(word: &str) -> Self {
        Self::Name(word.to_owned())
    }
}

impl From<String> for WordRef {
    fn from(word: String) -> Self {
        Self::Name(word)
    }
}

impl From<CustomWord> for WordRef {
    fn from(record: CustomWord) -> Self {
        Self::Word(record)
    }
}

impl From<&CustomWord> for WordRef {
    fn from(record: &CustomWord) -> Self {
        Self::Word(record.clone())
    }
}

/// Which words to include when listing a custom model's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordType {
    /// All words
    All,
    /// Words added by the user
    User,
    /// Words extracted from corpora
    Corpora,
}

impl WordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::User => "user",
            Self::Corpora => "corpora",
        }
    }
}

impl FromStr for WordType {
    type Err = SttError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "user" => Ok(Self::User),
            "corpora" => Ok(Self::Corpora),
            other => Err(SttError::InvalidArgument(format!(
                "word_type must be all, user, or corpora, got '{other}'"
            ))),
        }
    }
}

/// Sort order when listing a custom model's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSort {
    /// Alphabetically by word
    Alphabetical,
    /// By how many corpora reference the word
    Count,
}

impl WordSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::Count => "count",
        }
    }
}

impl FromStr for WordSort {
    type Err = SttError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "alphabetical" => Ok(Self::Alphabetical),
            "count" => Ok(Self::Count),
            other => Err(SttError::InvalidArgument(format!(
                "sort must be alphabetical or count, got '{other}'"
            ))),
        }
    }
}

/// Optional parameters for sessionless recognition
///
/// Every field is independently optional; unset fields never reach the
/// query string.
#[derive(Debug, Clone, Default)]
pub struct RecognizeOptions {
    /// Keep the connection open across utterance boundaries
    pub continuous: Option<bool>,
    /// Base model identifier (see `list_models`)
    pub model: Option<String>,
    /// Custom language model GUID
    pub customization_id: Option<String>,
    /// Seconds of silence before the service closes the connection;
    /// `-1` for infinity
    pub inactivity_timeout: Option<i64>,
    /// Keyword strings to spot in the audio
    pub keywords: Option<Vec<String>>,
    /// Lower confidence bound for spotting a keyword (0.0 to 1.0)
    pub keywords_threshold: Option<f64>,
    /// Maximum number of alternative transcripts
    pub max_alternatives: Option<u32>,
    /// Lower confidence bound for word alternatives (0.0 to 1.0)
    pub word_alternatives_threshold: Option<f64>,
    /// Return a confidence measure per word
    pub word_confidence: Option<bool>,
    /// Return time alignment per word
    pub timestamps: Option<bool>,
    /// Return interim hypotheses as they are produced
    pub interim_results: Option<bool>,
    /// Censor profanity in the transcript (US English only)
    pub profanity_filter: Option<bool>,
    /// Convert dates, numbers, and currency into conventional forms
    pub smart_formatting: Option<bool>,
    /// Label which words were spoken by which speaker
    pub speaker_labels: Option<bool>,
    /// Weight given to custom-model words over base-model words
    /// (0.0 to 1.0)
    pub customization_weight: Option<f64>,
}

impl RecognizeOptions {
    pub(crate) fn append_to(&self, params: &mut Params) {
        params.push_opt("continuous", self.continuous);
        params.push_opt("inactivity_timeout", self.inactivity_timeout);
        params.push_list("keywords", self.keywords.as_deref());
        params.push_opt("keywords_threshold", self.keywords_threshold);
        params.push_opt("max_alternatives", self.max_alternatives);
        params.push_opt("model", self.model.as_ref());
        params.push_opt("customization_id", self.customization_id.as_ref());
        params.push_opt(
            "word_alternatives_threshold",
            self.word_alternatives_threshold,
        );
        params.push_opt("word_confidence", self.word_confidence);
        params.push_opt("timestamps", self.timestamps);
        params.push_opt("interim_results", self.interim_results);
        params.push_opt("profanity_filter", self.profanity_filter);
        params.push_opt("smart_formatting", self.smart_formatting);
        params.push_opt("speaker_labels", self.speaker_labels);
        params.push_opt("customization_weight", self.customization_weight);
    }
}

/// Optional parameters for session creation
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Base model identifier for the new session
    pub model: Option<String>,
    /// Custom language model GUID
    pub customization_id: Option<String>,
    /// Custom acoustic model GUID
    pub acoustic_customization_id: Option<String>,
    /// Weight given to custom-model words over base-model words
    pub customization_weight: Option<f64>,
}

impl SessionOptions {
    pub(crate) fn append_to(&self, params: &mut Params) {
        params.push_opt("model", self.model.as_ref());
        params.push_opt("customization_id", self.customization_id.as_ref());
        params.push_opt(
            "acoustic_customization_id",
            self.acoustic_customization_id.as_ref(),
        );
        params.push_opt("customization_weight", self.customization_weight);
    }
}

/// An audio file part for multipart session recognition
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Audio bytes
    pub data: Bytes,
    /// Filename hint for the part; omitted from the wire when unset
    pub filename: Option<String>,
    /// Content type; defaults to `application/octet-stream` when unset
    pub content_type: Option<String>,
}

impl AudioUpload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filename: None,
            content_type: None,
        }
    }
}

/// Payload and parameters for recognition within a session
///
/// Two mutually exclusive shapes share this type: a non-multipart request
/// populates `audio` (plus any of the query parameters), a multipart
/// request populates `metadata` and `upload`. The client trusts the
/// caller's choice of shape and does not reconcile conflicting fields.
#[derive(Debug, Clone, Default)]
pub struct SessionRecognition {
    /// NON-MULTIPART: audio to transcribe, sent as the raw request body
    pub audio: Option<Bytes>,
    /// Content type of the input; defaults to `audio/basic`
    pub content_type: Option<String>,
    /// Set to `chunked` to stream the audio
    pub transfer_encoding: Option<String>,
    /// NON-MULTIPART: caller-chosen sequence id for this recognition task
    pub sequence_id: Option<i64>,
    /// Seconds of silence before the service closes the connection
    pub inactivity_timeout: Option<i64>,
    /// Keyword strings to spot in the audio
    pub keywords: Option<Vec<String>>,
    /// Lower confidence bound for spotting a keyword
    pub keywords_threshold: Option<f64>,
    /// Maximum number of alternative transcripts
    pub max_alternatives: Option<u32>,
    /// Lower confidence bound for word alternatives
    pub word_alternatives_threshold: Option<f64>,
    /// Return a confidence measure per word
    pub word_confidence: Option<bool>,
    /// Return time alignment per word
    pub timestamps: Option<bool>,
    /// Censor profanity in the transcript
    pub profanity_filter: Option<bool>,
    /// Convert dates, numbers, and currency into conventional forms
    pub smart_formatting: Option<bool>,
    /// Label which words were spoken by which speaker
    pub speaker_labels: Option<bool>,
    /// MULTIPART: JSON text describing the audio parts; always the first
    /// part of the request
    pub metadata: Option<String>,
    /// MULTIPART: the audio file part
    pub upload: Option<AudioUpload>,
}

impl SessionRecognition {
    pub(crate) fn append_to(&self, params: &mut Params) {
        params.push_opt("sequence_id", self.sequence_id);
        params.push_opt("inactivity_timeout", self.inactivity_timeout);
        params.push_list("keywords", self.keywords.as_deref());
        params.push_opt("keywords_threshold", self.keywords_threshold);
        params.push_opt("max_alternatives", self.max_alternatives);
        params.push_opt(
            "word_alternatives_threshold",
            self.word_alternatives_threshold,
        );
        params.push_opt("word_confidence", self.word_confidence);
        params.push_opt("timestamps", self.timestamps);
        params.push_opt("profanity_filter", self.profanity_filter);
        params.push_opt("smart_formatting", self.smart_formatting);
        params.push_opt("speaker_labels", self.speaker_labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_word_round_trips() {
        let word = CustomWord::new("IEEE")
            .sounds_like(vec!["i triple e".to_owned()])
            .display_as("IEEE");

        let projected = serde_json::to_value(&word).unwrap();
        assert_eq!(
            projected,
            serde_json::json!({
                "word": "IEEE",
                "sounds_like": ["i triple e"],
                "display_as": "IEEE",
            })
        );

        let rebuilt: CustomWord = serde_json::from_value(projected).unwrap();
        assert_eq!(rebuilt, word);
    }

    #[test]
    fn projection_omits_unset_fields() {
        let word = CustomWord::new("NCAA");
        assert_eq!(
            serde_json::to_value(&word).unwrap(),
            serde_json::json!({"word": "NCAA"})
        );
    }

    #[test]
    fn fragment_excludes_the_word() {
        let word = CustomWord::new("IEEE")
            .sounds_like(vec!["i triple e".to_owned()])
            .display_as("IEEE");

        assert_eq!(
            word.fragment(),
            serde_json::json!({
                "sounds_like": ["i triple e"],
                "display_as": "IEEE",
            })
        );
    }

    #[test]
    fn word_ref_resolves_either_form() {
        let by_name = WordRef::from("tornadoes");
        assert_eq!(by_name.as_str(), "tornadoes");

        let by_record = WordRef::from(CustomWord::new("tornadoes"));
        assert_eq!(by_record.as_str(), "tornadoes");
    }

    #[test]
    fn word_type_rejects_unknown_values() {
        assert_eq!("corpora".parse::<WordType>().unwrap(), WordType::Corpora);
        assert!(matches!(
            "invalid".parse::<WordType>(),
            Err(SttError::InvalidArgument(_))
        ));
    }

    #[test]
    fn sort_rejects_unknown_values() {
        assert_eq!(
            "alphabetical".parse::<WordSort>().unwrap(),
            WordSort::Alphabetical
        );
        assert!(matches!(
            "newest".parse::<WordSort>(),
            Err(SttError::InvalidArgument(_))
        ));
    }
}
