//! Error types for RDF/XML loading

/// Error type for every stage of loading: scanning, tree building,
/// namespace resolution and triple extraction
#[derive(Debug, thiserror::Error)]
pub enum RdfXmlError {
    /// Underlying reader failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes are not valid UTF-8
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// Input uses an encoding the scanner does not decode
    #[error("unsupported document encoding: {0}")]
    UnsupportedEncoding(&'static str),

    /// Stream ended in the middle of a construct.
    /// `consumed` holds whatever was read before the end was hit.
    #[error("unexpected end of input")]
    UnexpectedEof { consumed: String },

    /// Stream ended cleanly where a new tag could have started
    #[error("no more tags in input")]
    EndOfInput,

    /// Tag or attribute grammar violation
    #[error("syntax error at character {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Attribute value terminated by something other than its opening quote
    #[error("mismatched quote at character {position}: expected {expected:?}, found {found:?}")]
    QuoteMismatch {
        position: usize,
        expected: char,
        found: char,
    },

    /// Opening and closing tags disagree on prefix or name
    #[error("opening and closing tags don't match: opening tag {opening}, closing tag {closing}")]
    TagMismatch { opening: String, closing: String },

    /// Prefix used without an `xmlns:` declaration on the root element
    #[error("undefined schema name: {0:?}")]
    UndefinedSchema(String),

    /// Namespace declaration value is not a valid URI
    #[error("schema URI {value:?} doesn't conform to URL rules: {source}")]
    InvalidIri {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// Qualified name with nothing after the colon
    #[error("expected a word after colon in {0:?}")]
    EmptyLocalName(String),

    /// Dedicated extraction pool could not be started
    #[error("failed to build extraction thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, RdfXmlError>;

impl RdfXmlError {
    /// Create a syntax error at a character position
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create an end-of-input error carrying the partially read text
    pub fn eof(consumed: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            consumed: consumed.into(),
        }
    }

    /// True for both flavours of end-of-stream
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. } | Self::EndOfInput)
    }
}
