use std::{fmt, io};

/// Crate-wide `Result` type using [`MejsonError`] as the error.
pub type Result<T> = std::result::Result<T, MejsonError>;

/// Top-level error type for mejson operations.
#[derive(Debug)]
pub enum MejsonError {
    /// Conversion aborted.
    Marshal(MarshalError),

    /// Malformed input stream.
    Input(InputError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON serialization errors.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Hard failures raised while marshalling.
///
/// These abort the whole enclosing conversion; no partial output is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// Input nesting went past the configured limit.
    DepthExceeded { limit: usize },
}

/// Errors reading a BSON dump stream.
#[derive(Debug)]
pub enum InputError {
    /// A document could not be decoded.
    Bson { index: usize, message: String },

    /// A document length prefix is impossible.
    InvalidLength { index: usize, length: i32 },

    /// The stream ended in the middle of a document.
    Truncated { index: usize },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MejsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MejsonError::Marshal(e) => write!(f, "Conversion failed: {e}"),
            MejsonError::Input(e) => write!(f, "Input error: {e}"),
            MejsonError::Config(e) => write!(f, "Configuration error: {e}"),
            MejsonError::Io(e) => write!(f, "I/O error: {e}"),
            MejsonError::Json(e) => write!(f, "JSON error: {e}"),
            MejsonError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalError::DepthExceeded { limit } => {
                write!(f, "nesting depth exceeds limit of {limit}")
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Bson { index, message } => {
                write!(f, "document #{index} is not valid BSON: {message}")
            }
            InputError::InvalidLength { index, length } => {
                write!(f, "document #{index} has invalid length {length}")
            }
            InputError::Truncated { index } => write!(f, "document #{index} is truncated"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MejsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MejsonError::Marshal(e) => Some(e),
            MejsonError::Input(e) => Some(e),
            MejsonError::Config(e) => Some(e),
            MejsonError::Io(e) => Some(e),
            MejsonError::Json(e) => Some(e),
            MejsonError::Generic(_) => None,
        }
    }
}
impl std::error::Error for MarshalError {}
impl std::error::Error for InputError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to MejsonError ========================= */

impl From<io::Error> for MejsonError {
    fn from(err: io::Error) -> Self {
        MejsonError::Io(err)
    }
}

impl From<serde_json::Error> for MejsonError {
    fn from(err: serde_json::Error) -> Self {
        MejsonError::Json(err)
    }
}

impl From<MarshalError> for MejsonError {
    fn from(err: MarshalError) -> Self {
        MejsonError::Marshal(err)
    }
}

impl From<InputError> for MejsonError {
    fn from(err: InputError) -> Self {
        MejsonError::Input(err)
    }
}

impl From<ConfigError> for MejsonError {
    fn from(err: ConfigError) -> Self {
        MejsonError::Config(err)
    }
}

impl From<String> for MejsonError {
    fn from(msg: String) -> Self {
        MejsonError::Generic(msg)
    }
}

impl From<&str> for MejsonError {
    fn from(msg: &str) -> Self {
        MejsonError::Generic(msg.to_owned())
    }
}
