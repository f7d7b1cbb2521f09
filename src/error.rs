//! Error types for Rowscope
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// Bad range parameters (rejected by the store boundary)
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String },

    /// Unknown collection
    #[snafu(display("Collection not found: {collection}"))]
    NotFound { collection: String },

    /// Store unreachable or failed to answer
    #[snafu(display("Transport error: {message}"))]
    Transport { message: String },

    /// Store answered with a malformed response
    #[snafu(display("Unexpected response: {message}"))]
    Unexpected { message: String },

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations, network, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// The controller task went away
    #[snafu(display("Channel closed: {message}"))]
    ChannelClosed { message: String },
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }

    /// Shorthand for an unexpected-response error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Error::Unexpected {
            message: message.into(),
        }
    }

    /// HTTP status equivalent at the store boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } | Error::Invalid { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::Transport { .. } => 503,
            _ => 500,
        }
    }

    /// Whether the viewer should keep its last good window and wait for the
    /// next scroll-driven cycle
    ///
    /// Unexpected responses are treated like transport failures on the UI side.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Unexpected { .. } | Error::Io { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
