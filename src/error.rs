//! Error types for the IRC client engine.
//!
//! [`Error`] covers transport-level failures, [`MessageParseError`] the
//! strict message parser, and [`CommandError`] slash-command usage
//! problems. Server-side numeric errors are not Rust errors at all: the
//! dispatcher turns them into scrollback entries.

/// Convenience type alias for Results using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level engine errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the maximum allowed length.
    #[error("message too long: {0} bytes")]
    MessageTooLong(usize),

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },

    /// The configured host is not usable as a TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// The connection is gone; nothing more can be sent.
    #[error("disconnected")]
    Disconnected,
}

/// Errors returned by the strict message parser (`str::parse::<Message>`).
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Tags and source were present but no command followed them.
    #[error("missing command")]
    MissingCommand,
}

/// Errors produced while turning a slash-command into a message.
///
/// The `Display` text is what ends up in the session log.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandError {
    /// Input did not start with `/`.
    #[error("Not a command: input must start with '/'")]
    NotACommand,

    /// Parameter count outside what the command accepts.
    #[error("Invalid command format, expected '{usage}'.")]
    Usage {
        /// Usage string of the command.
        usage: &'static str,
    },

    /// No template for this command.
    #[error("Unimplemented command {0}")]
    Unimplemented(String),
}
