//! Error types for the Enigma engine.

use thiserror::Error;

/// Errors produced by the Enigma engine and its configuration layer.
///
/// Every variant is fatal for the message or run being processed; the
/// engine never retries and never repairs partial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Alphabet has duplicate symbols, fewer than 2 symbols, or reserved characters.
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// Symbol is not a member of the alphabet.
    #[error("Symbol '{0}' is not in the alphabet")]
    InvalidSymbol(char),
    /// Index lies outside `[0, size)`.
    #[error("Index {index} is outside the alphabet range [0, {size})")]
    IndexOutOfRange { index: usize, size: usize },
    /// Cycle notation is empty, unbalanced, nested, or covers a symbol twice.
    #[error("Malformed cycle notation: {0}")]
    MalformedCycle(String),
    /// Machine, rotor, or setting configuration is inconsistent.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Position or ring string does not have one symbol per non-reflector slot.
    #[error("Setting has {found} symbols but the machine needs {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

impl EnigmaError {
    /// Shorthand for building a [`EnigmaError::ConfigurationError`].
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EnigmaError::ConfigurationError(msg.into())
    }
}
