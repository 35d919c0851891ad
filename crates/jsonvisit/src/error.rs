//! Reader error types.
//!
//! Errors are surfaced, never thrown: the reader latches the first failure
//! and every later [`parse`](crate::Reader::parse) call against the same
//! instance is a no-op. Callers must check [`error`](crate::Reader::error)
//! after each top-level parse.

use thiserror::Error;

/// A parse failure, latched at the byte the reader could not accept.
///
/// Once latched the error is permanent for the reader instance; recovery
/// requires constructing a new reader over a fresh buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct ReadError {
    /// Byte offset into the input buffer of the offending position.
    pub offset: usize,
    /// What went wrong.
    pub kind: ErrorKind,
}

/// Classification of reader failures.
///
/// There is no warning tier and no recoverable tier; every kind is terminal
/// for the parse pass it occurred in.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The buffer holds no `{` or `[` before its first significant byte.
    #[error("no root container")]
    NoRootContainer,
    /// A byte that no state of the parser accepts.
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),
    /// A number lexeme that does not convert to a double.
    #[error("malformed number")]
    InvalidNumber,
    /// End of input inside a string literal.
    #[error("unterminated string")]
    UnterminatedString,
    /// End of input before the level's closing `}` or `]` was found.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A string or key whose bytes are not valid UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// Nesting deeper than [`ReaderOptions::max_depth`](crate::ReaderOptions::max_depth).
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}
