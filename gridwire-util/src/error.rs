//! The error taxonomy shared by the reader and the authenticator.
//!
//! Each kind is its own type rather than one combined enum: a
//! [`LexError`] can never arise once the parser is running, and an
//! [`AuthError`] never arises from document parsing, so keeping them
//! separate lets callers match on exactly the failures a given call can
//! produce.

use thiserror::Error;

use crate::span::Span;

/// Failure while turning characters into tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{span}: unexpected character {found:?}")]
    UnexpectedChar { found: char, span: Span },

    #[error("{span}: unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("{span}: unterminated URI literal")]
    UnterminatedUri { span: Span },

    #[error("{span}: invalid escape sequence '\\{escape}'")]
    InvalidEscape { escape: char, span: Span },

    #[error("{span}: incomplete \\u escape, expected 4 hex digits")]
    IncompleteUnicodeEscape { span: Span },

    #[error("{span}: incomplete hex number literal")]
    IncompleteHexNumber { span: Span },

    #[error("{span}: unexpected end of input while scanning a token")]
    UnexpectedEof { span: Span },
}

/// Failure while assembling tokens into a `Grid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{span}: unexpected token, expected {expected}")]
    UnexpectedToken { expected: String, span: Span },

    #[error("unexpected end of token stream, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("{span}: unsupported grid protocol version {found:?}, only \"3.0\" is accepted")]
    UnsupportedVersion { found: String, span: Span },

    #[error("{span}: a row must contain at least one cell")]
    EmptyRow { span: Span },

    #[error("{span}: tag is missing its identifier")]
    TagMissingIdentifier { span: Span },

    #[error("{span}: unknown keyword {name:?}")]
    UnknownKeyword { name: String, span: Span },
}

/// Failure while converting a lexeme's raw text into a typed value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("{span}: {reason}")]
    InvalidLiteral { reason: String, span: Span },
}

impl ReadError {
    pub fn invalid(reason: impl Into<String>, span: Span) -> Self {
        ReadError::InvalidLiteral {
            reason: reason.into(),
            span,
        }
    }
}

/// Violation of a value-construction invariant, raised outside the reader
/// (e.g. by callers building a `Coord` directly).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error(
        "coordinate out of range: lat={lat} (expected -90..=90), lon={lon} (expected -180..=180)"
    )]
    CoordOutOfRange { lat: f64, lon: f64 },

    #[error("{unit:?} is not a valid unit string")]
    InvalidUnit { unit: String },
}

/// Failure during the SCRAM handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("handshake step {step:?} expected HTTP status {expected}, got {found}")]
    UnexpectedStatus {
        step: &'static str,
        expected: u16,
        found: u16,
    },

    #[error("handshake step {step:?} is missing the {header:?} header")]
    MissingHeader {
        step: &'static str,
        header: &'static str,
    },

    #[error("unsupported authentication scheme {found:?}")]
    UnsupportedScheme { found: String },

    #[error("unsupported hash algorithm {found:?}")]
    UnsupportedHash { found: String },

    #[error("missing required parameter {key:?} in {step:?} response")]
    MissingParameter {
        step: &'static str,
        key: &'static str,
    },

    #[error("malformed auth header: {reason}")]
    MalformedHeader { reason: String },

    #[error("SCRAM verification failed: {reason}")]
    ScramVerificationFailed { reason: String },
}
