//! gridwire-util - shared error and source-position types.
//!
//! Every other crate in the workspace depends on this one for the error
//! taxonomy (§7 of the protocol: lexical, parse, read, value and auth
//! errors are kept as separate types rather than one grab-bag enum) and
//! for [`Position`] / [`Span`], used to annotate where in the document a
//! failure occurred.

pub mod error;
pub mod span;

pub use error::{AuthError, LexError, ParseError, ReadError, ValueError};
pub use span::{Position, Span};
