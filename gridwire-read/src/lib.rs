//! gridwire-read - typed reader for the grid document language.
//!
//! Sits on top of `gridwire-lex`'s token stream and assembles it into a
//! [`Grid`] by recursive descent (§4.4), converting each lexeme into a
//! typed [`Val`] along the way via the lexical readers in [`read`]
//! (§4.5). Parsing never buffers the whole token stream: the parser
//! pulls one token ahead of the one it is examining, the same
//! lazy-sequence shape the lexer itself uses.

pub mod parser;
pub mod read;
pub mod value;

use gridwire_util::{LexError, ParseError, ReadError};
use thiserror::Error;

pub use parser::Parser;
pub use value::{Col, Coord, Date, DateTime, Dict, Grid, Num, Ref, Row, Time, Val};

/// Any failure that can arise while turning a byte-chunk stream into a
/// `Grid`: lexical, syntactic, or a malformed literal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Reads one top-level grid document from `source` (§4.4 `parse_root`):
/// a `ver` tag, grid-level metadata, a column header row, then rows
/// until the chunk source is exhausted.
pub async fn read_grid<S: gridwire_lex::ChunkSource>(source: S) -> Result<Grid, GridError> {
    let mut parser = Parser::make(source).await?;
    parser.parse_root().await
}
