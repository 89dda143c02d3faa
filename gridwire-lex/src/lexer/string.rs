//! String and URI literal scanning (§4.3.1).
//!
//! Only the *shape* of escapes is validated here; decoding into the
//! actual text (collapsing `\n`, `\uXXXX`, ...) happens in the lexical
//! value readers of `gridwire-read`, which re-walk the verbatim lexeme.

use gridwire_util::{LexError, Position, Span};

use crate::chars::ChunkSource;
use crate::grammar::*;
use crate::token::{TokKind, Token};

use super::core::Lexer;

impl<S: ChunkSource> Lexer<S> {
    /// Rule 6: string literal, delimited by `"`.
    pub(crate) async fn lex_str(&mut self, start: Position) -> Result<Option<Token>, LexError> {
        self.consume().await?; // opening quote
        self.scan_delimited(start, is_str_end, is_str_escaped_char)
            .await?;
        Ok(Some(Token::new(
            TokKind::Str,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }

    /// Rule 7: URI literal, delimited by `` ` ``.
    pub(crate) async fn lex_uri(&mut self, start: Position) -> Result<Option<Token>, LexError> {
        self.consume().await?; // opening backtick
        self.scan_delimited(start, is_uri_end, is_uri_escaped_char)
            .await?;
        Ok(Some(Token::new(
            TokKind::Uri,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }

    /// Shared body of §4.3.1: loop until the terminator, honouring `\\`
    /// escapes (including `\uXXXX`) and otherwise requiring
    /// `isUnicodeChar`. `is_end` and `is_escaped` are mode-specific
    /// (string vs. URI) character classes.
    async fn scan_delimited(
        &mut self,
        start: Position,
        is_end: fn(char) -> bool,
        is_escaped: fn(char) -> bool,
    ) -> Result<(), LexError> {
        loop {
            let Some(c) = self.current else {
                return Err(LexError::UnterminatedString { span: self.span_from(start) });
            };

            if c == '\\' {
                self.consume().await?; // the backslash
                let Some(escape) = self.current else {
                    return Err(LexError::UnexpectedEof { span: self.span_from(start) });
                };
                if escape == 'u' {
                    self.consume().await?;
                    for _ in 0..4 {
                        match self.current {
                            Some(h) if is_hex_digit(h) => self.consume().await?,
                            _ => {
                                return Err(LexError::IncompleteUnicodeEscape {
                                    span: self.span_from(start),
                                })
                            }
                        }
                    }
                } else if is_escaped(escape) {
                    self.consume().await?;
                } else {
                    return Err(LexError::InvalidEscape {
                        escape,
                        span: self.span_from(start),
                    });
                }
                continue;
            }

            if is_end(c) {
                self.consume().await?; // closing delimiter
                return Ok(());
            }

            if is_unicode_char(c) {
                self.consume().await?;
                continue;
            }

            return Err(LexError::UnexpectedChar {
                found: c,
                span: Span::point(self.current_pos),
            });
        }
    }
}
