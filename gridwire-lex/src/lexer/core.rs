//! Core lexer: one-character lookahead over a [`CharStream`] and the
//! dispatch table that implements the recognition order of §4.3.

use gridwire_util::{LexError, Position, Span};

use crate::chars::{ChunkSource, CharStream};
use crate::grammar::*;
use crate::token::{TokKind, Token};

/// Streaming tokeniser for a grid document.
///
/// Holds `current`/`peek` character lookahead on top of the char stream's
/// own single-character `next_char`, plus a reusable text accumulator for
/// the lexeme currently being scanned.
pub struct Lexer<S> {
    pub(crate) chars: CharStream<S>,
    pub(crate) current: Option<char>,
    pub(crate) peek: Option<char>,
    pub(crate) current_pos: Position,
    pub(crate) accumulator: String,
}

impl<S: ChunkSource> Lexer<S> {
    /// Reads one character into `current` and one into `peek`.
    pub async fn make(source: S) -> std::io::Result<Self> {
        let mut chars = CharStream::new(source);
        let current_pos = chars.position();
        let current = chars.next_char().await?;
        let peek = chars.next_char().await?;
        Ok(Self {
            chars,
            current,
            peek,
            current_pos,
            accumulator: String::new(),
        })
    }

    pub(crate) async fn bump(&mut self) -> std::io::Result<()> {
        self.current_pos = self.chars.position();
        self.current = self.peek;
        self.peek = self.chars.next_char().await?;
        Ok(())
    }

    /// Consumes `current` into the accumulator and advances.
    pub(crate) async fn consume(&mut self) -> Result<(), LexError> {
        if let Some(c) = self.current {
            self.accumulator.push(c);
        }
        let start = self.current_pos;
        self.bump()
            .await
            .map_err(|_| LexError::UnexpectedEof { span: Span::point(start) })
    }

    pub(crate) fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.current_pos)
    }

    async fn skip_whitespace(&mut self) {
        while let Some(c) = self.current {
            if is_whitespace(c) {
                // Whitespace is never expected to hit end-of-stream mid
                // character, and io errors surface on the next real token.
                if self.bump().await.is_err() {
                    break;
                }
            } else {
                break;
            }
        }
    }

    /// Returns the next token, or `None` once the character stream is
    /// exhausted. This is the lazy pull-based sequence the parser drives;
    /// there is no separate "tokenize all" entry point because the whole
    /// point is to never materialise the full token list.
    pub async fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace().await;

        let start = self.current_pos;
        self.accumulator.clear();

        let Some(c) = self.current else {
            return Ok(None);
        };

        // Digraphs are checked before the single-character dispatch so
        // `<<`/`>>` never fall through as unrecognised `<`/`>` (the grid
        // grammar has no bare angle-bracket tokens).
        if c == '<' && self.peek == Some('<') {
            self.consume().await?;
            self.consume().await?;
            return Ok(Some(Token::new(
                TokKind::GridStart,
                self.take_accumulator(),
                self.span_from(start),
            )));
        }
        if c == '>' && self.peek == Some('>') {
            self.consume().await?;
            self.consume().await?;
            return Ok(Some(Token::new(
                TokKind::GridEnd,
                self.take_accumulator(),
                self.span_from(start),
            )));
        }
        if c == '\r' && self.peek == Some('\n') {
            self.consume().await?;
            self.consume().await?;
            return Ok(Some(Token::new(
                TokKind::Linefeed,
                self.take_accumulator(),
                self.span_from(start),
            )));
        }

        if is_id_start(c) {
            return self.lex_identifier(start).await;
        }
        if is_keyword_start(c) {
            return self.lex_keyword(start).await;
        }
        if is_symbol_start(c) {
            return self.lex_symbol(start).await;
        }
        if is_ref_start(c) {
            return self.lex_ref(start).await;
        }
        if is_str_start(c) {
            return self.lex_str(start).await;
        }
        if is_uri_start(c) {
            return self.lex_uri(start).await;
        }
        if is_number_start(c) {
            return self.lex_number(start).await;
        }

        let trivial = match c {
            '(' => Some(TokKind::LParen),
            ')' => Some(TokKind::RParen),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            '{' => Some(TokKind::LBrace),
            '}' => Some(TokKind::RBrace),
            ':' => Some(TokKind::Colon),
            ',' => Some(TokKind::Comma),
            '\n' => Some(TokKind::Linefeed),
            _ => None,
        };
        if let Some(kind) = trivial {
            self.consume().await?;
            return Ok(Some(Token::new(kind, self.take_accumulator(), self.span_from(start))));
        }

        Err(LexError::UnexpectedChar {
            found: c,
            span: Span::point(start),
        })
    }

    pub(crate) fn take_accumulator(&mut self) -> String {
        std::mem::take(&mut self.accumulator)
    }
}
