//! Recursive-descent parser over `gridwire-lex`'s token stream (§4.4).
//!
//! Split the way the grammar is split: `core` (this file) holds the
//! one-token lookahead and the generic `consume`/`consume_if` helpers;
//! `grid` holds grid/column/row assembly; `tags` holds dict/list/tag
//! assembly; `literal` holds the single-value dispatch and every scalar
//! production.

mod grid;
mod literal;
mod tags;

use gridwire_lex::{ChunkSource, Lexer, TokKind, Token};
use gridwire_util::ParseError;

use crate::GridError;

/// One-token-ahead cursor over a lexer's token stream, the parser's
/// analogue of the lexer's own `current`/`peek` character lookahead.
pub struct Parser<S> {
    lexer: Lexer<S>,
    cur: Option<Token>,
    peek: Option<Token>,
}

impl<S: ChunkSource> Parser<S> {
    pub async fn make(source: S) -> Result<Self, GridError> {
        let mut lexer = Lexer::make(source).await.map_err(io_as_lex)?;
        let cur = lexer.next_token().await?;
        let peek = lexer.next_token().await?;
        Ok(Self { lexer, cur, peek })
    }

    async fn next(&mut self) -> Result<(), GridError> {
        self.cur = self.peek.take();
        self.peek = self.lexer.next_token().await?;
        Ok(())
    }

    fn current_is(&self, kind: TokKind) -> bool {
        self.cur.as_ref().is_some_and(|t| t.kind == kind)
    }

    fn current_is_text(&self, kind: TokKind, text: &str) -> bool {
        self.cur
            .as_ref()
            .is_some_and(|t| t.kind == kind && t.text == text)
    }

    fn peek_is(&self, kind: TokKind) -> bool {
        self.peek.as_ref().is_some_and(|t| t.kind == kind)
    }

    /// Consumes and returns the current token if it matches `kind`,
    /// otherwise leaves the cursor untouched and returns `None`.
    async fn consume_if(&mut self, kind: TokKind) -> Result<Option<Token>, GridError> {
        if !self.current_is(kind) {
            return Ok(None);
        }
        let tok = self.cur.take().unwrap();
        self.next().await?;
        Ok(Some(tok))
    }

    /// Consumes the current token, requiring it to match `kind` (and, if
    /// given, its exact text), or raises a `ParseError`.
    async fn consume(&mut self, kind: TokKind) -> Result<Token, GridError> {
        self.consume_expecting(kind, None).await
    }

    async fn consume_text(&mut self, kind: TokKind, text: &str) -> Result<Token, GridError> {
        self.consume_expecting(kind, Some(text)).await
    }

    /// Like `consume(Identifier)`, but for the one position (a tag or
    /// column name) where a generic "unexpected token" doesn't say what
    /// was actually missing.
    async fn consume_tag_identifier(&mut self) -> Result<Token, GridError> {
        match self.cur.clone() {
            Some(tok) if tok.kind == TokKind::Identifier => {
                self.next().await?;
                Ok(tok)
            }
            Some(tok) => Err(ParseError::TagMissingIdentifier { span: tok.span }.into()),
            None => Err(ParseError::UnexpectedEof {
                expected: "a tag identifier".to_string(),
            }
            .into()),
        }
    }

    async fn consume_expecting(
        &mut self,
        kind: TokKind,
        text: Option<&str>,
    ) -> Result<Token, GridError> {
        let Some(tok) = self.cur.clone() else {
            return Err(ParseError::UnexpectedEof {
                expected: text.map(|t| t.to_string()).unwrap_or_else(|| kind.describe().to_string()),
            }
            .into());
        };
        if tok.kind != kind || text.is_some_and(|t| t != tok.text) {
            return Err(ParseError::UnexpectedToken {
                expected: text.map(|t| t.to_string()).unwrap_or_else(|| kind.describe().to_string()),
                span: tok.span,
            }
            .into());
        }
        self.next().await?;
        Ok(tok)
    }
}

/// `Lexer::make` only fails on the chunk source's own I/O error, before
/// any position has been scanned, so there is no real span to report.
fn io_as_lex(_e: std::io::Error) -> GridError {
    gridwire_util::LexError::UnexpectedEof {
        span: gridwire_util::Span::point(gridwire_util::Position::START),
    }
    .into()
}
