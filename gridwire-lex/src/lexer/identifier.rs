//! Identifiers, keywords, refs and symbols (§4.3 rules 2-5).

use gridwire_util::LexError;

use crate::chars::ChunkSource;
use crate::grammar::*;
use crate::token::{TokKind, Token};

use super::core::Lexer;

impl<S: ChunkSource> Lexer<S> {
    /// Rule 2: `isIdStart` → identifier.
    pub(crate) async fn lex_identifier(
        &mut self,
        start: gridwire_util::Position,
    ) -> Result<Option<Token>, LexError> {
        self.consume().await?;
        while let Some(c) = self.current {
            if is_id_part(c) {
                self.consume().await?;
            } else {
                break;
            }
        }
        Ok(Some(Token::new(
            TokKind::Identifier,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }

    /// Rule 3: `isKeywordStart` → keyword, with the `NaN`/`INF`/`T`/`F`
    /// post-processing into `NUMBER`/`BOOL` the grammar calls for.
    pub(crate) async fn lex_keyword(
        &mut self,
        start: gridwire_util::Position,
    ) -> Result<Option<Token>, LexError> {
        self.consume().await?;
        while let Some(c) = self.current {
            if is_keyword_part(c) {
                self.consume().await?;
            } else {
                break;
            }
        }
        let text = self.take_accumulator();
        let kind = if is_nan(&text) || is_pos_inf(&text) {
            TokKind::Number
        } else if text == "T" || text == "F" {
            TokKind::Bool
        } else {
            TokKind::Keyword
        };
        Ok(Some(Token::new(kind, text, self.span_from(start))))
    }

    /// Rule 4: `isSymbolStart` → symbol.
    pub(crate) async fn lex_symbol(
        &mut self,
        start: gridwire_util::Position,
    ) -> Result<Option<Token>, LexError> {
        self.consume().await?; // the leading '^'
        while let Some(c) = self.current {
            if is_symbol_part(c) {
                self.consume().await?;
            } else {
                break;
            }
        }
        Ok(Some(Token::new(
            TokKind::Symbol,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }

    /// Rule 5: `isRefStart` → ref. The trailing space that may follow a
    /// ref in source text is whitespace before the *next* token, not part
    /// of this lexeme — it is deliberately not consumed here even though
    /// one variant of the original lexer did (§9 open question).
    pub(crate) async fn lex_ref(
        &mut self,
        start: gridwire_util::Position,
    ) -> Result<Option<Token>, LexError> {
        self.consume().await?; // the leading '@'
        while let Some(c) = self.current {
            if is_ref_part(c) {
                self.consume().await?;
            } else {
                break;
            }
        }
        Ok(Some(Token::new(
            TokKind::Ref,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }
}
