//! Number / date / time scanning (§4.3.2). The final token kind is
//! decided from counts accumulated while scanning, not from a grammar
//! with separate productions per kind — `1-2-3` and `1-2-3T4:5:6-7:00`
//! share one scan loop and only the dash/colon tally tells them apart.

use gridwire_util::{LexError, Position};

use crate::chars::ChunkSource;
use crate::grammar::*;
use crate::token::{TokKind, Token};

use super::core::Lexer;

impl<S: ChunkSource> Lexer<S> {
    /// Rule 8: `isNumberStart` → numeric/date/time.
    pub(crate) async fn lex_number(
        &mut self,
        start: Position,
    ) -> Result<Option<Token>, LexError> {
        if self.current == Some('0') && self.peek == Some('x') {
            return self.lex_hex_number(start).await;
        }

        let mut dashes = 0u32;
        let mut colons = 0u32;
        let mut exp = false;

        loop {
            let Some(c) = self.current else { break };

            if is_digit(c) {
                self.consume().await?;
                continue;
            }
            if exp && matches!(c, '+' | '-') {
                self.consume().await?;
                continue;
            }
            if c == '-' {
                dashes += 1;
                self.consume().await?;
                continue;
            }
            if c == ':' && self.peek.is_some_and(is_digit) {
                colons += 1;
                self.consume().await?;
                continue;
            }
            if (exp || colons >= 1) && c == '+' {
                self.consume().await?;
                continue;
            }
            if c == '.' {
                if !self.peek.is_some_and(is_digit) {
                    break;
                }
                self.consume().await?;
                continue;
            }
            if matches!(c, 'e' | 'E') && self.peek.is_some_and(|p| matches!(p, '+' | '-') || is_digit(p))
            {
                exp = true;
                self.consume().await?;
                continue;
            }
            if is_alpha(c) || matches!(c, '%' | '$' | '/') || (c as u32) > 0x7F {
                self.consume().await?;
                continue;
            }
            if c == '_' {
                self.consume().await?;
                continue;
            }
            break;
        }

        let kind = if dashes == 2 && colons == 0 {
            TokKind::Date
        } else if dashes == 0 && colons > 1 {
            TokKind::Time
        } else if dashes > 2 {
            TokKind::DateTime
        } else {
            TokKind::Number
        };

        Ok(Some(Token::new(kind, self.take_accumulator(), self.span_from(start))))
    }

    async fn lex_hex_number(&mut self, start: Position) -> Result<Option<Token>, LexError> {
        self.consume().await?; // '0'
        self.consume().await?; // 'x'
        let mut digits = 0usize;
        while let Some(c) = self.current {
            if is_hex_digit(c) {
                digits += 1;
                self.consume().await?;
            } else if c == '_' {
                self.consume().await?;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(LexError::IncompleteHexNumber {
                span: self.span_from(start),
            });
        }
        Ok(Some(Token::new(
            TokKind::Number,
            self.take_accumulator(),
            self.span_from(start),
        )))
    }
}
