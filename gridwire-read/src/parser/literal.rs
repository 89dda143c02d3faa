//! Literal assembly (§4.4 `parse_literal` and the scalar productions it
//! dispatches to). One function per grammar production, matching the
//! grouping `zinc/parser.py` uses even where a production is a single
//! line, so each can be found by the keyword/token it handles.

use gridwire_lex::{ChunkSource, TokKind};
use gridwire_util::ParseError;

use crate::read;
use crate::value::Val;
use crate::GridError;

use super::Parser;

impl<S: ChunkSource> Parser<S> {
    /// §4.4 `parse_literal`: the single dispatch point every value
    /// production (nested grids included) eventually funnels through.
    pub(crate) async fn parse_literal(&mut self) -> Result<Val, GridError> {
        let Some(cur) = self.cur.clone() else {
            return Err(ParseError::UnexpectedEof {
                expected: "a value".to_string(),
            }
            .into());
        };

        if cur.kind == TokKind::Keyword && self.peek_is(TokKind::LParen) {
            return match cur.text.as_str() {
                "C" => self.parse_coord().await,
                "Bin" => self.parse_bin().await,
                _ => self.parse_xstr().await,
            };
        }

        match cur.kind {
            TokKind::LBracket => self.parse_list().await,
            TokKind::LBrace => self.parse_dict().await.map(Val::Dict),
            TokKind::GridStart => self.parse_nested_grid_value().await,
            TokKind::Ref => self.parse_ref().await,
            TokKind::Symbol => self.parse_symbol().await,
            TokKind::Bool => self.parse_bool().await,
            TokKind::Uri => self.parse_uri().await,
            TokKind::Number => self.parse_num().await,
            TokKind::Str => self.parse_str().await,
            TokKind::Date => self.parse_date().await,
            TokKind::Time => self.parse_time().await,
            TokKind::DateTime => self.parse_date_time().await,
            TokKind::Keyword if cur.text == "N" => self.parse_null().await,
            TokKind::Keyword if cur.text == "M" => self.parse_marker().await,
            TokKind::Keyword if cur.text == "R" => self.parse_remove().await,
            TokKind::Keyword if cur.text == "NA" => self.parse_na().await,
            // Any other keyword not immediately followed by `(` matches
            // none of the recognised singletons or the coord/bin/xstr
            // forms handled above — §4.4's disambiguation rule says
            // "anything else is a parse error".
            TokKind::Keyword => Err(ParseError::UnknownKeyword {
                name: cur.text.clone(),
                span: cur.span,
            }
            .into()),
            _ => Err(ParseError::UnexpectedToken {
                expected: "a value".to_string(),
                span: cur.span,
            }
            .into()),
        }
    }

    async fn parse_ref(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Ref).await?;
        let mut r = read::read_ref(&tok.text);
        if self.current_is(TokKind::Str) {
            let name = self.consume(TokKind::Str).await?;
            r = r.with_name(read::read_str(&name.text, name.span)?);
        }
        Ok(Val::Ref(r))
    }

    async fn parse_symbol(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Symbol).await?;
        Ok(Val::Symbol(read::read_symbol(&tok.text)))
    }

    async fn parse_bool(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Bool).await?;
        Ok(Val::Bool(read::read_bool(&tok.text, tok.span)?))
    }

    async fn parse_uri(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Uri).await?;
        Ok(Val::Uri(read::read_uri(&tok.text, tok.span)?))
    }

    async fn parse_str(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Str).await?;
        Ok(Val::Str(read::read_str(&tok.text, tok.span)?))
    }

    async fn parse_num(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Number).await?;
        Ok(Val::Num(read::read_num(&tok.text, tok.span)?))
    }

    async fn parse_date(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Date).await?;
        Ok(Val::Date(read::read_date(&tok.text, tok.span)?))
    }

    async fn parse_time(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::Time).await?;
        Ok(Val::Time(read::read_time(&tok.text, tok.span)?))
    }

    async fn parse_date_time(&mut self) -> Result<Val, GridError> {
        let tok = self.consume(TokKind::DateTime).await?;
        Ok(Val::DateTime(read::read_date_time(&tok.text, tok.span)?))
    }

    async fn parse_null(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "N").await?;
        Ok(Val::Null)
    }

    async fn parse_marker(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "M").await?;
        Ok(Val::Marker)
    }

    async fn parse_remove(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "R").await?;
        Ok(Val::Remove)
    }

    async fn parse_na(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "NA").await?;
        Ok(Val::Na)
    }

    async fn parse_coord(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "C").await?;
        self.consume(TokKind::LParen).await?;
        let lat_tok = self.consume(TokKind::Number).await?;
        let lat = read::read_num(&lat_tok.text, lat_tok.span)?;
        self.consume(TokKind::Colon).await?;
        let lon_tok = self.consume(TokKind::Number).await?;
        let lon = read::read_num(&lon_tok.text, lon_tok.span)?;
        self.consume(TokKind::RParen).await?;
        Ok(Val::Coord(read::read_coord(lat.value, lon.value, lon_tok.span)?))
    }

    async fn parse_xstr(&mut self) -> Result<Val, GridError> {
        let type_tok = self.consume(TokKind::Keyword).await?;
        self.consume(TokKind::LParen).await?;
        let payload_tok = self.consume(TokKind::Str).await?;
        let payload = read::read_str(&payload_tok.text, payload_tok.span)?;
        self.consume(TokKind::RParen).await?;
        Ok(Val::XStr(type_tok.text, payload))
    }

    async fn parse_bin(&mut self) -> Result<Val, GridError> {
        self.consume_text(TokKind::Keyword, "Bin").await?;
        self.consume(TokKind::LParen).await?;
        let mime_tok = self.consume(TokKind::Str).await?;
        let mime = read::read_str(&mime_tok.text, mime_tok.span)?;
        self.consume(TokKind::RParen).await?;
        Ok(Val::Bin(mime))
    }
}
