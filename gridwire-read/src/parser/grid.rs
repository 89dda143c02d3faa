//! Grid, column and row assembly (§4.4 `parse_root`/`parse_nested_grid`
//! and everything they call). `parse_root` drives a whole document;
//! `parse_nested_grid` is its `<< ... >>`-delimited counterpart used
//! wherever a literal position expects a value (§4.4 `parse_literal`).

use gridwire_lex::{ChunkSource, TokKind};
use gridwire_util::ParseError;

use crate::value::{Col, Grid, Row, Val};
use crate::GridError;

use super::Parser;

impl<S: ChunkSource> Parser<S> {
    async fn parse_grid_ver(&mut self) -> Result<String, GridError> {
        self.consume_text(TokKind::Identifier, "ver").await?;
        self.consume(TokKind::Colon).await?;
        let tok = self.consume(TokKind::Str).await?;
        crate::read::read_str(&tok.text, tok.span).map_err(Into::into)
    }

    async fn parse_col(&mut self, index: usize) -> Result<Col, GridError> {
        let name = self.consume_tag_identifier().await?;
        let meta = self.parse_tags(false).await?;
        Ok(Col { index, name: name.text, meta })
    }

    async fn parse_cols(&mut self) -> Result<Vec<Col>, GridError> {
        let mut cols = Vec::new();
        loop {
            cols.push(self.parse_col(cols.len()).await?);
            if self.consume_if(TokKind::Comma).await?.is_none() {
                break;
            }
        }
        self.consume(TokKind::Linefeed).await?;
        Ok(cols)
    }

    /// A row's cell count always matches the column count: a bare comma
    /// or an immediate linefeed elides a cell to `Null` rather than
    /// shifting the remaining cells (§3 invariant, §4.4 row rules).
    async fn parse_row(&mut self) -> Result<Row, GridError> {
        let mut cells = Vec::new();
        loop {
            if self.consume_if(TokKind::Linefeed).await?.is_some() {
                cells.push(Val::Null);
                break;
            }
            if self.consume_if(TokKind::Comma).await?.is_some() {
                cells.push(Val::Null);
                continue;
            }

            cells.push(self.parse_literal().await?);

            if self.consume_if(TokKind::Linefeed).await?.is_some() {
                break;
            }
            self.consume(TokKind::Comma).await?;
        }

        if cells.is_empty() {
            return Err(ParseError::EmptyRow {
                span: self.cur.as_ref().map(|t| t.span).unwrap_or_default(),
            }
            .into());
        }
        Ok(cells)
    }

    /// Reads a whole top-level document: `ver` tag, grid metadata, the
    /// column header line, then rows until the token stream itself is
    /// exhausted (there is no closing delimiter at the top level).
    pub async fn parse_root(&mut self) -> Result<Grid, GridError> {
        let ver = self.parse_grid_ver().await?;
        let meta = self.parse_tags(false).await?;
        let ver_span = self.cur.as_ref().map(|t| t.span).unwrap_or_default();
        self.consume(TokKind::Linefeed).await?;

        if ver != "3.0" {
            return Err(ParseError::UnsupportedVersion { found: ver, span: ver_span }.into());
        }

        let cols = self.parse_cols().await?;
        let mut rows = Vec::new();
        while self.cur.is_some() {
            rows.push(self.parse_row().await?);
        }
        Ok(Grid { meta, cols, rows })
    }

    /// `parse_literal`'s `GRID_START` case: a grid nested inside another
    /// document, terminated by `>>` instead of end-of-stream.
    pub(crate) async fn parse_nested_grid_value(&mut self) -> Result<Val, GridError> {
        self.consume(TokKind::GridStart).await?;
        let ver = self.parse_grid_ver().await?;
        let meta = self.parse_tags(false).await?;
        let ver_span = self.cur.as_ref().map(|t| t.span).unwrap_or_default();
        self.consume(TokKind::Linefeed).await?;

        if ver != "3.0" {
            return Err(ParseError::UnsupportedVersion { found: ver, span: ver_span }.into());
        }

        let cols = self.parse_cols().await?;
        let mut rows = Vec::new();
        while self.consume_if(TokKind::GridEnd).await?.is_none() {
            rows.push(self.parse_row().await?);
        }
        Ok(Val::Grid(Box::new(Grid { meta, cols, rows })))
    }
}
