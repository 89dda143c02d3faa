//! Tag, dict and list assembly (§4.4 `parse_tag`/`parse_tags`/
//! `parse_dict`/`parse_list`).

use gridwire_lex::{ChunkSource, TokKind};

use crate::value::{Dict, Val};
use crate::GridError;

use super::Parser;

impl<S: ChunkSource> Parser<S> {
    /// `id` alone means the tag's value is `Marker`; `id:value` gives it
    /// an explicit value.
    async fn parse_tag(&mut self) -> Result<(String, Val), GridError> {
        let id = self.consume_tag_identifier().await?;
        if self.consume_if(TokKind::Colon).await?.is_none() {
            return Ok((id.text, Val::Marker));
        }
        let val = self.parse_literal().await?;
        Ok((id.text, val))
    }

    /// Reads tags until the next token isn't an identifier. `allow_comma`
    /// controls whether a comma between tags is consumed: column headers
    /// (§4.4 `parse_col`) forbid it since the comma there separates
    /// columns, while dict and grid/nested-grid metadata allow it.
    pub(crate) async fn parse_tags(&mut self, allow_comma: bool) -> Result<Dict, GridError> {
        let mut tags = Dict::new();
        while self.current_is(TokKind::Identifier) {
            let (id, val) = self.parse_tag().await?;
            tags.insert(id, val);
            if allow_comma {
                self.consume_if(TokKind::Comma).await?;
            }
        }
        Ok(tags)
    }

    pub(crate) async fn parse_dict(&mut self) -> Result<Dict, GridError> {
        self.consume(TokKind::LBrace).await?;
        let tags = self.parse_tags(true).await?;
        self.consume(TokKind::RBrace).await?;
        Ok(tags)
    }

    pub(crate) async fn parse_list(&mut self) -> Result<Val, GridError> {
        self.consume(TokKind::LBracket).await?;
        let mut items = Vec::new();
        loop {
            if self.consume_if(TokKind::RBracket).await?.is_some() {
                break;
            }
            items.push(self.parse_literal().await?);
            if self.consume_if(TokKind::Comma).await?.is_none() {
                self.consume(TokKind::RBracket).await?;
                break;
            }
        }
        Ok(Val::List(items))
    }
}
