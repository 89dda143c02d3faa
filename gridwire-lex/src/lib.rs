//! gridwire-lex - streaming tokeniser for the grid document language.
//!
//! Consumes a lazy sequence of byte chunks (§4.2) and produces tokens one
//! at a time (§4.3) with no intermediate buffering of the whole document.
//! The module split mirrors the grammar's recognition rules rather than
//! an arbitrary file-size cut: `grammar` is the character classification
//! table, `chars` is the chunk-to-char adaptor, `token` is the token
//! model, and `lexer` is the dispatch loop built on top of both.

pub mod chars;
pub mod grammar;
mod lexer;
pub mod token;

pub use chars::{ChunkSource, CharStream, VecChunkSource};
pub use lexer::Lexer;
pub use token::{TokKind, Token};

#[cfg(test)]
mod tests {
    use super::*;

    async fn tokens(doc: &str) -> Vec<Token> {
        let mut lexer = Lexer::make(VecChunkSource::whole(doc.to_string())).await.unwrap();
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().await.unwrap() {
            out.push(tok);
        }
        out
    }

    #[tokio::test]
    async fn lexes_a_simple_row() {
        let toks = tokens("id, name\n@a,\"alpha\"\n").await;
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokKind::Identifier,
                TokKind::Comma,
                TokKind::Identifier,
                TokKind::Linefeed,
                TokKind::Ref,
                TokKind::Comma,
                TokKind::Str,
                TokKind::Linefeed,
            ]
        );
    }

    #[tokio::test]
    async fn grid_start_and_end_are_not_confused_with_comparisons() {
        let toks = tokens("<<>>").await;
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokKind::GridStart, TokKind::GridEnd]);
    }

    #[tokio::test]
    async fn keyword_singletons_and_numeric_keywords() {
        let toks = tokens("NaN INF -INF T F Bin").await;
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokKind::Number,
                TokKind::Number,
                TokKind::Number,
                TokKind::Bool,
                TokKind::Bool,
                TokKind::Keyword,
            ]
        );
    }

    #[tokio::test]
    async fn number_date_time_datetime_classification() {
        let toks = tokens("12 2010-03-11 23:55:00 2010-03-11T23:55:00-05:00").await;
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokKind::Number, TokKind::Date, TokKind::Time, TokKind::DateTime]
        );
    }

    #[tokio::test]
    async fn ref_does_not_consume_trailing_space() {
        let toks = tokens("@a b").await;
        assert_eq!(toks[0].kind, TokKind::Ref);
        assert_eq!(toks[0].text, "a");
        assert_eq!(toks[1].kind, TokKind::Identifier);
        assert_eq!(toks[1].text, "b");
    }

    #[tokio::test]
    async fn whitespace_is_oblivious_property() {
        // Inserting extra whitespace strictly between tokens must not
        // change the resulting token sequence (Property 3, §8).
        let a = tokens("id,name\n").await;
        let b = tokens("id , name \n").await;
        let ka: Vec<_> = a.iter().map(|t| (t.kind, t.text.clone())).collect();
        let kb: Vec<_> = b.iter().map(|t| (t.kind, t.text.clone())).collect();
        assert_eq!(ka, kb);
    }

    #[tokio::test]
    async fn unterminated_string_is_lexical_error() {
        let mut lexer = Lexer::make(VecChunkSource::whole("\"abc".to_string())).await.unwrap();
        let err = lexer.next_token().await.unwrap_err();
        assert!(matches!(err, gridwire_util::LexError::UnterminatedString { .. }));
    }

    #[tokio::test]
    async fn unknown_character_is_lexical_error() {
        let mut lexer = Lexer::make(VecChunkSource::whole("#".to_string())).await.unwrap();
        let err = lexer.next_token().await.unwrap_err();
        assert!(matches!(
            err,
            gridwire_util::LexError::UnexpectedChar { found: '#', .. }
        ));
    }

    use proptest::prelude::*;

    proptest! {
        /// Property 3 (§8), generated rather than a single fixed case:
        /// padding arbitrary runs of spaces around a comma between
        /// arbitrary identifiers never changes the resulting tokens.
        #[test]
        fn whitespace_is_oblivious_under_arbitrary_padding(
            ids in prop::collection::vec("[a-z][a-z0-9]{0,5}", 1..5),
            paddings in prop::collection::vec(0usize..4, 0..5),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let tight = format!("{}\n", ids.join(","));

            let mut padded = String::new();
            for (i, id) in ids.iter().enumerate() {
                if i > 0 {
                    let n = paddings.get(i - 1).copied().unwrap_or(0);
                    padded.push_str(&" ".repeat(n));
                    padded.push(',');
                    padded.push_str(&" ".repeat(n));
                }
                padded.push_str(id);
            }
            padded.push('\n');

            let a = rt.block_on(tokens(&tight));
            let b = rt.block_on(tokens(&padded));
            let ka: Vec<_> = a.iter().map(|t| (t.kind, t.text.clone())).collect();
            let kb: Vec<_> = b.iter().map(|t| (t.kind, t.text.clone())).collect();
            prop_assert_eq!(ka, kb);
        }
    }
}
