//! Turns a lazy sequence of UTF-8 byte chunks into a lazy sequence of
//! single characters with no materialisation of the whole payload.
//!
//! This is the chunk-to-char adaptor of §4.2: it owns exactly one
//! partially-consumed chunk at a time and fetches the next one only once
//! the current one is exhausted. The lexer layers its own one-character
//! lookahead (`current`, `peek`) on top of the single `next_char` this
//! type exposes; `CharStream` itself never looks ahead.

use bytes::Bytes;
use gridwire_util::Position;

/// Supplies the next chunk of the document, or `None` at end of stream.
///
/// Implemented by the HTTP transport's body-chunk stream in the client
/// crate; a `Vec<Bytes>`-backed implementation below exists for tests.
pub trait ChunkSource {
    /// Fetches the next chunk. May suspend on network I/O.
    async fn next_chunk(&mut self) -> std::io::Result<Option<Bytes>>;
}

/// A `ChunkSource` over an in-memory list of chunks, used in tests and
/// whenever a whole document is already available.
pub struct VecChunkSource {
    chunks: std::vec::IntoIter<Bytes>,
}

impl VecChunkSource {
    pub fn new(chunks: Vec<Bytes>) -> Self {
        Self {
            chunks: chunks.into_iter(),
        }
    }

    /// Convenience constructor that chunks a whole string into one piece.
    pub fn whole(document: impl Into<Bytes>) -> Self {
        Self::new(vec![document.into()])
    }
}

impl ChunkSource for VecChunkSource {
    async fn next_chunk(&mut self) -> std::io::Result<Option<Bytes>> {
        Ok(self.chunks.next())
    }
}

/// Adapts a [`ChunkSource`] into a pull-based character stream.
pub struct CharStream<S> {
    source: S,
    buffer: Bytes,
    read: usize,
    pos: Position,
    /// Set once the underlying source has yielded its last chunk.
    exhausted: bool,
}

impl<S: ChunkSource> CharStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: Bytes::new(),
            read: 0,
            pos: Position::START,
            exhausted: false,
        }
    }

    /// Current byte/line/column position, for error spans.
    pub fn position(&self) -> Position {
        self.pos
    }

    fn remaining(&self) -> &[u8] {
        &self.buffer[self.read..]
    }

    async fn fill(&mut self) -> std::io::Result<()> {
        if self.exhausted {
            return Ok(());
        }
        // Release the consumed prefix before growing the buffer again.
        self.buffer = self.buffer.slice(self.read..);
        self.read = 0;
        match self.source.next_chunk().await? {
            Some(chunk) => {
                if self.buffer.is_empty() {
                    self.buffer = chunk;
                } else {
                    let mut joined = Vec::with_capacity(self.buffer.len() + chunk.len());
                    joined.extend_from_slice(&self.buffer);
                    joined.extend_from_slice(&chunk);
                    self.buffer = Bytes::from(joined);
                }
            }
            None => self.exhausted = true,
        }
        Ok(())
    }

    /// Returns the next character, or `None` at end of stream.
    ///
    /// Multiple calls after end of stream keep returning `None`
    /// idempotently; they never panic or re-suspend on I/O.
    pub async fn next_char(&mut self) -> std::io::Result<Option<char>> {
        loop {
            if let Ok(s) = std::str::from_utf8(self.remaining()) {
                if let Some(c) = s.chars().next() {
                    self.read += c.len_utf8();
                    self.pos = self.pos.advance(c);
                    return Ok(Some(c));
                }
            } else {
                // A multi-byte codepoint may be split across the chunk
                // boundary; fetching more bytes before decoding resolves
                // all but a genuinely invalid encoding, which surfaces as
                // the io error from `from_utf8` once no more chunks remain.
                if self.exhausted {
                    std::str::from_utf8(self.remaining())
                        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                }
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fill().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_chars_across_chunk_boundaries() {
        let mut stream = CharStream::new(VecChunkSource::new(vec![
            Bytes::from_static("héllo, ".as_bytes()),
            Bytes::from_static("wörld".as_bytes()),
        ]));
        let mut out = String::new();
        while let Some(c) = stream.next_char().await.unwrap() {
            out.push(c);
        }
        assert_eq!(out, "héllo, wörld");
    }

    #[tokio::test]
    async fn end_of_stream_is_idempotent() {
        let mut stream = CharStream::new(VecChunkSource::whole("a"));
        assert_eq!(stream.next_char().await.unwrap(), Some('a'));
        assert_eq!(stream.next_char().await.unwrap(), None);
        assert_eq!(stream.next_char().await.unwrap(), None);
    }

    #[tokio::test]
    async fn tracks_line_and_column() {
        let mut stream = CharStream::new(VecChunkSource::whole("ab\ncd"));
        for _ in 0..3 {
            stream.next_char().await.unwrap();
        }
        let pos = stream.position();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }
}
