//! Tokenizer errors
//!
//! Every variant except [`Error::Eof`] is sticky: once a tokenizer reports
//! it, all later calls return a clone of the same value.

use std::io;
use std::sync::Arc;

/// Error returned by [`Tokenizer`](crate::Tokenizer) operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The stream ended cleanly between tokens
    #[error("end of stream")]
    Eof,

    /// The stream ended inside an open tag, comment, PI or DOCTYPE
    #[error("byte pos {offset}: unexpected end of stream")]
    UnexpectedEof { offset: u64 },

    /// A single token needs more lookahead than the buffer may grow to
    #[error("byte pos {offset}: could not grow buffer to {requested}, max limit is set to {limit}")]
    BufferLimitExceeded {
        offset: u64,
        requested: usize,
        limit: usize,
    },

    /// The underlying source failed
    #[error("byte pos {offset}: read failed: {source}")]
    Read {
        offset: u64,
        #[source]
        source: Arc<io::Error>,
    },

    /// `<!...>` constructs nested deeper than the scanner follows
    #[error("byte pos {offset}: declarations nested deeper than {depth} levels")]
    NestingTooDeep { offset: u64, depth: usize },
}

impl Error {
    /// True for a clean end of stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }

    /// Byte count read from the source when the error occurred
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::Eof => None,
            Error::UnexpectedEof { offset }
            | Error::BufferLimitExceeded { offset, .. }
            | Error::Read { offset, .. }
            | Error::NestingTooDeep { offset, .. } => Some(*offset),
        }
    }

    pub(crate) fn read(offset: u64, source: io::Error) -> Self {
        Error::Read {
            offset,
            source: Arc::new(source),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Eof, Error::Eof) => true,
            (Error::UnexpectedEof { offset: a }, Error::UnexpectedEof { offset: b }) => a == b,
            (
                Error::BufferLimitExceeded {
                    offset: a,
                    requested: ra,
                    limit: la,
                },
                Error::BufferLimitExceeded {
                    offset: b,
                    requested: rb,
                    limit: lb,
                },
            ) => a == b && ra == rb && la == lb,
            (Error::Read { offset: a, source: sa }, Error::Read { offset: b, source: sb }) => {
                a == b && sa.kind() == sb.kind()
            }
            (
                Error::NestingTooDeep { offset: a, depth: da },
                Error::NestingTooDeep { offset: b, depth: db },
            ) => a == b && da == db,
            _ => false,
        }
    }
}
