//! Streaming XML tokenizer
//!
//! Pulls bytes from a [`Read`] source into a [`GrowableBuffer`] and hands
//! out one construct per call, either as raw bytes
//! ([`Tokenizer::next_raw_token`]) or decomposed ([`Tokenizer::next_token`]).
//! Both borrow the tokenizer, so a returned view is gone on the next call.

use crate::core::decompose::decompose;
use crate::core::position::{Position, PositionTracker};
use crate::core::scanner::{self, CharData, TokenEnd, MAX_NESTING_DEPTH};
use crate::core::token::{AttrSpan, ByteRange, Token};
use crate::error::Error;
use crate::options::Options;
use crate::reader::buffered::GrowableBuffer;
use memchr::memchr;
use std::io::Read;

/// XML tokenizer over a byte source
pub struct Tokenizer<R> {
    buffer: GrowableBuffer<R>,
    options: Options,
    tracker: PositionTracker,
    /// Buffer index up to which bytes have been fed to the tracker
    tracked: usize,
    /// Sticky error; end of stream is never stored here
    err: Option<Error>,
    /// Bytes of a construct left open by the last failed call
    partial: ByteRange,
    begin: Position,
    end: Position,
    attrs: Vec<AttrSpan>,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer with default options
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, Options::default())
    }

    pub fn with_options(reader: R, options: Options) -> Self {
        let options = options.normalized();
        Tokenizer {
            buffer: GrowableBuffer::new(reader, options.read_increment, options.max_buffer_size),
            options,
            tracker: PositionTracker::new(),
            tracked: 0,
            err: None,
            partial: ByteRange::default(),
            begin: Position::START,
            end: Position::START,
            attrs: Vec::with_capacity(options.attr_capacity),
        }
    }

    /// Rebind to a new source and options, keeping buffer and attribute
    /// capacity for reuse.
    pub fn reset(&mut self, reader: R, options: Options) {
        let options = options.normalized();
        self.buffer
            .reset(reader, options.read_increment, options.max_buffer_size);
        self.options = options;
        self.tracker.reset();
        self.tracked = 0;
        self.err = None;
        self.partial = ByteRange::default();
        self.begin = Position::START;
        self.end = Position::START;
        self.attrs.clear();
        self.attrs.reserve(options.attr_capacity);
    }

    /// Next token, decomposed into name, attributes and data.
    ///
    /// Returns [`Error::Eof`] once the stream is exhausted, repeatedly.
    /// Any other error is sticky.
    pub fn next_token(&mut self) -> Result<Token<'_>, Error> {
        let span = self.scan()?;
        let raw = span.of(self.buffer.data());
        let mut layout = decompose(raw, &mut self.attrs);
        layout.begin = self.begin;
        layout.end = self.end;
        Ok(Token::new(raw, &self.attrs, layout))
    }

    /// Next token as raw bytes: one tag, comment, PI or DOCTYPE, or a start
    /// tag together with the text (and CDATA sections) that follow it.
    ///
    /// On failure after a construct was opened, its bytes are available
    /// from [`partial`](Self::partial) until the next call.
    pub fn next_raw_token(&mut self) -> Result<&[u8], Error> {
        let span = self.scan()?;
        Ok(span.of(self.buffer.data()))
    }

    /// Bytes of the construct the last call failed inside, if any
    pub fn partial(&self) -> &[u8] {
        self.buffer.data().get(self.partial.start..self.partial.end).unwrap_or_default()
    }

    /// Begin and end positions of the last token returned
    pub fn positions(&self) -> (Position, Position) {
        (self.begin, self.end)
    }

    /// Total bytes read from the source
    pub fn bytes_read(&self) -> u64 {
        self.buffer.bytes_read()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn get_ref(&self) -> &R {
        self.buffer.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.buffer.into_inner()
    }

    /// Locate the next construct and return its (trimmed) range in the
    /// buffer, stamping begin/end positions.
    fn scan(&mut self) -> Result<ByteRange, Error> {
        self.partial = ByteRange::default();
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        // Opening '<'
        let mut pivot = loop {
            if let Some(p) = memchr(b'<', self.buffer.unscanned()) {
                break self.buffer.cursor() + p;
            }
            let end = self.buffer.len();
            self.compact(end);
            if let Err(err) = self.buffer.refill() {
                return Err(self.fail(err));
            }
        };

        // Closing '>'
        let close = loop {
            match scanner::find_token_end(self.buffer.data(), pivot) {
                TokenEnd::Found(close) => break close,
                TokenEnd::TooDeep => {
                    self.partial = ByteRange::new(pivot, self.buffer.len());
                    let err = Error::NestingTooDeep {
                        offset: self.buffer.bytes_read(),
                        depth: MAX_NESTING_DEPTH,
                    };
                    return Err(self.fail(err));
                }
                TokenEnd::Incomplete => {
                    pivot -= self.compact(pivot);
                    if let Err(err) = self.buffer.refill() {
                        self.partial = ByteRange::new(pivot, self.buffer.len());
                        let err = match err {
                            Error::Eof => Error::UnexpectedEof {
                                offset: self.buffer.bytes_read(),
                            },
                            other => other,
                        };
                        return Err(self.fail(err));
                    }
                }
            }
        };

        let is_tag = !matches!(self.buffer.data()[pivot + 1], b'?' | b'!');
        let (pivot, stop) = if is_tag {
            self.extend_char_data(pivot, close)
        } else {
            (pivot, close)
        };

        let end = if is_tag {
            pivot + scanner::trim_end(&self.buffer.data()[pivot..stop]).len()
        } else {
            stop
        };
        self.buffer.set_cursor(stop);

        self.track_to(pivot);
        self.begin = self.tracker.snapshot();
        self.track_to(end);
        self.end = self.tracker.snapshot();

        Ok(ByteRange::new(pivot, end))
    }

    /// Extend a start tag over the character data after it, stopping
    /// before the next markup that is not a CDATA section.
    ///
    /// Returns the (possibly rebased) pivot and the end of the text.
    fn extend_char_data(&mut self, mut pivot: usize, close: usize) -> (usize, usize) {
        let mut at = close;
        loop {
            match scanner::scan_char_data(self.buffer.data(), at) {
                CharData::End(stop) => return (pivot, stop),
                CharData::Section(next) => at = next,
                CharData::Incomplete { resume, in_cdata } => {
                    let shift = self.compact(pivot);
                    pivot -= shift;
                    let resume = resume - shift;
                    match self.buffer.refill() {
                        Ok(_) => at = resume,
                        Err(err) => {
                            // The token so far is still returned; the
                            // failure surfaces on the next call.
                            match err {
                                Error::Eof if in_cdata => {
                                    let offset = self.buffer.bytes_read();
                                    self.fail(Error::UnexpectedEof { offset });
                                }
                                Error::Eof => {}
                                other => {
                                    self.fail(other);
                                }
                            }
                            return (pivot, resume);
                        }
                    }
                }
            }
        }
    }

    /// Drop the bytes before `pivot`, accounting for them in the position
    /// tracker first. Returns the shift applied to buffer indices.
    fn compact(&mut self, pivot: usize) -> usize {
        self.track_to(pivot);
        let shift = self.buffer.compact(pivot);
        self.tracked -= shift;
        shift
    }

    fn track_to(&mut self, index: usize) {
        if index > self.tracked {
            self.tracker.advance(&self.buffer.data()[self.tracked..index]);
            self.tracked = index;
        }
    }

    /// Record `err` as sticky unless it is a clean end of stream
    fn fail(&mut self, err: Error) -> Error {
        if !err.is_eof() {
            log::debug!(target: "xmltokenizer", "tokenizer stopped: {}", err);
            self.err = Some(err.clone());
        }
        err
    }
}

impl<R> std::fmt::Debug for Tokenizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("options", &self.options)
            .field("position", &self.tracker.snapshot())
            .field("err", &self.err)
            .finish_non_exhaustive()
    }
}
