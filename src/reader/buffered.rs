//! Growable read buffer
//!
//! Holds the unconsumed tail of the stream plus freshly read bytes.
//! The live region grows by one read increment per refill, up to a hard
//! ceiling, and is compacted toward offset 0 when a token needs more
//! lookahead than the bytes after it.

use crate::error::Error;
use crate::options::DEFAULT_READ_INCREMENT;
use std::io::{self, Read};

/// Byte buffer refilled from a [`Read`] source
pub struct GrowableBuffer<R> {
    reader: R,
    /// Allocated region, always initialized. Only `..end` is live.
    buffer: Vec<u8>,
    /// Bytes before the cursor have been scanned
    cursor: usize,
    end: usize,
    eof: bool,
    read_increment: usize,
    max_size: usize,
    bytes_read: u64,
}

impl<R: Read> GrowableBuffer<R> {
    /// Create a buffer reading `read_increment` bytes at a time and never
    /// holding more than `max_size` live bytes.
    pub fn new(reader: R, read_increment: usize, max_size: usize) -> Self {
        GrowableBuffer {
            reader,
            buffer: vec![0u8; initial_len(read_increment)],
            cursor: 0,
            end: 0,
            eof: false,
            read_increment,
            max_size,
            bytes_read: 0,
        }
    }

    /// Rebind to a new source, keeping the allocation when it is big enough
    pub fn reset(&mut self, reader: R, read_increment: usize, max_size: usize) {
        self.reader = reader;
        self.cursor = 0;
        self.end = 0;
        self.eof = false;
        self.read_increment = read_increment;
        self.max_size = max_size;
        self.bytes_read = 0;

        let wanted = initial_len(read_increment);
        if self.buffer.len() < wanted {
            self.buffer = vec![0u8; wanted];
        }
    }

    /// Append at least one byte from the source.
    ///
    /// The live region grows by one read increment. When that does not fit
    /// the allocation, the allocation grows (at least doubling, plus one
    /// increment of headroom for later compactions). Fails with
    /// [`Error::BufferLimitExceeded`] once the live region would pass the
    /// ceiling, and with [`Error::Eof`] when the source is exhausted.
    pub fn refill(&mut self) -> Result<usize, Error> {
        if self.eof {
            return Err(Error::Eof);
        }

        let want = self.end + self.read_increment;
        if want > self.max_size {
            return Err(Error::BufferLimitExceeded {
                offset: self.bytes_read,
                requested: want,
                limit: self.max_size,
            });
        }

        if want > self.buffer.len() {
            let grown = (want + self.read_increment)
                .max(self.buffer.len() * 2)
                .min(self.max_size + self.read_increment);
            log::debug!(
                target: "xmltokenizer",
                "growing buffer from {} to {} bytes",
                self.buffer.len(),
                grown
            );
            self.buffer.resize(grown, 0);
        }

        loop {
            match self.reader.read(&mut self.buffer[self.end..want]) {
                Ok(0) => {
                    self.eof = true;
                    return Err(Error::Eof);
                }
                Ok(n) => {
                    self.end += n;
                    self.bytes_read += n as u64;
                    log::trace!(target: "xmltokenizer", "read {} bytes, {} live", n, self.end);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::read(self.bytes_read, e)),
            }
        }
    }

    /// Move the live bytes from `pivot` to the front of the buffer.
    ///
    /// Returns the shift applied, which callers subtract from any index
    /// they hold. The cursor is rebased the same way.
    pub fn compact(&mut self, pivot: usize) -> usize {
        let pivot = pivot.min(self.end);
        if pivot == 0 {
            return 0;
        }
        self.buffer.copy_within(pivot..self.end, 0);
        self.end -= pivot;
        self.cursor = self.cursor.saturating_sub(pivot);
        log::trace!(target: "xmltokenizer", "compacted {} bytes, {} live", pivot, self.end);
        pivot
    }

    /// Live bytes, from offset 0 to the end of what has been read
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.end);
    }

    /// Live bytes after the cursor
    #[inline]
    pub fn unscanned(&self) -> &[u8] {
        &self.buffer[self.cursor..self.end]
    }

    /// Whether the source has reported end of stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Total bytes pulled from the source since construction or reset
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Allocated size, live or not
    #[inline]
    pub fn allocated(&self) -> usize {
        self.buffer.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// One increment plus room for the tail left behind by a compaction
fn initial_len(read_increment: usize) -> usize {
    read_increment + DEFAULT_READ_INCREMENT
}
