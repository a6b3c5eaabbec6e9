//! Line/column/offset tracking
//!
//! Positions are stamped on every token. Columns count UTF-8 characters,
//! offsets count bytes.

use memchr::memrchr;

/// A location in the input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    /// 0-based count of bytes consumed from the start of the stream
    pub offset: u64,
}

impl Position {
    /// Position of the first byte of a stream
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub const fn new(line: usize, column: usize, offset: u64) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Running position counter fed with every consumed byte
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    pos: Position,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `consumed` bytes.
    ///
    /// Only `\n` starts a new line. A `\r` directly before it bumps the
    /// column and is then discarded by the reset, so `\r\n` counts as a
    /// single break.
    pub fn advance(&mut self, consumed: &[u8]) {
        if consumed.is_empty() {
            return;
        }
        self.pos.offset += consumed.len() as u64;

        let tail = match memrchr(b'\n', consumed) {
            Some(last) => {
                self.pos.line += memchr::memchr_iter(b'\n', consumed).count();
                self.pos.column = 1;
                &consumed[last + 1..]
            }
            None => consumed,
        };
        self.pos.column += char_count(tail);
    }

    /// Current position, i.e. the position of the next unconsumed byte
    #[inline]
    pub fn snapshot(&self) -> Position {
        self.pos
    }

    pub fn reset(&mut self) {
        self.pos = Position::START;
    }
}

/// Count UTF-8 characters by skipping continuation bytes
#[inline]
fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count()
}
