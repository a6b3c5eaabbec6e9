//! Tokenizer configuration

/// Bytes requested from the source per refill
pub const DEFAULT_READ_INCREMENT: usize = 4 << 10;

/// Ceiling on how far the buffer may grow to hold one token
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 1000 << 10;

/// Attribute slots reserved up front
pub const DEFAULT_ATTR_CAPACITY: usize = 16;

/// Tokenizer options
///
/// A zero in any field selects that field's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Chunk size fetched from the source on every refill
    pub read_increment: usize,
    /// Hard ceiling on the buffer, and so on the size of a single token
    pub max_buffer_size: usize,
    /// Initial capacity of the attribute table
    pub attr_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            read_increment: DEFAULT_READ_INCREMENT,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            attr_capacity: DEFAULT_ATTR_CAPACITY,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_increment(mut self, size: usize) -> Self {
        self.read_increment = size;
        self
    }

    pub fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    pub fn with_attr_capacity(mut self, capacity: usize) -> Self {
        self.attr_capacity = capacity;
        self
    }

    /// Replace zeros with defaults and raise the ceiling to at least one
    /// read increment.
    pub(crate) fn normalized(self) -> Self {
        let or_default = |value: usize, default: usize| if value == 0 { default } else { value };
        let read_increment = or_default(self.read_increment, DEFAULT_READ_INCREMENT);
        let max_buffer_size =
            or_default(self.max_buffer_size, DEFAULT_MAX_BUFFER_SIZE).max(read_increment);
        Options {
            read_increment,
            max_buffer_size,
            attr_capacity: or_default(self.attr_capacity, DEFAULT_ATTR_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_default() {
        let opts = Options {
            read_increment: 0,
            max_buffer_size: 0,
            attr_capacity: 0,
        }
        .normalized();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn test_ceiling_raised_to_read_increment() {
        let opts = Options::new()
            .with_read_increment(8192)
            .with_max_buffer_size(100)
            .normalized();
        assert_eq!(opts.max_buffer_size, 8192);
    }

    #[test]
    fn test_builder() {
        let opts = Options::new().with_read_increment(1).with_attr_capacity(4);
        assert_eq!(opts.read_increment, 1);
        assert_eq!(opts.attr_capacity, 4);
        assert_eq!(opts.max_buffer_size, DEFAULT_MAX_BUFFER_SIZE);
    }
}
