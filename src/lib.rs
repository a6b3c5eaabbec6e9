//! xmltokenizer - streaming, low-allocation XML tokenizer
//!
//! Turns any [`std::io::Read`] source into raw tag/text tokens without
//! building a tree or validating structure. Meant as the layer under
//! format-specific unmarshalers that walk a document one token at a time.
//!
//! Two entry points share one buffer:
//! - [`Tokenizer::next_raw_token`]: the undecomposed bytes of one construct
//! - [`Tokenizer::next_token`]: the same construct split into name,
//!   attributes and data
//!
//! Returned views borrow the tokenizer and are invalidated by the next
//! call. [`OwnedToken::copy_from`] and [`TokenPool`] keep a token around.
//!
//! ```
//! use xmltokenizer::{Error, Tokenizer};
//!
//! let mut tok = Tokenizer::new(&b"<a x=\"1\">hi</a>"[..]);
//!
//! let start = tok.next_token().unwrap();
//! assert_eq!(start.name().local, b"a");
//! assert_eq!(start.attrs().find(b"x").unwrap().value, b"1");
//! assert_eq!(start.data(), b"hi");
//!
//! assert!(tok.next_token().unwrap().is_end_element());
//! assert!(matches!(tok.next_token(), Err(Error::Eof)));
//! ```

mod core;
mod error;
mod options;
mod pool;
pub mod reader;
mod tokenizer;

pub use crate::core::position::{Position, PositionTracker};
pub use crate::core::scanner::MAX_NESTING_DEPTH;
pub use crate::core::token::{Attr, AttrIter, Attrs, Name, OwnedToken, Token};
pub use error::Error;
pub use options::{Options, DEFAULT_ATTR_CAPACITY, DEFAULT_MAX_BUFFER_SIZE, DEFAULT_READ_INCREMENT};
pub use pool::TokenPool;
pub use tokenizer::Tokenizer;
