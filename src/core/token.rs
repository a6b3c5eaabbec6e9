//! Token model
//!
//! A [`Token`] is a set of byte ranges over one raw span. The live token
//! returned by the tokenizer borrows the tokenizer's buffer; an
//! [`OwnedToken`] carries its own copy of the span and survives later calls.

use super::position::Position;
use std::fmt;

/// Half-open byte range into a raw token span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        ByteRange { start, end }
    }

    #[inline]
    pub fn of<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        &raw[self.start..self.end]
    }
}

/// Name location: the full range plus the first colon, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NameSpan {
    pub full: ByteRange,
    pub colon: Option<usize>,
}

impl NameSpan {
    pub fn new(raw: &[u8], full: ByteRange) -> Self {
        NameSpan {
            full,
            colon: memchr::memchr(b':', full.of(raw)).map(|c| full.start + c),
        }
    }

    pub fn resolve<'a>(&self, raw: &'a [u8]) -> Name<'a> {
        let full = self.full.of(raw);
        match self.colon {
            Some(colon) => Name {
                prefix: &raw[self.full.start..colon],
                local: &raw[colon + 1..self.full.end],
                full,
            },
            None => Name {
                prefix: &[],
                local: full,
                full,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AttrSpan {
    pub name: NameSpan,
    pub value: ByteRange,
}

/// Everything about a token except its bytes and attribute table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TokenLayout {
    pub name: NameSpan,
    pub data: ByteRange,
    pub self_closing: bool,
    pub is_end_element: bool,
    pub begin: Position,
    pub end: Position,
}

/// Element or attribute name, split syntactically on the first `:`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Name<'a> {
    /// Bytes before the first colon, empty when there is none
    pub prefix: &'a [u8],
    /// Bytes after the first colon, or the whole name
    pub local: &'a [u8],
    /// The name as written
    pub full: &'a [u8],
}

impl<'a> Name<'a> {
    /// Split `full` on its first colon
    pub fn split(full: &'a [u8]) -> Self {
        match memchr::memchr(b':', full) {
            Some(colon) => Name {
                prefix: &full[..colon],
                local: &full[colon + 1..],
                full,
            },
            None => Name {
                prefix: &[],
                local: full,
                full,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    pub fn full_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.full).ok()
    }

    pub fn local_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.local).ok()
    }

    pub fn prefix_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.prefix).ok()
    }
}

/// A single attribute, value exactly as written between the quotes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attr<'a> {
    pub name: Name<'a>,
    pub value: &'a [u8],
}

impl<'a> Attr<'a> {
    pub fn value_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.value).ok()
    }
}

/// Attribute list of a token, in document order
#[derive(Clone, Copy)]
pub struct Attrs<'a> {
    raw: &'a [u8],
    spans: &'a [AttrSpan],
}

impl<'a> Attrs<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Attr<'a>> {
        self.spans.get(index).map(|span| resolve_attr(self.raw, span))
    }

    /// First attribute whose full name matches
    pub fn find(&self, full_name: &[u8]) -> Option<Attr<'a>> {
        self.iter().find(|attr| attr.name.full == full_name)
    }

    pub fn iter(&self) -> AttrIter<'a> {
        AttrIter {
            raw: self.raw,
            spans: self.spans.iter(),
        }
    }
}

impl<'a> IntoIterator for Attrs<'a> {
    type Item = Attr<'a>;
    type IntoIter = AttrIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Attrs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for Attrs<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

pub struct AttrIter<'a> {
    raw: &'a [u8],
    spans: std::slice::Iter<'a, AttrSpan>,
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = Attr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.spans.next().map(|span| resolve_attr(self.raw, span))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for AttrIter<'_> {}

#[inline]
fn resolve_attr<'a>(raw: &'a [u8], span: &AttrSpan) -> Attr<'a> {
    Attr {
        name: span.name.resolve(raw),
        value: span.value.of(raw),
    }
}

/// A decomposed token.
///
/// Tokens handed out by [`Tokenizer::next_token`](crate::Tokenizer::next_token)
/// borrow the tokenizer and are gone on the next call. Use
/// [`OwnedToken::copy_from`] to keep one.
///
/// Shapes:
/// - start tag: name set, maybe attributes
/// - self-closing tag (`<a/>`): [`is_self_closing`](Self::is_self_closing)
/// - end tag (`</a>`): [`is_end_element`](Self::is_end_element), no attributes, no data
/// - leaf element (`<a>text</a>`): name set and [`data`](Self::data) holds the
///   trimmed text or the CDATA payload; the end tag is the next token
/// - `<?...?>` and `<!...>`: empty name, data is the whole construct,
///   self-closing
#[derive(Clone, Copy)]
pub struct Token<'a> {
    raw: &'a [u8],
    attrs: &'a [AttrSpan],
    layout: TokenLayout,
}

impl<'a> Token<'a> {
    pub(crate) fn new(raw: &'a [u8], attrs: &'a [AttrSpan], layout: TokenLayout) -> Self {
        Token { raw, attrs, layout }
    }

    #[inline]
    pub fn name(&self) -> Name<'a> {
        self.layout.name.resolve(self.raw)
    }

    #[inline]
    pub fn attrs(&self) -> Attrs<'a> {
        Attrs {
            raw: self.raw,
            spans: self.attrs,
        }
    }

    /// Leaf text, CDATA payload, or the raw bytes of a non-tag construct
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.layout.data.of(self.raw)
    }

    pub fn data_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.data()).ok()
    }

    /// The trimmed raw span this token was decomposed from
    #[inline]
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    #[inline]
    pub fn is_self_closing(&self) -> bool {
        self.layout.self_closing
    }

    #[inline]
    pub fn is_end_element(&self) -> bool {
        self.layout.is_end_element
    }

    /// `<?...?>`, `<!--...-->`, `<!DOCTYPE ...>` and the like
    #[inline]
    pub fn is_non_tag(&self) -> bool {
        self.raw.starts_with(b"<?") || self.raw.starts_with(b"<!")
    }

    /// Position of the token's first byte
    #[inline]
    pub fn begin(&self) -> Position {
        self.layout.begin
    }

    /// Position just past the token's last byte
    #[inline]
    pub fn end(&self) -> Position {
        self.layout.end
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &String::from_utf8_lossy(self.name().full))
            .field("attrs", &self.attrs())
            .field("data", &String::from_utf8_lossy(self.data()))
            .field("self_closing", &self.is_self_closing())
            .field("is_end_element", &self.is_end_element())
            .field("begin", &self.begin())
            .field("end", &self.end())
            .finish()
    }
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.attrs() == other.attrs()
            && self.data() == other.data()
            && self.layout.self_closing == other.layout.self_closing
            && self.layout.is_end_element == other.layout.is_end_element
            && self.layout.begin == other.layout.begin
            && self.layout.end == other.layout.end
    }
}

/// A token detached from the tokenizer's buffer.
///
/// Holds one copy of the raw span and the range table over it, so copying
/// in a new token reuses both allocations.
#[derive(Debug, Clone, Default)]
pub struct OwnedToken {
    raw: Vec<u8>,
    attrs: Vec<AttrSpan>,
    layout: TokenLayout,
}

impl OwnedToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy `token` into `self`, replacing whatever was there
    pub fn copy_from(&mut self, token: &Token<'_>) -> &mut Self {
        self.raw.clear();
        self.raw.extend_from_slice(token.raw);
        self.attrs.clear();
        self.attrs.extend_from_slice(token.attrs);
        self.layout = token.layout;
        self
    }

    /// Borrow as a regular token
    pub fn as_token(&self) -> Token<'_> {
        Token::new(&self.raw, &self.attrs, self.layout)
    }

    /// Drop the contents, keeping capacity
    pub fn clear(&mut self) {
        self.raw.clear();
        self.attrs.clear();
        self.layout = TokenLayout::default();
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn name(&self) -> Name<'_> {
        self.as_token().name()
    }

    pub fn attrs(&self) -> Attrs<'_> {
        self.as_token().attrs()
    }

    pub fn data(&self) -> &[u8] {
        self.as_token().data()
    }

    pub fn is_self_closing(&self) -> bool {
        self.layout.self_closing
    }

    pub fn is_end_element(&self) -> bool {
        self.layout.is_end_element
    }

    pub fn begin(&self) -> Position {
        self.layout.begin
    }

    pub fn end(&self) -> Position {
        self.layout.end
    }
}

impl From<&Token<'_>> for OwnedToken {
    fn from(token: &Token<'_>) -> Self {
        let mut owned = OwnedToken::new();
        owned.copy_from(token);
        owned
    }
}
