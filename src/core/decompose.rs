//! Raw token decomposition
//!
//! Splits a raw span into name, attributes and trailing character data.

use super::attributes::{parse_attributes, trimmed_range};
use super::scanner::{CDATA_PREFIX, CDATA_SUFFIX};
use super::token::{AttrSpan, ByteRange, NameSpan, TokenLayout};

/// Decompose `raw` into a layout, filling `attrs` (cleared first).
///
/// Positions are left at their defaults for the caller to stamp.
pub(crate) fn decompose(raw: &[u8], attrs: &mut Vec<AttrSpan>) -> TokenLayout {
    attrs.clear();
    let mut layout = TokenLayout::default();

    if raw.starts_with(b"<?") || raw.starts_with(b"<!") {
        layout.data = ByteRange::new(0, raw.len());
        layout.self_closing = true;
        return layout;
    }
    if raw.is_empty() {
        return layout;
    }

    let mut at = 1;
    if raw.get(at) == Some(&b'/') {
        layout.is_end_element = true;
        at += 1;
    }

    at = consume_tag_name(raw, at, &mut layout);
    let (at, self_closing) = parse_attributes(raw, at, attrs);
    layout.self_closing = self_closing;
    layout.data = char_data(raw, at);
    layout
}

/// The name runs up to the first `>` or whitespace; a `/` right before
/// `>` belongs to the tag, not the name.
fn consume_tag_name(raw: &[u8], at: usize, layout: &mut TokenLayout) -> usize {
    let rest = &raw[at..];
    let mut pos = rest
        .iter()
        .position(|&b| matches!(b, b'>' | b' ' | b'\t' | b'\r' | b'\n'))
        .unwrap_or(rest.len());
    if rest.get(pos) == Some(&b'>') && pos > 0 && rest[pos - 1] == b'/' {
        pos -= 1;
    }

    layout.name = NameSpan::new(raw, trimmed_range(raw, at, at + pos));
    at + pos
}

/// Trimmed text after the tag, with CDATA markers removed
fn char_data(raw: &[u8], at: usize) -> ByteRange {
    let mut range = trimmed_range(raw, at, raw.len());
    if range.of(raw).starts_with(CDATA_PREFIX) {
        range.start += CDATA_PREFIX.len();
    }
    if range.of(raw).ends_with(CDATA_SUFFIX) {
        range.end -= CDATA_SUFFIX.len();
    }
    trimmed_range(raw, range.start, range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::Token;
    use pretty_assertions::assert_eq;

    fn check(raw: &[u8], f: impl FnOnce(Token<'_>)) {
        let mut attrs = Vec::new();
        let layout = decompose(raw, &mut attrs);
        f(Token::new(raw, &attrs, layout));
    }

    #[test]
    fn test_non_tag() {
        check(b"<?xml version=\"1.0\"?>", |t| {
            assert!(t.name().is_empty());
            assert_eq!(t.data(), b"<?xml version=\"1.0\"?>");
            assert!(t.is_self_closing());
            assert!(t.is_non_tag());
        });
        check(b"<!-- c -->", |t| {
            assert_eq!(t.data(), b"<!-- c -->");
            assert!(t.attrs().is_empty());
        });
    }

    #[test]
    fn test_start_tag() {
        check(b"<body xmlns:foo=\"ns1\" xmlns=\"ns2\" \r\n\t  >", |t| {
            assert_eq!(t.name().full, b"body");
            assert_eq!(t.attrs().len(), 2);
            assert_eq!(t.attrs().get(0).unwrap().name.prefix, b"xmlns");
            assert_eq!(t.attrs().get(1).unwrap().name.local, b"xmlns");
            assert!(!t.is_self_closing());
            assert!(t.data().is_empty());
        });
    }

    #[test]
    fn test_end_tag() {
        check(b"</tag:name>", |t| {
            assert!(t.is_end_element());
            assert_eq!(t.name().prefix, b"tag");
            assert_eq!(t.name().local, b"name");
            assert!(t.attrs().is_empty());
            assert!(t.data().is_empty());
        });
    }

    #[test]
    fn test_self_closing_without_space() {
        check(b"<inner/>", |t| {
            assert_eq!(t.name().full, b"inner");
            assert!(t.is_self_closing());
        });
        check(b"<goodbye />", |t| {
            assert_eq!(t.name().full, b"goodbye");
            assert!(t.is_self_closing());
        });
    }

    #[test]
    fn test_leaf_text() {
        check(b"<hello lang=\"en\">World &lt;&gt;", |t| {
            assert_eq!(t.name().full, b"hello");
            assert_eq!(t.attrs().find(b"lang").unwrap().value, b"en");
            assert_eq!(t.data_str(), Some("World &lt;&gt;"));
        });
    }

    #[test]
    fn test_leaf_cdata() {
        check(b"<tag:name>\n\t<![CDATA[Some text here.]]>", |t| {
            assert_eq!(t.name().prefix, b"tag");
            assert_eq!(t.data_str(), Some("Some text here."));
        });
        check(b"<data><![CDATA[ <element>text</element> ]]>", |t| {
            assert_eq!(t.data_str(), Some("<element>text</element>"));
        });
        check(b"<data><![CDATA[]]>", |t| {
            assert!(t.data().is_empty());
        });
    }

    #[test]
    fn test_malformed_does_not_panic() {
        let inputs: [&[u8]; 7] = [b"<", b"</", b"<a", b"<a x=", b"<a x=\"", b"< >", b"<>"];
        for raw in inputs {
            check(raw, |t| {
                let _ = (t.name(), t.attrs().len(), t.data());
            });
        }
    }
}
