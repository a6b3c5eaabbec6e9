//! Attribute parsing
//!
//! Parses the attributes of a raw tag span into range tables. Values are
//! taken as written between double quotes; no entity decoding.

use super::scanner::{trim_end, trim_start};
use super::token::{AttrSpan, ByteRange, NameSpan};
use memchr::{memchr, memchr2};

/// Parse attributes from `raw[at..]`, the bytes after the element name.
///
/// Repeatedly finds the next `=` or `>`. A `>` ends the tag; `/>` marks it
/// self-closing. Otherwise the trimmed bytes before the `=` are the name
/// (possibly empty) and the value runs between the next two `"`.
///
/// Returns the index just past the tag's `>` and whether it was `/>`.
/// Malformed input (no `>` or an unterminated value) ends parsing at the
/// end of `raw`.
pub(crate) fn parse_attributes(raw: &[u8], mut at: usize, attrs: &mut Vec<AttrSpan>) -> (usize, bool) {
    loop {
        let Some(p) = raw.get(at..).and_then(|rest| memchr2(b'=', b'>', rest)) else {
            return (raw.len(), false);
        };
        let pos = at + p;

        if raw[pos] == b'>' {
            let self_closing = p > 0 && raw[pos - 1] == b'/';
            return (pos + 1, self_closing);
        }

        let name = trimmed_range(raw, at, pos);
        at = pos + 1;

        let Some(q) = memchr(b'"', &raw[at..]) else {
            return (raw.len(), false);
        };
        let open = at + q + 1;
        let Some(w) = memchr(b'"', &raw[open..]) else {
            return (raw.len(), false);
        };
        let close = open + w;

        attrs.push(AttrSpan {
            name: NameSpan::new(raw, name),
            value: ByteRange::new(open, close),
        });
        at = close + 1;
    }
}

/// Range of `raw[start..end]` with edge whitespace removed
pub(crate) fn trimmed_range(raw: &[u8], start: usize, end: usize) -> ByteRange {
    let slice = &raw[start..end];
    let lead = slice.len() - trim_start(slice).len();
    let kept = trim_end(&slice[lead..]).len();
    ByteRange::new(start + lead, start + lead + kept)
}
