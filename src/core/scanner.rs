//! Token boundary scanning using memchr
//!
//! Pure functions over the live buffer. They never read from the source;
//! when a construct runs past the end of the bytes they were given they
//! report it and the tokenizer refills and calls again.

use memchr::{memchr, memchr_iter, memmem};

/// Limit on `<!...>` constructs nested inside a DOCTYPE internal subset
pub const MAX_NESTING_DEPTH: usize = 64;

pub const CDATA_PREFIX: &[u8] = b"<![CDATA[";
pub const CDATA_SUFFIX: &[u8] = b"]]>";

/// Result of searching for the end of a construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEnd {
    /// Index just past the terminating `>`
    Found(usize),
    /// The buffer ends before the terminator
    Incomplete,
    /// Nested declarations went past [`MAX_NESTING_DEPTH`]
    TooDeep,
}

/// Find the end of the construct whose `<` is at `pivot`.
///
/// * `<?...?>` ends at `?>`
/// * `<!--...-->` ends at `-->`
/// * other `<!...>` resolve nested `<...>` first and skip quoted `>`
/// * ordinary tags skip `>` inside double-quoted values
pub fn find_token_end(buf: &[u8], pivot: usize) -> TokenEnd {
    find_token_end_nested(buf, pivot, 0)
}

fn find_token_end_nested(buf: &[u8], pivot: usize, depth: usize) -> TokenEnd {
    if depth > MAX_NESTING_DEPTH {
        return TokenEnd::TooDeep;
    }

    let mut left = pivot + 1;
    loop {
        let Some(p) = buf.get(left..).and_then(|rest| memchr(b'>', rest)) else {
            return TokenEnd::Incomplete;
        };
        let right = left + p + 1;

        match buf[pivot + 1] {
            b'?' => {
                if right >= pivot + 3 && buf[right - 2] == b'?' {
                    return TokenEnd::Found(right);
                }
                // Not the closing ?>
                left = right;
                continue;
            }
            b'!' if buf[pivot + 2..].starts_with(b"--") => {
                if right >= pivot + 6 && &buf[right - 3..right - 1] == b"--" {
                    return TokenEnd::Found(right);
                }
                // Not the closing -->
                left = right;
                continue;
            }
            b'!' => {
                // DOCTYPE, ENTITY and friends: a nested construct owns any
                // `>` up to its own end.
                let inner = buf.get(left + 1..right - 1).unwrap_or_default();
                if let Some(p) = memchr(b'<', inner) {
                    match find_token_end_nested(buf, left + 1 + p, depth + 1) {
                        TokenEnd::Found(end) => {
                            left = end;
                            continue;
                        }
                        other => return other,
                    }
                }
            }
            _ => {}
        }

        if memchr_iter(b'"', &buf[left..right]).count() % 2 == 0 {
            return TokenEnd::Found(right);
        }

        // This `>` sits inside a quoted value, skip to the closing quote
        match memchr(b'"', &buf[right..]) {
            Some(p) => left = right + p + 1,
            None => return TokenEnd::Incomplete,
        }
    }
}

/// Result of scanning character data that follows a start tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharData {
    /// Text ends right before the `<` at this index
    End(usize),
    /// A CDATA section closed; keep scanning from this index
    Section(usize),
    /// Bytes ran out. Rescan from `resume` after a refill; `in_cdata` is
    /// set when `resume` is the `<` of a (possibly) unfinished CDATA section.
    Incomplete { resume: usize, in_cdata: bool },
}

/// Scan text starting at `from` up to the next markup.
pub fn scan_char_data(buf: &[u8], from: usize) -> CharData {
    let Some(p) = buf.get(from..).and_then(|rest| memchr(b'<', rest)) else {
        return CharData::Incomplete {
            resume: buf.len(),
            in_cdata: false,
        };
    };
    let lt = from + p;
    let rest = &buf[lt..];

    let n = rest.len().min(CDATA_PREFIX.len());
    if rest[..n] != CDATA_PREFIX[..n] {
        return CharData::End(lt);
    }
    if n < CDATA_PREFIX.len() {
        return CharData::Incomplete {
            resume: lt,
            in_cdata: true,
        };
    }

    match memmem::find(&rest[CDATA_PREFIX.len()..], CDATA_SUFFIX) {
        Some(k) => CharData::Section(lt + CDATA_PREFIX.len() + k + CDATA_SUFFIX.len()),
        None => CharData::Incomplete {
            resume: lt,
            in_cdata: true,
        },
    }
}

/// Strip leading whitespace: space, tab, `\n` and `\r\n`
pub fn trim_start(b: &[u8]) -> &[u8] {
    let mut start = 0;
    while start < b.len() {
        match b[start] {
            b' ' | b'\t' | b'\n' => start += 1,
            b'\r' if b.get(start + 1) == Some(&b'\n') => start += 2,
            _ => break,
        }
    }
    &b[start..]
}

/// Strip trailing whitespace: space, tab, `\n` and `\r\n`
pub fn trim_end(b: &[u8]) -> &[u8] {
    let mut end = b.len();
    while end > 0 {
        match b[end - 1] {
            b' ' | b'\t' => end -= 1,
            b'\n' => {
                end -= 1;
                if end > 0 && b[end - 1] == b'\r' {
                    end -= 1;
                }
            }
            _ => break,
        }
    }
    &b[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_of(input: &str) -> TokenEnd {
        find_token_end(input.as_bytes(), 0)
    }

    #[test]
    fn test_plain_tag() {
        assert_eq!(end_of("<a>text"), TokenEnd::Found(3));
        assert_eq!(end_of("<a/>"), TokenEnd::Found(4));
        assert_eq!(end_of("</a>"), TokenEnd::Found(4));
    }

    #[test]
    fn test_quoted_right_angle_in_attribute() {
        let input = r#"<sample path="foo>bar>baz">"#;
        assert_eq!(end_of(input), TokenEnd::Found(input.len()));
    }

    #[test]
    fn test_processing_instruction() {
        assert_eq!(end_of("<?sample <foo> ?>"), TokenEnd::Found(17));
        assert_eq!(end_of(r#"<?sample " ?>"#), TokenEnd::Found(13));
    }

    #[test]
    fn test_comment_terminators() {
        assert_eq!(end_of("<!-->--><!-- x -->"), TokenEnd::Found(8));
        assert_eq!(end_of("<!--<--><!-- x -->"), TokenEnd::Found(8));
        assert_eq!(end_of("<!-- a > b"), TokenEnd::Incomplete);
    }

    #[test]
    fn test_doctype_nested_constructs() {
        let input = "<!DOCTYPE [ <!-- <foo> --> ] >";
        assert_eq!(end_of(input), TokenEnd::Found(input.len()));
        let input = "<!DOCTYPE [ <!-- \" --> ] >";
        assert_eq!(end_of(input), TokenEnd::Found(input.len()));
        let input = r#"<!DOCTYPE ">" >"#;
        assert_eq!(end_of(input), TokenEnd::Found(input.len()));
    }

    #[test]
    fn test_doctype_entity_subset() {
        let input = "<!DOCTYPE note [\n  <!ENTITY nbsp \"&#xA0;\">\n  <!ENTITY w \"W.\">\n]>";
        assert_eq!(end_of(input), TokenEnd::Found(input.len()));
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(end_of("<"), TokenEnd::Incomplete);
        assert_eq!(end_of("<a x=\"1>"), TokenEnd::Incomplete);
        assert_eq!(end_of("<?pi >"), TokenEnd::Incomplete);
    }

    #[test]
    fn test_nesting_bounded() {
        let mut input = String::new();
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.push_str("<!X ");
        }
        input.push('>');
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.push_str(" >");
        }
        assert_eq!(end_of(&input), TokenEnd::TooDeep);
    }

    #[test]
    fn test_char_data_plain() {
        assert_eq!(scan_char_data(b"<a>text</a>", 3), CharData::End(7));
        assert_eq!(
            scan_char_data(b"<a>te", 3),
            CharData::Incomplete {
                resume: 5,
                in_cdata: false
            }
        );
    }

    #[test]
    fn test_char_data_cdata() {
        let input = b"<a><![CDATA[x<y]]></a>";
        assert_eq!(scan_char_data(input, 3), CharData::Section(18));
        assert_eq!(scan_char_data(input, 18), CharData::End(18));
        assert_eq!(
            scan_char_data(b"<a><![CD", 3),
            CharData::Incomplete {
                resume: 3,
                in_cdata: true
            }
        );
        assert_eq!(
            scan_char_data(b"<a><![CDATA[x]]", 3),
            CharData::Incomplete {
                resume: 3,
                in_cdata: true
            }
        );
    }

    #[test]
    fn test_trim() {
        let trim = |b: &'static [u8]| trim_end(trim_start(b));
        assert_eq!(trim(b" \t\r\nabc \r\n"), b"abc");
        assert_eq!(trim(b"\rabc\r"), b"\rabc\r");
        assert_eq!(trim(b"x \r\n \n"), b"x");
        assert_eq!(trim(b"   "), b"");
    }
}
