//! Matcher for block-reference directives.
//!
//! ```text
//! directive := "<!--" ws* "wp:block" ws+ "{" body "}" ws* ("/" ws*)? "-->"
//! body      := (no "}")* "\"ref\"" ws* ":" ws* digits (no "}")*
//! ```
//!
//! The element name and the `"ref"` key match ASCII case-insensitively, so
//! both `<!-- wp:block {"ref":1} /-->` and `<!--WP:BLOCK {"REF": 1}-->` are
//! directives. All tokens are ASCII, so byte offsets always fall on UTF-8
//! character boundaries.

use std::ops::Range;

const OPEN: &[u8] = b"<!--";
const CLOSE: &[u8] = b"-->";
const NAME: &[u8] = b"wp:block";
const REF_KEY: &[u8] = b"\"ref\"";

/// A block-reference directive located in markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDirective {
    /// Byte range of the whole directive, from `<!--` through `-->`
    pub span: Range<usize>,
    /// Byte range of the digits of the `ref` value
    pub ref_span: Range<usize>,
    /// The `ref` value, `None` when it does not fit in a u64
    pub ref_id: Option<u64>,
}

/// Find every block directive in `content`, in document order.
/// Directives never overlap.
pub fn find_block_directives(content: &str) -> Vec<BlockDirective> {
    let bytes = content.as_bytes();
    let mut directives = Vec::new();
    let mut pos = 0;

    while let Some(start) = find(bytes, pos, OPEN) {
        match match_directive(bytes, start) {
            Some(directive) => {
                pos = directive.span.end;
                directives.push(directive);
            }
            None => pos = start + OPEN.len(),
        }
    }

    directives
}

fn match_directive(bytes: &[u8], start: usize) -> Option<BlockDirective> {
    let mut i = skip_ws(bytes, start + OPEN.len(), bytes.len());
    if !starts_with_ignore_case(&bytes[i..], NAME) {
        return None;
    }
    i += NAME.len();

    let after_name = skip_ws(bytes, i, bytes.len());
    if after_name == i || bytes.get(after_name) != Some(&b'{') {
        return None;
    }

    let body_start = after_name + 1;
    let body_end = body_start + bytes[body_start..].iter().position(|&b| b == b'}')?;
    let ref_span = find_ref_value(bytes, body_start, body_end)?;

    i = skip_ws(bytes, body_end + 1, bytes.len());
    if bytes.get(i) == Some(&b'/') {
        i = skip_ws(bytes, i + 1, bytes.len());
    }
    if !bytes[i..].starts_with(CLOSE) {
        return None;
    }

    let ref_id = std::str::from_utf8(&bytes[ref_span.clone()])
        .ok()
        .and_then(|digits| digits.parse::<u64>().ok());

    Some(BlockDirective {
        span: start..i + CLOSE.len(),
        ref_span,
        ref_id,
    })
}

/// Locate the digits following the first `"ref"` key in `bytes[from..to]`
fn find_ref_value(bytes: &[u8], from: usize, to: usize) -> Option<Range<usize>> {
    let body = &bytes[..to];
    let mut k = from;

    while k + REF_KEY.len() <= to {
        if starts_with_ignore_case(&body[k..], REF_KEY) {
            let mut j = skip_ws(body, k + REF_KEY.len(), to);
            if body.get(j) == Some(&b':') {
                j = skip_ws(body, j + 1, to);
                let digits_start = j;
                while j < to && body[j].is_ascii_digit() {
                    j += 1;
                }
                if j > digits_start {
                    return Some(digits_start..j);
                }
            }
        }
        k += 1;
    }

    None
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn skip_ws(bytes: &[u8], mut i: usize, limit: usize) -> usize {
    while i < limit && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
