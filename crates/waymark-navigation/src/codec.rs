//! Percent-encoding helpers shared by template matching and route building.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters that cannot appear raw inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Query keys and values additionally escape the pair separators.
const QUERY: &AsciiSet = &SEGMENT.add(b'&').add(b'=').add(b'+');

pub(crate) fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

pub(crate) fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY).to_string()
}

pub(crate) fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Form-style decoding: `+` is a space, then percent escapes.
pub(crate) fn decode_query(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Splits `a=1&b=2` into decoded pairs. Later duplicates win at the caller.
pub(crate) fn parse_query(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query.split('&').filter(|pair| !pair.is_empty()).map(|pair| {
        // Only the first '=' separates; values may contain more.
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (decode_query(k), decode_query(v))
    })
}

/// `scheme://rest` → `(Some(scheme), rest)`. A `://` that follows non-scheme
/// characters (e.g. inside an unencoded query value) is not a scheme.
pub(crate) fn split_scheme(s: &str) -> (Option<&str>, &str) {
    if let Some(idx) = s.find("://") {
        let scheme = &s[..idx];
        let valid = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            return (Some(scheme), &s[idx + 3..]);
        }
    }
    (None, s)
}

/// Path segments without the outer slashes. Interior empty segments are kept
/// so that `a//b` does not silently collapse into `a/b`.
pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_matches('/');
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}
