//! Character reference decoding for label text and `href` values.
//!
//! Only a fixed table of named references is recognized. Anything else that looks like an
//! entity is kept verbatim, so labels such as `AT&T` or `a &foo; b` survive unchanged.

use std::borrow::Cow;

/// Named references understood in label text.
pub const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("times", '×'),
    ("plusmn", '±'),
    ("deg", '°'),
    ("mu", 'μ'),
];

// `&plusmn;` is the longest name in the table; numeric forms get a little more room.
const MAX_REFERENCE_LEN: usize = 12;

/// Decodes named and numeric character references in a single left-to-right pass.
///
/// The output of a reference is never re-scanned: `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_reference(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes one reference at the start of `tail` (which begins with `&`).
///
/// Returns the decoded character and the number of bytes consumed, including `&` and `;`.
fn decode_reference(tail: &str) -> Option<(char, usize)> {
    let body = tail.get(1..)?;
    let semi = body
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let name = &body[..semi];
    let consumed = semi + 2;

    if let Some(num) = name.strip_prefix('#') {
        return decode_numeric(num).map(|ch| (ch, consumed));
    }

    NAMED_ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, ch)| (*ch, consumed))
}

fn decode_numeric(num: &str) -> Option<char> {
    let code = match num.strip_prefix(['x', 'X']) {
        Some(hex) => {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            u32::from_str_radix(hex, 16).ok()?
        }
        None => {
            if num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            num.parse::<u32>().ok()?
        }
    };
    char::from_u32(code).filter(|c| *c != '\0')
}
