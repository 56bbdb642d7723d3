//! Whitelist-driven tag scanner.
//!
//! Label markup is never handed to a general HTML parser. The scanner only recognizes the tags in
//! [`TagName::ALL`]; every other `<...>` is left in place and later treated as literal text.
//!
//! A tag runs from `<` to the first `>`. If another `<` shows up first, the candidate is not a tag.

use rustc_hash::FxHashMap;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
    A,
    B,
    I,
    Em,
    Sup,
    Sub,
    Span,
    Br,
}

impl TagName {
    pub const ALL: [TagName; 8] = [
        TagName::A,
        TagName::B,
        TagName::I,
        TagName::Em,
        TagName::Sup,
        TagName::Sub,
        TagName::Span,
        TagName::Br,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagName::A => "a",
            TagName::B => "b",
            TagName::I => "i",
            TagName::Em => "em",
            TagName::Sup => "sup",
            TagName::Sub => "sub",
            TagName::Span => "span",
            TagName::Br => "br",
        }
    }

    /// Case-insensitive lookup in the tag table.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// `br` is the only void tag; everything else looks for a closing tag.
    pub fn is_paired(self) -> bool {
        self != TagName::Br
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

/// One recognized `<name ...>` or `</name ...>` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: TagName,
    pub kind: TagKind,
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    /// Raw text between the tag name and `>`. Junk on closing tags lands here too and is ignored.
    pub attrs: &'a str,
}

/// Result of [`scan`]: a tag plus, for paired opening tags, the span of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'a> {
    pub tag: Tag<'a>,
    /// Content between the opening and closing tag. Empty for `br` and closing tags.
    pub inner: Range<usize>,
    /// Byte offset where scanning resumes after this match.
    pub end: usize,
}

/// Parses a recognized tag starting at the `<` at byte offset `lt`.
fn tag_at(input: &str, lt: usize) -> Option<Tag<'_>> {
    let after_lt = input.get(lt + 1..)?;
    let (kind, rest) = match after_lt.strip_prefix('/') {
        Some(rest) => (TagKind::Close, rest),
        None => (TagKind::Open, after_lt),
    };
    let name_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
    let name = TagName::parse(&rest[..name_len])?;
    let tail = &rest[name_len..];

    let next = tail.chars().next()?;
    let terminated = next.is_whitespace()
        || next == '>'
        || (next == '/' && name == TagName::Br && kind == TagKind::Open);
    if !terminated {
        return None;
    }

    let delim = tail.find(['<', '>'])?;
    if !tail[delim..].starts_with('>') {
        return None;
    }

    let tail_offset = input.len() - tail.len();
    Some(Tag {
        name,
        kind,
        start: lt,
        end: tail_offset + delim + 1,
        attrs: &tail[..delim],
    })
}

/// Finds the next recognized tag (opening or closing) at or after `from`.
pub fn next_tag(input: &str, from: usize) -> Option<Tag<'_>> {
    let mut pos = from;
    while let Some(rel) = input.get(pos..)?.find('<') {
        let lt = pos + rel;
        if let Some(tag) = tag_at(input, lt) {
            return Some(tag);
        }
        pos = lt + 1;
    }
    None
}

/// Finds the nearest `</name ...>` at or after `from`.
pub fn find_close(input: &str, name: TagName, from: usize) -> Option<Tag<'_>> {
    let mut pos = from;
    while let Some(tag) = next_tag(input, pos) {
        if tag.kind == TagKind::Close && tag.name == name {
            return Some(tag);
        }
        pos = tag.start + 1;
    }
    None
}

/// Finds the next tag at or after `from` and resolves the content span of paired tags.
///
/// A paired tag without a closing tag extends to the end of `input`.
pub fn scan(input: &str, from: usize) -> Option<TagMatch<'_>> {
    let tag = next_tag(input, from)?;
    if tag.kind == TagKind::Close || !tag.name.is_paired() {
        return Some(TagMatch {
            tag,
            inner: tag.end..tag.end,
            end: tag.end,
        });
    }

    Some(match find_close(input, tag.name, tag.end) {
        Some(close) => TagMatch {
            tag,
            inner: tag.end..close.start,
            end: close.end,
        },
        None => TagMatch {
            tag,
            inner: tag.end..input.len(),
            end: input.len(),
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue<'a> {
    Quoted(&'a str),
    Unquoted(&'a str),
    /// Attribute name without `=`.
    Bare,
}

/// Attributes of one tag occurrence, keyed by lowercased name. The first occurrence of a name wins.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet<'a> {
    entries: FxHashMap<String, AttrValue<'a>>,
}

fn ends_attr_name(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'/' | b'"' | b'\'' | b'>')
}

fn skip_ascii_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

impl<'a> AttributeSet<'a> {
    /// Parses raw attribute text permissively.
    ///
    /// Stray quotes, slashes and `=` between attributes are skipped. An unterminated quoted value
    /// drops that attribute and everything after it.
    pub fn parse(raw: &'a str) -> Self {
        let bytes = raw.as_bytes();
        let mut entries = FxHashMap::default();
        let mut i = 0usize;

        while i < bytes.len() {
            if ends_attr_name(bytes[i]) {
                i += 1;
                continue;
            }

            let name_start = i;
            while i < bytes.len() && !ends_attr_name(bytes[i]) {
                i += 1;
            }
            let name = raw[name_start..i].to_ascii_lowercase();

            let mut j = skip_ascii_whitespace(bytes, i);
            let value = if j < bytes.len() && bytes[j] == b'=' {
                j = skip_ascii_whitespace(bytes, j + 1);
                match bytes.get(j) {
                    Some(&q @ (b'"' | b'\'')) => {
                        let Some(len) = raw[j + 1..].find(q as char) else {
                            tracing::trace!(attr = %name, "unterminated attribute value");
                            break;
                        };
                        i = j + 1 + len + 1;
                        AttrValue::Quoted(&raw[j + 1..j + 1 + len])
                    }
                    _ => {
                        let value_start = j;
                        while j < bytes.len()
                            && !bytes[j].is_ascii_whitespace()
                            && !matches!(bytes[j], b'"' | b'\'')
                        {
                            j += 1;
                        }
                        i = j;
                        AttrValue::Unquoted(&raw[value_start..j])
                    }
                }
            } else {
                i = j;
                AttrValue::Bare
            };

            entries.entry(name).or_insert(value);
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<AttrValue<'a>> {
        self.entries.get(name).copied()
    }

    /// The value of `name` if it was quoted and non-empty.
    pub fn quoted(&self, name: &str) -> Option<&'a str> {
        match self.get(name)? {
            AttrValue::Quoted(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_whitelisted_tags_case_insensitively() {
        let t = next_tag("x <SuP>y", 0).unwrap();
        assert_eq!(t.name, TagName::Sup);
        assert_eq!(t.kind, TagKind::Open);
        assert_eq!((t.start, t.end), (2, 7));

        let t = next_tag("</A href=\"nope\">", 0).unwrap();
        assert_eq!(t.name, TagName::A);
        assert_eq!(t.kind, TagKind::Close);
    }

    #[test]
    fn rejects_unknown_and_unterminated_names() {
        assert_eq!(next_tag("<bold>x</bold>", 0), None);
        assert_eq!(next_tag("<foo> <abbr>", 0), None);
        assert_eq!(next_tag("a < b > c", 0), None);
        assert_eq!(next_tag("<b", 0), None);
        assert_eq!(next_tag("<b <i>", 0).map(|t| t.name), Some(TagName::I));
    }

    #[test]
    fn br_accepts_self_closing_forms() {
        for s in ["<br>", "<br/>", "<br />", "<BR\t>"] {
            let t = next_tag(s, 0).unwrap();
            assert_eq!(t.name, TagName::Br, "{s}");
            assert_eq!(t.end, s.len(), "{s}");
        }
        assert_eq!(next_tag("<b/>", 0), None);
    }

    #[test]
    fn scan_pairs_with_nearest_close() {
        let s = "<b>x<i>y</i></b>z";
        let m = scan(s, 0).unwrap();
        assert_eq!(&s[m.inner.clone()], "x<i>y</i>");
        assert_eq!(&s[m.end..], "z");
    }

    #[test]
    fn scan_extends_unclosed_tags_to_end() {
        let s = "<b>bold</i>";
        let m = scan(s, 0).unwrap();
        assert_eq!(&s[m.inner.clone()], "bold</i>");
        assert_eq!(m.end, s.len());
    }

    #[test]
    fn scan_accepts_junk_in_closing_tag() {
        let s = r#"<a href="x">z</a href="nope" style="for real?">!"#;
        let m = scan(s, 0).unwrap();
        assert_eq!(&s[m.inner.clone()], "z");
        assert_eq!(&s[m.end..], "!");
    }

    #[test]
    fn parses_attributes_permissively() {
        let attrs = AttributeSet::parse(r#" HREF="x"StYlE='y' magic weather=cloudy"#);
        assert_eq!(attrs.get("href"), Some(AttrValue::Quoted("x")));
        assert_eq!(attrs.get("style"), Some(AttrValue::Quoted("y")));
        assert_eq!(attrs.get("magic"), Some(AttrValue::Bare));
        assert_eq!(attrs.get("weather"), Some(AttrValue::Unquoted("cloudy")));

        let attrs = AttributeSet::parse(" \t\r\n href =    \"  x\" \n\r\t style=\"y\"  \n ");
        assert_eq!(attrs.quoted("href"), Some("  x"));
        assert_eq!(attrs.quoted("style"), Some("y"));
    }

    #[test]
    fn discards_text_after_quoted_value() {
        let attrs = AttributeSet::parse(r#" style="quoted: yeah;"disallowed: indeed;""#);
        assert_eq!(attrs.quoted("style"), Some("quoted: yeah;"));
    }

    #[test]
    fn first_occurrence_wins_and_unterminated_values_drop() {
        let attrs = AttributeSet::parse(r#" style="a" style="b" href="oops"#);
        assert_eq!(attrs.quoted("style"), Some("a"));
        assert_eq!(attrs.get("href"), None);
    }
}
