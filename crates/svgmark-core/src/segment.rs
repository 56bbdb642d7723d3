//! Recursive-descent construction of the segment tree.
//!
//! The builder never fails. Anything it does not recognize stays literal text; recognized tags
//! with unsafe attributes lose the attribute (or, for anchors with a rejected href, the wrapper).
//! Wrappers nest at most [`MAX_NESTING`] deep; markup below that depth is kept as text.

use crate::entities::decode_entities;
use crate::sanitize::{self, Anchor};
use crate::scanner::{self, AttributeSet, TagKind, TagMatch, TagName};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    Root { children: Vec<Segment> },
    Text { text: String },
    Bold { children: Vec<Segment> },
    Italic { children: Vec<Segment> },
    Span { style: String, children: Vec<Segment> },
    Link { anchor: Anchor, children: Vec<Segment> },
    Superscript { children: Vec<Segment> },
    Subscript { children: Vec<Segment> },
    LineBreak,
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn children(&self) -> &[Segment] {
        match self {
            Segment::Root { children }
            | Segment::Bold { children }
            | Segment::Italic { children }
            | Segment::Span { children, .. }
            | Segment::Link { children, .. }
            | Segment::Superscript { children }
            | Segment::Subscript { children } => children,
            Segment::Text { .. } | Segment::LineBreak => &[],
        }
    }

    /// Number of `LineBreak` leaves in this subtree.
    pub fn line_breaks(&self) -> usize {
        match self {
            Segment::LineBreak => 1,
            other => other.children().iter().map(Segment::line_breaks).sum(),
        }
    }

    /// Concatenated text content, ignoring line breaks.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(seg: &Segment, out: &mut String) {
    match seg {
        Segment::Text { text } => out.push_str(text),
        other => other.children().iter().for_each(|c| collect_text(c, out)),
    }
}

/// Replaces `\r\n`, `\r` and `\n` with a single space. Only `<br>` breaks lines.
pub fn normalize_newlines(input: &str) -> std::borrow::Cow<'_, str> {
    if !input.contains(['\r', '\n']) {
        return std::borrow::Cow::Borrowed(input);
    }
    std::borrow::Cow::Owned(input.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

/// Builds the segment tree for a label.
pub fn parse_segments(input: &str) -> Segment {
    let input = normalize_newlines(input);
    Segment::Root {
        children: build(&input, Scope::default()),
    }
}

/// Deepest wrapper nesting the builder produces.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_link: bool,
    depth: usize,
}

impl Scope {
    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

fn build(input: &str, scope: Scope) -> Vec<Segment> {
    let mut out = Vec::new();
    if scope.depth >= MAX_NESTING {
        tracing::debug!(depth = scope.depth, "nesting limit reached, keeping markup as text");
        push_text(&mut out, input);
        return out;
    }

    let mut pos = 0usize;

    while let Some(m) = scanner::scan(input, pos) {
        push_text(&mut out, &input[pos..m.tag.start]);
        match m.tag.kind {
            TagKind::Close => {
                tracing::trace!(tag = m.tag.name.as_str(), "dropping unmatched closing tag");
            }
            TagKind::Open => open_tag(&mut out, input, &m, scope),
        }
        pos = m.end;
    }
    push_text(&mut out, &input[pos..]);
    out
}

fn open_tag(out: &mut Vec<Segment>, input: &str, m: &TagMatch<'_>, scope: Scope) {
    let inner = &input[m.inner.clone()];
    let attrs = AttributeSet::parse(m.tag.attrs);

    let seg = match m.tag.name {
        TagName::Br => {
            sanitize::drop_all("br", &attrs);
            Segment::LineBreak
        }
        TagName::B => {
            sanitize::drop_all("b", &attrs);
            Segment::Bold {
                children: build(inner, scope.nested()),
            }
        }
        TagName::I | TagName::Em => {
            sanitize::drop_all(m.tag.name.as_str(), &attrs);
            Segment::Italic {
                children: build(inner, scope.nested()),
            }
        }
        TagName::Sup => {
            sanitize::drop_all("sup", &attrs);
            Segment::Superscript {
                children: build(inner, scope.nested()),
            }
        }
        TagName::Sub => {
            sanitize::drop_all("sub", &attrs);
            Segment::Subscript {
                children: build(inner, scope.nested()),
            }
        }
        TagName::Span => {
            let children = build(inner, scope.nested());
            match sanitize::sanitize_span(&attrs) {
                Some(style) => Segment::Span { style, children },
                None => return splice(out, children),
            }
        }
        TagName::A => {
            let children = build(
                inner,
                Scope {
                    in_link: true,
                    ..scope.nested()
                },
            );
            if scope.in_link {
                tracing::trace!("flattening nested anchor");
                return splice(out, children);
            }
            match sanitize::sanitize_anchor(&attrs) {
                Some(anchor) => Segment::Link { anchor, children },
                None => return splice(out, children),
            }
        }
    };
    out.push(seg);
}

/// Appends decoded text, merging with a preceding text segment.
fn push_text(out: &mut Vec<Segment>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = decode_entities(raw);
    match out.last_mut() {
        Some(Segment::Text { text }) => text.push_str(&decoded),
        _ => out.push(Segment::text(decoded.into_owned())),
    }
}

/// Moves `children` into `out` in place of a dropped wrapper.
fn splice(out: &mut Vec<Segment>, children: Vec<Segment>) {
    for child in children {
        match child {
            Segment::Text { text } => match out.last_mut() {
                Some(Segment::Text { text: prev }) => prev.push_str(&text),
                _ => out.push(Segment::Text { text }),
            },
            other => out.push(other),
        }
    }
}
