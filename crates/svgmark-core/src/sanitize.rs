//! Attribute allow-listing for `<a>` and `<span>`.
//!
//! Only `href` and `style` on anchors and `style` on spans survive. The tables below are the whole
//! policy; nothing at runtime can widen them.

use crate::entities::decode_entities;
use crate::scanner::{AttrValue, AttributeSet};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Schemes an `href` may carry. Relative references (no scheme) are always allowed.
pub const ALLOWED_HREF_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Appended to every anchor style.
pub const LINK_STYLE: &str = "cursor:pointer";

/// `xlink:show` value for anchors that carry an href.
pub const LINK_SHOW: &str = "new";

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z][a-z0-9+.\-]*):").expect("valid regex"))
}

/// Sanitized anchor attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub href: Option<String>,
    /// Author style, passed through verbatim (no entity decoding).
    pub style: Option<String>,
}

impl Anchor {
    /// The final anchor style: the author style followed by [`LINK_STYLE`].
    pub fn css(&self) -> String {
        match self.style.as_deref() {
            Some(style) => format!("{style};{LINK_STYLE}"),
            None => LINK_STYLE.to_string(),
        }
    }

    pub fn show(&self) -> Option<&'static str> {
        self.href.as_ref().map(|_| LINK_SHOW)
    }
}

/// Lowercased copy of `href` with whitespace and control characters removed, used only for
/// scheme inspection. `java\tscript:` and ` javascript :` both collapse to `javascript:`.
fn compact_for_scheme(href: &str) -> String {
    href.chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Validates a raw (still entity-encoded) `href` value.
///
/// Returns the trimmed, decoded href when its scheme is allowed, or `None` when the anchor must be
/// dropped.
pub fn sanitize_href(raw: &str) -> Option<String> {
    let decoded = decode_entities(raw.trim());
    let href = decoded.trim();
    let compact = compact_for_scheme(href);

    if compact.starts_with("javascript:") {
        tracing::debug!(href = %href, "rejecting javascript href");
        return None;
    }

    if let Some(caps) = scheme_regex().captures(&compact) {
        let scheme = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if !ALLOWED_HREF_SCHEMES.contains(&scheme) {
            tracing::debug!(href = %href, scheme, "rejecting href with disallowed scheme");
            return None;
        }
    }

    Some(href.to_string())
}

/// The quoted, non-empty `style` of a tag. Unquoted styles are dropped as a whole.
fn quoted_style(attrs: &AttributeSet<'_>) -> Option<String> {
    match attrs.get("style")? {
        AttrValue::Quoted(v) if !v.is_empty() => Some(v.to_string()),
        AttrValue::Quoted(_) => None,
        AttrValue::Unquoted(v) => {
            tracing::debug!(style = v, "dropping unquoted style");
            None
        }
        AttrValue::Bare => None,
    }
}

fn trace_dropped(tag: &str, attrs: &AttributeSet<'_>, kept: &[&str]) {
    for name in attrs.names().filter(|n| !kept.contains(n)) {
        tracing::trace!(tag, attr = name, "dropping attribute");
    }
}

/// Sanitizes `<a>` attributes.
///
/// `None` means the href was rejected and the anchor wrapper must not be emitted. An anchor with
/// no usable href (missing, empty or unquoted) is kept without one.
pub fn sanitize_anchor(attrs: &AttributeSet<'_>) -> Option<Anchor> {
    trace_dropped("a", attrs, &["href", "style"]);

    let href = match attrs.quoted("href") {
        Some(raw) if !raw.trim().is_empty() => Some(sanitize_href(raw)?),
        _ => None,
    };

    Some(Anchor {
        href,
        style: quoted_style(attrs),
    })
}

/// Sanitizes `<span>` attributes. `None` means the span carries no style and is transparent.
pub fn sanitize_span(attrs: &AttributeSet<'_>) -> Option<String> {
    trace_dropped("span", attrs, &["style"]);
    quoted_style(attrs)
}

/// Logs attributes on tags that accept none.
pub fn drop_all(tag: &str, attrs: &AttributeSet<'_>) {
    trace_dropped(tag, attrs, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(raw: &str) -> Option<Anchor> {
        sanitize_anchor(&AttributeSet::parse(raw))
    }

    #[test]
    fn rejects_javascript_with_any_spacing_or_case() {
        for href in [
            "javascript:alert(1)",
            "     javascript:alert('attack')",
            "JavaScript:alert(1)",
            "java\tscript:alert(1)",
            "javascript :alert(1)",
            "&#106;avascript:alert(1)",
            "javascript&#58;alert(1)",
        ] {
            assert_eq!(sanitize_href(href), None, "{href}");
        }
    }

    #[test]
    fn rejects_other_schemes() {
        for href in ["data:text/html,x", "vbscript:x", "ftp://example.com", "file:///etc"] {
            assert_eq!(sanitize_href(href), None, "{href}");
        }
    }

    #[test]
    fn accepts_relative_and_allowed_schemes() {
        assert_eq!(sanitize_href("/mylink").as_deref(), Some("/mylink"));
        assert_eq!(sanitize_href("XSS").as_deref(), Some("XSS"));
        assert_eq!(sanitize_href("  https://plot.ly ").as_deref(), Some("https://plot.ly"));
        assert_eq!(
            sanitize_href("mailto:support@plot.ly").as_deref(),
            Some("mailto:support@plot.ly")
        );
        assert_eq!(
            sanitize_href("https://abc.com/f.jsp?name=abc&amp;pwd=def").as_deref(),
            Some("https://abc.com/f.jsp?name=abc&pwd=def")
        );
        assert_eq!(sanitize_href("x?a=b:c").as_deref(), Some("x?a=b:c"));
    }

    #[test]
    fn anchor_keeps_only_href_and_style() {
        let a = anchor(r#" magic="true" href="x" weather="cloudy" style="y" speed="42""#).unwrap();
        assert_eq!(a.href.as_deref(), Some("x"));
        assert_eq!(a.style.as_deref(), Some("y"));
        assert_eq!(a.css(), "y;cursor:pointer");
        assert_eq!(a.show(), Some("new"));
    }

    #[test]
    fn anchor_without_href_has_no_show() {
        let a = anchor("").unwrap();
        assert_eq!(a.href, None);
        assert_eq!(a.css(), "cursor:pointer");
        assert_eq!(a.show(), None);

        let a = anchor("href=unquoted").unwrap();
        assert_eq!(a.href, None);
    }

    #[test]
    fn style_is_not_entity_decoded() {
        let style = sanitize_span(&AttributeSet::parse(r#" style="quoted: yeah&';;""#));
        assert_eq!(style.as_deref(), Some("quoted: yeah&';;"));
        let style = sanitize_span(&AttributeSet::parse(r#" style="a&amp;b""#));
        assert_eq!(style.as_deref(), Some("a&amp;b"));
    }

    #[test]
    fn unquoted_or_empty_span_style_is_dropped() {
        assert_eq!(sanitize_span(&AttributeSet::parse(" style=unquoted")), None);
        assert_eq!(sanitize_span(&AttributeSet::parse(r#" style="""#)), None);
        assert_eq!(sanitize_span(&AttributeSet::parse("")), None);
    }
}
