use crate::layout::Run;
use crate::*;

fn only_line(input: &str) -> Vec<Run> {
    let mut lines = convert(input);
    assert_eq!(lines.len(), 1, "{input}");
    lines.remove(0).runs
}

fn text(s: &str) -> Run {
    Run::Text {
        text: s.to_string(),
    }
}

fn span(style: &str, children: Vec<Run>) -> Run {
    Run::Span {
        style: style.to_string(),
        children,
    }
}

#[test]
fn basic_span_is_transparent() {
    assert_eq!(only_line("<span>text</span>"), vec![text("text")]);
}

#[test]
fn unquoted_span_style_is_ignored() {
    assert_eq!(only_line("<span style=unquoted>text</span>"), vec![text("text")]);
}

#[test]
fn quoted_span_style_is_kept() {
    assert_eq!(
        only_line(r#"<span style="quoted: yeah;">text</span>"#),
        vec![span("quoted: yeah;", vec![text("text")])]
    );
}

#[test]
fn junk_after_span_style_is_dropped() {
    assert_eq!(
        only_line(r#"<span style="quoted: yeah;"disallowed: indeed;">text</span>"#),
        vec![span("quoted: yeah;", vec![text("text")])]
    );
    assert_eq!(
        only_line(r#"<span style="a;b;"other="x">t</span>"#),
        vec![span("a;b;", vec![text("t")])]
    );
}

#[test]
fn span_style_keeps_entities_verbatim() {
    assert_eq!(
        only_line(r#"<span style="quoted: yeah&';;">text</span>"#),
        vec![span("quoted: yeah&';;", vec![text("text")])]
    );
    assert_eq!(
        only_line(r#"<span style="content:'&amp;'">&amp;</span>"#),
        vec![span("content:'&amp;'", vec![text("&")])]
    );
}

#[test]
fn decodes_entities_in_text() {
    assert_eq!(
        only_line("100&mu; &amp; &lt; 10 &gt; 0 &nbsp;100 &times; 20 &plusmn; 0.5 &deg;"),
        vec![text("100μ & < 10 > 0 \u{00A0}100 × 20 ± 0.5 °")]
    );
}

#[test]
fn decoded_angle_brackets_are_not_markup() {
    assert_eq!(only_line("&lt;b&gt;x&lt;/b&gt;"), vec![text("<b>x</b>")]);
}

#[test]
fn unclosed_bold_runs_to_the_end() {
    assert_eq!(
        only_line("a<b>b c"),
        vec![
            text("a"),
            Run::Bold {
                children: vec![text("b c")]
            }
        ]
    );
}
