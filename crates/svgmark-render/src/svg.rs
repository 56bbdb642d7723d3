use crate::RenderOptions;
use std::fmt::Write as _;
use svgmark_core::layout::ZERO_WIDTH_SPACE;
use svgmark_core::{LineSubtree, Run, convert};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

fn push_text(out: &mut String, text: &str) {
    out.push_str(&htmlize::escape_text(text));
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&htmlize::escape_attribute(value));
    out.push('"');
}

fn push_num_attr(out: &mut String, name: &str, value: f64) {
    let _ = write!(out, " {name}=\"{value}\"");
}

fn render_run(out: &mut String, run: &Run) {
    match run {
        Run::Text { text } => push_text(out, text),
        Run::Marker => out.push(ZERO_WIDTH_SPACE),
        Run::Link { anchor, children } => {
            out.push_str("<a");
            if let Some(href) = anchor.href.as_deref() {
                push_attr(out, "xlink:href", href);
            }
            if let Some(show) = anchor.show() {
                push_attr(out, "xlink:show", show);
            }
            push_attr(out, "style", &anchor.css());
            out.push('>');
            render_runs(out, children);
            out.push_str("</a>");
        }
        Run::ScriptClose { .. } => {
            out.push_str("<tspan");
            if let Some(dy) = run.dy() {
                push_attr(out, "dy", dy);
            }
            out.push('>');
            out.push(ZERO_WIDTH_SPACE);
            out.push_str("</tspan>");
        }
        Run::Bold { children }
        | Run::Italic { children }
        | Run::Span { children, .. }
        | Run::ScriptOpen { children, .. } => {
            out.push_str("<tspan");
            if let Some(style) = run.style() {
                push_attr(out, "style", &style);
            }
            if let Some(dy) = run.dy() {
                push_attr(out, "dy", dy);
            }
            out.push('>');
            render_runs(out, children);
            out.push_str("</tspan>");
        }
    }
}

fn render_runs(out: &mut String, runs: &[Run]) {
    for run in runs {
        render_run(out, run);
    }
}

/// Renders line subtrees as the content of an SVG `<text>` element.
///
/// A single line is emitted without a line wrapper; multiple lines each get a
/// `<tspan class="line" dy="...">`.
pub fn render_lines(lines: &[LineSubtree], options: &RenderOptions) -> String {
    let mut out = String::new();
    let wrap = lines.len() > 1;
    for line in lines {
        if wrap {
            out.push_str("<tspan");
            push_attr(&mut out, "class", &options.line_class);
            if let Some(x) = options.line_x {
                push_num_attr(&mut out, "x", x);
            }
            push_attr(&mut out, "dy", &line.dy());
            out.push('>');
        }
        render_runs(&mut out, &line.runs);
        if wrap {
            out.push_str("</tspan>");
        }
    }
    out
}

/// Converts and renders label markup in one step.
pub fn render_label(input: &str, options: &RenderOptions) -> String {
    let lines = convert(input);
    tracing::trace!(lines = lines.len(), "rendering label");
    render_lines(&lines, options)
}

/// Renders label markup as a standalone SVG document with a single `<text>` element.
pub fn render_document(input: &str, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("<svg");
    push_attr(&mut out, "xmlns", SVG_NS);
    push_attr(&mut out, "xmlns:xlink", XLINK_NS);
    if let Some(w) = options.width {
        push_num_attr(&mut out, "width", w);
    }
    if let Some(h) = options.height {
        push_num_attr(&mut out, "height", h);
    }
    out.push_str("><text");
    if let Some(class) = options.text_class.as_deref() {
        push_attr(&mut out, "class", class);
    }
    if let Some(x) = options.line_x {
        push_num_attr(&mut out, "x", x);
    }
    if let Some(y) = options.text_y {
        push_num_attr(&mut out, "y", y);
    }
    if let Some(style) = options.text_style.as_deref() {
        push_attr(&mut out, "style", style);
    }
    out.push('>');
    out.push_str(&render_label(input, options));
    out.push_str("</text></svg>");
    out
}
