//! Line layout: splits a segment tree at line breaks into self-contained line subtrees.
//!
//! Splitting is a structural copy. Every wrapper open across a break is re-created on the next
//! line, so each line can be rendered on its own.

use crate::sanitize::Anchor;
use crate::segment::{MAX_NESTING, Segment};
use serde::Serialize;
use std::borrow::Cow;

/// Line height in `em`.
pub const LINE_HEIGHT_EM: f64 = 1.3;
// The same constant in tenths of an em, so offsets format without float noise.
const LINE_HEIGHT_TENTHS: usize = 13;

pub const BOLD_STYLE: &str = "font-weight:bold";
pub const ITALIC_STYLE: &str = "font-style:italic";
pub const SCRIPT_SCALE: &str = "70%";
pub const SCRIPT_STYLE: &str = "font-size:70%";

/// Emitted before every script opener and inside every closer.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Script {
    Superscript,
    Subscript,
}

impl Script {
    /// Baseline shift applied by the opener.
    pub fn shift_dy(self) -> &'static str {
        match self {
            Script::Superscript => "-0.6em",
            Script::Subscript => "0.3em",
        }
    }

    /// Baseline shift applied by the closer to return to the surrounding baseline.
    pub fn reset_dy(self) -> &'static str {
        match self {
            Script::Superscript => "0.42em",
            Script::Subscript => "-0.21em",
        }
    }

    pub fn scale(self) -> &'static str {
        SCRIPT_SCALE
    }
}

/// A node of a laid-out line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Run {
    Text {
        text: String,
    },
    /// Zero-width text anchoring a script opener.
    Marker,
    Bold {
        children: Vec<Run>,
    },
    Italic {
        children: Vec<Run>,
    },
    Span {
        style: String,
        children: Vec<Run>,
    },
    Link {
        anchor: Anchor,
        children: Vec<Run>,
    },
    /// Scaled, shifted script content. `continued` is set on lines after the first one the script
    /// touches; the shift is repeated there because each line starts on its own baseline.
    ScriptOpen {
        script: Script,
        continued: bool,
        children: Vec<Run>,
    },
    /// Restores the baseline after the last line of a script.
    ScriptClose {
        script: Script,
    },
}

impl Run {
    pub fn children(&self) -> &[Run] {
        match self {
            Run::Bold { children }
            | Run::Italic { children }
            | Run::Span { children, .. }
            | Run::Link { children, .. }
            | Run::ScriptOpen { children, .. } => children,
            Run::Text { .. } | Run::Marker | Run::ScriptClose { .. } => &[],
        }
    }

    /// The `style` this run carries when rendered.
    pub fn style(&self) -> Option<Cow<'_, str>> {
        match self {
            Run::Bold { .. } => Some(Cow::Borrowed(BOLD_STYLE)),
            Run::Italic { .. } => Some(Cow::Borrowed(ITALIC_STYLE)),
            Run::Span { style, .. } => Some(Cow::Borrowed(style)),
            Run::Link { anchor, .. } => Some(Cow::Owned(anchor.css())),
            Run::ScriptOpen { .. } => Some(Cow::Borrowed(SCRIPT_STYLE)),
            Run::Text { .. } | Run::Marker | Run::ScriptClose { .. } => None,
        }
    }

    /// The baseline shift this run carries when rendered.
    pub fn dy(&self) -> Option<&'static str> {
        match self {
            Run::ScriptOpen { script, .. } => Some(script.shift_dy()),
            Run::ScriptClose { script } => Some(script.reset_dy()),
            _ => None,
        }
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSubtree {
    pub index: usize,
    pub total: usize,
    pub runs: Vec<Run>,
}

impl LineSubtree {
    /// Vertical offset of this line in `em`.
    pub fn offset_em(&self) -> f64 {
        self.index as f64 * LINE_HEIGHT_EM
    }

    /// The offset formatted as an SVG length, e.g. `0em`, `1.3em`, `2.6em`.
    pub fn dy(&self) -> String {
        let tenths = self.index * LINE_HEIGHT_TENTHS;
        match tenths % 10 {
            0 => format!("{}em", tenths / 10),
            frac => format!("{}.{}em", tenths / 10, frac),
        }
    }

    /// Visible text of the line; markers are not included.
    pub fn text(&self) -> String {
        fn collect(runs: &[Run], out: &mut String) {
            for run in runs {
                match run {
                    Run::Text { text } => out.push_str(text),
                    other => collect(other.children(), out),
                }
            }
        }
        let mut out = String::new();
        collect(&self.runs, &mut out);
        out
    }
}

/// Accumulates runs line by line.
#[derive(Debug, Default)]
struct Lines {
    done: Vec<Vec<Run>>,
    current: Vec<Run>,
}

impl Lines {
    fn push(&mut self, run: Run) {
        self.current.push(run);
    }

    fn push_text(&mut self, text: &str) {
        match self.current.last_mut() {
            Some(Run::Text { text: prev }) => prev.push_str(text),
            _ => self.push(Run::Text {
                text: text.to_string(),
            }),
        }
    }

    fn break_line(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
    }

    fn into_fragments(mut self) -> Vec<Vec<Run>> {
        self.break_line();
        self.done
    }

    /// Appends fragments without a wrapper.
    fn extend(&mut self, fragments: Vec<Vec<Run>>) {
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                self.break_line();
            }
            self.current.extend(fragment);
        }
    }

    /// Re-creates a wrapper around each line fragment of its content. A wrapper split by a break
    /// is not re-created on a line where it would be empty.
    fn wrap(&mut self, fragments: Vec<Vec<Run>>, wrap: impl Fn(Vec<Run>) -> Run) {
        let split = fragments.len() > 1;
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                self.break_line();
            }
            if split && fragment.is_empty() {
                continue;
            }
            self.push(wrap(fragment));
        }
    }

    fn script(&mut self, fragments: Vec<Vec<Run>>, script: Script) {
        let last = fragments.len().saturating_sub(1);
        for (i, children) in fragments.into_iter().enumerate() {
            if i > 0 {
                self.break_line();
            }
            self.push(Run::Marker);
            self.push(Run::ScriptOpen {
                script,
                continued: i > 0,
                children,
            });
            if i == last {
                self.push(Run::ScriptClose { script });
            }
        }
    }
}

/// Lays out a segment list into per-line run fragments. Always returns at least one fragment.
///
/// `depth` counts the wrappers around `segments`. At [`MAX_NESTING`] the remaining subtree is
/// flattened to its text and line breaks.
fn split_lines(segments: &[Segment], depth: usize) -> Vec<Vec<Run>> {
    if depth >= MAX_NESTING {
        return flatten_lines(segments);
    }
    let nested = depth + 1;
    let mut lines = Lines::default();
    for seg in segments {
        match seg {
            Segment::Text { text } => lines.push(Run::Text { text: text.clone() }),
            Segment::LineBreak => lines.break_line(),
            Segment::Root { children } => lines.extend(split_lines(children, nested)),
            Segment::Bold { children } => {
                lines.wrap(split_lines(children, nested), |children| Run::Bold { children })
            }
            Segment::Italic { children } => {
                lines.wrap(split_lines(children, nested), |children| Run::Italic { children })
            }
            Segment::Span { style, children } => {
                lines.wrap(split_lines(children, nested), |children| Run::Span {
                    style: style.clone(),
                    children,
                })
            }
            Segment::Link { anchor, children } => {
                lines.wrap(split_lines(children, nested), |children| Run::Link {
                    anchor: anchor.clone(),
                    children,
                })
            }
            Segment::Superscript { children } => {
                lines.script(split_lines(children, nested), Script::Superscript)
            }
            Segment::Subscript { children } => {
                lines.script(split_lines(children, nested), Script::Subscript)
            }
        }
    }
    lines.into_fragments()
}

fn flatten_lines(segments: &[Segment]) -> Vec<Vec<Run>> {
    let mut lines = Lines::default();
    let mut stack = vec![segments.iter()];
    while let Some(iter) = stack.last_mut() {
        match iter.next() {
            None => {
                stack.pop();
            }
            Some(Segment::Text { text }) => lines.push_text(text),
            Some(Segment::LineBreak) => lines.break_line(),
            Some(other) => stack.push(other.children().iter()),
        }
    }
    lines.into_fragments()
}

/// Splits a segment tree into line subtrees.
///
/// A tree without line breaks yields exactly one line.
pub fn layout_lines(root: &Segment) -> Vec<LineSubtree> {
    let fragments = match root {
        Segment::Root { children } => split_lines(children, 0),
        other => split_lines(std::slice::from_ref(other), 0),
    };
    let total = fragments.len();
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, runs)| LineSubtree { index, total, runs })
        .collect()
}
