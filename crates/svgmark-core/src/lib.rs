#![forbid(unsafe_code)]

//! Pseudo-HTML label text to positioned, styled text runs (headless).
//!
//! Labels may carry a small set of inline tags: `<b>`, `<i>`/`<em>`, `<sup>`, `<sub>`, `<br>`,
//! `<span style="...">` and `<a href="..." style="...">`. Conversion runs in three stages:
//! - [`parse_segments`]: scan tags, decode entities and sanitize attributes into a [`Segment`] tree
//! - [`layout_lines`]: split the tree at line breaks into [`LineSubtree`]s
//! - a renderer (see `svgmark-render`) maps lines onto concrete SVG nodes
//!
//! Conversion never fails. Malformed markup degrades to literal text; unsafe attributes are dropped.

pub mod config;
pub mod entities;
pub mod error;
pub mod layout;
pub mod sanitize;
pub mod scanner;
pub mod segment;
pub mod text;

pub use config::SvgmarkConfig;
pub use entities::decode_entities;
pub use error::{Error, Result};
pub use layout::{LineSubtree, Run, Script, layout_lines};
pub use sanitize::Anchor;
pub use segment::{MAX_NESTING, Segment, parse_segments};
pub use text::{PlainTextOptions, plain_text};

/// Converts label markup into line subtrees.
pub fn convert(input: &str) -> Vec<LineSubtree> {
    layout_lines(&parse_segments(input))
}

/// Number of lines [`convert`] produces for `input`.
pub fn line_count(input: &str) -> usize {
    parse_segments(input).line_breaks() + 1
}

#[cfg(test)]
mod tests;
