#![forbid(unsafe_code)]

//! Maps [`svgmark_core::LineSubtree`]s onto SVG `<tspan>`/`<a>` markup.

pub mod svg;

use serde::Serialize;
use svgmark_core::SvgmarkConfig;

pub use svg::{render_document, render_label, render_lines};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid config value at `{path}`: expected {expected}")]
    InvalidConfig { path: String, expected: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Presentation options, usually read from an [`SvgmarkConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    /// `class` of each per-line `<tspan>`.
    pub line_class: String,
    /// `x` applied to each per-line `<tspan>` so lines restart at the same column.
    pub line_x: Option<f64>,
    pub text_class: Option<String>,
    pub text_style: Option<String>,
    pub text_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_class: "line".to_string(),
            line_x: None,
            text_class: None,
            text_style: None,
            text_y: None,
            width: None,
            height: None,
        }
    }
}

fn opt_str(config: &SvgmarkConfig, path: &str) -> Result<Option<String>> {
    match config.get(path) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| Error::InvalidConfig {
                path: path.to_string(),
                expected: "a string",
            }),
    }
}

fn opt_f64(config: &SvgmarkConfig, path: &str) -> Result<Option<f64>> {
    match config.get(path) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| Error::InvalidConfig {
                path: path.to_string(),
                expected: "a finite number",
            }),
    }
}

impl RenderOptions {
    /// Reads `text.lineClass`, `text.x`, `text.y`, `text.class`, `text.style`, `svg.width` and
    /// `svg.height`. Missing keys keep their defaults.
    pub fn from_config(config: &SvgmarkConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            line_class: opt_str(config, "text.lineClass")?.unwrap_or(defaults.line_class),
            line_x: opt_f64(config, "text.x")?,
            text_class: opt_str(config, "text.class")?,
            text_style: opt_str(config, "text.style")?,
            text_y: opt_f64(config, "text.y")?,
            width: opt_f64(config, "svg.width")?,
            height: opt_f64(config, "svg.height")?,
        })
    }
}
