#![forbid(unsafe_code)]

//! `svgmark` turns label strings with a handful of inline tags into sanitized, line-split text
//! runs for SVG.
//!
//! # Features
//!
//! - `render`: enable SVG `<tspan>` output (`svgmark::render`)

pub use svgmark_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use svgmark_render::svg::{render_document, render_label, render_lines};
    pub use svgmark_render::{Error, RenderOptions, Result};

    /// Renders a label with options read from `config`.
    pub fn render_label_with_config(
        input: &str,
        config: &crate::SvgmarkConfig,
    ) -> Result<String> {
        let options = RenderOptions::from_config(config)?;
        Ok(render_label(input, &options))
    }
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_label_with_config_applies_line_class() {
        let cfg = SvgmarkConfig::from_value(json!({ "text": { "lineClass": "row" } }));
        let out = render::render_label_with_config("a<br>b", &cfg).unwrap();
        assert!(out.starts_with(r#"<tspan class="row" dy="0em">a</tspan>"#));
    }
}
