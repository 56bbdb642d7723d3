use svgmark_core::SvgmarkConfig;
use svgmark_render::{RenderOptions, render_document};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

fn parse(svg: &str) -> roxmltree::Document<'_> {
    roxmltree::Document::parse(svg).expect("renderer emits well-formed XML")
}

fn anchor_attrs(doc: &roxmltree::Document<'_>) -> Vec<(Option<String>, String, String)> {
    let a = doc
        .descendants()
        .find(|n| n.has_tag_name("a"))
        .expect("anchor element");
    a.attributes()
        .map(|attr| {
            (
                attr.namespace().map(str::to_string),
                attr.name().to_string(),
                attr.value().to_string(),
            )
        })
        .collect()
}

#[test]
fn anchor_attribute_allow_list_holds_in_parsed_output() {
    let svg = render_document(
        r#"<a href="XSS" onmouseover="alert(1)" style="font-size:300px">Subtitle</a>"#,
        &RenderOptions::default(),
    );
    let doc = parse(&svg);
    let attrs = anchor_attrs(&doc);
    assert_eq!(
        attrs,
        vec![
            (Some(XLINK_NS.to_string()), "href".to_string(), "XSS".to_string()),
            (Some(XLINK_NS.to_string()), "show".to_string(), "new".to_string()),
            (
                None,
                "style".to_string(),
                "font-size:300px;cursor:pointer".to_string()
            ),
        ]
    );
    let text = doc
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>();
    assert_eq!(text, "Subtitle");
}

#[test]
fn javascript_links_leave_no_anchor() {
    let svg = render_document(
        r#"<a href =    "     javascript:alert('attack')">XSS</a>"#,
        &RenderOptions::default(),
    );
    let doc = parse(&svg);
    assert!(!doc.descendants().any(|n| n.has_tag_name("a")));
    assert!(!svg.contains("javascript"));
}

#[test]
fn hostile_text_stays_text() {
    let svg = render_document(
        r#"<script>alert(1)</script> &lt;img onerror=x&gt; <b onclick="x">b</b>"#,
        &RenderOptions::default(),
    );
    let doc = parse(&svg);
    let names = doc
        .descendants()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["svg", "text", "tspan"]);
    let bold = doc
        .descendants()
        .find(|n| n.has_tag_name("tspan"))
        .expect("bold tspan");
    assert_eq!(bold.attribute("style"), Some("font-weight:bold"));
    assert_eq!(bold.attribute("onclick"), None);
}

#[test]
fn lines_become_positioned_tspans() {
    let cfg = SvgmarkConfig::from_json_str(
        r#"{ "text": { "x": 5, "y": 20, "class": "label" }, "svg": { "width": 100, "height": 40 } }"#,
    )
    .unwrap();
    let options = RenderOptions::from_config(&cfg).unwrap();
    let svg = render_document("one<br>two<br/>three", &options);
    let doc = parse(&svg);

    let root = doc.root_element();
    assert_eq!(root.attribute("width"), Some("100"));
    let text = root.first_element_child().expect("text element");
    assert_eq!(text.attribute("class"), Some("label"));
    assert_eq!(text.attribute("y"), Some("20"));

    let lines = text
        .children()
        .filter(|n| n.is_element())
        .map(|n| {
            (
                n.attribute("class").unwrap_or_default().to_string(),
                n.attribute("x").unwrap_or_default().to_string(),
                n.attribute("dy").unwrap_or_default().to_string(),
                n.text().unwrap_or_default().to_string(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            ("line".into(), "5".into(), "0em".into(), "one".into()),
            ("line".into(), "5".into(), "1.3em".into(), "two".into()),
            ("line".into(), "5".into(), "2.6em".into(), "three".into()),
        ]
    );
}
