//! Lightweight CSS handling.
//!
//! Parses inline `style=""` attributes into declaration maps, reads the
//! handful of value types the runtime cares about (px sizes, durations),
//! and holds the declarative stylesheet that defines how presentation
//! states look. The stylesheet is rendered once into a `<style>` element.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::{Document, NodeId};

/// Inline style declarations, property -> value.
pub type Declarations = BTreeMap<String, String>;

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> Declarations {
    let mut decls = Declarations::new();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_lowercase();
        let val = parts[1].trim();
        if prop.is_empty() || val.is_empty() {
            continue;
        }
        decls.insert(prop, val.to_string());
    }
    decls
}

/// Serialize declarations back into `style` attribute form.
pub fn serialize_declarations(decls: &Declarations) -> String {
    let mut out = String::new();
    for (prop, val) in decls {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}: {};", prop, val);
    }
    out
}

/// Parse a CSS size value (px or plain number).
pub fn parse_css_size(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    let num_str = v.trim_end_matches("px");
    num_str.trim().parse::<f32>().ok()
}

/// Parse a CSS time value into seconds (`0.3s`, `300ms`).
pub fn parse_css_duration(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    if let Some(ms) = v.strip_suffix("ms") {
        return ms.trim().parse::<f32>().ok().map(|m| m / 1000.0);
    }
    v.strip_suffix('s')?.trim().parse::<f32>().ok()
}

fn trim_number(v: f32) -> String {
    let fixed = format!("{:.3}", v);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        t => t.to_string(),
    }
}

/// Format seconds as a CSS time value without float noise (`0.3s`, not `0.30000000000000004s`).
pub fn format_secs(secs: f32) -> String {
    format!("{}s", trim_number(secs))
}

/// Format a pixel length (`12.5px`, `0px`).
pub fn format_px(px: f32) -> String {
    format!("{}px", trim_number(px))
}

/// A single selector -> declarations rule.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>, declarations: &[(&str, &str)]) -> Self {
        Self {
            selector: selector.into(),
            declarations: declarations
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// `@keyframes` block: named stops, each with its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub name: String,
    pub stops: Vec<(String, Vec<(String, String)>)>,
}

/// Declarative mapping from presentation state to appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub rules: Vec<StyleRule>,
    pub keyframes: Vec<Keyframes>,
}

impl StyleSheet {
    /// Appearance of the states the runtime sets: entrance classes and
    /// their `visible` form, the active nav link, the cursor trail and the
    /// easter-egg pop-in.
    pub fn presentation_defaults() -> Self {
        let rules = vec![
            StyleRule::new(
                ".fade-in",
                &[
                    ("opacity", "0"),
                    ("transform", "translateY(20px)"),
                    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
                ],
            ),
            StyleRule::new(
                ".slide-in-left",
                &[
                    ("opacity", "0"),
                    ("transform", "translateX(-30px)"),
                    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
                ],
            ),
            StyleRule::new(
                ".stagger-child",
                &[("opacity", "0"), ("transition", "opacity 0.4s ease")],
            ),
            StyleRule::new(
                ".fade-in.visible, .slide-in-left.visible, .stagger-child.visible",
                &[("opacity", "1"), ("transform", "none")],
            ),
            StyleRule::new(
                ".nav-link.active",
                &[
                    ("background-color", "var(--yellow)"),
                    ("transform", "translate(-2px, -2px)"),
                    ("box-shadow", "var(--shadow-sm)"),
                ],
            ),
            StyleRule::new(
                ".cursor-trail",
                &[
                    ("position", "fixed"),
                    ("pointer-events", "none"),
                    ("width", "8px"),
                    ("height", "8px"),
                    ("background", "var(--black)"),
                    ("z-index", "9999"),
                ],
            ),
        ];
        let keyframes = vec![Keyframes {
            name: "popIn".into(),
            stops: vec![
                ("0%".into(), vec![("transform".into(), "translate(-50%, -50%) scale(0)".into())]),
                ("80%".into(), vec![("transform".into(), "translate(-50%, -50%) scale(1.1)".into())]),
                ("100%".into(), vec![("transform".into(), "translate(-50%, -50%) scale(1)".into())]),
            ],
        }];
        Self { rules, keyframes }
    }

    pub fn rule(&self, selector: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.selector == selector)
    }

    /// Append the sheet as a `<style>` element in `<head>`. `None` when the
    /// document has no head.
    pub fn inject(&self, doc: &mut Document) -> Option<NodeId> {
        let head = doc.head()?;
        let style = doc.create_element("style");
        doc.set_attr(style, "data-origin", "page-reveal");
        doc.append_text(style, self.to_css());
        doc.append_child(head, style);
        Some(style)
    }

    /// Render to CSS text.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(out, "{} {{", rule.selector);
            for (p, v) in &rule.declarations {
                let _ = writeln!(out, "    {}: {};", p, v);
            }
            out.push_str("}\n");
        }
        for kf in &self.keyframes {
            let _ = writeln!(out, "@keyframes {} {{", kf.name);
            for (stop, decls) in &kf.stops {
                let body: Vec<String> = decls.iter().map(|(p, v)| format!("{}: {};", p, v)).collect();
                let _ = writeln!(out, "    {} {{ {} }}", stop, body.join(" "));
            }
            out.push_str("}\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inline() {
        let decls = parse_inline_style("color: red; HEIGHT: 600px;; transition-delay:0.2s");
        assert_eq!(decls.get("color").map(String::as_str), Some("red"));
        assert_eq!(decls.get("height").map(String::as_str), Some("600px"));
        assert_eq!(decls.get("transition-delay").map(String::as_str), Some("0.2s"));
        assert_eq!(decls.len(), 3);
    }

    #[test]
    fn serialize_is_sorted_and_reparsable() {
        let decls = parse_inline_style("top: 4px; left: 2px");
        let text = serialize_declarations(&decls);
        assert_eq!(text, "left: 2px; top: 4px;");
        assert_eq!(parse_inline_style(&text), decls);
    }

    #[test]
    fn sizes_and_durations() {
        assert_eq!(parse_css_size("600px"), Some(600.0));
        assert_eq!(parse_css_size(" 12 "), Some(12.0));
        assert_eq!(parse_css_size("50%"), None);
        assert_eq!(parse_css_duration("0.3s"), Some(0.3));
        assert_eq!(parse_css_duration("250ms"), Some(0.25));
        assert_eq!(parse_css_duration("fast"), None);
    }

    #[test]
    fn seconds_format_without_float_noise() {
        assert_eq!(format_secs(0.0), "0s");
        assert_eq!(format_secs(3.0 * 0.1), "0.3s");
        assert_eq!(format_secs(0.1), "0.1s");
        assert_eq!(format_secs(1.5), "1.5s");
        assert_eq!(format_px(-0.0001), "0px");
        assert_eq!(format_px(37.25), "37.25px");
    }

    #[test]
    fn presentation_sheet_renders_active_link_and_keyframes() {
        let sheet = StyleSheet::presentation_defaults();
        assert!(sheet.rule(".nav-link.active").is_some());
        let css = sheet.to_css();
        assert!(css.contains(".nav-link.active {"));
        assert!(css.contains("@keyframes popIn {"));
        assert!(css.contains("80% { transform: translate(-50%, -50%) scale(1.1); }"));
    }

    #[test]
    fn injects_into_head() {
        let mut doc = crate::dom::parser::parse_html(
            "<html><head><title>t</title></head><body></body></html>",
            "file:///c.html",
        );
        let style = StyleSheet::presentation_defaults().inject(&mut doc).unwrap();
        assert_eq!(doc.query_all("head style").unwrap(), vec![style]);
        assert!(doc.collect_text(style).contains(".nav-link.active"));

        let mut headless = Document::new("about:blank");
        assert!(StyleSheet::default().inject(&mut headless).is_none());
    }
}
