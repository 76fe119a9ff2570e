use crate::dom::css::parse_inline_style;
use crate::dom::{Document, NodeId};
use scraper::{ElementRef, Html, Node};

/// Tags whose children should be stripped (invisible/script content)
const SKIP_CHILDREN: &[&str] = &["script", "style", "noscript", "svg"];

/// Parse raw HTML string into a `Document`
pub fn parse_html(html: &str, url: &str) -> Document {
    let document = Html::parse_document(html);

    // Extract <title>
    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let mut doc = Document::new(url);
    doc.title = title.trim().to_string();
    let root = doc.root();
    convert_element(&mut doc, root, document.root_element());
    log::debug!("parsed {} ({} nodes)", url, doc.len());
    doc
}

fn convert_element(doc: &mut Document, parent: NodeId, el: ElementRef<'_>) {
    let tag = el.value().name.local.as_ref().to_string();
    let id = doc.create_element(tag.as_str());

    for (k, v) in el.value().attrs() {
        match k {
            "class" => {
                for class in v.split_whitespace() {
                    doc.add_class(id, class);
                }
            }
            "style" => {
                for (prop, val) in parse_inline_style(v) {
                    doc.set_style(id, &prop, val);
                }
            }
            _ => doc.set_attr(id, k, v),
        }
    }
    doc.append_child(parent, id);

    // Skip children of invisible elements
    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return;
    }

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    convert_element(doc, id, child_el);
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                if !s.trim().is_empty() {
                    doc.append_text(id, s);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_html() {
        let html = r#"
        <html>
            <head><title>Test Page</title></head>
            <body>
                <h1>Hello</h1>
                <p>Content paragraph</p>
            </body>
        </html>
        "#;

        let doc = parse_html(html, "https://example.com");
        assert_eq!(doc.title, "Test Page");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert!(doc.len() > 5);
    }

    #[test]
    fn strips_script_children() {
        let html = r#"
        <html><body>
            <p>Visible</p>
            <script>alert("hidden");</script>
        </body></html>
        "#;

        let doc = parse_html(html, "https://example.com");
        let body = doc.body().unwrap();
        let text = doc.collect_text(body);
        assert!(text.contains("Visible"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn lifts_class_and_style_attributes() {
        let html = r#"<html><body>
            <div id="card" class="about-card  fade" style="height: 300px; color: red">x</div>
        </body></html>"#;

        let doc = parse_html(html, "https://example.com");
        let card = doc.element_by_id("card").unwrap();
        let node = doc.node(card).unwrap();
        assert_eq!(node.class_list, vec!["about-card", "fade"]);
        assert_eq!(doc.style(card, "height"), Some("300px"));
        assert_eq!(doc.attr(card, "class"), None);
        assert_eq!(doc.attr(card, "style"), None);
    }
}
