//! Mobile navigation toggle.

use crate::config::MobileNavConfig;
use crate::dom::{Document, NodeId};

pub struct MobileNav {
    toggle: NodeId,
    menu: NodeId,
    links: Vec<NodeId>,
    open_class: String,
}

impl MobileNav {
    /// `None` unless both the toggle button and the menu exist.
    pub fn init(doc: &Document, cfg: &MobileNavConfig) -> Option<Self> {
        let toggle = doc.query(&cfg.toggle_selector).ok().flatten();
        let menu = doc.query(&cfg.menu_selector).ok().flatten();
        let (toggle, menu) = match (toggle, menu) {
            (Some(t), Some(m)) => (t, m),
            _ => {
                log::debug!("mobile nav: toggle or menu missing, skipping");
                return None;
            }
        };
        let links = doc.query_within(menu, &cfg.link_selector).unwrap_or_default();
        Some(Self {
            toggle,
            menu,
            links,
            open_class: cfg.open_class.clone(),
        })
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.menu, &self.open_class)
    }

    /// Dispatch a click on `target` through the toggle, link and document
    /// listeners, in that order.
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) {
        if doc.contains(self.toggle, target) {
            let open = doc.toggle_class(self.toggle, &self.open_class);
            doc.toggle_class(self.menu, &self.open_class);
            doc.set_attr(self.toggle, "aria-expanded", open.to_string());
            log::debug!("mobile nav: {}", if open { "opened" } else { "closed" });
        }
        if self.links.iter().any(|l| doc.contains(*l, target)) {
            self.close(doc);
        }
        if !doc.contains(self.toggle, target) && !doc.contains(self.menu, target) {
            self.close(doc);
        }
    }

    pub fn close(&self, doc: &mut Document) {
        doc.remove_class(self.toggle, &self.open_class);
        doc.remove_class(self.menu, &self.open_class);
        doc.set_attr(self.toggle, "aria-expanded", "false");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const PAGE: &str = r##"<html><body>
        <nav class="nav">
            <button class="nav-toggle" aria-expanded="false"><span>menu</span></button>
            <ul class="nav-links">
                <li><a class="nav-link" href="#work">Work</a></li>
                <li class="spacer">-</li>
            </ul>
        </nav>
        <main><p id="outside">elsewhere</p></main>
    </body></html>"##;

    fn setup() -> (Document, MobileNav) {
        let doc = parse_html(PAGE, "file:///m.html");
        let nav = MobileNav::init(&doc, &MobileNavConfig::default()).unwrap();
        (doc, nav)
    }

    #[test]
    fn toggle_opens_and_closes() {
        let (mut doc, nav) = setup();
        let span = doc.query(".nav-toggle span").unwrap().unwrap();
        let toggle = doc.query(".nav-toggle").unwrap().unwrap();
        nav.handle_click(&mut doc, span);
        assert!(nav.is_open(&doc));
        assert!(doc.has_class(toggle, "active"));
        assert_eq!(doc.attr(toggle, "aria-expanded"), Some("true"));
        nav.handle_click(&mut doc, toggle);
        assert!(!nav.is_open(&doc));
        assert_eq!(doc.attr(toggle, "aria-expanded"), Some("false"));
    }

    #[test]
    fn link_click_closes() {
        let (mut doc, nav) = setup();
        let toggle = doc.query(".nav-toggle").unwrap().unwrap();
        nav.handle_click(&mut doc, toggle);
        let link = doc.query(".nav-link").unwrap().unwrap();
        nav.handle_click(&mut doc, link);
        assert!(!nav.is_open(&doc));
    }

    #[test]
    fn inside_menu_but_not_a_link_stays_open() {
        let (mut doc, nav) = setup();
        let toggle = doc.query(".nav-toggle").unwrap().unwrap();
        nav.handle_click(&mut doc, toggle);
        let spacer = doc.query(".spacer").unwrap().unwrap();
        nav.handle_click(&mut doc, spacer);
        assert!(nav.is_open(&doc));
    }

    #[test]
    fn outside_click_closes() {
        let (mut doc, nav) = setup();
        let toggle = doc.query(".nav-toggle").unwrap().unwrap();
        nav.handle_click(&mut doc, toggle);
        let outside = doc.element_by_id("outside").unwrap();
        nav.handle_click(&mut doc, outside);
        assert!(!nav.is_open(&doc));
    }

    #[test]
    fn absent_menu_disables() {
        let doc = parse_html("<html><body><button class='nav-toggle'>x</button></body></html>", "file:///m.html");
        assert!(MobileNav::init(&doc, &MobileNavConfig::default()).is_none());
    }
}
