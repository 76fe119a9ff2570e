pub mod css;
pub mod parser;
pub mod selector;

use std::collections::HashMap;

use self::css::Declarations;
use self::selector::{Selector, SelectorError};

/// Index of a node inside its `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// Internal DOM node representation.
///
/// `class` and `style` attributes are lifted out of `attributes` into
/// `class_list` and `style` so presentation-state toggles and inline style
/// writes don't round-trip through strings.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub class_list: Vec<String>,
    pub style: Declarations,
    pub text: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub node_type: NodeType,
}

impl DomNode {
    fn new(node_type: NodeType, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            class_list: Vec::new(),
            style: Declarations::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            node_type,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.iter().any(|c| c == class)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}

/// Parsed page: an arena of nodes plus the handles the runtime needs.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
    root: NodeId,
    pub url: String,
    pub title: String,
}

impl Document {
    /// Empty document holding only the `#document` root.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            nodes: vec![DomNode::new(NodeType::Document, "#document")],
            root: NodeId(0),
            url: url.into(),
            title: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ─── Construction ──────────────────────────────────────────────────────

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode::new(NodeType::Element, tag));
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = DomNode::new(NodeType::Text, "");
        node.text = content.into();
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // Refuse to create a cycle.
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Shorthand for creating a text node and appending it.
    pub fn append_text(&mut self, parent: NodeId, content: impl Into<String>) -> NodeId {
        let text = self.create_text(content);
        self.append_child(parent, text);
        text
    }

    /// Remove a node (and its subtree) from the tree. The arena slot stays
    /// valid, so stale handles keep resolving but are no longer connected.
    pub fn detach(&mut self, id: NodeId) {
        let parent = match self.node(id).and_then(|n| n.parent) {
            Some(p) => p,
            None => return,
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == self.root {
                return true;
            }
            cur = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Inclusive descendant check (`ancestor.contains(node)` in DOM terms).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Elements under `scope` in document order, `scope` itself excluded.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(scope) {
            Some(n) => n.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            if let Some(n) = self.node(id) {
                if n.is_element() {
                    out.push(id);
                }
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.query_within(self.root, selector)
    }

    pub fn query(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Elements under `scope` matching `selector`, in document order.
    pub fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let sel = Selector::parse(selector)?;
        Ok(self.select(scope, &sel))
    }

    pub fn select(&self, scope: NodeId, sel: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| sel.matches(self, *id))
            .collect()
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.node(*n).and_then(|n| n.id()) == Some(id))
    }

    /// Nearest inclusive ancestor matching `sel`.
    pub fn closest(&self, id: NodeId, sel: &Selector) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if sel.matches(self, c) {
                return Some(c);
            }
            cur = self.node(c).and_then(|n| n.parent);
        }
        None
    }

    fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.node(*n).map(|n| n.tag == tag).unwrap_or(false))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_by_tag("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag("body")
    }

    // ─── Attributes, classes, styles ───────────────────────────────────────

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).map(|n| n.has_class(class)).unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_mut(id) {
            if !n.has_class(class) {
                n.class_list.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(n) = self.node_mut(id) {
            n.class_list.retain(|c| c != class);
        }
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.node(id).is_some()
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.style.get(property)).map(|s| s.as_str())
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(id) {
            n.style.insert(property.to_string(), value.into());
        }
    }

    /// Recursively collect text content under `id`.
    pub fn collect_text(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.collect_text_inner(id, &mut buf);
        buf
    }

    fn collect_text_inner(&self, id: NodeId, buf: &mut String) {
        let node = match self.node(id) {
            Some(n) => n,
            None => return,
        };
        if !node.text.is_empty() {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(node.text.trim());
        }
        for child in &node.children {
            self.collect_text_inner(*child, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new("about:blank");
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), html);
        doc.append_child(html, body);
        doc.append_child(body, p);
        doc.append_text(p, "hello");
        (doc, body, p)
    }

    #[test]
    fn class_toggling() {
        let (mut doc, _, p) = small_doc();
        assert!(doc.toggle_class(p, "active"));
        assert!(doc.has_class(p, "active"));
        doc.add_class(p, "active");
        assert_eq!(doc.node(p).unwrap().class_list.len(), 1);
        assert!(!doc.toggle_class(p, "active"));
        assert!(!doc.has_class(p, "active"));
    }

    #[test]
    fn detach_disconnects_subtree() {
        let (mut doc, body, p) = small_doc();
        assert!(doc.is_connected(p));
        doc.detach(p);
        assert!(!doc.is_connected(p));
        assert!(doc.node(body).unwrap().children.is_empty());
        // Mutating a detached node is harmless.
        doc.set_style(p, "filter", "none");
        doc.detach(p);
    }

    #[test]
    fn append_refuses_cycles() {
        let (mut doc, body, p) = small_doc();
        doc.append_child(p, body);
        assert!(doc.contains(body, p));
        assert!(!doc.contains(p, body));
    }

    #[test]
    fn head_body_and_text() {
        let (doc, body, p) = small_doc();
        assert_eq!(doc.body(), Some(body));
        assert_eq!(doc.head(), None);
        assert_eq!(doc.collect_text(p), "hello");
    }
}
