use crate::dom::css::parse_css_size;
use crate::dom::{Document, NodeId, NodeType};

/// Bounding box for a laid-out DOM node, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Boxes for every node laid out at load time, indexed by `NodeId`.
///
/// Nodes created after layout (trail dots, overlays) have no box and are
/// invisible to intersection observers and hit testing.
#[derive(Debug, Clone)]
pub struct Geometry {
    boxes: Vec<Option<LayoutBox>>,
    depth: Vec<u32>,
    document_height: f32,
    pub viewport_width: f32,
}

impl Geometry {
    pub fn box_of(&self, id: NodeId) -> Option<LayoutBox> {
        self.boxes.get(id.0).copied().flatten()
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    /// Laid-out nodes with their tree depth, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, LayoutBox, u32)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .filter_map(move |(i, b)| b.map(|b| (NodeId(i), b, self.depth[i])))
    }

    /// Deepest connected element whose box contains the document point.
    pub fn hit_test(&self, doc: &Document, x: f32, y: f32) -> Option<NodeId> {
        let mut cur = doc.root();
        let mut hit = None;
        'descend: loop {
            let node = doc.node(cur)?;
            for child in node.children.iter().rev() {
                let is_element = doc.node(*child).map(|n| n.is_element()).unwrap_or(false);
                if !is_element {
                    continue;
                }
                if let Some(b) = self.box_of(*child) {
                    if b.height > 0.0 && b.contains(x, y) {
                        hit = Some(*child);
                        cur = *child;
                        continue 'descend;
                    }
                }
            }
            return hit;
        }
    }
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "td",
    "th",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
    "figure",
    "figcaption",
    "details",
    "summary",
];

/// Never painted; laid out as empty boxes.
const HIDDEN_TAGS: &[&str] = &["head", "title", "meta", "link", "script", "style", "noscript", "template"];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "section" | "article" | "main" => (16.0, 16.0),
        "nav" | "header" | "footer" => (12.0, 12.0),
        "blockquote" => (12.0, 12.0),
        "pre" => (8.0, 8.0),
        "hr" => (8.0, 8.0),
        _ => (0.0, 0.0),
    }
}

/// Per-tag padding in pixels.
fn tag_padding(tag: &str, is_block: bool) -> f32 {
    match tag {
        "section" | "article" | "main" | "aside" => 16.0,
        "nav" | "header" | "footer" => 12.0,
        "blockquote" => 20.0,
        _ if is_block => 4.0,
        _ => 0.0,
    }
}

fn font_size_for(tag: &str, parent_font_size: f32) -> f32 {
    match tag {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        "h5" | "h6" => 16.0,
        "small" => 12.0,
        _ => parent_font_size,
    }
}

/// Compute layout for a document (simple top-to-bottom block model).
pub fn compute_layout(doc: &Document, viewport_width: f32) -> Geometry {
    let mut geometry = Geometry {
        boxes: vec![None; doc.len()],
        depth: vec![0; doc.len()],
        document_height: 0.0,
        viewport_width,
    };
    let mut cursor_y = 0.0;
    layout_node(doc, doc.root(), 0.0, &mut cursor_y, viewport_width, 16.0, 0, &mut geometry);
    geometry.document_height = cursor_y;
    geometry
}

#[allow(clippy::too_many_arguments)]
fn layout_node(
    doc: &Document,
    id: NodeId,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    parent_font_size: f32,
    depth: u32,
    geometry: &mut Geometry,
) {
    let node = match doc.node(id) {
        Some(n) => n,
        None => return,
    };
    geometry.depth[id.0] = depth;

    // Fixed-position overlays are out of flow and get no box.
    if node.style.get("position").map(String::as_str) == Some("fixed") {
        return;
    }

    if HIDDEN_TAGS.contains(&node.tag.as_str()) || node.style.get("display").map(String::as_str) == Some("none") {
        geometry.boxes[id.0] = Some(LayoutBox {
            x,
            y: *cursor_y,
            width: 0.0,
            height: 0.0,
        });
        return;
    }

    let is_block = node.node_type == NodeType::Element && BLOCK_TAGS.contains(&node.tag.as_str());
    let font_size = font_size_for(&node.tag, parent_font_size);
    let (margin_top, margin_bottom) = tag_margins(&node.tag);
    let padding = tag_padding(&node.tag, is_block);

    if is_block {
        *cursor_y += margin_top;
    }

    let start_y = *cursor_y;

    if padding > 0.0 {
        *cursor_y += padding;
    }

    // Layout children
    let child_x = x + padding;
    let child_width = (available_width - padding * 2.0).max(0.0);
    for child in &node.children {
        layout_node(doc, *child, child_x, cursor_y, child_width, font_size, depth + 1, geometry);
    }

    // Text content contributes to height
    if !node.text.is_empty() {
        let line_height = font_size * 1.4;
        let chars_per_line = (available_width / (font_size * 0.6)).max(1.0) as usize;
        let lines = (node.text.len() as f32 / chars_per_line as f32).ceil().max(1.0);
        *cursor_y += lines * line_height;
    }

    if padding > 0.0 {
        *cursor_y += padding;
    }

    // Explicit px height / min-height stretch the box.
    let explicit = ["height", "min-height"]
        .iter()
        .filter_map(|p| node.style.get(*p).and_then(|v| parse_css_size(v)))
        .fold(0.0_f32, f32::max);
    if *cursor_y - start_y < explicit {
        *cursor_y = start_y + explicit;
    }

    let height = *cursor_y - start_y;

    if is_block {
        *cursor_y += margin_bottom;
    }

    geometry.boxes[id.0] = Some(LayoutBox {
        x,
        y: start_y,
        width: available_width,
        height,
    });
}
