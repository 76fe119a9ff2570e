/// Entrance transition animator.
///
/// Turns the class state the reveal engine leaves behind (entrance class,
/// `visible`, inline delay) plus the time a node was revealed into a frame
/// a painter can draw: opacity and a translation offset.
/// - `fade-in`: rises 20px while fading in over 0.6s
/// - `slide-in-left`: slides 30px from the left over 0.6s
/// - `stagger-child`: fades in over 0.4s
use crate::dom::css::parse_css_duration;
use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entrance {
    pub from_dx: f32,
    pub from_dy: f32,
    pub duration: f32,
}

impl Entrance {
    /// The entrance a node's classes select, if any.
    pub fn for_node(doc: &Document, node: NodeId) -> Option<Self> {
        if doc.has_class(node, "fade-in") {
            Some(Self {
                from_dx: 0.0,
                from_dy: 20.0,
                duration: 0.6,
            })
        } else if doc.has_class(node, "slide-in-left") {
            Some(Self {
                from_dx: -30.0,
                from_dy: 0.0,
                duration: 0.6,
            })
        } else if doc.has_class(node, "stagger-child") {
            Some(Self {
                from_dx: 0.0,
                from_dy: 0.0,
                duration: 0.4,
            })
        } else {
            None
        }
    }
}

/// One painted state of an entrance transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    pub opacity: f32,
    pub dx: f32,
    pub dy: f32,
}

impl RevealFrame {
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn is_settled(&self) -> bool {
        *self == Self::SETTLED
    }
}

/// Delay from inline `transition-delay` or `animation-delay`, in seconds.
fn inline_delay(doc: &Document, node: NodeId) -> f32 {
    ["transition-delay", "animation-delay"]
        .iter()
        .filter_map(|p| doc.style(node, p).and_then(parse_css_duration))
        .next()
        .unwrap_or(0.0)
}

// CSS `ease` approximated by a cubic ease-out.
fn ease(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Frame for `node` at clock `now`. Nodes without an entrance class are
/// always settled; nodes with one but not yet `visible` are at the start.
pub fn reveal_frame(doc: &Document, node: NodeId, revealed_at: Option<f64>, now: f64) -> RevealFrame {
    let entrance = match Entrance::for_node(doc, node) {
        Some(e) => e,
        None => return RevealFrame::SETTLED,
    };
    let start = match revealed_at {
        Some(t) if doc.has_class(node, "visible") => t,
        _ => {
            return RevealFrame {
                opacity: 0.0,
                dx: entrance.from_dx,
                dy: entrance.from_dy,
            }
        }
    };
    let elapsed = (now - start) as f32 - inline_delay(doc, node);
    let t = if entrance.duration <= 0.0 {
        1.0
    } else {
        (elapsed / entrance.duration).clamp(0.0, 1.0)
    };
    let k = ease(t);
    RevealFrame {
        opacity: k,
        dx: entrance.from_dx * (1.0 - k),
        dy: entrance.from_dy * (1.0 - k),
    }
}

/// Frame composed with every ancestor's: opacities multiply and offsets add,
/// the way nested transitions paint.
pub fn composed_frame(
    doc: &Document,
    node: NodeId,
    revealed_at: impl Fn(NodeId) -> Option<f64>,
    now: f64,
) -> RevealFrame {
    let mut frame = RevealFrame::SETTLED;
    let mut cur = Some(node);
    while let Some(id) = cur {
        let f = reveal_frame(doc, id, revealed_at(id), now);
        frame.opacity *= f.opacity;
        frame.dx += f.dx;
        frame.dy += f.dy;
        cur = doc.node(id).and_then(|n| n.parent);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const PAGE: &str = r#"<html><body>
        <div id="card" class="fade-in"><span id="kid" class="stagger-child">x</span></div>
        <h2 id="label" class="slide-in-left">Label</h2>
        <p id="plain">plain</p>
    </body></html>"#;

    #[test]
    fn hidden_until_visible() {
        let doc = parse_html(PAGE, "file:///a.html");
        let card = doc.element_by_id("card").unwrap();
        let f = reveal_frame(&doc, card, None, 5.0);
        assert_eq!(f.opacity, 0.0);
        assert_eq!(f.dy, 20.0);
        let plain = doc.element_by_id("plain").unwrap();
        assert!(reveal_frame(&doc, plain, None, 0.0).is_settled());
    }

    #[test]
    fn transition_runs_after_delay() {
        let mut doc = parse_html(PAGE, "file:///a.html");
        let label = doc.element_by_id("label").unwrap();
        doc.add_class(label, "visible");
        doc.set_style(label, "transition-delay", "0.2s");
        assert_eq!(reveal_frame(&doc, label, Some(1.0), 1.1).opacity, 0.0);
        let mid = reveal_frame(&doc, label, Some(1.0), 1.5);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.dx < 0.0 && mid.dx > -30.0);
        assert!(reveal_frame(&doc, label, Some(1.0), 2.0).is_settled());
    }

    #[test]
    fn child_inherits_parent_fade() {
        let mut doc = parse_html(PAGE, "file:///a.html");
        let card = doc.element_by_id("card").unwrap();
        let kid = doc.element_by_id("kid").unwrap();
        doc.add_class(kid, "visible");
        let f = composed_frame(&doc, kid, |n| if n == kid { Some(0.0) } else { None }, 10.0);
        assert_eq!(f.opacity, 0.0);
        doc.add_class(card, "visible");
        let f = composed_frame(&doc, kid, |_| Some(0.0), 10.0);
        assert!(f.is_settled());
    }
}
