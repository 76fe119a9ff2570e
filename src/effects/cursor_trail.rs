//! Decorative cursor trail.
//!
//! A fixed number of dots follow the pointer: dot 0 sits at the latest
//! position, dot `i` at the position `i` moves ago, each fainter than the
//! last.

use std::collections::VecDeque;

use crate::config::EffectsConfig;
use crate::dom::css::format_px;
use crate::dom::{Document, NodeId};

pub struct CursorTrail {
    dots: Vec<NodeId>,
    history: VecDeque<(f32, f32)>,
}

impl CursorTrail {
    /// Appends the dots to `<body>`. `None` on narrow viewports, without a
    /// body, or with a zero-length trail.
    pub fn init(doc: &mut Document, cfg: &EffectsConfig, viewport_width: f32) -> Option<Self> {
        if viewport_width <= cfg.min_viewport_width || cfg.trail_length == 0 {
            return None;
        }
        let body = doc.body()?;
        let len = cfg.trail_length;
        let dots = (0..len)
            .map(|i| {
                let dot = doc.create_element("div");
                doc.add_class(dot, "cursor-trail");
                doc.set_style(dot, "position", "fixed");
                doc.set_style(dot, "opacity", format!("{:.2}", 1.0 - i as f32 / len as f32));
                doc.set_style(dot, "display", "none");
                doc.append_child(body, dot);
                dot
            })
            .collect();
        Some(Self {
            dots,
            history: VecDeque::with_capacity(len),
        })
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    /// Record a pointer position (client coordinates) and move the dots.
    pub fn pointer_move(&mut self, doc: &mut Document, x: f32, y: f32) {
        self.history.push_front((x, y));
        self.history.truncate(self.dots.len());
        for (i, dot) in self.dots.iter().enumerate() {
            let (px, py) = match self.history.get(i) {
                Some(p) => *p,
                None => break,
            };
            doc.set_style(*dot, "display", "block");
            doc.set_style(*dot, "left", format_px(px));
            doc.set_style(*dot, "top", format_px(py));
            doc.set_style(*dot, "transform", "translate(-50%, -50%)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    fn doc() -> Document {
        parse_html("<html><body><p>x</p></body></html>", "file:///t.html")
    }

    #[test]
    fn disabled_at_or_below_threshold() {
        let mut d = doc();
        assert!(CursorTrail::init(&mut d, &EffectsConfig::default(), 1024.0).is_none());
        assert!(CursorTrail::init(&mut d, &EffectsConfig::default(), 800.0).is_none());
    }

    #[test]
    fn dots_follow_pointer_history() {
        let mut d = doc();
        let cfg = EffectsConfig {
            trail_length: 3,
            ..EffectsConfig::default()
        };
        let mut trail = CursorTrail::init(&mut d, &cfg, 1280.0).unwrap();
        let dots = trail.dots().to_vec();
        assert_eq!(d.query_all(".cursor-trail").unwrap(), dots);

        trail.pointer_move(&mut d, 10.0, 20.0);
        assert_eq!(d.style(dots[0], "left"), Some("10px"));
        assert_eq!(d.style(dots[1], "display"), Some("none"));

        trail.pointer_move(&mut d, 30.0, 40.0);
        trail.pointer_move(&mut d, 50.5, 60.0);
        trail.pointer_move(&mut d, 70.0, 80.0);
        assert_eq!(d.style(dots[0], "left"), Some("70px"));
        assert_eq!(d.style(dots[1], "left"), Some("50.5px"));
        assert_eq!(d.style(dots[2], "top"), Some("40px"));
    }
}
