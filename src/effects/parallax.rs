//! Scroll parallax for `[data-parallax]` elements.

use crate::config::EffectsConfig;
use crate::dom::css::format_px;
use crate::dom::{Document, NodeId};

pub struct Parallax {
    layers: Vec<(NodeId, f32)>,
}

impl Parallax {
    /// `None` on narrow viewports or when nothing is marked for parallax.
    /// The attribute value, when numeric, overrides the default speed.
    pub fn init(doc: &Document, cfg: &EffectsConfig, viewport_width: f32) -> Option<Self> {
        if viewport_width <= cfg.min_viewport_width {
            return None;
        }
        let layers: Vec<(NodeId, f32)> = doc
            .query_all(&cfg.parallax_selector)
            .unwrap_or_default()
            .into_iter()
            .map(|n| {
                let speed = doc
                    .attr(n, "data-parallax")
                    .and_then(|v| v.trim().parse::<f32>().ok())
                    .unwrap_or(cfg.parallax_speed);
                (n, speed)
            })
            .collect();
        if layers.is_empty() {
            return None;
        }
        Some(Self { layers })
    }

    pub fn on_scroll(&self, doc: &mut Document, scroll_y: f32) {
        for (node, speed) in &self.layers {
            doc.set_style(*node, "transform", format!("translateY({})", format_px(scroll_y * speed)));
        }
    }
}
