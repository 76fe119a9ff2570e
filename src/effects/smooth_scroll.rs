//! Same-page anchor scrolling.
//!
//! Clicks on `a[href^="#"]` are intercepted and turned into an animated
//! scroll that stops the target section just below the fixed nav bar.

use crate::dom::selector::Selector;
use crate::dom::{Document, NodeId};
use crate::engine::viewport::Viewport;
use crate::render::layout::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f32,
    pub behavior: ScrollBehavior,
}

const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

pub struct SmoothScroll {
    anchor: Option<Selector>,
    anchors: Vec<NodeId>,
    bar: Option<Selector>,
    behavior: ScrollBehavior,
}

impl SmoothScroll {
    /// Collect the in-page anchors present at load. A non-positive
    /// `duration_secs` makes every request an instant jump.
    pub fn init(doc: &Document, bar_selector: &str, duration_secs: f32) -> Self {
        let anchor = Selector::parse(ANCHOR_SELECTOR).ok();
        let anchors = anchor.as_ref().map(|sel| doc.select(doc.root(), sel)).unwrap_or_default();
        let bar = match Selector::parse(bar_selector) {
            Ok(sel) => Some(sel),
            Err(e) => {
                log::warn!("smooth scroll: ignoring nav bar offset: {}", e);
                None
            }
        };
        let behavior = if duration_secs > 0.0 {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        };
        log::debug!("smooth scroll: {} in-page anchors", anchors.len());
        Self {
            anchor,
            anchors,
            bar,
            behavior,
        }
    }

    /// The intercepted anchor for a click on `target`, if any.
    pub fn anchor_for(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        let sel = self.anchor.as_ref()?;
        doc.closest(target, sel).filter(|a| self.anchors.contains(a))
    }

    /// Handle a click. `None` when the click is not on an in-page anchor or
    /// the anchor's target does not exist.
    pub fn handle_click(
        &self,
        doc: &Document,
        geometry: &Geometry,
        viewport: &Viewport,
        target: NodeId,
    ) -> Option<ScrollRequest> {
        let anchor = self.anchor_for(doc, target)?;
        let href = doc.attr(anchor, "href")?;
        self.request_for(doc, geometry, viewport, href)
    }

    /// Scroll position that brings `#id` just under the nav bar.
    pub fn request_for(&self, doc: &Document, geometry: &Geometry, viewport: &Viewport, href: &str) -> Option<ScrollRequest> {
        let id = href.strip_prefix('#')?;
        let target = match doc.element_by_id(id) {
            Some(t) => t,
            None => {
                log::debug!("smooth scroll: no element for {}", href);
                return None;
            }
        };
        let target_box = geometry.box_of(target)?;
        let bar_height = self
            .bar
            .as_ref()
            .and_then(|sel| doc.select(doc.root(), sel).into_iter().next())
            .and_then(|bar| geometry.box_of(bar))
            .map(|b| b.height)
            .unwrap_or(0.0);
        // getBoundingClientRect().top + pageYOffset is the document-space top.
        let top = (target_box.y - bar_height).clamp(0.0, viewport.max_scroll(geometry.document_height()));
        Some(ScrollRequest {
            top,
            behavior: self.behavior,
        })
    }
}

/// An in-flight animated scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl ScrollAnimation {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance by `dt`; returns the new scroll position and whether the
    /// animation has finished.
    pub fn step(&mut self, dt: f32) -> (f32, bool) {
        self.elapsed += dt.max(0.0);
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return (self.to, true);
        }
        let t = self.elapsed / self.duration;
        let eased = if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        };
        (self.from + (self.to - self.from) * eased, false)
    }
}
