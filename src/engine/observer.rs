//! Intersection observer: the viewport-watching primitive.
//!
//! Holds the observed targets for one policy and, each time the host asks
//! for records, reports the targets whose intersecting state changed since
//! the previous computation. The first computation after `observe` always
//! produces an entry, like the platform primitive it models.

use crate::config::HostCapabilities;
use crate::dom::{Document, NodeId};
use crate::engine::viewport::{ObservationPolicy, Viewport};
use crate::render::layout::Geometry;

/// The host has no intersection primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverUnavailable;

impl std::fmt::Display for ObserverUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "intersection observation is not available on this host")
    }
}

impl std::error::Error for ObserverUnavailable {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub ratio: f32,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
struct Observed {
    node: NodeId,
    last: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    policy: ObservationPolicy,
    observed: Vec<Observed>,
}

impl IntersectionObserver {
    pub fn try_new(policy: ObservationPolicy, host: &HostCapabilities) -> Result<Self, ObserverUnavailable> {
        if !host.intersection_observer {
            return Err(ObserverUnavailable);
        }
        Ok(Self {
            policy,
            observed: Vec::new(),
        })
    }

    /// Start watching `node`. Observing the same node twice is a no-op.
    pub fn observe(&mut self, node: NodeId) {
        if self.observed.iter().any(|o| o.node == node) {
            return;
        }
        self.observed.push(Observed { node, last: None });
    }

    /// Entries for every target whose state changed, in observation order.
    /// Detached targets and targets without a layout box are skipped.
    pub fn take_records(&mut self, doc: &Document, geometry: &Geometry, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for o in &mut self.observed {
            if !doc.is_connected(o.node) {
                continue;
            }
            let b = match geometry.box_of(o.node) {
                Some(b) => b,
                None => continue,
            };
            let (ratio, is_intersecting) = self.policy.evaluate(&viewport.to_client(b), viewport);
            if o.last != Some(is_intersecting) {
                o.last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: o.node,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}
