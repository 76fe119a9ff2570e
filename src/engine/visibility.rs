//! Visibility engine.
//!
//! Watches a fixed set of targets through an `IntersectionObserver` and runs
//! an activation for each target that comes into view. In `Once` mode the
//! activation is latched: a target's `activated` flag only ever goes from
//! false to true and later entries for it are ignored, so revealed content
//! never hides again. `EveryEntry` mode reruns the activation on each
//! intersecting entry (nav highlighting).

use crate::config::{HostCapabilities, RevealConfig, StaggerPolicy};
use crate::dom::css::format_secs;
use crate::dom::{Document, NodeId};
use crate::engine::observer::{IntersectionEntry, IntersectionObserver};
use crate::engine::viewport::{ObservationPolicy, Viewport};
use crate::render::layout::Geometry;

#[derive(Debug, Clone, PartialEq)]
pub struct ObservableTarget {
    pub node: NodeId,
    pub activated: bool,
    pub stagger_index: Option<usize>,
    pub children: Vec<ObservableTarget>,
}

impl ObservableTarget {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            activated: false,
            stagger_index: None,
            children: Vec::new(),
        }
    }

    pub fn with_stagger(mut self, index: usize) -> Self {
        self.stagger_index = Some(index);
        self
    }

    pub fn with_children(mut self, children: Vec<ObservableTarget>) -> Self {
        self.children = children;
        self
    }
}

/// Mutation run when a target activates.
pub trait Activation {
    fn on_activate(&mut self, doc: &mut Document, target: &ObservableTarget);
}

impl<F> Activation for F
where
    F: FnMut(&mut Document, &ObservableTarget),
{
    fn on_activate(&mut self, doc: &mut Document, target: &ObservableTarget) {
        self(doc, target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationMode {
    Once,
    EveryEntry,
}

pub struct VisibilityEngine<A> {
    observer: Option<IntersectionObserver>,
    targets: Vec<ObservableTarget>,
    mode: ActivationMode,
    on_activate: A,
}

impl<A: Activation> VisibilityEngine<A> {
    /// Begin watching `targets` under `policy`.
    ///
    /// Without an intersection primitive every target is activated right
    /// away, so content is never left permanently hidden.
    pub fn observe(
        doc: &mut Document,
        targets: Vec<ObservableTarget>,
        policy: ObservationPolicy,
        host: &HostCapabilities,
        mode: ActivationMode,
        on_activate: A,
    ) -> Self {
        let mut engine = Self {
            observer: None,
            targets,
            mode,
            on_activate,
        };
        match IntersectionObserver::try_new(policy, host) {
            Ok(mut observer) => {
                for t in &engine.targets {
                    observer.observe(t.node);
                }
                engine.observer = Some(observer);
            }
            Err(e) => {
                log::warn!("{}; activating {} targets up front", e, engine.targets.len());
                for idx in 0..engine.targets.len() {
                    engine.activate(doc, idx);
                }
            }
        }
        engine
    }

    /// Pull intersection records for the current viewport and apply them.
    /// Returns the targets activated by this call.
    pub fn process(&mut self, doc: &mut Document, geometry: &Geometry, viewport: &Viewport) -> Vec<NodeId> {
        let entries = match self.observer.as_mut() {
            Some(obs) => obs.take_records(doc, geometry, viewport),
            None => return Vec::new(),
        };
        self.handle_entries(doc, &entries)
    }

    /// Apply entries in the order given.
    pub fn handle_entries(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> Vec<NodeId> {
        let mut fired = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let idx = match self.targets.iter().position(|t| t.node == entry.target) {
                Some(i) => i,
                None => continue,
            };
            if self.mode == ActivationMode::Once && self.targets[idx].activated {
                continue;
            }
            self.activate(doc, idx);
            fired.push(entry.target);
        }
        fired
    }

    fn activate(&mut self, doc: &mut Document, idx: usize) {
        let target = &mut self.targets[idx];
        target.activated = true;
        for child in &mut target.children {
            child.activated = true;
        }
        self.on_activate.on_activate(doc, target);
    }

    pub fn targets(&self) -> &[ObservableTarget] {
        &self.targets
    }

    pub fn is_activated(&self, node: NodeId) -> bool {
        self.targets.iter().any(|t| t.node == node && t.activated)
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    pub fn activation(&self) -> &A {
        &self.on_activate
    }
}

/// Default reveal mutation: mark the target visible, then give each child
/// its stagger delay and mark it visible too.
#[derive(Debug, Clone)]
pub struct RevealActivation {
    pub visible_class: String,
    pub stagger: StaggerPolicy,
}

impl Activation for RevealActivation {
    fn on_activate(&mut self, doc: &mut Document, target: &ObservableTarget) {
        doc.add_class(target.node, &self.visible_class);
        for (i, child) in target.children.iter().enumerate() {
            let delay = self.stagger.delay_for(child.stagger_index.unwrap_or(i));
            doc.set_style(child.node, self.stagger.property.css_name(), format_secs(delay));
            doc.add_class(child.node, &self.visible_class);
        }
        log::debug!("revealed {:?} with {} children", target.node, target.children.len());
    }
}

/// Discover reveal targets and apply their entrance state.
///
/// Each group's matches get the entrance class; staggered groups also get a
/// `(i % cycle) * unit` delay. Nested `child_selector` matches become the
/// target's children. A node matched by several groups is observed once.
pub fn discover_reveal_targets(doc: &mut Document, cfg: &RevealConfig) -> Vec<ObservableTarget> {
    let mut targets: Vec<ObservableTarget> = Vec::new();
    for group in &cfg.groups {
        let mut found = match doc.query_all(&group.selector) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("skipping reveal group: {}", e);
                continue;
            }
        };
        if group.first_only {
            found.truncate(1);
        }
        for (i, node) in found.into_iter().enumerate() {
            doc.add_class(node, &group.entrance_class);
            let stagger_index = group.stagger_cycle.map(|cycle| i % cycle);
            if let Some(idx) = stagger_index {
                doc.set_style(node, cfg.stagger.property.css_name(), format_secs(cfg.stagger.delay_for(idx)));
            }
            if targets.iter().any(|t| t.node == node) {
                continue;
            }
            let children = doc
                .query_within(node, &cfg.child_selector)
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(ci, c)| ObservableTarget::new(c).with_stagger(ci))
                .collect();
            targets.push(ObservableTarget {
                node,
                activated: false,
                stagger_index,
                children,
            });
        }
    }
    targets
}
