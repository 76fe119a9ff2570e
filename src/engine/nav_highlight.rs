//! Active navigation link tracking.
//!
//! A `VisibilityEngine` over `section[id]` elements, rerun on every
//! intersecting entry, whose activation clears the active class from every
//! nav link and sets it on the one pointing at `#<section id>`.

use std::collections::BTreeMap;

use crate::config::{HostCapabilities, NavConfig};
use crate::dom::{Document, NodeId};
use crate::engine::viewport::Viewport;
use crate::engine::visibility::{Activation, ActivationMode, ObservableTarget, VisibilityEngine};
use crate::render::layout::Geometry;

/// Section id -> "is the current section". At most one entry is true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    sections: BTreeMap<String, bool>,
}

impl NavigationState {
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            sections: ids.into_iter().map(|id| (id.to_string(), false)).collect(),
        }
    }

    /// Make `id` the only active section.
    pub fn activate(&mut self, id: &str) {
        for (k, v) in self.sections.iter_mut() {
            *v = k == id;
        }
        self.sections.entry(id.to_string()).or_insert(true);
    }

    pub fn active(&self) -> Option<&str> {
        self.sections.iter().find(|(_, v)| **v).map(|(k, _)| k.as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.sections.get(id).copied().unwrap_or(false)
    }
}

/// Exclusive link mutation.
#[derive(Debug, Clone)]
pub struct NavActivation {
    links: Vec<NodeId>,
    active_class: String,
    state: NavigationState,
}

impl NavActivation {
    pub fn state(&self) -> &NavigationState {
        &self.state
    }
}

impl Activation for NavActivation {
    fn on_activate(&mut self, doc: &mut Document, target: &ObservableTarget) {
        let id = match doc.attr(target.node, "id") {
            Some(id) => id.to_string(),
            None => return,
        };
        let wanted = format!("#{}", id);
        for link in &self.links {
            doc.remove_class(*link, &self.active_class);
            if doc.attr(*link, "href") == Some(wanted.as_str()) {
                doc.add_class(*link, &self.active_class);
            }
        }
        self.state.activate(&id);
        log::debug!("nav: active section #{}", id);
    }
}

pub struct NavHighlighter {
    engine: VisibilityEngine<NavActivation>,
}

impl NavHighlighter {
    /// Wire up sections and links. Returns `None` when the page has no
    /// sections or no links to highlight, or the host cannot observe.
    pub fn init(doc: &mut Document, cfg: &NavConfig, host: &HostCapabilities) -> Option<Self> {
        if !host.intersection_observer {
            log::info!("nav highlight disabled: no intersection observer");
            return None;
        }
        let sections = match doc.query_all(&cfg.section_selector) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("nav highlight disabled: {}", e);
                return None;
            }
        };
        let links = doc.query_all(&cfg.link_selector).unwrap_or_default();
        if sections.is_empty() || links.is_empty() {
            log::debug!("nav highlight disabled: {} sections, {} links", sections.len(), links.len());
            return None;
        }
        let ids: Vec<String> = sections
            .iter()
            .filter_map(|s| doc.attr(*s, "id").map(str::to_string))
            .collect();
        let activation = NavActivation {
            links,
            active_class: cfg.active_class.clone(),
            state: NavigationState::new(ids.iter().map(String::as_str)),
        };
        let targets = sections.into_iter().map(ObservableTarget::new).collect();
        let engine = VisibilityEngine::observe(doc, targets, cfg.policy, host, ActivationMode::EveryEntry, activation);
        Some(Self { engine })
    }

    pub fn process(&mut self, doc: &mut Document, geometry: &Geometry, viewport: &Viewport) {
        self.engine.process(doc, geometry, viewport);
    }

    pub fn state(&self) -> &NavigationState {
        self.engine.activation().state()
    }
}
