//! Runtime configuration.
//!
//! `EngineConfig::default()` reproduces the portfolio page script: the
//! selectors it queries, the class names it toggles, its observation
//! policies and its stagger timing. The `with_*` builders adjust it.

use crate::engine::viewport::ObservationPolicy;

/// What the host platform offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub intersection_observer: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
        }
    }
}

/// Which CSS property carries a stagger delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayProperty {
    TransitionDelay,
    AnimationDelay,
}

impl DelayProperty {
    pub fn css_name(self) -> &'static str {
        match self {
            DelayProperty::TransitionDelay => "transition-delay",
            DelayProperty::AnimationDelay => "animation-delay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerPolicy {
    /// Seconds added per index step.
    pub unit_secs: f32,
    pub property: DelayProperty,
}

impl StaggerPolicy {
    pub fn delay_for(&self, index: usize) -> f32 {
        index as f32 * self.unit_secs
    }
}

impl Default for StaggerPolicy {
    fn default() -> Self {
        Self {
            unit_secs: 0.1,
            property: DelayProperty::TransitionDelay,
        }
    }
}

/// One family of reveal targets.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealGroup {
    pub selector: String,
    /// Entrance class added at discovery (`fade-in`, `slide-in-left`).
    pub entrance_class: String,
    /// Group-level stagger: target `i` gets index `i % cycle`.
    pub stagger_cycle: Option<usize>,
    /// Only the first match is observed.
    pub first_only: bool,
}

impl RevealGroup {
    pub fn new(selector: &str, entrance_class: &str) -> Self {
        Self {
            selector: selector.to_string(),
            entrance_class: entrance_class.to_string(),
            stagger_cycle: None,
            first_only: false,
        }
    }

    pub fn staggered(mut self, cycle: usize) -> Self {
        self.stagger_cycle = Some(cycle.max(1));
        self
    }

    pub fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    pub groups: Vec<RevealGroup>,
    pub child_selector: String,
    pub visible_class: String,
    pub policy: ObservationPolicy,
    pub stagger: StaggerPolicy,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                RevealGroup::new(
                    ".about-card, .philosophy-card, .timeline-item, .book-card, .hobby-card, .contact-link",
                    "fade-in",
                )
                .staggered(4),
                RevealGroup::new(".section-label", "slide-in-left"),
                RevealGroup::new(".philosophy-statement", "fade-in").first_only(),
            ],
            child_selector: ".stagger-child".into(),
            visible_class: "visible".into(),
            policy: ObservationPolicy::reveal(),
            stagger: StaggerPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavConfig {
    pub section_selector: String,
    pub link_selector: String,
    pub active_class: String,
    /// Fixed bar whose height offsets smooth scrolling.
    pub bar_selector: String,
    pub policy: ObservationPolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            section_selector: "section[id]".into(),
            link_selector: ".nav-link".into(),
            active_class: "active".into(),
            bar_selector: ".nav".into(),
            policy: ObservationPolicy::nav_band_offset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MobileNavConfig {
    pub toggle_selector: String,
    pub menu_selector: String,
    pub link_selector: String,
    pub open_class: String,
}

impl Default for MobileNavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".nav-toggle".into(),
            menu_selector: ".nav-links".into(),
            link_selector: ".nav-link".into(),
            open_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectsConfig {
    /// Pointer and scroll effects run only on viewports wider than this.
    pub min_viewport_width: f32,
    pub trail_length: usize,
    pub parallax_selector: String,
    pub parallax_speed: f32,
    /// Duration of an animated anchor scroll, seconds.
    pub smooth_scroll_secs: f32,
    pub banner: bool,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            min_viewport_width: 1024.0,
            trail_length: 8,
            parallax_selector: "[data-parallax]".into(),
            parallax_speed: 0.3,
            smooth_scroll_secs: 0.5,
            banner: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KonamiConfig {
    pub sequence: Vec<String>,
    pub message: String,
    /// Seconds before the hue rotation is undone.
    pub filter_secs: f32,
    /// Seconds before the message overlay is removed.
    pub message_secs: f32,
}

impl Default for KonamiConfig {
    fn default() -> Self {
        Self {
            sequence: [
                "ArrowUp",
                "ArrowUp",
                "ArrowDown",
                "ArrowDown",
                "ArrowLeft",
                "ArrowRight",
                "ArrowLeft",
                "ArrowRight",
                "b",
                "a",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            message: "YOU FOUND THE SECRET!".into(),
            filter_secs: 3.0,
            message_secs: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub host: HostCapabilities,
    pub reveal: RevealConfig,
    pub nav: NavConfig,
    pub mobile_nav: MobileNavConfig,
    pub effects: EffectsConfig,
    pub konami: KonamiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            host: HostCapabilities::default(),
            reveal: RevealConfig::default(),
            nav: NavConfig::default(),
            mobile_nav: MobileNavConfig::default(),
            effects: EffectsConfig::default(),
            konami: KonamiConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_host(mut self, host: HostCapabilities) -> Self {
        self.host = host;
        self
    }

    pub fn with_nav_policy(mut self, policy: ObservationPolicy) -> Self {
        self.nav.policy = policy;
        self
    }

    pub fn with_reveal_policy(mut self, policy: ObservationPolicy) -> Self {
        self.reveal.policy = policy;
        self
    }

    pub fn with_stagger(mut self, stagger: StaggerPolicy) -> Self {
        self.reveal.stagger = stagger;
        self
    }

    pub fn with_banner(mut self, enabled: bool) -> Self {
        self.effects.banner = enabled;
        self
    }
}
