//! A loaded page with its interaction layer running.
//!
//! `Page::start` is the page-ready wiring: it injects the presentation
//! stylesheet, discovers reveal targets, starts the nav highlighter and the
//! peripheral effects, then runs a first intersection pass. After that the
//! host drives it with input (`scroll_to`, `click`, `key_down`,
//! `pointer_move`) and frame ticks (`advance`). Handlers run one at a time;
//! each scroll change or tick ends with an intersection pass, reveal first
//! and nav highlight second.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::dom::css::StyleSheet;
use crate::dom::{Document, NodeId};
use crate::effects::banner::log_banner;
use crate::effects::cursor_trail::CursorTrail;
use crate::effects::konami::{EasterEgg, KonamiDetector};
use crate::effects::mobile_nav::MobileNav;
use crate::effects::parallax::Parallax;
use crate::effects::smooth_scroll::{ScrollAnimation, ScrollBehavior, SmoothScroll};
use crate::engine::nav_highlight::{NavHighlighter, NavigationState};
use crate::engine::timer::TimerQueue;
use crate::engine::viewport::Viewport;
use crate::engine::visibility::{
    discover_reveal_targets, ActivationMode, ObservableTarget, RevealActivation, VisibilityEngine,
};
use crate::render::layout::{compute_layout, Geometry};

pub struct Page {
    doc: Document,
    geometry: Geometry,
    viewport: Viewport,
    timers: TimerQueue,
    reveal: VisibilityEngine<RevealActivation>,
    nav: Option<NavHighlighter>,
    smooth_scroll: SmoothScroll,
    scroll_animation: Option<ScrollAnimation>,
    smooth_scroll_secs: f32,
    mobile_nav: Option<MobileNav>,
    konami: KonamiDetector,
    easter_egg: EasterEgg,
    trail: Option<CursorTrail>,
    parallax: Option<Parallax>,
    revealed_at: HashMap<NodeId, f64>,
    stylesheet: Option<NodeId>,
}

impl Page {
    pub fn start(mut doc: Document, geometry: Geometry, cfg: &EngineConfig) -> Self {
        let viewport = Viewport::new(cfg.viewport_width, cfg.viewport_height);

        let stylesheet = StyleSheet::presentation_defaults().inject(&mut doc);
        if stylesheet.is_none() {
            log::warn!("no <head>; presentation styles not injected");
        }
        if cfg.effects.banner {
            log_banner(&doc.title);
        }

        let targets = discover_reveal_targets(&mut doc, &cfg.reveal);
        log::info!("observing {} reveal targets", targets.len());
        let reveal = VisibilityEngine::observe(
            &mut doc,
            targets,
            cfg.reveal.policy,
            &cfg.host,
            ActivationMode::Once,
            RevealActivation {
                visible_class: cfg.reveal.visible_class.clone(),
                stagger: cfg.reveal.stagger,
            },
        );
        let smooth_scroll = SmoothScroll::init(&doc, &cfg.nav.bar_selector, cfg.effects.smooth_scroll_secs);
        let nav = NavHighlighter::init(&mut doc, &cfg.nav, &cfg.host);
        let mobile_nav = MobileNav::init(&doc, &cfg.mobile_nav);
        let trail = CursorTrail::init(&mut doc, &cfg.effects, viewport.width);
        let parallax = Parallax::init(&doc, &cfg.effects, viewport.width);

        let mut page = Self {
            doc,
            geometry,
            viewport,
            timers: TimerQueue::new(),
            reveal,
            nav,
            smooth_scroll,
            scroll_animation: None,
            smooth_scroll_secs: cfg.effects.smooth_scroll_secs,
            mobile_nav,
            konami: KonamiDetector::new(cfg.konami.sequence.clone()),
            easter_egg: EasterEgg::new(&cfg.konami),
            trail,
            parallax,
            revealed_at: HashMap::new(),
            stylesheet,
        };

        // Targets activated without an observer count as revealed at load.
        let preactivated: Vec<NodeId> = page
            .reveal
            .targets()
            .iter()
            .filter(|t| t.activated)
            .map(|t| t.node)
            .collect();
        page.record_reveals(&preactivated);
        page.refresh();
        page
    }

    // ─── Input ─────────────────────────────────────────────────────────────

    /// Jump to `y` (clamped), cancelling any animated scroll.
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_animation = None;
        self.set_scroll(y);
    }

    pub fn scroll_by(&mut self, dy: f32) {
        let y = self.viewport.scroll_y + dy;
        self.scroll_to(y);
    }

    /// Dispatch a click on `target`: anchor interception first, then the
    /// mobile menu listeners.
    pub fn click(&mut self, target: NodeId) {
        if let Some(req) = self
            .smooth_scroll
            .handle_click(&self.doc, &self.geometry, &self.viewport, target)
        {
            log::debug!("anchor click: scrolling to {}", req.top);
            match req.behavior {
                ScrollBehavior::Smooth => {
                    self.scroll_animation = Some(ScrollAnimation::new(
                        self.viewport.scroll_y,
                        req.top,
                        self.smooth_scroll_secs,
                    ));
                }
                ScrollBehavior::Instant => self.scroll_to(req.top),
            }
        }
        if let Some(nav) = &self.mobile_nav {
            nav.handle_click(&mut self.doc, target);
        }
    }

    /// Click at a client-space point. Returns the element hit, if any.
    pub fn click_at(&mut self, x: f32, y: f32) -> Option<NodeId> {
        let hit = self.hit_test(x, y)?;
        self.click(hit);
        Some(hit)
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        self.geometry.hit_test(&self.doc, x, y + self.viewport.scroll_y)
    }

    /// Key press by DOM key name (`ArrowUp`, `b`). Returns `true` when it
    /// completed the Konami sequence.
    pub fn key_down(&mut self, key: &str) -> bool {
        if !self.konami.advance(key) {
            return false;
        }
        self.easter_egg.trigger(&mut self.doc, &mut self.timers);
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(trail) = &mut self.trail {
            trail.pointer_move(&mut self.doc, x, y);
        }
    }

    /// New viewport size. A width change re-lays the document out; nodes
    /// created at runtime stay out of flow. Width-gated effects keep their
    /// load-time state.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width != self.viewport.width {
            self.geometry = compute_layout(&self.doc, width);
            log::debug!("relaid out at {}px, document height {}", width, self.geometry.document_height());
        }
        self.viewport.width = width;
        self.viewport.height = height;
        let y = self.viewport.scroll_y;
        self.set_scroll(y);
    }

    /// Frame tick: run due timers, step the scroll animation, then process
    /// intersections.
    pub fn advance(&mut self, dt_secs: f32) {
        self.timers.advance(dt_secs as f64, &mut self.doc);
        if let Some(mut anim) = self.scroll_animation.take() {
            let (y, done) = anim.step(dt_secs);
            if !done {
                self.scroll_animation = Some(anim);
            }
            self.set_scroll(y);
        } else {
            self.refresh();
        }
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    fn set_scroll(&mut self, y: f32) {
        let max = self.viewport.max_scroll(self.geometry.document_height());
        self.viewport.scroll_y = y.clamp(0.0, max);
        if let Some(p) = &self.parallax {
            p.on_scroll(&mut self.doc, self.viewport.scroll_y);
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        let fired = self.reveal.process(&mut self.doc, &self.geometry, &self.viewport);
        self.record_reveals(&fired);
        if let Some(nav) = &mut self.nav {
            nav.process(&mut self.doc, &self.geometry, &self.viewport);
        }
    }

    fn record_reveals(&mut self, nodes: &[NodeId]) {
        let now = self.timers.now();
        for node in nodes {
            let target = match self.reveal.targets().iter().find(|t| t.node == *node) {
                Some(t) => t,
                None => continue,
            };
            self.revealed_at.entry(target.node).or_insert(now);
            for child in &target.children {
                self.revealed_at.entry(child.node).or_insert(now);
            }
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Page clock, seconds since start.
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    pub fn reveal_targets(&self) -> &[ObservableTarget] {
        self.reveal.targets()
    }

    /// Clock time at which `node` (a target or a target's child) was revealed.
    pub fn revealed_at(&self, node: NodeId) -> Option<f64> {
        self.revealed_at.get(&node).copied()
    }

    pub fn navigation(&self) -> Option<&NavigationState> {
        self.nav.as_ref().map(|n| n.state())
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll_animation.is_some()
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_nav.as_ref().map(|n| n.is_open(&self.doc)).unwrap_or(false)
    }

    pub fn konami_progress(&self) -> usize {
        self.konami.progress()
    }

    pub fn trail_dots(&self) -> &[NodeId] {
        self.trail.as_ref().map(|t| t.dots()).unwrap_or(&[])
    }

    pub fn stylesheet(&self) -> Option<NodeId> {
        self.stylesheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostCapabilities;
    use crate::dom::parser::parse_html;

    const PAGE: &str = r##"<html><head><title>Jane Doe</title></head><body>
        <nav class="nav" style="height: 60px">
            <button class="nav-toggle">menu</button>
            <ul class="nav-links">
                <li><a class="nav-link" href="#intro">Intro</a></li>
                <li><a class="nav-link" href="#work">Work</a></li>
                <li><a class="nav-link" href="#contact">Contact</a></li>
            </ul>
        </nav>
        <section id="intro" style="height: 1000px">
            <h2 class="section-label">Intro</h2>
            <div class="about-card"><span class="stagger-child">1</span><span class="stagger-child">2</span></div>
        </section>
        <section id="work" style="height: 1000px">
            <h2 class="section-label">Work</h2>
            <div class="timeline-item">a</div>
            <div class="timeline-item">b</div>
        </section>
        <section id="contact" style="height: 1000px">
            <a class="contact-link" href="mailto:jane@example.com">mail</a>
            <a href="#missing">nowhere</a>
        </section>
        <div data-parallax="0.5">bg</div>
        <p>Built by hand with plain HTML and CSS, hosted as static files, and tuned so every section reads well on a phone as much as on a wide monitor. Thanks for scrolling all the way down here.</p>
    </body></html>"##;

    fn start(cfg: &EngineConfig) -> Page {
        let doc = parse_html(PAGE, "file:///page.html");
        let geo = compute_layout(&doc, cfg.viewport_width);
        Page::start(doc, geo, cfg)
    }

    fn active_hrefs(page: &Page) -> Vec<String> {
        let doc = page.document();
        doc.query_all(".nav-link.active")
            .unwrap()
            .into_iter()
            .map(|l| doc.attr(l, "href").unwrap().to_string())
            .collect()
    }

    fn section_top(page: &Page, id: &str) -> f32 {
        let doc = page.document();
        page.geometry().box_of(doc.element_by_id(id).unwrap()).unwrap().y
    }

    #[test]
    fn startup_reveals_what_is_on_screen() {
        let page = start(&EngineConfig::default().with_banner(false));
        let doc = page.document();
        let about = doc.query(".about-card").unwrap().unwrap();
        let timeline = doc.query(".timeline-item").unwrap().unwrap();
        assert!(doc.has_class(about, "visible"));
        assert!(!doc.has_class(timeline, "visible"));
        assert_eq!(page.revealed_at(about), Some(0.0));
        assert!(page.stylesheet().is_some());
    }

    #[test]
    fn scrolling_into_intro_highlights_intro() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let intro = section_top(&page, "intro");
        page.scroll_to(intro - 100.0);
        assert_eq!(active_hrefs(&page), vec!["#intro"]);
    }

    #[test]
    fn work_in_band_highlights_only_work() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let work = section_top(&page, "work");
        page.scroll_to(work + 10.0 - 160.0);
        assert_eq!(active_hrefs(&page), vec!["#work"]);
        assert_eq!(page.navigation().unwrap().active(), Some("work"));
    }

    #[test]
    fn anchor_click_animates_under_nav_bar() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let link = page.document().query("a[href=\"#contact\"]").unwrap().unwrap();
        page.click(link);
        assert!(page.is_scrolling());
        for _ in 0..40 {
            page.advance(1.0 / 60.0);
        }
        assert!(!page.is_scrolling());
        let nav_h = page
            .geometry()
            .box_of(page.document().query(".nav").unwrap().unwrap())
            .unwrap()
            .height;
        let expected = (section_top(&page, "contact") - nav_h)
            .min(page.viewport().max_scroll(page.geometry().document_height()));
        assert!((page.viewport().scroll_y - expected).abs() < 0.01);
        let contact_link = page.document().query(".contact-link").unwrap().unwrap();
        assert!(page.document().has_class(contact_link, "visible"));
    }

    #[test]
    fn anchor_to_missing_section_changes_nothing() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let before: Vec<Vec<String>> = (0..page.document().len())
            .map(|i| page.document().node(NodeId(i)).unwrap().class_list.clone())
            .collect();
        let a = page.document().query("a[href=\"#missing\"]").unwrap().unwrap();
        page.click(a);
        assert!(!page.is_scrolling());
        assert_eq!(page.viewport().scroll_y, 0.0);
        let after: Vec<Vec<String>> = (0..page.document().len())
            .map(|i| page.document().node(NodeId(i)).unwrap().class_list.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn user_scroll_cancels_animation() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let link = page.document().query("a[href=\"#work\"]").unwrap().unwrap();
        page.click(link);
        page.scroll_to(5.0);
        assert!(!page.is_scrolling());
        page.advance(1.0);
        assert_eq!(page.viewport().scroll_y, 5.0);
    }

    #[test]
    fn konami_runs_easter_egg_and_cleans_up() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let keys = [
            "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft", "ArrowRight", "b",
            "a",
        ];
        let triggered: Vec<bool> = keys.iter().map(|k| page.key_down(k)).collect();
        assert_eq!(triggered.iter().filter(|t| **t).count(), 1);
        let egg = page.document().query(".easter-egg").unwrap().unwrap();
        page.advance(2.5);
        assert!(!page.document().is_connected(egg));
        page.advance(1.0);
        let body = page.document().body().unwrap();
        assert_eq!(page.document().style(body, "filter"), Some("hue-rotate(0deg)"));
    }

    #[test]
    fn mobile_menu_and_pointer_effects() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let toggle = page.document().query(".nav-toggle").unwrap().unwrap();
        page.click(toggle);
        assert!(page.mobile_menu_open());
        let link = page.document().query("a[href=\"#work\"]").unwrap().unwrap();
        page.click(link);
        assert!(!page.mobile_menu_open());

        page.pointer_move(300.0, 200.0);
        let dot = page.trail_dots()[0];
        assert_eq!(page.document().style(dot, "left"), Some("300px"));

        page.scroll_to(100.0);
        let layer = page.document().query("[data-parallax]").unwrap().unwrap();
        assert_eq!(page.document().style(layer, "transform"), Some("translateY(50px)"));
    }

    #[test]
    fn scroll_past_end_clamps_to_max() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let max = page.viewport().max_scroll(page.geometry().document_height());
        assert!(max > 0.0);
        page.scroll_to(1.0e6);
        assert_eq!(page.viewport().scroll_y, max);
        page.scroll_by(-1.0e6);
        assert_eq!(page.viewport().scroll_y, 0.0);
    }

    #[test]
    fn resize_relays_out_and_reclamps() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        page.pointer_move(10.0, 10.0);
        let keys = [
            "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft", "ArrowRight", "b",
            "a",
        ];
        for k in keys {
            page.key_down(k);
        }
        let wide_height = page.geometry().document_height();
        page.scroll_to(1.0e6);

        page.resize(400.0, 800.0);
        let fresh = compute_layout(page.document(), 400.0);
        assert_eq!(page.geometry().document_height(), fresh.document_height());
        assert!(page.geometry().document_height() > wide_height);
        assert!(page.trail_dots().iter().all(|d| page.geometry().box_of(*d).is_none()));
        let egg = page.document().query(".easter-egg").unwrap().unwrap();
        assert!(page.geometry().box_of(egg).is_none());

        page.scroll_to(1.0e6);
        page.resize(1280.0, 800.0);
        let max = page.viewport().max_scroll(page.geometry().document_height());
        assert_eq!(page.viewport().scroll_y, max);
    }

    #[test]
    fn height_only_resize_keeps_layout() {
        let mut page = start(&EngineConfig::default().with_banner(false));
        let before = page.geometry().document_height();
        page.resize(1280.0, 400.0);
        assert_eq!(page.geometry().document_height(), before);
        assert_eq!(page.viewport().height, 400.0);
    }

    #[test]
    fn zero_duration_anchor_click_jumps() {
        let mut cfg = EngineConfig::default().with_banner(false);
        cfg.effects.smooth_scroll_secs = 0.0;
        let mut page = start(&cfg);
        let link = page.document().query("a[href=\"#work\"]").unwrap().unwrap();
        page.click(link);
        assert!(!page.is_scrolling());
        assert!(page.viewport().scroll_y > 0.0);
        assert_eq!(active_hrefs(&page), vec!["#work"]);
    }

    #[test]
    fn narrow_viewport_skips_decorations() {
        let page = start(&EngineConfig::default().with_banner(false).with_viewport(800.0, 600.0));
        assert!(page.trail_dots().is_empty());
    }

    #[test]
    fn without_observer_everything_is_revealed() {
        let cfg = EngineConfig::default().with_banner(false).with_host(HostCapabilities {
            intersection_observer: false,
        });
        let page = start(&cfg);
        assert!(page.reveal_targets().iter().all(|t| t.activated));
        let doc = page.document();
        for t in page.reveal_targets() {
            assert!(doc.has_class(t.node, "visible"));
        }
        assert!(page.navigation().is_none());
    }
}
