//! `PreviewApp`: the top-level egui application state.
//!
//! This module declares the `PreviewApp` struct and its constructor.
//! All methods are split across the sibling sub-modules:
//!
//! - `navigation`: page loading, history, async fetch
//! - `toolbar`: address bar and controls
//! - `content`: page canvas, input dispatch, inspector

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::sync::mpsc;

use eframe::egui;

use page_reveal::dom::NodeId;
use page_reveal::engine::page::Page;
use page_reveal::engine::pipeline::PageError;
use page_reveal::engine::viewport::ObservationPolicy;

/// Which nav highlight band the next load uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBand {
    /// Line 20% down the viewport
    Offset,
    /// Line through the viewport's middle
    Centered,
}

impl NavBand {
    pub fn policy(self) -> ObservationPolicy {
        match self {
            NavBand::Offset => ObservationPolicy::nav_band_offset(),
            NavBand::Centered => ObservationPolicy::nav_band_centered(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavBand::Offset => "Band 20%",
            NavBand::Centered => "Band 50%",
        }
    }
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct PreviewApp {
    pub url_input: String,
    pub page: Option<Page>,
    pub error: Option<String>,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<Result<Page, PageError>>>,
    pub nav_band: NavBand,
    pub show_inspector: bool,
    // History (back / forward)
    pub history: Vec<String>,
    pub history_idx: usize,
    /// Canvas size last frame; new pages are laid out at this size.
    pub canvas_size: egui::Vec2,
    /// Element last clicked on the canvas, shown in the inspector.
    pub selected: Option<NodeId>,
}

impl PreviewApp {
    pub fn new(ctx: &egui::Context, initial: Option<String>) -> Self {
        let mut app = Self {
            url_input: initial.clone().unwrap_or_default(),
            page: None,
            error: None,
            loading: false,
            fetch_rx: None,
            nav_band: NavBand::Offset,
            show_inspector: true,
            history: Vec::new(),
            history_idx: 0,
            canvas_size: egui::vec2(1280.0, 760.0),
            selected: None,
        };
        if initial.is_some() {
            app.navigate(ctx);
        }
        app
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_fetch();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        if self.show_inspector {
            egui::SidePanel::right("inspector")
                .default_width(260.0)
                .show(ctx, |ui| {
                    self.draw_inspector(ui);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_content(ui);
            });

        if self.page.is_some() {
            // Transitions and timers run on the frame clock.
            ctx.request_repaint();
        }
    }
}
