//! Navigation methods for `PreviewApp`.
//!
//! Covers history management (`go_back`, `go_forward`, `navigate`) and the
//! asynchronous page-load lifecycle (`navigate_no_history`, `check_fetch`).

use std::sync::mpsc;

use eframe::egui;

use page_reveal::config::EngineConfig;
use page_reveal::engine::pipeline::PageEngine;

use super::PreviewApp;

impl PreviewApp {
    /// Navigate one step back in history.
    pub fn go_back(&mut self, ctx: &egui::Context) {
        if self.history_idx > 0 {
            self.history_idx -= 1;
            self.url_input = self.history[self.history_idx].clone();
            self.navigate_no_history(ctx);
        }
    }

    /// Navigate one step forward in history.
    pub fn go_forward(&mut self, ctx: &egui::Context) {
        if self.history_idx + 1 < self.history.len() {
            self.history_idx += 1;
            self.url_input = self.history[self.history_idx].clone();
            self.navigate_no_history(ctx);
        }
    }

    /// Push the current source to history and start loading.
    pub fn navigate(&mut self, ctx: &egui::Context) {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            return;
        }
        if self.history.is_empty() || self.history[self.history_idx] != url {
            // Truncate forward history before pushing
            self.history.truncate(self.history_idx + 1);
            self.history.push(url);
            self.history_idx = self.history.len() - 1;
        }
        self.navigate_no_history(ctx);
    }

    /// Start an async page load without touching history.
    pub fn navigate_no_history(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;
        self.selected = None;

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let source = self.url_input.trim().to_string();
        let config = EngineConfig::default()
            .with_viewport(self.canvas_size.x, self.canvas_size.y)
            .with_nav_policy(self.nav_band.policy());
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let engine = PageEngine::new(config);
            let result = engine.load_page(&source);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll the async load channel and update app state when a result arrives.
    pub fn check_fetch(&mut self) {
        let result = match &self.fetch_rx {
            Some(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(_) => return,
            },
            None => return,
        };
        match result {
            Ok(page) => {
                log::info!(
                    "loaded {} ({} reveal targets)",
                    page.document().url,
                    page.reveal_targets().len()
                );
                self.page = Some(page);
                self.error = None;
            }
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e.to_string());
                self.page = None;
            }
        }
        self.loading = false;
        self.fetch_rx = None;
    }
}
