//! Page canvas for `PreviewApp`.
//!
//! Forwards wheel, pointer, click and key input to the running `Page`,
//! ticks its clock, and paints the laid-out boxes with their reveal frames.

use eframe::egui;
use egui::ecolor::Hsva;

use page_reveal::dom::css::{parse_css_size, serialize_declarations};
use page_reveal::dom::{Document, NodeId, NodeType};
use page_reveal::engine::page::Page;
use page_reveal::render::animator::composed_frame;

use super::PreviewApp;

const INK: egui::Color32 = egui::Color32::from_rgb(20, 20, 20);
const PAPER: egui::Color32 = egui::Color32::from_rgb(250, 248, 240);
const HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(255, 220, 60);

impl PreviewApp {
    /// Main canvas: spinner, error, page, or the empty-state hint.
    pub fn draw_content(&mut self, ui: &mut egui::Ui) {
        if self.loading {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        if let Some(ref error) = self.error {
            ui.colored_label(egui::Color32::RED, error);
            return;
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        self.canvas_size = rect.size();

        let page = match self.page.as_mut() {
            Some(p) => p,
            None => {
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Open a page by path or URL",
                    egui::FontId::proportional(18.0),
                    egui::Color32::GRAY,
                );
                return;
            }
        };

        if page.viewport().width != rect.width() || page.viewport().height != rect.height() {
            page.resize(rect.width(), rect.height());
        }

        let keyboard_free = !ui.ctx().wants_keyboard_input();
        let (scroll, hover, dt, keys) = ui.input(|i| {
            let keys: Vec<String> = if keyboard_free {
                i.events
                    .iter()
                    .filter_map(|e| match e {
                        egui::Event::Key {
                            key,
                            pressed: true,
                            repeat: false,
                            ..
                        } => Some(key_name(*key)),
                        _ => None,
                    })
                    .collect()
            } else {
                Vec::new()
            };
            (i.raw_scroll_delta.y, i.pointer.hover_pos(), i.stable_dt, keys)
        });

        if response.hovered() && scroll != 0.0 {
            page.scroll_by(-scroll);
        }
        if let Some(pos) = hover.filter(|p| rect.contains(*p)) {
            page.pointer_move(pos.x - rect.min.x, pos.y - rect.min.y);
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.selected = page.click_at(pos.x - rect.min.x, pos.y - rect.min.y);
            }
        }
        for key in keys {
            if page.key_down(&key) {
                log::debug!("konami sequence completed");
            }
        }
        page.advance(dt);

        paint_page(ui, rect, page);
    }

    /// Runtime state and the selected element's classes and inline style.
    pub fn draw_inspector(&self, ui: &mut egui::Ui) {
        let page = match &self.page {
            Some(p) => p,
            None => {
                ui.label("No page loaded");
                return;
            }
        };
        let doc = page.document();
        ui.heading(if doc.title.is_empty() { "Untitled" } else { doc.title.as_str() });
        ui.label(egui::RichText::new(&doc.url).monospace().small());
        ui.separator();

        let viewport = page.viewport();
        ui.label(format!(
            "Scroll: {:.0} / {:.0}",
            viewport.scroll_y,
            viewport.max_scroll(page.geometry().document_height())
        ));
        let targets = page.reveal_targets();
        let revealed = targets.iter().filter(|t| t.activated).count();
        ui.label(format!("Revealed: {} / {}", revealed, targets.len()));
        match page.navigation() {
            Some(nav) => ui.label(format!("Active section: {}", nav.active().unwrap_or("-"))),
            None => ui.label("Nav highlight: off"),
        };
        ui.label(format!("Menu open: {}", page.mobile_menu_open()));
        ui.label(format!("Konami: {}/10", page.konami_progress()));
        ui.label(format!("Clock: {:.2}s", page.now()));

        if let Some((id, node)) = self.selected.and_then(|id| doc.node(id).map(|n| (id, n))) {
            ui.separator();
            ui.label(egui::RichText::new(format!("<{}> #{}", node.tag, id.0)).strong());
            if !node.class_list.is_empty() {
                ui.label(format!(".{}", node.class_list.join(" .")));
            }
            let style = serialize_declarations(&node.style);
            if !style.is_empty() {
                ui.label(egui::RichText::new(style).monospace().small());
            }
            if let Some(at) = page.revealed_at(id) {
                ui.label(format!("Revealed at {:.2}s", at));
            }
        }
    }
}

fn key_name(key: egui::Key) -> String {
    match key {
        egui::Key::ArrowUp => "ArrowUp".into(),
        egui::Key::ArrowDown => "ArrowDown".into(),
        egui::Key::ArrowLeft => "ArrowLeft".into(),
        egui::Key::ArrowRight => "ArrowRight".into(),
        other => other.name().to_lowercase(),
    }
}

fn heading_size(doc: &Document, parent: Option<NodeId>) -> f32 {
    let tag = parent.and_then(|p| doc.node(p)).map(|n| n.tag.as_str()).unwrap_or("");
    match tag {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        _ => 14.0,
    }
}

fn with_alpha(c: egui::Color32, opacity: f32) -> egui::Color32 {
    let a = (c.a() as f32 * opacity.clamp(0.0, 1.0)) as u8;
    egui::Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), a)
}

fn rotate_hue(c: egui::Color32, turns: f32) -> egui::Color32 {
    if turns == 0.0 {
        return c;
    }
    let mut hsva = Hsva::from(c);
    hsva.h = (hsva.h + turns).rem_euclid(1.0);
    hsva.into()
}

/// `hue-rotate(<deg>)` on `<body>`, as a fraction of a turn.
fn body_hue_turns(doc: &Document) -> f32 {
    doc.body()
        .and_then(|b| doc.style(b, "filter"))
        .and_then(|f| f.strip_prefix("hue-rotate(")?.strip_suffix("deg)")?.trim().parse::<f32>().ok())
        .map(|deg| deg / 360.0)
        .unwrap_or(0.0)
}

fn paint_page(ui: &egui::Ui, rect: egui::Rect, page: &Page) {
    let doc = page.document();
    let scroll = page.viewport().scroll_y;
    let turns = body_hue_turns(doc);
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, rotate_hue(PAPER, turns));

    let origin = rect.min - egui::vec2(0.0, scroll);
    for (id, b, _depth) in page.geometry().iter() {
        if b.bottom() < scroll || b.y > scroll + rect.height() || !doc.is_connected(id) {
            continue;
        }
        let node = match doc.node(id) {
            Some(n) => n,
            None => continue,
        };
        let frame = composed_frame(doc, id, |n| page.revealed_at(n), page.now());
        if frame.opacity <= 0.0 {
            continue;
        }
        let min = origin + egui::vec2(b.x + frame.dx, b.y + frame.dy);
        let r = egui::Rect::from_min_size(min, egui::vec2(b.width, b.height));
        match node.node_type {
            NodeType::Text => {
                let text = node.text.trim();
                if text.is_empty() {
                    continue;
                }
                let size = heading_size(doc, node.parent);
                let color = with_alpha(rotate_hue(INK, turns), frame.opacity);
                let galley = painter.layout(text.to_string(), egui::FontId::proportional(size), color, r.width());
                painter.galley(r.min, galley, color);
            }
            NodeType::Element if b.height > 0.0 => {
                if node.has_class("active") {
                    painter.rect_filled(r, 2.0, with_alpha(rotate_hue(HIGHLIGHT, turns), frame.opacity));
                }
                if !node.class_list.is_empty() {
                    let stroke = egui::Stroke::new(1.0, with_alpha(rotate_hue(INK, turns), frame.opacity * 0.4));
                    painter.rect_stroke(r, 2.0, stroke);
                }
            }
            _ => {}
        }
    }

    paint_overlays(&painter, rect, doc, page, turns);
}

/// Nodes created at runtime have no layout box: the cursor trail and the
/// easter-egg message are drawn from their inline styles.
fn paint_overlays(painter: &egui::Painter, rect: egui::Rect, doc: &Document, page: &Page, turns: f32) {
    for dot in page.trail_dots() {
        if doc.style(*dot, "display") != Some("block") {
            continue;
        }
        let x = doc.style(*dot, "left").and_then(parse_css_size);
        let y = doc.style(*dot, "top").and_then(parse_css_size);
        let opacity = doc
            .style(*dot, "opacity")
            .and_then(|o| o.parse::<f32>().ok())
            .unwrap_or(1.0);
        if let (Some(x), Some(y)) = (x, y) {
            painter.rect_filled(
                egui::Rect::from_center_size(rect.min + egui::vec2(x, y), egui::vec2(8.0, 8.0)),
                0.0,
                with_alpha(rotate_hue(INK, turns), opacity),
            );
        }
    }

    if let Ok(Some(egg)) = doc.query(".easter-egg") {
        let message = doc.collect_text(egg);
        let galley = painter.layout_no_wrap(message, egui::FontId::proportional(28.0), INK);
        let panel = egui::Rect::from_center_size(rect.center(), galley.size() + egui::vec2(64.0, 40.0));
        painter.rect_filled(panel.translate(egui::vec2(8.0, 8.0)), 0.0, INK);
        painter.rect_filled(panel, 0.0, HIGHLIGHT);
        painter.rect_stroke(panel, 0.0, egui::Stroke::new(4.0, INK));
        painter.galley(panel.center() - galley.size() / 2.0, galley, INK);
    }
}
