//! Toolbar rendering for `PreviewApp`.
//!
//! Draws the address bar, back/forward buttons, nav band selector and the
//! inspector toggle.

use eframe::egui;

use super::{NavBand, PreviewApp};

impl PreviewApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Back / Forward
            let can_back = self.history_idx > 0;
            let can_fwd = self.history_idx + 1 < self.history.len();
            if ui
                .add_enabled(can_back, egui::Button::new("\u{25C0}").min_size(egui::vec2(28.0, 24.0)))
                .clicked()
            {
                self.go_back(ctx);
            }
            if ui
                .add_enabled(can_fwd, egui::Button::new("\u{25B6}").min_size(egui::vec2(28.0, 24.0)))
                .clicked()
            {
                self.go_forward(ctx);
            }

            // Source bar
            let response = ui.add_sized(
                [ui.available_width() - 260.0, 24.0],
                egui::TextEdit::singleline(&mut self.url_input)
                    .hint_text("Path or URL...")
                    .font(egui::TextStyle::Monospace),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.navigate(ctx);
            }

            if ui.button("Go").clicked() {
                self.navigate(ctx);
            }

            // Nav band selector; takes effect on reload
            let prev_band = self.nav_band;
            egui::ComboBox::from_id_salt("nav_band")
                .selected_text(self.nav_band.label())
                .show_ui(ui, |ui| {
                    for band in [NavBand::Offset, NavBand::Centered] {
                        ui.selectable_value(&mut self.nav_band, band, band.label());
                    }
                });
            if self.nav_band != prev_band && self.page.is_some() {
                self.navigate_no_history(ctx);
            }

            ui.toggle_value(&mut self.show_inspector, "Inspector");
        });
    }
}
