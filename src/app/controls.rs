use eframe::egui::{Align, Layout, RichText, Ui};

use super::WorkspaceApp;
use super::draw::{MIDNIGHT, PAPER};

impl WorkspaceApp {
    pub(super) fn show_controls(&mut self, ui: &mut Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("tetherboard").strong());
            ui.separator();

            if ui.button("Save layout").clicked() {
                self.request_save(now);
            }
            if ui.button("Restore").clicked() {
                self.request_load(now);
            }

            ui.separator();

            let theme = self.workspace.theme.clone();
            let next = if theme == PAPER.name { MIDNIGHT } else { PAPER };
            if ui.button(format!("Theme: {theme}")).clicked() {
                self.set_theme(next.name, now);
            }

            let mut flower = self.workspace.flower_mode;
            if ui.checkbox(&mut flower, "Flower layout").changed() {
                self.workspace.flower_mode = flower;
                self.reopen_open_groups();
            }

            let mut background = self.workspace.background_animation;
            if ui.checkbox(&mut background, "Background").changed() {
                self.workspace.background_animation = background;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if !self.status.text.is_empty() {
                    ui.label(self.status.text.clone());
                }
            });
        });
    }

    // Re-runs the open transition so children move to the new layout.
    fn reopen_open_groups(&mut self) {
        let open_keys: Vec<String> = self
            .workspace
            .groups()
            .filter(|group| group.open)
            .map(|group| group.key.clone())
            .collect();
        for key in open_keys {
            self.workspace.toggle_group(&key);
            self.workspace.toggle_group(&key);
        }
    }
}
