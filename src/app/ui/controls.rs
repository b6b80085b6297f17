use eframe::egui::{Color32, RichText, Slider, Ui};

use crate::project::SemanticType;

use super::super::ViewModel;
use super::super::prefs::{MAX_MOTION_SPEED, MIN_MOTION_SPEED};
use super::super::store::{MAX_CONNECTION_DEPTH, MIN_CONNECTION_DEPTH, SyncStatus};

impl ViewModel {
    pub(in crate::app) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        reload_requested: &mut bool,
        is_syncing: bool,
    ) {
        ui.add_space(8.0);
        ui.heading(self.store.project_id().to_string());
        ui.horizontal(|ui| {
            self.sync_badge(ui, is_syncing);
            if self.source_is_mock {
                ui.label(
                    RichText::new("sample data")
                        .small()
                        .color(Color32::from_gray(150)),
                );
            }
        });
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Reload").clicked() {
                *reload_requested = true;
            }
            ui.add_enabled_ui(!self.source_is_mock, |ui| {
                ui.checkbox(&mut self.auto_refresh_enabled, "Auto-refresh");
            });
        });
        ui.separator();

        ui.label("Connection depth");
        ui.horizontal(|ui| {
            let depth = self.store.connection_depth();
            if ui
                .add_enabled(depth > MIN_CONNECTION_DEPTH, eframe::egui::Button::new("−"))
                .clicked()
            {
                self.store.set_connection_depth(depth - 1);
            }
            ui.label(depth.to_string());
            if ui
                .add_enabled(depth < MAX_CONNECTION_DEPTH, eframe::egui::Button::new("+"))
                .clicked()
            {
                self.store.set_connection_depth(depth + 1);
            }
        });
        ui.add_space(6.0);

        ui.label("Motion speed");
        ui.add(
            Slider::new(
                &mut self.motion_speed_factor,
                MIN_MOTION_SPEED..=MAX_MOTION_SPEED,
            )
            .fixed_decimals(1),
        );
        ui.separator();

        ui.label("Node types");
        for semantic_type in SemanticType::FILTERABLE {
            let mut visible = self.type_filters.is_visible(semantic_type);
            if ui.checkbox(&mut visible, semantic_type.label()).changed() {
                self.type_filters.toggle(semantic_type);
                self.frame_dirty = true;
            }
        }
        ui.separator();

        ui.label(
            RichText::new(format!(
                "{} nodes · {} edges visible",
                self.visible_node_count, self.visible_edge_count
            ))
            .small()
            .color(Color32::from_gray(150)),
        );
    }

    fn sync_badge(&self, ui: &mut Ui, is_syncing: bool) {
        let (text, color) = if is_syncing {
            ("syncing", Color32::from_rgb(244, 190, 102))
        } else {
            match self.store.sync_status() {
                SyncStatus::Connected => ("connected", Color32::from_rgb(110, 214, 166)),
                SyncStatus::Syncing => ("syncing", Color32::from_rgb(244, 190, 102)),
                SyncStatus::Error => ("sync error", Color32::from_rgb(240, 120, 110)),
            }
        };
        ui.label(RichText::new(text).small().color(color));
    }
}
