use eframe::egui::{Color32, RichText, Ui};

use super::super::ViewModel;
use super::super::store::MAX_VISIBLE_SIBLINGS;

impl ViewModel {
    pub(in crate::app) fn draw_footer(&mut self, ui: &mut Ui) {
        ui.horizontal_centered(|ui| {
            let Some(selected_id) = self.store.selected_node_id().map(str::to_string) else {
                ui.label(
                    RichText::new("Click a node to select it. Double-click to focus and expand.")
                        .small()
                        .color(Color32::from_gray(140)),
                );
                return;
            };

            let label = self
                .store
                .nodes()
                .get(&selected_id)
                .map(|node| node.label.clone())
                .unwrap_or_else(|| selected_id.clone());
            ui.label(RichText::new(label).strong());

            let total = self.store.child_total(&selected_id);
            if total <= MAX_VISIBLE_SIBLINGS {
                if total > 0 {
                    ui.label(
                        RichText::new(format!("{total} children"))
                            .small()
                            .color(Color32::from_gray(150)),
                    );
                }
                return;
            }

            let page_count = total.div_ceil(MAX_VISIBLE_SIBLINGS);
            let page = self
                .store
                .sibling_page_by_parent()
                .get(&selected_id)
                .copied()
                .unwrap_or(0)
                .min(page_count - 1);

            ui.separator();
            if ui.add_enabled(page > 0, eframe::egui::Button::new("◀")).clicked() {
                self.store.set_sibling_page(&selected_id, page - 1);
            }
            ui.label(format!("page {} / {page_count}", page + 1));
            if ui
                .add_enabled(page + 1 < page_count, eframe::egui::Button::new("▶"))
                .clicked()
            {
                self.store.set_sibling_page(&selected_id, page + 1);
            }
            ui.label(
                RichText::new(format!("{total} children"))
                    .small()
                    .color(Color32::from_gray(150)),
            );
        });
    }
}
