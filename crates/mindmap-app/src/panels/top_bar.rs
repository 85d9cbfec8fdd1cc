use egui::{RichText, Ui, ViewportCommand};

use crate::ui_consts::HEADING_TEXT_SIZE;
use crate::MindMapApp;

impl MindMapApp {
    pub fn ui_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("🧠 Mind Map").strong().size(HEADING_TEXT_SIZE));
            ui.separator();

            if ui
                .toggle_value(&mut self.read_only, "🔒 Read-only")
                .on_hover_text("Lock the map against edits")
                .changed()
            {
                self.canvas.escape();
            }

            let fullscreen = ui.ctx().input(|i| i.viewport().fullscreen.unwrap_or(false));
            if ui
                .selectable_label(fullscreen, "⛶ Fullscreen")
                .on_hover_text("F11")
                .clicked()
            {
                ui.ctx()
                    .send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
            }
            ui.separator();

            if ui
                .add_enabled(!self.read_only, egui::Button::new("📂 Import JSON"))
                .clicked()
            {
                let ctx = ui.ctx().clone();
                self.import_dialog(&ctx);
            }
            if ui
                .add_enabled(!self.read_only, egui::Button::new("🖼 Insert Image…"))
                .on_hover_text("Add a picture from a file; dropping one on the canvas works too")
                .clicked()
            {
                let ctx = ui.ctx().clone();
                self.insert_image_dialog(&ctx);
            }
            #[cfg(not(target_arch = "wasm32"))]
            if ui
                .add_enabled(!self.read_only, egui::Button::new("📋 Paste Image"))
                .on_hover_text("Add the picture on the clipboard")
                .clicked()
            {
                self.paste_clipboard_image();
            }
            if ui.button("💾 Export JSON").clicked() {
                self.export_json_file();
            }
            if ui.button("📝 Export Markdown").clicked() {
                self.export_markdown_file();
            }
            if ui.button("Save Map").on_hover_text("Ctrl + S").clicked() {
                self.save_map();
            }

            if !self.read_only {
                if let Some(id) = self.canvas.selected.clone() {
                    ui.separator();
                    if ui
                        .button("➕ Add Subtopic")
                        .on_hover_text("Add a connected subtopic next to the selection")
                        .clicked()
                    {
                        self.add_subtopic(&id);
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.toggle_value(&mut self.show_help, "❓");
            });
        });
    }
}
