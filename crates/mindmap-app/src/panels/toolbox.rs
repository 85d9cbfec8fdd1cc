use egui::{CollapsingHeader, Id, RichText, Ui};
use egui_mindmap::node_types::{self, NodeTypeInfo, ToolboxGroup};
use egui_mindmap::NodeTemplate;

use crate::ui_consts::{HEADING_TEXT_SIZE, SECTION_SPACING, UI_MARGIN};
use crate::MindMapApp;

impl MindMapApp {
    pub fn ui_toolbox(&mut self, ui: &mut Ui) {
        ui.add_space(UI_MARGIN);
        ui.label(RichText::new("Toolbox").strong().size(HEADING_TEXT_SIZE));
        ui.weak(if self.read_only {
            "Read-only: unlock to add nodes"
        } else {
            "Drag onto the canvas"
        });
        ui.add_space(SECTION_SPACING);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (title, group) in [
                ("Topics", ToolboxGroup::Topics),
                ("Subtopics", ToolboxGroup::Subtopics),
            ] {
                CollapsingHeader::new(title).default_open(true).show(ui, |ui| {
                    for info in node_types::in_group(group) {
                        self.toolbox_entry(ui, info);
                        ui.add_space(SECTION_SPACING);
                    }
                });
            }

            ui.separator();
            let mut dark = self.dark_mode;
            let label = if dark { "🌙 Dark theme" } else { "☀ Light theme" };
            if ui
                .toggle_value(&mut dark, label)
                .on_hover_text("Toggle dark or light visuals")
                .changed()
            {
                let ctx = ui.ctx().clone();
                self.set_dark_mode(&ctx, dark);
            }
        });
    }

    fn toolbox_entry(&self, ui: &mut Ui, info: &'static NodeTypeInfo) {
        let body = |ui: &mut Ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(format!("{} {}", info.icon, info.name)).strong());
                ui.small(info.description);
            });
        };
        if self.read_only {
            body(ui);
            return;
        }
        ui.dnd_drag_source(
            Id::new(("toolbox", info.key)),
            NodeTemplate {
                node_type: info.key,
            },
            body,
        );
    }
}
