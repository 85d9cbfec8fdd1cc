use egui::{Context, Grid, Window};

use crate::keybindings::HELP;
use crate::MindMapApp;

impl MindMapApp {
    pub fn ui_help_window(&mut self, ctx: &Context) {
        Window::new("Keyboard shortcuts")
            .open(&mut self.show_help)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                Grid::new("shortcuts").striped(true).show(ui, |ui| {
                    for (keys, action) in HELP {
                        ui.monospace(keys);
                        ui.label(action);
                        ui.end_row();
                    }
                });
                ui.add_space(4.0);
                ui.weak("Double-click a node to rename it, right-click for more actions.");
                ui.weak("Drop a picture on the canvas or use Insert Image to add an image node.");
            });
    }
}
