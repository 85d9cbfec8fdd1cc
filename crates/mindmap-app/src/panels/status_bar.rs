use egui::{Color32, RichText, Ui};

use crate::status::StatusKind;
use crate::ui_consts::INFO_TEXT_SIZE;
use crate::util::build_version;
use crate::MindMapApp;

const TIP: &str = "Drag node types from the toolbox onto the canvas. Shift + drag or use the handle to connect nodes.";

fn kind_color(kind: StatusKind, dark: bool) -> Color32 {
    match (kind, dark) {
        (StatusKind::Info, true) => Color32::LIGHT_BLUE,
        (StatusKind::Info, false) => Color32::from_rgb(30, 90, 180),
        (StatusKind::Success, true) => Color32::LIGHT_GREEN,
        (StatusKind::Success, false) => Color32::from_rgb(20, 130, 60),
        (StatusKind::Error, true) => Color32::LIGHT_RED,
        (StatusKind::Error, false) => Color32::from_rgb(190, 40, 40),
    }
}

impl MindMapApp {
    pub fn ui_status_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            match self.status.latest() {
                Some(msg) => {
                    ui.label(
                        RichText::new(&msg.stamp)
                            .weak()
                            .monospace()
                            .size(INFO_TEXT_SIZE),
                    );
                    ui.label(
                        RichText::new(&msg.text)
                            .color(kind_color(msg.kind, self.dark_mode))
                            .size(INFO_TEXT_SIZE),
                    );
                }
                None => {
                    let tip = if self.read_only {
                        "Read-only mode. Unlock to edit the map."
                    } else {
                        TIP
                    };
                    ui.label(RichText::new(tip).weak().size(INFO_TEXT_SIZE));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(build_version()).weak().size(INFO_TEXT_SIZE));
                ui.separator();
                let zoom = self.canvas.transform.scale * 100.;
                ui.label(RichText::new(format!("{zoom:.0}%")).size(INFO_TEXT_SIZE));
            });
        });
    }
}
