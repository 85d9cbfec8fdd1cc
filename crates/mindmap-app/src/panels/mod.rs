use egui::{Align2, Color32, Id, Rect, Ui};

mod help;
mod properties;
mod status_bar;
mod toolbox;
mod top_bar;

/// Id of the note editor's text field, used to tell whether it has keyboard focus.
pub fn note_editor_id() -> Id {
    Id::new("note_editor")
}

pub fn paint_drop_overlay(ui: &Ui, rect: Rect) {
    let fade = Color32::from_black_alpha(140);
    ui.painter().rect_filled(rect, 0.0, fade);

    let font = egui::TextStyle::Heading.resolve(ui.style());
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Drop a mind map JSON file to load it",
        font,
        Color32::WHITE,
    );
}
