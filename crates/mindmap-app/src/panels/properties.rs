use egui::text::{CCursor, CCursorRange};
use egui::text_edit::TextEditState;
use egui::{Button, ComboBox, Context, Key, RichText, TextEdit, TextStyle, Ui};
use egui_mindmap::node_types::{self, ToolboxGroup};
use egui_mindmap::notes::{preview_text, Format};
use egui_mindmap::{Action, Node, NodeUpdate};
use web_time::Instant;

use super::note_editor_id;
use crate::ui_consts::{HEADING_TEXT_SIZE, NOTE_EDITOR_ROWS, SECTION_SPACING, UI_MARGIN};
use crate::{MindMapApp, NameEdit};

/// New name to store for `text`, if any: trimmed, non-empty and different from `current`.
fn committed_name(text: &str, current: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty() && trimmed != current).then(|| trimmed.to_owned())
}

impl MindMapApp {
    pub fn ui_properties(&mut self, ui: &mut Ui, node_id: &str) {
        let Some(node) = self.map.node(node_id).cloned() else {
            return;
        };

        ui.add_space(UI_MARGIN);
        ui.label(
            RichText::new(format!("{} Properties", node_types::icon(&node.node_type)))
                .strong()
                .size(HEADING_TEXT_SIZE),
        );
        ui.add_space(SECTION_SPACING);

        egui::ScrollArea::vertical().show(ui, |ui| {
            self.ui_name_field(ui, &node);
            ui.add_space(SECTION_SPACING);
            self.ui_type_picker(ui, &node);
            ui.add_space(SECTION_SPACING);
            ui.separator();
            self.ui_connections(ui, &node.id);
            ui.separator();
            self.ui_note_editor(ui);
        });
    }

    fn ui_name_field(&mut self, ui: &mut Ui, node: &Node) {
        if self.name_edit.node_id.as_deref() != Some(node.id.as_str()) {
            self.name_edit = NameEdit {
                node_id: Some(node.id.clone()),
                text: node.name.clone(),
            };
        }

        ui.label("Name");
        let resp = ui.add_enabled(
            !self.read_only,
            TextEdit::singleline(&mut self.name_edit.text).desired_width(f32::INFINITY),
        );

        if resp.lost_focus() {
            let cancelled = ui.input(|i| i.key_pressed(Key::Escape));
            match committed_name(&self.name_edit.text, &node.name).filter(|_| !cancelled) {
                Some(name) => {
                    self.name_edit.text.clone_from(&name);
                    self.dispatcher
                        .dispatch(Action::update_node(&node.id, NodeUpdate::name(name)));
                }
                None => self.name_edit.text.clone_from(&node.name),
            }
        } else if !resp.has_focus() && self.name_edit.text != node.name {
            // renamed elsewhere, e.g. on the canvas
            self.name_edit.text.clone_from(&node.name);
        }
    }

    fn ui_type_picker(&mut self, ui: &mut Ui, node: &Node) {
        let current = node_types::lookup(&node.node_type)
            .map_or(node.node_type.as_str(), |t| t.name);

        ui.label("Type");
        ui.add_enabled_ui(!self.read_only, |ui| {
            ComboBox::from_id_salt("node_type")
                .selected_text(format!("{} {current}", node_types::icon(&node.node_type)))
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    let offered = node_types::REGISTRY
                        .iter()
                        .filter(|t| t.group != ToolboxGroup::Hidden || t.key == node.node_type);
                    for info in offered {
                        let label = format!("{} {}", info.icon, info.name);
                        if ui
                            .selectable_label(info.key == node.node_type, label)
                            .clicked()
                            && info.key != node.node_type
                        {
                            self.dispatcher.dispatch(Action::update_node(
                                &node.id,
                                NodeUpdate::node_type(info.key),
                            ));
                        }
                    }
                });
        });
    }

    fn ui_connections(&mut self, ui: &mut Ui, node_id: &str) {
        let name_of = |id: &str| {
            self.map
                .node(id)
                .map_or_else(|| id.to_owned(), |n| n.name.clone())
        };
        let outgoing: Vec<(String, String)> = self
            .map
            .outgoing(node_id)
            .map(|c| (c.id.clone(), name_of(&c.to)))
            .collect();
        let incoming: Vec<(String, String)> = self
            .map
            .incoming(node_id)
            .map(|c| (c.id.clone(), name_of(&c.from)))
            .collect();

        let mut remove = None;
        for (title, arrow, list) in [
            ("Outgoing", "→", &outgoing),
            ("Incoming", "←", &incoming),
        ] {
            ui.label(RichText::new(format!("{title} ({})", list.len())).strong());
            if list.is_empty() {
                ui.weak("None");
            }
            for (conn_id, other) in list {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.read_only, Button::new("✖").small())
                        .on_hover_text("Remove connection")
                        .clicked()
                    {
                        remove = Some(conn_id.clone());
                    }
                    ui.label(format!("{arrow} {other}"));
                });
            }
            ui.add_space(SECTION_SPACING);
        }

        if let Some(id) = remove {
            self.dispatcher.dispatch(Action::remove_connection(id));
        }
    }

    fn ui_note_editor(&mut self, ui: &mut Ui) {
        let now = Instant::now();
        ui.label(RichText::new("Notes").strong());

        ui.add_enabled_ui(!self.read_only, |ui| {
            ui.horizontal_wrapped(|ui| {
                for format in Format::ALL {
                    if ui
                        .small_button(format.label())
                        .on_hover_text(format.tooltip())
                        .clicked()
                    {
                        self.apply_format(ui.ctx(), format, now);
                    }
                }
            });
        });

        let resp = ui.add(
            TextEdit::multiline(self.note_session.content_mut())
                .id(note_editor_id())
                .font(TextStyle::Monospace)
                .desired_rows(NOTE_EDITOR_ROWS)
                .desired_width(f32::INFINITY)
                .interactive(!self.read_only)
                .hint_text("Write notes for this node…"),
        );
        if resp.changed() {
            self.note_session.edited(now);
        }

        ui.horizontal(|ui| {
            let saving = self.note_session.is_saving(now);
            let label = if saving { "Saving…" } else { "Save" };
            if ui
                .add_enabled(!self.read_only && !saving, Button::new(label))
                .clicked()
            {
                let result = self.note_session.save(&mut self.store, now);
                self.note_saved(result);
            }
            if self.note_session.has_unsaved_changes() {
                ui.weak("Unsaved changes");
            }
        });

        let preview = preview_text(self.note_session.content());
        if !preview.is_empty() {
            ui.add_space(SECTION_SPACING);
            ui.weak(format!("Card preview: {preview}"));
        }
    }

    /// Applies `format` to the editor's selection, or to an empty range at the end.
    fn apply_format(&mut self, ctx: &Context, format: Format, now: Instant) {
        let id = note_editor_id();
        let mut state = TextEditState::load(ctx, id).unwrap_or_default();
        let content = self.note_session.content_mut();
        let selection = state.cursor.char_range().map_or_else(
            || {
                let end = content.chars().count();
                end..end
            },
            |r| {
                let (a, b) = (r.primary.index, r.secondary.index);
                a.min(b)..a.max(b)
            },
        );

        let selected = format.apply(content, selection);
        state.cursor.set_char_range(Some(CCursorRange::two(
            CCursor::new(selected.start),
            CCursor::new(selected.end),
        )));
        state.store(ctx, id);
        ctx.memory_mut(|m| m.request_focus(id));
        self.note_session.edited(now);
    }
}
