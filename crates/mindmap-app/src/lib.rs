use eframe::{App, CreationContext};
use egui::{CentralPanel, Context, Frame, SidePanel, TopBottomPanel, ViewportCommand, Visuals};
use egui_mindmap::notes::NoteSession;
use egui_mindmap::storage::{self, KeyValueStore};
use egui_mindmap::{
    node_types, Action, CanvasState, Dispatcher, MindMap, MindMapView, NodeUpdate, NoteData,
    SettingsInteraction, SettingsNavigation, SettingsStyle, StorageError,
};
use web_time::Instant;

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

mod config;
mod files;
mod images;
mod keybindings;
mod panels;
mod status;
mod ui_consts;
mod util;

pub use config::AppConfig;
pub use files::Upload;
pub use images::ImageUpload;
pub use keybindings::Command;
pub use status::{StatusKind, StatusQueue};

/// Name field of the properties panel, tracked per node.
#[derive(Debug, Clone, Default)]
pub struct NameEdit {
    pub node_id: Option<String>,
    pub text: String,
}

pub struct MindMapApp {
    pub config: AppConfig,
    pub map: MindMap,
    pub canvas: CanvasState,
    pub dispatcher: Dispatcher,
    pub store: Box<dyn KeyValueStore>,
    /// Cache of every stored note, used for card previews.
    pub notes: NoteData,
    pub note_session: NoteSession,
    pub name_edit: NameEdit,
    pub settings_navigation: SettingsNavigation,
    pub read_only: bool,
    pub dark_mode: bool,
    pub show_help: bool,
    pub drag_hover: bool,
    pub status: StatusQueue,
    #[cfg(target_arch = "wasm32")]
    pub web_upload_buf: Rc<RefCell<Vec<Upload>>>,
    /// Pictures picked or pasted in the browser, added on the next frame.
    #[cfg(target_arch = "wasm32")]
    pub web_image_buf: Rc<RefCell<Vec<ImageUpload>>>,
}

impl MindMapApp {
    pub fn new(cc: &CreationContext<'_>) -> Self {
        Self::with_config(cc, AppConfig::from_env())
    }

    pub fn with_config(cc: &CreationContext<'_>, config: AppConfig) -> Self {
        // Ctrl +/- drive the canvas zoom, not the UI scale
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        #[cfg(target_arch = "wasm32")]
        let web_image_buf = Rc::new(RefCell::new(Vec::new()));
        #[cfg(target_arch = "wasm32")]
        if let Err(e) = images::install_paste_listener(&cc.egui_ctx, web_image_buf.clone()) {
            log::warn!("pasting images unavailable: {e}");
        }

        let mut status = StatusQueue::new();
        let (store, warning) = config::open_store(&config);
        if let Some(w) = warning {
            status.push_error(format!("Storage unavailable: {w}"));
        }

        let map = match storage::load_map(&store, &config.map_id) {
            Ok(Some(map)) => {
                log::info!("loaded map {}: {} nodes", config.map_id, map.nodes.len());
                map
            }
            Ok(None) => MindMap::default(),
            Err(e) => {
                status.push_error(format!("Could not load saved map: {e}"));
                MindMap::default()
            }
        };
        let notes = storage::load_all_notes(&store);

        let dark_mode =
            storage::load_dark_mode(&store).unwrap_or(cc.egui_ctx.style().visuals.dark_mode);
        cc.egui_ctx.set_visuals(if dark_mode {
            Visuals::dark()
        } else {
            Visuals::light()
        });

        Self {
            note_session: NoteSession::new(config.autosave_delay),
            config,
            map,
            canvas: CanvasState::default(),
            dispatcher: Dispatcher::new(),
            store,
            notes,
            name_edit: NameEdit::default(),
            settings_navigation: SettingsNavigation::default(),
            read_only: false,
            dark_mode,
            show_help: false,
            drag_hover: false,
            status,
            #[cfg(target_arch = "wasm32")]
            web_upload_buf: Rc::new(RefCell::new(Vec::new())),
            #[cfg(target_arch = "wasm32")]
            web_image_buf,
        }
    }

    pub fn save_map(&mut self) {
        match storage::save_map(&mut self.store, &self.config.map_id, &self.map) {
            Ok(()) => self.status.push_success("Map saved"),
            Err(e) => self.status.push_error(format!("Saving the map failed: {e}")),
        }
    }

    pub fn set_dark_mode(&mut self, ctx: &Context, dark: bool) {
        self.dark_mode = dark;
        ctx.set_visuals(if dark { Visuals::dark() } else { Visuals::light() });
        if let Err(e) = storage::save_dark_mode(&mut self.store, dark) {
            self.status.push_error(format!("Saving the theme failed: {e}"));
        }
    }

    /// Adds a subtopic to the right of `parent`, records it as a child and connects the two.
    pub fn add_subtopic(&mut self, parent_id: &str) {
        let Some(parent) = self.map.node(parent_id) else {
            return;
        };
        let pos = parent.location() + egui::vec2(ui_consts::SUBTOPIC_OFFSET_X, 0.);
        let child = node_types::create_node(node_types::SUBTOPIC, pos);
        let mut children = parent.children.clone();
        children.push(child.id.clone());

        let child_id = child.id.clone();
        self.dispatcher.dispatch(Action::AddNode(child));
        self.dispatcher.dispatch(Action::update_node(
            parent_id,
            NodeUpdate::children(children),
        ));
        self.dispatcher
            .dispatch(Action::add_connection(parent_id, child_id.clone()));
        self.canvas.select(Some(&child_id));
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.canvas.selected.take() {
            self.dispatcher.dispatch(Action::delete_node(id));
        }
    }

    fn note_saved(&mut self, result: Result<(), StorageError>) {
        match result {
            Ok(()) => self.notes = storage::load_all_notes(&self.store),
            Err(e) => self.status.push_error(format!("Saving the note failed: {e}")),
        }
    }

    /// Rebinds the note editor to the current selection.
    fn sync_note_session(&mut self, ctx: &Context) {
        let focused = ctx.memory(|m| m.has_focus(panels::note_editor_id()));
        let selected = self.canvas.selected.clone();
        if let Some(result) = self
            .note_session
            .select(selected.as_deref(), &mut self.store, focused)
        {
            self.note_saved(result);
        }
    }

    fn tick(&mut self, ctx: &Context) {
        let now = Instant::now();
        if let Some(result) = self.note_session.tick(&mut self.store, now) {
            self.note_saved(result);
        }
        if let Some(wait) = self.note_session.next_wakeup(now) {
            ctx.request_repaint_after(wait);
        }

        self.status.retain_active();
        if !self.status.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn process_keybindings(&mut self, ctx: &Context) {
        for cmd in keybindings::dispatch(ctx) {
            self.run_command(ctx, cmd);
        }
    }

    pub fn run_command(&mut self, ctx: &Context, cmd: Command) {
        let step = self.settings_navigation.zoom_step;
        match cmd {
            Command::ZoomIn => self.canvas.zoom_centered(step),
            Command::ZoomOut => self.canvas.zoom_centered(-step),
            Command::ResetView => self.canvas.transform.reset(),
            Command::SaveMap => self.save_map(),
            Command::CopyNode => {
                let Some(id) = self.canvas.selected.clone() else {
                    return;
                };
                if self.canvas.copy_node(&self.map, &id) {
                    if let Some(node) = self.map.node(&id) {
                        ctx.copy_text(node.name.clone());
                        self.status.push_info(format!("Copied \"{}\"", node.name));
                    }
                }
            }
            Command::PasteNode => {
                if !self.read_only {
                    self.canvas.paste(&self.dispatcher);
                }
            }
            Command::DeleteNode => {
                if !self.read_only {
                    self.delete_selected();
                }
            }
            Command::Escape => {
                self.canvas.escape();
                self.show_help = false;
            }
            Command::ToggleFullscreen => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
            }
        }
    }

    fn ui_canvas(&mut self, ui: &mut egui::Ui) {
        let interactions = if self.read_only {
            SettingsInteraction::read_only()
        } else {
            SettingsInteraction::default()
        };
        let style = SettingsStyle::for_dark_mode(self.dark_mode);

        let mut view = MindMapView::new(&self.map, &mut self.canvas, &self.dispatcher)
            .with_notes(&self.notes)
            .with_interactions(&interactions)
            .with_navigations(&self.settings_navigation)
            .with_styles(&style);
        let resp = ui.add(&mut view);

        if self.drag_hover {
            panels::paint_drop_overlay(ui, resp.rect);
        }
    }
}

impl App for MindMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.dispatcher.apply(&mut self.map);
        self.canvas.retain_existing(&self.map);
        self.sync_note_session(ctx);

        self.process_keybindings(ctx);
        self.handle_dropped_files(ctx);
        #[cfg(target_arch = "wasm32")]
        {
            self.poll_web_uploads();
            self.poll_web_images();
        }

        TopBottomPanel::top("top_bar").show(ctx, |ui| self.ui_top_bar(ui));
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.ui_status_bar(ui));
        SidePanel::left("toolbox")
            .resizable(false)
            .exact_width(ui_consts::TOOLBOX_WIDTH)
            .show(ctx, |ui| self.ui_toolbox(ui));
        if let Some(id) = self.canvas.selected.clone() {
            SidePanel::right("properties")
                .default_width(ui_consts::PROPERTIES_WIDTH)
                .show(ctx, |ui| self.ui_properties(ui, &id));
        }
        CentralPanel::default()
            .frame(Frame::NONE)
            .show(ctx, |ui| self.ui_canvas(ui));

        self.ui_help_window(ctx);
        self.tick(ctx);
    }
}

impl Drop for MindMapApp {
    fn drop(&mut self) {
        if self.note_session.has_unsaved_changes() {
            let result = self.note_session.save(&mut self.store, Instant::now());
            if let Err(e) = result {
                log::error!("saving note on exit failed: {e}");
            }
        }
    }
}
