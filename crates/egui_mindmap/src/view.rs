use std::collections::{HashMap, HashSet};

use egui::load::{SizeHint, SizedTexture, TexturePoll};
use egui::{
    Area, Button, Context, Frame, Id, Key, Order, PointerButton, Pos2, Rect, Response, Sense,
    TextEdit, TextureOptions, Ui, Vec2, Widget,
};

use crate::context_menu::{ContextMenu, MenuAction, MenuTarget};
use crate::dispatch::Dispatcher;
use crate::draw::{self, DrawContext, NodeDisplay};
use crate::geometry::{self, ConnectionPath};
use crate::image_data;
use crate::interaction::Interaction;
use crate::model::{Connection, MindMap, Node, NoteData};
use crate::node_types;
use crate::notes::preview_text;
use crate::reducer::{Action, NodeUpdate};
use crate::settings::{SettingsInteraction, SettingsNavigation, SettingsStyle};
use crate::transform::ViewTransform;

/// Offset applied to pasted copies, in logical units.
pub const PASTE_OFFSET: Vec2 = Vec2::new(50., 50.);

/// Drag-and-drop payload carried by toolbox entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
    pub node_type: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rename {
    pub node_id: String,
    pub text: String,
    focus_requested: bool,
}

/// Canvas state that lives across frames but is not part of the document.
#[derive(Clone, Debug, Default)]
pub struct CanvasState {
    pub transform: ViewTransform,
    pub interaction: Interaction,
    pub selected: Option<String>,
    pub context_menu: Option<ContextMenu>,
    pub rename: Option<Rename>,
    /// Node kept by Copy for a later Paste.
    pub copied: Option<Node>,
    canvas_size: Vec2,
    /// Texture uris handed to egui, mapped to whether their data URL decoded.
    pictures: HashMap<String, bool>,
}

impl CanvasState {
    pub fn select(&mut self, node_id: Option<&str>) {
        self.selected = node_id.map(str::to_owned);
    }

    pub fn copy_node(&mut self, map: &MindMap, node_id: &str) -> bool {
        self.copied = map.node(node_id).cloned();
        self.copied.is_some()
    }

    /// Adds a copy of the copied node with a fresh id, shifted by [`PASTE_OFFSET`], and
    /// selects it. Returns the new id.
    pub fn paste(&mut self, dispatcher: &Dispatcher) -> Option<String> {
        let mut node = self.copied.clone()?;
        node.id = crate::ids::node_id();
        node.x += PASTE_OFFSET.x;
        node.y += PASTE_OFFSET.y;
        let id = node.id.clone();
        dispatcher.dispatch(Action::AddNode(node));
        self.selected = Some(id.clone());
        Some(id)
    }

    /// Zooms around the centre of the canvas as it was last drawn.
    pub fn zoom_centered(&mut self, amount: f32) {
        let canvas = Rect::from_min_size(Pos2::ZERO, self.canvas_size);
        self.transform.zoom(amount, None, canvas);
    }

    /// Logical point shown at the centre of the canvas as it was last drawn.
    pub fn visible_center(&self) -> Pos2 {
        self.transform
            .screen_to_logical((self.canvas_size / 2.).to_pos2())
    }

    /// Textures of the pictures carried by image nodes, keyed by node id.
    ///
    /// Each data URL is decoded once and registered with egui under
    /// [`image_data::texture_uri`]; textures of pictures no longer on the map are freed.
    /// Nodes whose texture is still loading, or could not be loaded, are absent.
    fn load_pictures<'m>(
        &mut self,
        ctx: &Context,
        map: &'m MindMap,
    ) -> HashMap<&'m str, SizedTexture> {
        let mut textures = HashMap::new();
        let mut in_use = HashSet::new();
        for node in map.nodes.iter().filter(|n| n.is_image()) {
            let Some(data_url) = node.properties.image_data.as_deref() else {
                continue;
            };
            let uri = image_data::texture_uri(&node.id, data_url);
            in_use.insert(uri.clone());
            let decoded = *self.pictures.entry(uri.clone()).or_insert_with(|| {
                match image_data::decode_data_url(data_url) {
                    Ok(img) => {
                        ctx.include_bytes(uri.clone(), img.bytes);
                        true
                    }
                    Err(e) => {
                        log::warn!("picture of node {} not shown: {e}", node.id);
                        false
                    }
                }
            });
            if !decoded {
                continue;
            }
            match ctx.try_load_texture(&uri, TextureOptions::LINEAR, SizeHint::default()) {
                Ok(TexturePoll::Ready { texture }) => {
                    textures.insert(node.id.as_str(), texture);
                }
                Ok(TexturePoll::Pending { .. }) => {}
                Err(e) => log::trace!("texture {uri} unavailable: {e}"),
            }
        }

        self.pictures.retain(|uri, decoded| {
            let keep = in_use.contains(uri);
            if !keep && *decoded {
                ctx.forget_image(uri);
            }
            keep
        });
        textures
    }

    /// Drops any gesture, open menu or rename in progress.
    pub fn escape(&mut self) {
        self.interaction.cancel();
        self.context_menu = None;
        self.rename = None;
    }

    /// Opens the menu for a secondary click at `screen_pos`, `local` being the same point
    /// relative to the canvas. Nothing opens while menus are disabled.
    fn open_context_menu(
        &mut self,
        settings: &SettingsInteraction,
        scene: &Scene,
        screen_pos: Pos2,
        local: Pos2,
    ) -> bool {
        if !settings.context_menu {
            self.context_menu = None;
            return false;
        }
        let canvas_pos = self.transform.screen_to_logical(local);
        let target = match scene.node_at(canvas_pos) {
            Some(node) => MenuTarget::Node(node.id.clone()),
            None => MenuTarget::Canvas,
        };
        self.context_menu = Some(ContextMenu::new(screen_pos, canvas_pos, target));
        true
    }

    /// Clears references to nodes that no longer exist.
    pub fn retain_existing(&mut self, map: &MindMap) {
        if self.selected.as_deref().is_some_and(|id| !map.contains_node(id)) {
            self.selected = None;
        }
        if self.rename.as_ref().is_some_and(|r| !map.contains_node(&r.node_id)) {
            self.rename = None;
        }
        if self
            .context_menu
            .as_ref()
            .and_then(ContextMenu::node_id)
            .is_some_and(|id| !map.contains_node(id))
        {
            self.context_menu = None;
        }
        let stale_drag = self
            .interaction
            .dragged_node()
            .is_some_and(|id| !map.contains_node(id));
        let stale_link = self
            .interaction
            .pending_connection()
            .is_some_and(|p| !map.contains_node(&p.from));
        if stale_drag || stale_link {
            self.interaction.cancel();
        }
    }
}

/// Node shapes and hit-testing for one frame.
struct Scene<'m> {
    map: &'m MindMap,
    previews: HashMap<&'m str, String>,
    selected: Option<&'m str>,
}

impl<'m> Scene<'m> {
    fn new(map: &'m MindMap, notes: Option<&NoteData>, selected: Option<&str>) -> Self {
        let previews = match notes {
            Some(notes) => map
                .nodes
                .iter()
                .filter_map(|n| {
                    let preview = preview_text(notes.get(&n.id)?);
                    (!preview.is_empty()).then_some((n.id.as_str(), preview))
                })
                .collect(),
            None => HashMap::new(),
        };
        let selected = selected.and_then(|id| map.node(id)).map(|n| n.id.as_str());
        Self {
            map,
            previews,
            selected,
        }
    }

    fn has_preview(&self, node: &Node) -> bool {
        self.previews.contains_key(node.id.as_str())
    }

    fn center(&self, node: &Node) -> Pos2 {
        geometry::node_rect(node, self.has_preview(node)).center()
    }

    /// Paint order: document order with the selected node last.
    fn paint_order(&self) -> impl Iterator<Item = &'m Node> + '_ {
        let selected = self.selected;
        self.map
            .nodes
            .iter()
            .filter(move |n| Some(n.id.as_str()) != selected)
            .chain(selected.and_then(|id| self.map.node(id)))
    }

    fn node_at(&self, pos: Pos2) -> Option<&'m Node> {
        let order: Vec<_> = self.paint_order().collect();
        order
            .into_iter()
            .rev()
            .find(|n| geometry::node_contains(n, self.has_preview(n), pos))
    }

    fn anchor_at(&self, pos: Pos2) -> Option<&'m Node> {
        let order: Vec<_> = self.paint_order().collect();
        order
            .into_iter()
            .rev()
            .find(|n| geometry::anchor_contains(n, self.has_preview(n), pos))
    }

    fn connections(&self) -> impl Iterator<Item = (&'m Connection, ConnectionPath)> + '_ {
        self.map.connections.iter().filter_map(|c| {
            let from = self.map.node(&c.from)?;
            let to = self.map.node(&c.to)?;
            ConnectionPath::between(self.center(from), self.center(to)).map(|p| (c, p))
        })
    }

    fn connection_delete_at(&self, pos: Pos2) -> Option<&'m Connection> {
        let hits: Vec<_> = self.connections().collect();
        hits.into_iter()
            .rev()
            .find(|(_, p)| p.delete_button_contains(pos))
            .map(|(c, _)| c)
    }
}

/// Canvas widget: draws a [`MindMap`] and turns pointer input into [`Action`]s.
///
/// The map is only read. Every change is sent through the [`Dispatcher`] and becomes
/// visible once the owner applies the queued actions.
pub struct MindMapView<'a> {
    map: &'a MindMap,
    state: &'a mut CanvasState,
    dispatcher: &'a Dispatcher,
    notes: Option<&'a NoteData>,

    settings_interaction: SettingsInteraction,
    settings_navigation: SettingsNavigation,
    settings_style: SettingsStyle,
}

impl Widget for &mut MindMapView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        self.state.canvas_size = resp.rect.size();
        self.state.retain_existing(self.map);

        let selected = self.state.selected.clone();
        let scene = Scene::new(self.map, self.notes, selected.as_deref());
        let pictures = self.state.load_pictures(ui.ctx(), self.map);

        self.handle_pointer(ui, &resp, &scene);
        self.handle_navigation(ui, &resp);
        let menu_opened = self.handle_context_click(&resp, &scene);
        self.handle_drop(&resp);

        let ctx = DrawContext {
            painter: &painter,
            transform: &self.state.transform,
            origin: resp.rect.left_top(),
            style: &self.settings_style,
        };
        self.draw(&ctx, resp.rect, &scene, &pictures);

        self.show_rename(ui, &resp, &scene);
        self.show_context_menu(ui, menu_opened);

        if !self.state.interaction.is_idle()
            || self.state.selected != selected
            || !self.dispatcher.is_empty()
        {
            ui.ctx().request_repaint();
        }
        resp
    }
}

impl<'a> MindMapView<'a> {
    pub fn new(map: &'a MindMap, state: &'a mut CanvasState, dispatcher: &'a Dispatcher) -> Self {
        Self {
            map,
            state,
            dispatcher,
            notes: None,
            settings_interaction: SettingsInteraction::default(),
            settings_navigation: SettingsNavigation::default(),
            settings_style: SettingsStyle::default(),
        }
    }

    /// Notes used for the previews on node cards.
    pub fn with_notes(mut self, notes: &'a NoteData) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_interactions(mut self, settings_interaction: &SettingsInteraction) -> Self {
        self.settings_interaction = settings_interaction.clone();
        self
    }

    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }
}

impl MindMapView<'_> {
    fn handle_pointer(&mut self, ui: &Ui, resp: &Response, scene: &Scene) {
        let rename_enabled = self.settings_interaction.rename;
        let delete_enabled = self.settings_interaction.connection_delete;

        if resp.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .map(|p| local_pos(resp, p));
            let shift = ui.input(|i| i.modifiers.shift);
            if let Some(origin) = origin {
                self.begin_gesture(origin, shift, scene);
            }
        } else if resp.drag_started_by(PointerButton::Middle) && self.settings_navigation.zoom_and_pan {
            self.state.interaction = Interaction::begin_pan();
        }

        if resp.dragged() {
            if let Some(pointer) = resp.interact_pointer_pos().map(|p| local_pos(resp, p)) {
                let action = self.state.interaction.pointer_moved(
                    pointer,
                    resp.drag_delta(),
                    &mut self.state.transform,
                );
                if let Some(action) = action {
                    self.dispatcher.dispatch(action);
                }
            }
        }

        if resp.drag_stopped() {
            let target = resp
                .interact_pointer_pos()
                .or_else(|| resp.hover_pos())
                .map(|p| self.state.transform.screen_to_logical(local_pos(resp, p)))
                .and_then(|p| scene.node_at(p))
                .map(|n| n.id.as_str());
            if let Some(action) = self.state.interaction.pointer_released(target) {
                self.dispatcher.dispatch(action);
            }
        }

        if resp.double_clicked() {
            if let Some(node) = self.pointer_logical(resp).and_then(|p| scene.node_at(p)) {
                self.state.selected = Some(node.id.clone());
                if rename_enabled {
                    self.state.rename = Some(Rename {
                        node_id: node.id.clone(),
                        text: node.name.clone(),
                        focus_requested: false,
                    });
                }
            }
            return;
        }

        if resp.clicked() {
            let Some(pos) = self.pointer_logical(resp) else {
                return;
            };
            if delete_enabled {
                if let Some(conn) = scene.connection_delete_at(pos) {
                    self.dispatcher
                        .dispatch(Action::remove_connection(conn.id.clone()));
                    return;
                }
            }
            self.state.selected = scene.node_at(pos).map(|n| n.id.clone());
        }
    }

    fn begin_gesture(&mut self, origin: Pos2, shift: bool, scene: &Scene) {
        let si = &self.settings_interaction;
        let t = &self.state.transform;
        let logical = t.screen_to_logical(origin);

        if si.connect {
            if let Some(node) = scene.anchor_at(logical) {
                self.state.interaction =
                    Interaction::begin_connection(node, scene.center(node), origin, t);
                return;
            }
        }

        if let Some(node) = scene.node_at(logical) {
            self.state.selected = Some(node.id.clone());
            if si.connect && shift {
                self.state.interaction =
                    Interaction::begin_connection(node, scene.center(node), origin, t);
                return;
            }
            if si.node_drag {
                self.state.interaction = Interaction::begin_drag(node, origin, t);
                return;
            }
        }

        if self.settings_navigation.zoom_and_pan {
            self.state.interaction = Interaction::begin_pan();
        }
    }

    fn handle_navigation(&mut self, ui: &Ui, resp: &Response) {
        if !self.settings_navigation.zoom_and_pan || !resp.hovered() {
            return;
        }

        let (zoom_delta, scroll, hover) =
            ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta, i.pointer.hover_pos()));
        let local_rect = Rect::from_min_size(Pos2::ZERO, resp.rect.size());

        if zoom_delta != 1. {
            let step = self.settings_navigation.zoom_step * (zoom_delta - 1.).signum();
            let anchor = hover.map(|p| local_pos(resp, p));
            self.state.transform.zoom(step, anchor, local_rect);
        } else if scroll != Vec2::ZERO {
            self.state.transform.pan_by(scroll);
        }
    }

    /// Opens the context menu on secondary click. Returns whether it opened this frame.
    fn handle_context_click(&mut self, resp: &Response, scene: &Scene) -> bool {
        if !resp.secondary_clicked() {
            return false;
        }
        let Some(screen_pos) = resp.interact_pointer_pos() else {
            return false;
        };
        let local = local_pos(resp, screen_pos);
        self.state
            .open_context_menu(&self.settings_interaction, scene, screen_pos, local)
    }

    fn handle_drop(&mut self, resp: &Response) {
        if !self.settings_interaction.drop_nodes {
            return;
        }
        let Some(template) = resp.dnd_release_payload::<NodeTemplate>() else {
            return;
        };
        let Some(pos) = self.pointer_logical(resp) else {
            return;
        };
        let node = node_types::create_node(template.node_type, pos);
        log::debug!("dropped {} at ({}, {})", node.node_type, pos.x, pos.y);
        self.state.selected = Some(node.id.clone());
        self.dispatcher.dispatch(Action::AddNode(node));
    }

    fn draw(
        &self,
        ctx: &DrawContext,
        rect: Rect,
        scene: &Scene,
        pictures: &HashMap<&str, SizedTexture>,
    ) {
        draw::draw_background(ctx, rect);

        let show_delete = self.settings_interaction.connection_delete;
        for (_, path) in scene.connections() {
            draw::draw_connection(ctx, &path, show_delete);
        }
        if let Some(pending) = self.state.interaction.pending_connection() {
            draw::draw_pending_connection(ctx, &ConnectionPath::open(pending.start, pending.end));
        }

        let editing = self.state.rename.as_ref().map(|r| r.node_id.as_str());
        for node in scene.paint_order() {
            draw::draw_node(
                ctx,
                &NodeDisplay {
                    node,
                    preview: scene.previews.get(node.id.as_str()).map(String::as_str),
                    selected: scene.selected == Some(node.id.as_str()),
                    editing: editing == Some(node.id.as_str()),
                    show_anchor: self.settings_interaction.connect,
                    picture: pictures.get(node.id.as_str()).copied(),
                },
            );
        }
    }

    fn show_rename(&mut self, ui: &mut Ui, resp: &Response, scene: &Scene) {
        let Some(rename) = self.state.rename.as_mut() else {
            return;
        };
        let Some(node) = scene.map.node(&rename.node_id) else {
            self.state.rename = None;
            return;
        };

        let logical = geometry::node_rect(node, scene.has_preview(node));
        let field = Rect::from_center_size(
            logical.center(),
            Vec2::new(logical.width() - 16., 24.),
        );
        let field = self
            .state
            .transform
            .logical_to_screen_rect(field)
            .translate(resp.rect.left_top().to_vec2());

        let edit = ui.put(field, TextEdit::singleline(&mut rename.text));
        if !rename.focus_requested {
            edit.request_focus();
            rename.focus_requested = true;
            return;
        }
        if !edit.lost_focus() {
            return;
        }

        let cancelled = ui.input(|i| i.key_pressed(Key::Escape));
        let Some(rename) = self.state.rename.take() else {
            return;
        };
        if cancelled {
            return;
        }
        let name = rename.text.trim();
        if !name.is_empty() && name != node.name {
            self.dispatcher.dispatch(Action::update_node(
                rename.node_id.clone(),
                NodeUpdate::name(name),
            ));
        }
    }

    fn show_context_menu(&mut self, ui: &Ui, opened_now: bool) {
        let Some(menu) = self.state.context_menu.clone() else {
            return;
        };
        let options = menu.options(self.state.copied.is_some());

        let mut chosen = None;
        let area = Area::new(Id::new("mindmap_context_menu"))
            .order(Order::Foreground)
            .fixed_pos(menu.screen_pos)
            .show(ui.ctx(), |ui| {
                Frame::menu(ui.style()).show(ui, |ui| {
                    ui.set_min_width(140.);
                    for option in &options {
                        let label = format!("{} {}", option.action.icon(), option.action.label());
                        let button = ui.add_enabled(option.enabled, Button::new(label));
                        if button.clicked() {
                            chosen = Some(option.action);
                        }
                    }
                });
            });

        if let Some(action) = chosen {
            self.state.context_menu = None;
            self.apply_menu_action(&menu, action);
            return;
        }
        let escape = ui.input(|i| i.key_pressed(Key::Escape));
        if escape || (!opened_now && area.response.clicked_elsewhere()) {
            self.state.context_menu = None;
        }
    }

    fn apply_menu_action(&mut self, menu: &ContextMenu, action: MenuAction) {
        log::debug!("context menu: {}", action.label());
        match (action, menu.node_id()) {
            (MenuAction::ResetView, _) => self.state.transform.reset(),
            (MenuAction::AddTopic, _) => {
                let node = node_types::create_node(node_types::TOPIC, menu.canvas_pos);
                self.state.selected = Some(node.id.clone());
                self.dispatcher.dispatch(Action::AddNode(node));
            }
            (MenuAction::Delete, Some(id)) => {
                if self.state.selected.as_deref() == Some(id) {
                    self.state.selected = None;
                }
                self.dispatcher.dispatch(Action::delete_node(id));
            }
            (MenuAction::Copy, Some(id)) => {
                self.state.copy_node(self.map, id);
            }
            (MenuAction::Paste, Some(_)) => {
                self.state.paste(self.dispatcher);
            }
            (_, None) => {}
        }
    }

    fn pointer_logical(&self, resp: &Response) -> Option<Pos2> {
        resp.interact_pointer_pos()
            .or_else(|| resp.hover_pos())
            .map(|p| self.state.transform.screen_to_logical(local_pos(resp, p)))
    }
}

/// Converts a screen-space position to a widget-local one.
fn local_pos(resp: &Response, p: Pos2) -> Pos2 {
    (p - resp.rect.left_top()).to_pos2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> MindMap {
        let mut map = MindMap::empty();
        map.nodes.push(Node::new("a", "idea", "A", 0., 0.));
        map.nodes.push(Node::new("b", "idea", "B", 100., 20.));
        map.nodes.push(Node::new("d", "decision", "D", 500., 0.));
        map.connections.push(Connection {
            id: "c".into(),
            from: "a".into(),
            to: "d".into(),
        });
        map
    }

    #[test]
    fn selected_node_is_painted_last_and_hit_first() {
        let map = map();
        let scene = Scene::new(&map, None, None);
        assert_eq!(scene.node_at(Pos2::new(150., 40.)).unwrap().id, "b");

        let scene = Scene::new(&map, None, Some("a"));
        let order: Vec<_> = scene.paint_order().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a"]);
        assert_eq!(scene.node_at(Pos2::new(150., 40.)).unwrap().id, "a");
        assert!(scene.node_at(Pos2::new(1000., 1000.)).is_none());
    }

    #[test]
    fn decision_corners_are_not_hits() {
        let map = map();
        let scene = Scene::new(&map, None, None);
        assert!(scene.node_at(Pos2::new(505., 5.)).is_none());
        assert_eq!(scene.node_at(Pos2::new(560., 60.)).unwrap().id, "d");
    }

    #[test]
    fn previews_enlarge_cards() {
        let map = map();
        let mut notes = NoteData::new();
        notes.insert("a".into(), "<p>hello</p>".into());
        notes.insert("b".into(), "<p></p>".into());
        let scene = Scene::new(&map, Some(&notes), None);

        assert_eq!(scene.previews.get("a").map(String::as_str), Some("hello"));
        assert!(!scene.previews.contains_key("b"));
        let a = map.node("a").unwrap();
        assert_eq!(scene.center(a), Pos2::new(100., 40.));
    }

    #[test]
    fn connection_delete_button_sits_midway() {
        let map = map();
        let scene = Scene::new(&map, None, None);
        let (_, path) = scene.connections().next().unwrap();
        assert_eq!(scene.connection_delete_at(path.mid).unwrap().id, "c");
        assert!(scene.connection_delete_at(path.mid + Vec2::new(0., 40.)).is_none());
    }

    #[test]
    fn paste_offsets_and_selects_copy() {
        let map = map();
        let dispatcher = Dispatcher::new();
        let mut state = CanvasState::default();
        assert!(state.paste(&dispatcher).is_none());

        assert!(state.copy_node(&map, "b"));
        let id = state.paste(&dispatcher).unwrap();
        assert_eq!(state.selected.as_deref(), Some(id.as_str()));

        let mut next = map.clone();
        assert!(dispatcher.apply(&mut next));
        let copy = next.node(&id).unwrap();
        assert_eq!(copy.name, "B");
        assert_eq!(copy.location(), Pos2::new(150., 70.));
    }

    #[test]
    fn stale_references_are_dropped() {
        let map = map();
        let mut state = CanvasState {
            selected: Some("gone".into()),
            context_menu: Some(ContextMenu::new(
                Pos2::ZERO,
                Pos2::ZERO,
                MenuTarget::Node("gone".into()),
            )),
            interaction: Interaction::begin_drag(
                &Node::new("gone", "idea", "", 0., 0.),
                Pos2::ZERO,
                &ViewTransform::default(),
            ),
            ..Default::default()
        };
        state.retain_existing(&map);
        assert!(state.selected.is_none());
        assert!(state.context_menu.is_none());
        assert!(state.interaction.is_idle());
    }

    #[test]
    fn read_only_canvas_opens_no_menu() {
        let map = map();
        let scene = Scene::new(&map, None, None);
        let mut state = CanvasState::default();
        let on_b = Pos2::new(150., 40.);

        let ro = SettingsInteraction::read_only();
        assert!(!state.open_context_menu(&ro, &scene, on_b, on_b));
        assert!(state.context_menu.is_none());

        let editable = SettingsInteraction::default();
        assert!(state.open_context_menu(&editable, &scene, on_b, on_b));
        let menu = state.context_menu.as_ref().unwrap();
        assert_eq!(menu.target, MenuTarget::Node("b".into()));
        assert_eq!(menu.canvas_pos, on_b);
    }

    #[test]
    fn keyboard_zoom_uses_canvas_centre() {
        let mut state = CanvasState {
            canvas_size: Vec2::new(800., 600.),
            ..Default::default()
        };
        state.zoom_centered(0.1);
        assert!((state.transform.scale - 1.1).abs() < 1e-6);
        let centre = Pos2::new(400., 300.);
        let logical = state.transform.screen_to_logical(centre);
        assert!((logical - centre).length() < 1e-3);
    }

    #[test]
    fn visible_centre_follows_pan() {
        let mut state = CanvasState {
            canvas_size: Vec2::new(800., 600.),
            ..Default::default()
        };
        assert_eq!(state.visible_center(), Pos2::new(400., 300.));
        state.transform.pan_by(Vec2::new(100., -50.));
        assert_eq!(state.visible_center(), Pos2::new(300., 350.));
    }

    #[test]
    fn pictures_decode_once_and_leave_with_their_node() {
        let ctx = Context::default();
        let mut map = map();
        let photo_url = image_data::encode_data_url("image/png", &[1, 2, 3]);
        map.nodes
            .push(node_types::create_image_node(photo_url.clone(), Pos2::ZERO));
        map.nodes
            .push(node_types::create_image_node("clipboard text", Pos2::ZERO));
        // only image nodes show pictures
        let mut idea = Node::new("e", "idea", "E", 0., 0.);
        idea.properties.image_data = Some(photo_url);
        map.nodes.push(idea);

        let mut state = CanvasState::default();
        // no image loaders are installed, so nothing becomes a texture
        assert!(state.load_pictures(&ctx, &map).is_empty());
        assert_eq!(state.pictures.len(), 2);
        assert_eq!(state.pictures.values().filter(|ok| **ok).count(), 1);

        state.load_pictures(&ctx, &map);
        assert_eq!(state.pictures.len(), 2);

        map.nodes.retain(|n| !n.is_image());
        state.load_pictures(&ctx, &map);
        assert!(state.pictures.is_empty());
    }
}
