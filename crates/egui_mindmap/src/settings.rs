use egui::{Color32, Stroke};

/// Which editing gestures the canvas accepts.
#[derive(Debug, Clone)]
pub struct SettingsInteraction {
    /// Node dragging
    pub node_drag: bool,

    /// Drawing connections from a node's anchor handle or with Shift + drag
    pub connect: bool,

    /// Renaming a node by double-clicking it
    pub rename: bool,

    /// Delete buttons on connection midpoints
    pub connection_delete: bool,

    /// Right-click context menus
    pub context_menu: bool,

    /// Adding nodes by dropping toolbox entries onto the canvas
    pub drop_nodes: bool,
}

impl Default for SettingsInteraction {
    fn default() -> Self {
        Self {
            node_drag: true,
            connect: true,
            rename: true,
            connection_delete: true,
            context_menu: true,
            drop_nodes: true,
        }
    }
}

impl SettingsInteraction {
    /// Everything off, including context menus; selection and navigation keep working.
    pub fn read_only() -> Self {
        Self {
            node_drag: false,
            connect: false,
            rename: false,
            connection_delete: false,
            context_menu: false,
            drop_nodes: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsNavigation {
    /// Zoom and pan
    pub zoom_and_pan: bool,

    /// Scale change per zoom step
    pub zoom_step: f32,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_and_pan: true,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStyle {
    pub canvas_bg: Color32,
    pub grid: Color32,
    pub node_fill: Color32,
    pub node_stroke: Stroke,
    pub selected_stroke: Stroke,
    pub text: Color32,
    pub weak_text: Color32,
    pub connection: Stroke,
    pub anchor_fill: Color32,
    pub delete_fill: Color32,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self::light()
    }
}

impl SettingsStyle {
    pub fn light() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(0xf8, 0xf9, 0xfa),
            grid: Color32::from_rgb(0xe2, 0xe5, 0xe9),
            node_fill: Color32::WHITE,
            node_stroke: Stroke::new(1., Color32::from_rgb(0xce, 0xd4, 0xda)),
            selected_stroke: Stroke::new(2.5, Color32::from_rgb(0x22, 0x8b, 0xe6)),
            text: Color32::from_rgb(0x21, 0x25, 0x29),
            weak_text: Color32::from_rgb(0x86, 0x8e, 0x96),
            connection: Stroke::new(2., Color32::from_rgb(0x74, 0x8f, 0xfc)),
            anchor_fill: Color32::from_rgb(0x4d, 0xab, 0xf7),
            delete_fill: Color32::from_rgb(0xfa, 0x52, 0x52),
        }
    }

    pub fn dark() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(0x1a, 0x1b, 0x1e),
            grid: Color32::from_rgb(0x2c, 0x2e, 0x33),
            node_fill: Color32::from_rgb(0x25, 0x26, 0x2b),
            node_stroke: Stroke::new(1., Color32::from_rgb(0x37, 0x3a, 0x40)),
            selected_stroke: Stroke::new(2.5, Color32::from_rgb(0x4d, 0xab, 0xf7)),
            text: Color32::from_rgb(0xc1, 0xc2, 0xc5),
            weak_text: Color32::from_rgb(0x90, 0x92, 0x96),
            connection: Stroke::new(2., Color32::from_rgb(0x91, 0xa7, 0xff)),
            anchor_fill: Color32::from_rgb(0x33, 0x9a, 0xf0),
            delete_fill: Color32::from_rgb(0xe0, 0x31, 0x31),
        }
    }

    pub fn for_dark_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}
