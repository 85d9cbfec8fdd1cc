mod context_menu;
mod dispatch;
mod draw;
mod error;
mod geometry;
mod interaction;
mod model;
mod reducer;
mod settings;
mod transform;
mod view;

pub mod export;
pub mod ids;
pub mod image_data;
pub mod node_types;
pub mod notes;
pub mod storage;

pub use self::context_menu::{ContextMenu, MenuAction, MenuOption, MenuTarget};
pub use self::dispatch::Dispatcher;
pub use self::error::{ImageDataError, ImportError, StorageError};
pub use self::geometry::{fit_rect, node_rect, node_size, ConnectionPath};
pub use self::interaction::{Interaction, PendingConnection};
pub use self::model::{
    Connection, MindMap, Node, NodeProperties, NoteData, PLACEHOLDER_DESCRIPTION, ROOT_ID,
};
pub use self::reducer::{reduce, reduce_all, Action, NodeUpdate};
pub use self::settings::{SettingsInteraction, SettingsNavigation, SettingsStyle};
pub use self::transform::{ViewTransform, MAX_SCALE, MIN_SCALE};
pub use self::view::{CanvasState, MindMapView, NodeTemplate, Rename, PASTE_OFFSET};
