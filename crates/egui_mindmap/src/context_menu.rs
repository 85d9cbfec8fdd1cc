use egui::Pos2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuTarget {
    Canvas,
    Node(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    ResetView,
    AddTopic,
    Delete,
    Copy,
    Paste,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::ResetView => "Reset View",
            Self::AddTopic => "Add Topic",
            Self::Delete => "Delete",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::ResetView => "🔄",
            Self::AddTopic => "📝",
            Self::Delete => "🗑",
            Self::Copy => "📋",
            Self::Paste => "📌",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuOption {
    pub action: MenuAction,
    pub enabled: bool,
}

/// An open right-click menu.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
    /// Where the menu is shown, in absolute screen coordinates.
    pub screen_pos: Pos2,
    /// Logical canvas position that was clicked.
    pub canvas_pos: Pos2,
    pub target: MenuTarget,
}

impl ContextMenu {
    pub fn new(screen_pos: Pos2, canvas_pos: Pos2, target: MenuTarget) -> Self {
        Self {
            screen_pos,
            canvas_pos,
            target,
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match &self.target {
            MenuTarget::Node(id) => Some(id),
            MenuTarget::Canvas => None,
        }
    }

    /// Entries in display order with their enabled state.
    pub fn options(&self, has_copied_node: bool) -> Vec<MenuOption> {
        let opt = |action, enabled| MenuOption { action, enabled };
        match self.target {
            MenuTarget::Canvas => vec![
                opt(MenuAction::ResetView, true),
                opt(MenuAction::AddTopic, true),
            ],
            MenuTarget::Node(_) => vec![
                opt(MenuAction::Delete, true),
                opt(MenuAction::Copy, true),
                opt(MenuAction::Paste, has_copied_node),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_menu_entries() {
        let m = ContextMenu::new(Pos2::ZERO, Pos2::ZERO, MenuTarget::Canvas);
        let opts = m.options(false);
        assert_eq!(
            opts.iter().map(|o| o.action).collect::<Vec<_>>(),
            vec![MenuAction::ResetView, MenuAction::AddTopic]
        );
        assert!(opts.iter().all(|o| o.enabled));
        assert_eq!(m.node_id(), None);
    }

    #[test]
    fn paste_needs_a_copied_node() {
        let m = ContextMenu::new(Pos2::ZERO, Pos2::ZERO, MenuTarget::Node("a".into()));
        assert_eq!(m.node_id(), Some("a"));
        let opts = m.options(false);
        assert_eq!(opts[2].action, MenuAction::Paste);
        assert!(opts[..2].iter().all(|o| o.enabled));
        assert!(!opts[2].enabled);
        assert!(m.options(true)[2].enabled);
    }
}
