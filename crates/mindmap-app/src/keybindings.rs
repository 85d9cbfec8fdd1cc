use egui::{Context, Event, Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ZoomIn,
    ZoomOut,
    ResetView,
    SaveMap,
    CopyNode,
    PasteNode,
    DeleteNode,
    Escape,
    ToggleFullscreen,
}

/// Shortcut reference shown in the help window.
pub const HELP: [(&str, &str); 9] = [
    ("Ctrl + = / +", "Zoom in"),
    ("Ctrl + -", "Zoom out"),
    ("Ctrl + 0", "Reset view"),
    ("Ctrl + S", "Save map"),
    ("Ctrl + C / Ctrl + V", "Copy / paste selected node"),
    ("Delete", "Delete selected node"),
    ("Esc", "Cancel gesture, close menus"),
    ("F11", "Toggle fullscreen"),
    ("Shift + drag", "Connect nodes"),
];

/// Commands triggered this frame. Editing shortcuts are skipped while a text field
/// has keyboard focus so they keep their usual meaning there.
pub fn dispatch(ctx: &Context) -> Vec<Command> {
    let typing = ctx.wants_keyboard_input();
    ctx.input(|i| commands_from_events(&i.events, typing))
}

pub fn commands_from_events(events: &[Event], typing: bool) -> Vec<Command> {
    let mut cmds = Vec::new();
    for ev in events {
        match ev {
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => {
                if let Some(cmd) = key_command(*key, *modifiers, typing) {
                    cmds.push(cmd);
                }
            }
            // platforms turn Ctrl+C / Ctrl+V into clipboard events
            Event::Copy if !typing => cmds.push(Command::CopyNode),
            Event::Paste(_) if !typing => cmds.push(Command::PasteNode),
            _ => {}
        }
    }
    cmds.dedup();
    cmds
}

fn key_command(key: Key, m: Modifiers, typing: bool) -> Option<Command> {
    let cmd = m.command;
    match key {
        Key::Escape => Some(Command::Escape),
        Key::F11 => Some(Command::ToggleFullscreen),
        Key::S if cmd => Some(Command::SaveMap),
        Key::Plus | Key::Equals if cmd => Some(Command::ZoomIn),
        Key::Minus if cmd => Some(Command::ZoomOut),
        Key::Num0 if cmd => Some(Command::ResetView),
        _ if typing => None,
        Key::C if cmd => Some(Command::CopyNode),
        Key::V if cmd => Some(Command::PasteNode),
        Key::Delete | Key::Backspace if !m.any() => Some(Command::DeleteNode),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, modifiers: Modifiers) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    #[test]
    fn zoom_and_save_shortcuts() {
        let events = [
            key(Key::Equals, Modifiers::COMMAND),
            key(Key::Minus, Modifiers::COMMAND),
            key(Key::S, Modifiers::COMMAND),
            key(Key::Minus, Modifiers::NONE),
        ];
        assert_eq!(
            commands_from_events(&events, false),
            vec![Command::ZoomIn, Command::ZoomOut, Command::SaveMap]
        );
    }

    #[test]
    fn editing_keys_are_ignored_while_typing() {
        let events = [
            key(Key::Delete, Modifiers::NONE),
            Event::Copy,
            Event::Paste("x".into()),
            key(Key::S, Modifiers::COMMAND),
        ];
        assert_eq!(commands_from_events(&events, true), vec![Command::SaveMap]);
        assert_eq!(
            commands_from_events(&events, false),
            vec![
                Command::DeleteNode,
                Command::CopyNode,
                Command::PasteNode,
                Command::SaveMap
            ]
        );
    }

    #[test]
    fn copy_reported_once() {
        let events = [key(Key::C, Modifiers::COMMAND), Event::Copy];
        assert_eq!(commands_from_events(&events, false), vec![Command::CopyNode]);
    }
}
