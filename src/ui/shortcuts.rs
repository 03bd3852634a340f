use egui::{Context, Key, Modifiers};

use crate::ui::menu_bar::MenuAction;

pub fn handle_shortcuts(ctx: &Context, has_tab: bool) -> MenuAction {
    let mut action = MenuAction::default();

    ctx.input(|input| {
        let ctrl = if cfg!(target_os = "macos") {
            input.modifiers.mac_cmd
        } else {
            input.modifiers.ctrl
        };

        // Open file: Ctrl+O
        if ctrl && input.key_pressed(Key::O) {
            action.open_file = true;
        }

        // Quit: Ctrl+Q
        if ctrl && input.key_pressed(Key::Q) {
            action.quit = true;
        }

        if !has_tab {
            return;
        }

        // Close tab: Ctrl+W
        if ctrl && input.key_pressed(Key::W) {
            action.close_tab = true;
        }

        // Center: Space
        if input.key_pressed(Key::Space) && input.modifiers == Modifiers::NONE {
            action.center = true;
        }

        // Reload: F5
        if input.key_pressed(Key::F5) {
            action.reload = true;
        }

        // Tabs: Page Down / Page Up
        if input.key_pressed(Key::PageDown) {
            action.next_tab = true;
        }
        if input.key_pressed(Key::PageUp) {
            action.prev_tab = true;
        }
    });

    action
}
