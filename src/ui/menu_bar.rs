use egui::{Button, Ui};

/// Commands requested this frame from the menu bar or the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuAction {
    pub open_file: bool,
    pub close_tab: bool,
    pub quit: bool,
    pub center: bool,
    pub reload: bool,
    pub next_tab: bool,
    pub prev_tab: bool,
}

impl MenuAction {
    pub fn merge(self, other: MenuAction) -> MenuAction {
        MenuAction {
            open_file: self.open_file || other.open_file,
            close_tab: self.close_tab || other.close_tab,
            quit: self.quit || other.quit,
            center: self.center || other.center,
            reload: self.reload || other.reload,
            next_tab: self.next_tab || other.next_tab,
            prev_tab: self.prev_tab || other.prev_tab,
        }
    }
}

pub fn draw_menu_bar(ui: &mut Ui, has_tab: bool) -> MenuAction {
    let mut action = MenuAction::default();

    egui::MenuBar::new().ui(ui, |ui| {
        ui.menu_button("File", |ui| {
            action.open_file = ui
                .add(Button::new("Open...").shortcut_text("Ctrl+O"))
                .clicked();
            ui.separator();
            action.close_tab = ui
                .add_enabled(has_tab, Button::new("Close Tab").shortcut_text("Ctrl+W"))
                .clicked();
            action.quit = ui
                .add(Button::new("Quit").shortcut_text("Ctrl+Q"))
                .clicked();
        });

        ui.menu_button("Edit", |ui| {
            ui.add_enabled_ui(has_tab, |ui| {
                action.center = ui
                    .add(Button::new("Center").shortcut_text("Space"))
                    .clicked();
                action.reload = ui
                    .add(Button::new("Reload").shortcut_text("F5"))
                    .clicked();
                action.next_tab = ui
                    .add(Button::new("Next Tab").shortcut_text("Page Down"))
                    .clicked();
                action.prev_tab = ui
                    .add(Button::new("Prev Tab").shortcut_text("Page Up"))
                    .clicked();
            });
        });
    });

    action
}
