use egui::{Sense, Ui};

use crate::tabs::Tabs;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TabBarAction {
    pub select: Option<usize>,
    pub close: Option<usize>,
    /// Tab dragged from the first index and dropped on the second.
    pub move_tab: Option<(usize, usize)>,
}

pub fn draw_tab_bar(ui: &mut Ui, tabs: &Tabs) -> TabBarAction {
    let mut action = TabBarAction::default();
    let current = tabs.current_index();

    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal(|ui| {
            for (index, tab) in tabs.iter().enumerate() {
                let label = ui
                    .selectable_label(current == Some(index), tab.title())
                    .interact(Sense::drag())
                    .on_hover_text(tab.document.path.display().to_string());
                if label.clicked() {
                    action.select = Some(index);
                }

                // Drag a tab onto another one to reorder
                label.dnd_set_drag_payload(index);
                if label.dnd_hover_payload::<usize>().is_some() {
                    ui.painter().vline(
                        label.rect.left(),
                        label.rect.y_range(),
                        ui.visuals().selection.stroke,
                    );
                }
                if let Some(from) = label.dnd_release_payload::<usize>() {
                    action.move_tab = Some((*from, index));
                }
                if ui
                    .small_button("\u{00D7}")
                    .on_hover_text("Close tab")
                    .clicked()
                {
                    action.close = Some(index);
                }
                ui.separator();
            }
        });
    });

    action
}
