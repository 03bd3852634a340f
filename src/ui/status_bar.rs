use egui::Ui;

use crate::tabs::Tabs;

pub fn draw_status_bar(ui: &mut Ui, tabs: &Tabs, error_msg: Option<&str>) {
    ui.horizontal(|ui| {
        let Some(tab) = tabs.current() else {
            match error_msg {
                Some(err) => ui.colored_label(egui::Color32::RED, err),
                None => ui.label("No file loaded"),
            };
            return;
        };

        if let Some(location) = tab.cursor_location {
            ui.monospace(format_location(location));
            ui.separator();
        }
        if let Some(err) = error_msg {
            ui.colored_label(egui::Color32::RED, err);
            ui.separator();
        }

        let view_box = tab.transform.default_box();
        ui.label(tab.document.filename()).on_hover_text(format!(
            "viewBox {} {} {} {}",
            view_box.x, view_box.y, view_box.width, view_box.height
        ));
        ui.separator();

        let (cx, cy) = tab.transform.center();
        ui.label(format!("Zoom: {:.0}%", tab.transform.zoom_percent()))
            .on_hover_text(format!(
                "{} units per pixel, centered on {}",
                tab.transform.scale(),
                format_location((cx, cy))
            ));
        if tab.renderer.rendered_width > 0 {
            ui.separator();
            ui.label(format!(
                "Render: {}x{}",
                tab.renderer.rendered_width, tab.renderer.rendered_height
            ));
        }

        let diagnostics = tab.document.diagnostics();
        if !diagnostics.is_empty() {
            ui.separator();
            ui.colored_label(
                egui::Color32::YELLOW,
                format!("{} diagnostics", diagnostics.len()),
            )
            .on_hover_text(diagnostics.join("\n"));
        }

        ui.separator();
        ui.label(tabs.position_display());
        ui.separator();
        ui.label(tab.document.file_size_display());
    });
}

/// Document coordinate under the cursor, `x y` with six decimals.
pub fn format_location((x, y): (f64, f64)) -> String {
    format!("{x:.6} {y:.6}")
}
