use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::file_watcher::POLL_INTERVAL;
use crate::tabs::{DocumentTab, Tabs};
use crate::ui::canvas::{self, CanvasInput};
use crate::ui::menu_bar::{self, MenuAction};
use crate::ui::shortcuts;
use crate::ui::status_bar;
use crate::ui::tab_bar;

pub struct ViewerApp {
    tabs: Tabs,
    error_message: Option<String>,
    // Cleared by the next successful render
    render_error: Option<String>,

    // Files from the command line, opened on the first frame
    initial_files: Vec<PathBuf>,
}

impl ViewerApp {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            tabs: Tabs::new(),
            error_message: None,
            render_error: None,
            initial_files: files,
        }
    }

    /// Open `path` in a new tab. On failure no tab is created.
    fn load_file(&mut self, path: &Path) {
        match DocumentTab::open(path) {
            Ok(tab) => {
                self.error_message = None;
                self.tabs.push(tab);
            }
            Err(e) => {
                self.error_message = Some(format!("Error: {}: {}", path.display(), e));
                log::error!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    fn open_file_dialog(&mut self) {
        let files = rfd::FileDialog::new()
            .add_filter("Vector documents", &["svg", "svgz", "jvg"])
            .add_filter("Svg documents", &["svg", "svgz"])
            .add_filter("Jvg documents", &["jvg"])
            .add_filter("Any files", &["*"])
            .pick_files();

        let Some(mut files) = files else {
            return;
        };

        // Natural sort
        files.sort_by(|a, b| {
            let a_name = a.file_name().unwrap_or_default().to_string_lossy();
            let b_name = b.file_name().unwrap_or_default().to_string_lossy();
            natord::compare(&a_name, &b_name)
        });
        for path in files {
            self.load_file(&path);
        }
    }

    fn reload_current(&mut self) {
        let Some(tab) = self.tabs.current_mut() else {
            return;
        };
        match tab.reload() {
            Ok(()) => self.error_message = None,
            Err(e) => {
                self.error_message = Some(format!("Reload error: {}", e));
                log::error!("Failed to reload {}: {}", tab.document.path.display(), e);
            }
        }
    }

    fn handle_action(&mut self, action: MenuAction, ctx: &egui::Context) {
        if action.open_file {
            self.open_file_dialog();
        }
        if action.close_tab {
            if let Some(tab) = self.tabs.close_current() {
                log::info!("Closed {}", tab.document.path.display());
            }
        }
        if action.center {
            if let Some(tab) = self.tabs.current_mut() {
                tab.center();
            }
        }
        if action.reload {
            self.reload_current();
        }
        if action.next_tab {
            self.tabs.next();
        }
        if action.prev_tab {
            self.tabs.prev();
        }
        if action.quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Error shown in the status bar; open and reload failures win over
    /// render failures.
    fn status_error(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.render_error.as_deref())
    }

    /// Reload every tab whose file changed on disk.
    fn poll_file_changes(&mut self) {
        let now = Instant::now();
        for tab in self.tabs.iter_mut() {
            if let Some(Err(e)) = tab.poll_file_change(now) {
                self.error_message = Some(format!("Reload error: {}", e));
                log::error!("Failed to reload {}: {}", tab.document.path.display(), e);
            }
        }
    }
}

/// Render the tab's visible region. Returns the status bar text on failure.
fn render_tab(ctx: &egui::Context, tab: &mut DocumentTab, area: egui::Vec2) -> Option<String> {
    let result = tab
        .renderer
        .render_and_upload(ctx, &tab.document, &tab.transform, area);
    tab.render_dirty = false;
    match result {
        Ok(()) => None,
        Err(e) => {
            log::error!("Render failed: {e}");
            Some(format!("Render error: {}", e))
        }
    }
}

fn apply_canvas_input(tab: &mut DocumentTab, input: CanvasInput) {
    if let Some(pos) = input.pan_start {
        tab.pan_start(pos);
    }
    if let Some(pos) = input.pan_to {
        if input.pan_end {
            tab.pan_end(pos);
        } else {
            tab.pan_move(pos);
        }
    }
    match input.pointer {
        Some(pos) if input.wheel_delta != 0 => tab.zoom(input.wheel_delta, pos),
        Some(pos) => tab.hover(pos),
        None if !tab.transform.is_panning() => tab.cursor_location = None,
        None => {}
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for path in std::mem::take(&mut self.initial_files) {
            self.load_file(&path);
        }

        self.poll_file_changes();
        if !self.tabs.is_empty() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let kb_action = shortcuts::handle_shortcuts(ctx, !self.tabs.is_empty());

        // Handle dropped files
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            self.load_file(&path);
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            let menu_action = menu_bar::draw_menu_bar(ui, !self.tabs.is_empty());
            self.handle_action(menu_action.merge(kb_action), ctx);
        });

        if !self.tabs.is_empty() {
            egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
                let action = tab_bar::draw_tab_bar(ui, &self.tabs);
                if let Some(index) = action.select {
                    self.tabs.select(index);
                }
                if let Some((from, to)) = action.move_tab {
                    self.tabs.move_tab(from, to);
                }
                if let Some(index) = action.close {
                    self.tabs.close(index);
                }
            });
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_bar::draw_status_bar(ui, &self.tabs, self.status_error());
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let Some(tab) = self.tabs.current_mut() else {
                    canvas::draw_welcome(ui);
                    return;
                };

                let area = ui.available_size();
                tab.set_viewport((area.x as f64, area.y as f64));

                let response = canvas::draw_canvas(ui, tab.renderer.texture.as_ref());
                let input = canvas::read_input(ui, &response);
                apply_canvas_input(tab, input);

                if tab.render_dirty && area.x >= 1.0 && area.y >= 1.0 {
                    self.render_error = render_tab(ctx, tab, area);
                    // Show the new texture without waiting for more input
                    ctx.request_repaint();
                }
            });
    }
}
