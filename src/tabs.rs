use std::path::Path;
use std::time::Instant;

use crate::document::Document;
use crate::error::Result;
use crate::file_watcher::FileWatcher;
use crate::renderer::Renderer;
use crate::view_transform::ViewTransform;

/// Viewport assumed until the canvas has been laid out once.
const INITIAL_VIEWPORT: (f64, f64) = (800.0, 600.0);

/// One open document together with its view state.
pub struct DocumentTab {
    pub document: Document,
    pub transform: ViewTransform,
    pub renderer: Renderer,
    pub render_dirty: bool,
    /// Document coordinate under the pointer, if it is over the canvas.
    pub cursor_location: Option<(f64, f64)>,
    watcher: FileWatcher,
    viewport: (f64, f64),
    needs_fit: bool,
}

impl DocumentTab {
    pub fn open(path: &Path) -> Result<Self> {
        let document = Document::load(path)?;
        let transform = ViewTransform::initialize(document.default_box, INITIAL_VIEWPORT);
        let watcher = FileWatcher::new(path);
        log::info!("Opened {}", path.display());
        Ok(Self {
            document,
            transform,
            renderer: Renderer::new(),
            render_dirty: true,
            cursor_location: None,
            watcher,
            viewport: INITIAL_VIEWPORT,
            needs_fit: true,
        })
    }

    pub fn title(&self) -> &str {
        self.document.filename()
    }

    /// Track the canvas size. The first call fits the document into it.
    pub fn set_viewport(&mut self, size: (f64, f64)) {
        if self.needs_fit {
            self.needs_fit = false;
            self.viewport = size;
            self.transform.recenter(size);
            self.render_dirty = true;
        } else if size != self.viewport {
            self.viewport = size;
            self.render_dirty = true;
        }
    }

    pub fn center(&mut self) {
        self.transform.recenter(self.viewport);
        self.render_dirty = true;
    }

    /// Re-read the document, keeping the current center and scale.
    pub fn reload(&mut self) -> Result<()> {
        self.document.reload()?;
        self.transform.set_default_box(self.document.default_box);
        self.watcher.sync();
        self.render_dirty = true;
        log::info!("Reloaded {}", self.document.path.display());
        Ok(())
    }

    /// Reload if the file changed on disk. Returns `None` when nothing changed.
    pub fn poll_file_change(&mut self, now: Instant) -> Option<Result<()>> {
        if self.watcher.poll(now) {
            Some(self.reload())
        } else {
            None
        }
    }

    pub fn zoom(&mut self, wheel_delta: i32, cursor: (f64, f64)) {
        self.transform.zoom(wheel_delta, cursor, self.viewport);
        self.hover(cursor);
        self.render_dirty = true;
    }

    pub fn pan_start(&mut self, pos: (f64, f64)) {
        self.transform.pan_start(pos);
    }

    pub fn pan_move(&mut self, pos: (f64, f64)) {
        self.transform.pan_move(pos);
        self.hover(pos);
        self.render_dirty = true;
    }

    pub fn pan_end(&mut self, pos: (f64, f64)) {
        self.transform.pan_end(pos);
        self.hover(pos);
        self.render_dirty = true;
    }

    pub fn hover(&mut self, pos: (f64, f64)) {
        self.cursor_location = Some(self.transform.cursor_to_document(pos, self.viewport));
    }
}

/// Open tabs in display order plus the index of the active one.
pub struct Tabs {
    tabs: Vec<DocumentTab>,
    current: usize,
}

impl Tabs {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            current: 0,
        }
    }

    /// Append a tab and make it the active one.
    pub fn push(&mut self, tab: DocumentTab) {
        self.tabs.push(tab);
        self.current = self.tabs.len() - 1;
    }

    pub fn close(&mut self, index: usize) -> Option<DocumentTab> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);
        if index < self.current || self.current >= self.tabs.len() {
            self.current = self.current.saturating_sub(1);
        }
        Some(tab)
    }

    pub fn close_current(&mut self) -> Option<DocumentTab> {
        self.close(self.current)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.current = index;
        }
    }

    /// Move the tab at `from` to position `to`. The active tab stays active
    /// wherever it ends up.
    pub fn move_tab(&mut self, from: usize, to: usize) {
        if from >= self.tabs.len() || to >= self.tabs.len() || from == to {
            return;
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);

        if self.current == from {
            self.current = to;
        } else if from < self.current && self.current <= to {
            self.current -= 1;
        } else if to <= self.current && self.current < from {
            self.current += 1;
        }
    }

    pub fn next(&mut self) {
        if !self.tabs.is_empty() {
            self.current = (self.current + 1) % self.tabs.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.tabs.is_empty() {
            self.current = (self.current + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.tabs.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&DocumentTab> {
        self.tabs.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut DocumentTab> {
        self.tabs.get_mut(self.current)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentTab> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DocumentTab> {
        self.tabs.iter_mut()
    }

    pub fn position_display(&self) -> String {
        match self.current_index() {
            Some(index) => format!("{}/{}", index + 1, self.len()),
            None => String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
