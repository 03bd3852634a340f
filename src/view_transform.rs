/// Zoom factor applied per unit of wheel delta (120 units per notch).
const WHEEL_ZOOM_BASE: f64 = 1.0025;

/// An axis-aligned rectangle in document coordinates.
///
/// Width and height are not normalized: a jvg `rect` or `viewBox` whose
/// second corner lies above or left of the first produces negative sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DocRect {
    pub const UNIT: DocRect = DocRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    anchor: (f64, f64),
    start_center: (f64, f64),
}

/// Maps viewport pixels onto document units.
///
/// `scale` is document units per viewport pixel and is always positive. The
/// center is the document point shown in the middle of the viewport.
#[derive(Clone, Debug)]
pub struct ViewTransform {
    center_x: f64,
    center_y: f64,
    scale: f64,
    default_box: DocRect,
    drag: Option<DragState>,
}

impl ViewTransform {
    /// Fit `default_box` into a viewport of `viewport_size` pixels.
    pub fn initialize(default_box: DocRect, viewport_size: (f64, f64)) -> Self {
        let mut transform = Self {
            center_x: 0.0,
            center_y: 0.0,
            scale: 1.0,
            default_box,
            drag: None,
        };
        transform.recenter(viewport_size);
        transform
    }

    /// Re-fit the current default box, discarding any zoom and pan.
    pub fn recenter(&mut self, viewport_size: (f64, f64)) {
        self.scale = fit_scale(&self.default_box, viewport_size);
        let (cx, cy) = self.default_box.center();
        self.center_x = cx;
        self.center_y = cy;
    }

    pub fn visible_region(&self, viewport_size: (f64, f64)) -> DocRect {
        let (w, h) = viewport_size;
        let region_w = self.scale * w;
        let region_h = self.scale * h;
        DocRect::new(
            self.center_x - region_w / 2.0,
            self.center_y - region_h / 2.0,
            region_w,
            region_h,
        )
    }

    /// Rescale by `1.0025^(-wheel_delta)` keeping the document point under
    /// `cursor` fixed on screen.
    pub fn zoom(&mut self, wheel_delta: i32, cursor: (f64, f64), viewport_size: (f64, f64)) {
        let new_scale = self.scale * WHEEL_ZOOM_BASE.powf(-f64::from(wheel_delta));
        if !new_scale.is_finite() || new_scale <= 0.0 {
            log::debug!("Ignoring zoom to degenerate scale {new_scale}");
            return;
        }

        let dx = cursor.0 - viewport_size.0 / 2.0;
        let dy = cursor.1 - viewport_size.1 / 2.0;
        let doc_x = self.center_x + dx * self.scale;
        let doc_y = self.center_y + dy * self.scale;

        self.scale = new_scale;
        self.center_x = doc_x - dx * new_scale;
        self.center_y = doc_y - dy * new_scale;
    }

    pub fn pan_start(&mut self, pos: (f64, f64)) {
        self.drag = Some(DragState {
            anchor: pos,
            start_center: (self.center_x, self.center_y),
        });
    }

    /// Content follows the pointer: dragging right moves the center left.
    pub fn pan_move(&mut self, pos: (f64, f64)) {
        let Some(drag) = self.drag else {
            return;
        };
        self.center_x = drag.start_center.0 - (pos.0 - drag.anchor.0) * self.scale;
        self.center_y = drag.start_center.1 - (pos.1 - drag.anchor.1) * self.scale;
    }

    pub fn pan_end(&mut self, pos: (f64, f64)) {
        self.pan_move(pos);
        self.drag = None;
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cursor_to_document(&self, pos: (f64, f64), viewport_size: (f64, f64)) -> (f64, f64) {
        (
            self.center_x + (pos.0 - viewport_size.0 / 2.0) * self.scale,
            self.center_y + (pos.1 - viewport_size.1 / 2.0) * self.scale,
        )
    }

    /// Replace the default box after a reload. Center and scale are kept.
    pub fn set_default_box(&mut self, default_box: DocRect) {
        self.default_box = default_box;
    }

    pub fn default_box(&self) -> DocRect {
        self.default_box
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    /// Viewport pixels per document unit, as a percentage.
    pub fn zoom_percent(&self) -> f64 {
        100.0 / self.scale
    }
}

fn fit_scale(default_box: &DocRect, viewport_size: (f64, f64)) -> f64 {
    let w = viewport_size.0.max(1.0);
    let h = viewport_size.1.max(1.0);
    let scale = (default_box.width.abs() / w).max(default_box.height.abs() / h);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: (f64, f64), b: (f64, f64)) {
        assert!(
            (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_initialize_fits_wider_dimension() {
        // 200x100 document in a 400x400 viewport: width limits
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 200.0, 100.0), (400.0, 400.0));
        assert_eq!(vt.scale(), 0.5);
        assert_eq!(vt.center(), (100.0, 50.0));
    }

    #[test]
    fn test_initialize_fits_taller_dimension() {
        let vt = ViewTransform::initialize(DocRect::new(10.0, 20.0, 100.0, 300.0), (200.0, 100.0));
        assert_eq!(vt.scale(), 3.0);
        assert_eq!(vt.center(), (60.0, 170.0));
    }

    #[test]
    fn test_initialize_zero_viewport() {
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 50.0, 20.0), (0.0, 0.0));
        assert_eq!(vt.scale(), 50.0);
        assert!(vt.scale() > 0.0);
    }

    #[test]
    fn test_initialize_empty_box_keeps_positive_scale() {
        let vt = ViewTransform::initialize(DocRect::new(3.0, 4.0, 0.0, 0.0), (640.0, 480.0));
        assert_eq!(vt.scale(), 1.0);
        assert_eq!(vt.center(), (3.0, 4.0));
    }

    #[test]
    fn test_initialize_negative_box() {
        let vt = ViewTransform::initialize(DocRect::new(10.0, 10.0, -10.0, -10.0), (100.0, 100.0));
        assert_eq!(vt.scale(), 0.1);
        assert_eq!(vt.center(), (5.0, 5.0));
    }

    #[test]
    fn test_initialize_idempotent() {
        let default_box = DocRect::new(-5.0, 2.5, 37.0, 11.0);
        let a = ViewTransform::initialize(default_box, (321.0, 123.0));
        let b = ViewTransform::initialize(default_box, (321.0, 123.0));
        assert_eq!(a.scale(), b.scale());
        assert_eq!(a.center(), b.center());
    }

    #[test]
    fn test_visible_region() {
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 200.0, 100.0), (400.0, 400.0));
        let region = vt.visible_region((400.0, 400.0));
        assert_eq!(region, DocRect::new(0.0, -50.0, 200.0, 200.0));
    }

    #[test]
    fn test_visible_region_follows_resize() {
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 100.0, 100.0), (100.0, 100.0));
        let region = vt.visible_region((200.0, 100.0));
        assert_eq!(region, DocRect::new(-50.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_cursor_to_document() {
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 200.0, 100.0), (400.0, 400.0));
        assert_close(vt.cursor_to_document((200.0, 200.0), (400.0, 400.0)), (100.0, 50.0));
        assert_close(vt.cursor_to_document((0.0, 0.0), (400.0, 400.0)), (0.0, -50.0));
    }

    #[test]
    fn test_zoom_in_and_out() {
        let mut vt = ViewTransform::initialize(DocRect::UNIT, (100.0, 100.0));
        let before = vt.scale();
        vt.zoom(120, (50.0, 50.0), (100.0, 100.0));
        assert!(vt.scale() < before);
        vt.zoom(-120, (50.0, 50.0), (100.0, 100.0));
        assert!((vt.scale() - before).abs() < EPS);
    }

    #[test]
    fn test_zoom_factor() {
        let mut vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 100.0, 100.0), (100.0, 100.0));
        vt.zoom(-400, (50.0, 50.0), (100.0, 100.0));
        assert!((vt.scale() - 1.0025f64.powi(400)).abs() < EPS);
    }

    #[test]
    fn test_zoom_preserves_point_under_cursor() {
        let size = (640.0, 480.0);
        let cursors = [(0.0, 0.0), (17.5, 400.25), (320.0, 240.0), (639.0, 1.0)];
        let deltas = [1, -1, 120, -120, 960, -2400];
        for cursor in cursors {
            for delta in deltas {
                let mut vt = ViewTransform::initialize(DocRect::new(-30.0, 12.0, 400.0, 250.0), size);
                vt.pan_start((0.0, 0.0));
                vt.pan_end((13.0, -7.0));
                let before = vt.cursor_to_document(cursor, size);
                vt.zoom(delta, cursor, size);
                let after = vt.cursor_to_document(cursor, size);
                assert_close(before, after);
            }
        }
    }

    #[test]
    fn test_zoom_is_unbounded() {
        let mut vt = ViewTransform::initialize(DocRect::UNIT, (100.0, 100.0));
        for _ in 0..20 {
            vt.zoom(1200, (50.0, 50.0), (100.0, 100.0));
        }
        assert!(vt.scale() < 1e-10);
        assert!(vt.scale() > 0.0);
    }

    #[test]
    fn test_pan_follows_drag() {
        let mut vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 100.0, 100.0), (50.0, 50.0));
        assert_eq!(vt.scale(), 2.0);
        vt.pan_start((10.0, 10.0));
        assert!(vt.is_panning());
        vt.pan_move((20.0, 15.0));
        assert_eq!(vt.center(), (30.0, 40.0));
        vt.pan_end((20.0, 15.0));
        assert!(!vt.is_panning());
        assert_eq!(vt.center(), (30.0, 40.0));
    }

    #[test]
    fn test_pan_round_trip() {
        let mut vt = ViewTransform::initialize(DocRect::new(2.0, 3.0, 77.0, 55.0), (300.0, 200.0));
        let original = vt.center();
        let p0 = (12.5, 80.0);
        let p1 = (211.0, 3.75);

        vt.pan_start(p0);
        vt.pan_move(p1);
        vt.pan_end(p1);
        vt.pan_start(p1);
        vt.pan_move(p0);
        vt.pan_end(p0);

        assert_close(vt.center(), original);
    }

    #[test]
    fn test_pan_move_without_start_is_noop() {
        let mut vt = ViewTransform::initialize(DocRect::UNIT, (100.0, 100.0));
        let center = vt.center();
        vt.pan_move((40.0, 40.0));
        vt.pan_end((80.0, 80.0));
        assert_eq!(vt.center(), center);
    }

    #[test]
    fn test_recenter_after_navigation() {
        let size = (400.0, 300.0);
        let mut vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 40.0, 30.0), size);
        let fresh = vt.clone();
        vt.zoom(240, (10.0, 10.0), size);
        vt.pan_start((0.0, 0.0));
        vt.pan_end((100.0, 50.0));
        vt.recenter(size);
        assert_eq!(vt.scale(), fresh.scale());
        assert_eq!(vt.center(), fresh.center());
    }

    #[test]
    fn test_set_default_box_keeps_view() {
        let size = (100.0, 100.0);
        let mut vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 10.0, 10.0), size);
        vt.zoom(120, (30.0, 30.0), size);
        let (scale, center) = (vt.scale(), vt.center());

        vt.set_default_box(DocRect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(vt.scale(), scale);
        assert_eq!(vt.center(), center);

        vt.recenter(size);
        assert_eq!(vt.center(), (10.0, 10.0));
        assert_eq!(vt.scale(), 0.2);
    }

    #[test]
    fn test_zoom_extreme_deltas_keep_view() {
        let size = (100.0, 100.0);
        let mut vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 10.0, 10.0), size);
        let (scale, center) = (vt.scale(), vt.center());

        for delta in [i32::MIN, i32::MAX] {
            vt.zoom(delta, (50.0, 50.0), size);
            assert_eq!(vt.scale(), scale);
            assert_eq!(vt.center(), center);
        }
    }

    #[test]
    fn test_zoom_percent() {
        let vt = ViewTransform::initialize(DocRect::new(0.0, 0.0, 50.0, 50.0), (100.0, 100.0));
        assert_eq!(vt.zoom_percent(), 200.0);
    }
}
