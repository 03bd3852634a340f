use egui::{Color32, Event, MouseWheelUnit, Pos2, Rect, Sense, TextureHandle, Ui};

/// Wheel units per scrolled line, matching one notch of a classic mouse wheel.
const WHEEL_UNITS_PER_LINE: f64 = 120.0;
/// Wheel units per scrolled point for touchpads and smooth scrolling.
const WHEEL_UNITS_PER_POINT: f64 = 3.0;
const WHEEL_UNITS_PER_PAGE: f64 = 1200.0;
/// Base of the wheel zoom curve, used to turn pinch factors into wheel units.
const WHEEL_ZOOM_BASE: f64 = 1.0025;

/// Pointer input on the canvas, in pixels relative to its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasInput {
    pub pointer: Option<(f64, f64)>,
    pub wheel_delta: i32,
    pub pan_start: Option<(f64, f64)>,
    pub pan_to: Option<(f64, f64)>,
    pub pan_end: bool,
}

pub fn draw_canvas(ui: &mut Ui, texture: Option<&TextureHandle>) -> egui::Response {
    let available = ui.available_size();
    let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
    let rect = response.rect;

    painter.rect_filled(rect, 0.0, Color32::WHITE);

    // The texture always covers the whole canvas
    if let Some(tex) = texture {
        painter.image(
            tex.id(),
            rect,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    response
}

pub fn read_input(ui: &Ui, response: &egui::Response) -> CanvasInput {
    let origin = response.rect.min;
    let local = |p: Pos2| ((p.x - origin.x) as f64, (p.y - origin.y) as f64);
    let mut input = CanvasInput {
        pointer: response.hover_pos().map(local),
        ..Default::default()
    };

    if response.hovered() {
        input.wheel_delta = ui.input(|i| wheel_units(&i.events));
    }

    let pointer_pos = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.latest_pos()));

    if response.drag_started() {
        let anchor = ui.input(|i| i.pointer.press_origin()).or(pointer_pos);
        input.pan_start = anchor.map(local);
    }
    if response.dragged() || response.drag_stopped() {
        input.pan_to = pointer_pos.map(local);
        input.pan_end = response.drag_stopped();
    }

    input
}

/// Sum wheel and pinch events of this frame as wheel units. Positive values
/// zoom in.
fn wheel_units(events: &[Event]) -> i32 {
    let total: f64 = events
        .iter()
        .map(|event| match event {
            Event::MouseWheel { unit, delta, .. } => scroll_to_wheel_units(*unit, delta.y),
            Event::Zoom(factor) if *factor > 0.0 => (*factor as f64).ln() / WHEEL_ZOOM_BASE.ln(),
            _ => 0.0,
        })
        .sum();
    total.round() as i32
}

fn scroll_to_wheel_units(unit: MouseWheelUnit, delta_y: f32) -> f64 {
    let per_unit = match unit {
        MouseWheelUnit::Point => WHEEL_UNITS_PER_POINT,
        MouseWheelUnit::Line => WHEEL_UNITS_PER_LINE,
        MouseWheelUnit::Page => WHEEL_UNITS_PER_PAGE,
    };
    delta_y as f64 * per_unit
}

pub fn draw_welcome(ui: &mut Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading("SVG Viewer");
            ui.add_space(10.0);
            ui.label("Open an SVG or jvg file, or drop one here");
            ui.add_space(5.0);
            ui.label("Ctrl+O to open  |  Space to center  |  Page Up/Down to switch tabs");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_line_notch() {
        assert_eq!(scroll_to_wheel_units(MouseWheelUnit::Line, 1.0), 120.0);
        assert_eq!(scroll_to_wheel_units(MouseWheelUnit::Line, -2.0), -240.0);
    }

    #[test]
    fn test_wheel_points() {
        assert_eq!(scroll_to_wheel_units(MouseWheelUnit::Point, 15.0), 45.0);
    }

    #[test]
    fn test_pinch_zoom_in_is_positive() {
        let units = wheel_units(&[Event::Zoom(1.0025f32.powi(100))]);
        assert!((99..=101).contains(&units));
        assert!(wheel_units(&[Event::Zoom(0.5)]) < 0);
    }

    #[test]
    fn test_pinch_events_accumulate() {
        let units = wheel_units(&[Event::Zoom(1.0025f32.powi(50)), Event::Zoom(1.0025f32.powi(50))]);
        assert!((99..=101).contains(&units));
    }

    #[test]
    fn test_other_events_ignored() {
        assert_eq!(wheel_units(&[Event::Copy, Event::Zoom(1.0)]), 0);
    }
}
