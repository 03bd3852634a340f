use egui::{ColorImage, TextureHandle, TextureOptions};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::document::{Document, DocumentContent};
use crate::error::{Result, ViewerError};
use crate::jvg::{JvgDocument, PenColor, Primitive, POINT_RADIUS};
use crate::view_transform::{DocRect, ViewTransform};

pub const MAX_RENDER_DIM: u32 = 4096;

/// Maps a document region onto a pixmap of a given size.
#[derive(Clone, Copy, Debug)]
struct RegionMapping {
    region: DocRect,
    sx: f64,
    sy: f64,
}

impl RegionMapping {
    fn new(region: DocRect, pixel_width: u32, pixel_height: u32) -> Result<Self> {
        if region.width <= 0.0 || region.height <= 0.0 {
            return Err(ViewerError::Render("Visible region is empty".into()));
        }
        Ok(Self {
            region,
            sx: pixel_width as f64 / region.width,
            sy: pixel_height as f64 / region.height,
        })
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (f32, f32) {
        (
            ((x - self.region.x) * self.sx) as f32,
            ((y - self.region.y) * self.sy) as f32,
        )
    }

    fn transform(&self) -> Transform {
        Transform::from_row(
            self.sx as f32,
            0.0,
            0.0,
            self.sy as f32,
            (-self.region.x * self.sx) as f32,
            (-self.region.y * self.sy) as f32,
        )
    }
}

pub struct Renderer {
    pub texture: Option<TextureHandle>,
    pub rendered_width: u32,
    pub rendered_height: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            texture: None,
            rendered_width: 0,
            rendered_height: 0,
        }
    }

    /// Rasterize `region` of the document into a pixmap on a white background.
    pub fn render_to_pixmap(
        doc: &Document,
        region: DocRect,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<Pixmap> {
        let pixel_width = pixel_width.clamp(1, MAX_RENDER_DIM);
        let pixel_height = pixel_height.clamp(1, MAX_RENDER_DIM);
        let mapping = RegionMapping::new(region, pixel_width, pixel_height)?;

        let mut pixmap = Pixmap::new(pixel_width, pixel_height)
            .ok_or_else(|| ViewerError::Render("Failed to create pixmap".into()))?;
        pixmap.fill(Color::WHITE);

        match &doc.content {
            DocumentContent::Svg {
                tree,
                size_to_view_box,
            } => {
                let transform = mapping.transform().pre_concat(*size_to_view_box);
                resvg::render(tree, transform, &mut pixmap.as_mut());
            }
            DocumentContent::Jvg(jvg) => draw_primitives(&mut pixmap, jvg, &mapping),
        }

        Ok(pixmap)
    }

    /// Render the visible region for a canvas of `area` logical points and
    /// upload it as a GPU texture.
    pub fn render_and_upload(
        &mut self,
        ctx: &egui::Context,
        doc: &Document,
        transform: &ViewTransform,
        area: egui::Vec2,
    ) -> Result<()> {
        let pixels_per_point = ctx.pixels_per_point();
        let pixel_width = (area.x * pixels_per_point).round() as u32;
        let pixel_height = (area.y * pixels_per_point).round() as u32;
        let region = transform.visible_region((area.x as f64, area.y as f64));

        let pixmap = Self::render_to_pixmap(doc, region, pixel_width, pixel_height)?;

        let width = pixmap.width() as usize;
        let height = pixmap.height() as usize;
        let image = ColorImage::from_rgba_premultiplied([width, height], pixmap.data());

        let options = TextureOptions {
            magnification: egui::TextureFilter::Linear,
            minification: egui::TextureFilter::Linear,
            ..Default::default()
        };

        match &mut self.texture {
            Some(handle) => handle.set(image, options),
            None => {
                self.texture = Some(ctx.load_texture("document_render", image, options));
            }
        }

        self.rendered_width = width as u32;
        self.rendered_height = height as u32;

        Ok(())
    }
}

fn pen_paint(pen: PenColor) -> Paint<'static> {
    let [r, g, b] = pen.to_rgb8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    paint
}

// Outlines use a one pixel cosmetic pen; point discs scale with the document.
fn draw_primitives(pixmap: &mut Pixmap, jvg: &JvgDocument, mapping: &RegionMapping) {
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    for primitive in &jvg.primitives {
        match *primitive {
            Primitive::Line { from, to, pen } => {
                let (x0, y0) = mapping.to_pixel(from);
                let (x1, y1) = mapping.to_pixel(to);
                let mut pb = PathBuilder::new();
                pb.move_to(x0, y0);
                pb.line_to(x1, y1);
                if let Some(path) = pb.finish() {
                    pixmap.stroke_path(&path, &pen_paint(pen), &stroke, Transform::identity(), None);
                }
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                pen,
            } => {
                let corners = [
                    (x, y),
                    (x + width, y),
                    (x + width, y + height),
                    (x, y + height),
                ];
                let mut pb = PathBuilder::new();
                for (i, corner) in corners.into_iter().enumerate() {
                    let (px, py) = mapping.to_pixel(corner);
                    if i == 0 {
                        pb.move_to(px, py);
                    } else {
                        pb.line_to(px, py);
                    }
                }
                pb.close();
                if let Some(path) = pb.finish() {
                    pixmap.stroke_path(&path, &pen_paint(pen), &stroke, Transform::identity(), None);
                }
            }
            Primitive::Point { x, y, pen } => {
                let (cx, cy) = mapping.to_pixel((x, y));
                let radius = (POINT_RADIUS * mapping.sx) as f32;
                let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
                    continue;
                };
                let paint = pen_paint(pen);
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}
