//! Parser for the jvg line format.
//!
//! A jvg file starts with the header `jvg 1 0` followed by one directive per
//! line: `width`, `color`, `line`, `rect`, `viewBox` and `point`. Parsing is a
//! single forward pass. Lines that cannot be understood are reported as
//! diagnostics and skipped, so one bad record never loses the rest of the
//! document.

use crate::view_transform::DocRect;

pub const HEADER: &str = "jvg 1 0";

/// Radius of the filled circle drawn for a `point` directive, in document units.
pub const POINT_RADIUS: f64 = 1.0;

/// Pen color as written in the file. Channels are not range checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PenColor {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl PenColor {
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Channels clamped into `0..=255` for drawing.
    pub fn to_rgb8(self) -> [u8; 3] {
        [clamp_channel(self.r), clamp_channel(self.g), clamp_channel(self.b)]
    }
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        pen: PenColor,
    },
    /// `width`/`height` are `x1 - x0` and `y1 - y0` and may be negative.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        pen: PenColor,
    },
    Point {
        x: f64,
        y: f64,
        pen: PenColor,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct JvgDocument {
    pub default_box: DocRect,
    pub primitives: Vec<Primitive>,
    pub diagnostics: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default)]
struct PenState {
    color: PenColor,
}

pub fn parse(text: &str) -> JvgDocument {
    parse_lines(text.lines())
}

pub fn parse_lines<'a, I>(lines: I) -> JvgDocument
where
    I: IntoIterator<Item = &'a str>,
{
    let mut doc = JvgDocument {
        default_box: DocRect::UNIT,
        primitives: Vec::new(),
        diagnostics: Vec::new(),
    };
    let mut pen = PenState::default();
    let mut lines = lines.into_iter().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim_end_matches('\r') == HEADER => {}
        Some((_, header)) => report(&mut doc, 1, format!("Bad header: {header}")),
        None => report(&mut doc, 1, "Bad header: <empty>".to_string()),
    }

    for (index, line) in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&keyword) = tokens.first() else {
            continue;
        };

        let outcome = match keyword {
            "width" => parse_width(&tokens),
            "color" => parse_color(&tokens).map(|color| pen.color = color),
            "line" => parse_polyline(&tokens, pen, &mut doc.primitives),
            "rect" => parse_rect(&tokens, pen).map(|rect| doc.primitives.push(rect)),
            "viewBox" => parse_view_box(&tokens).map(|view_box| doc.default_box = view_box),
            "point" => parse_point(&tokens, pen).map(|point| doc.primitives.push(point)),
            _ => Err("Unknown directive"),
        };

        if let Err(kind) = outcome {
            report(&mut doc, index + 1, format!("{kind}: {}", tokens.join(" ")));
        }
    }

    doc
}

fn report(doc: &mut JvgDocument, line_number: usize, message: String) {
    log::warn!("jvg line {line_number}: {message}");
    doc.diagnostics.push(message);
}

type Outcome<T> = std::result::Result<T, &'static str>;

fn numbers(tokens: &[&str]) -> Option<Vec<f64>> {
    tokens.iter().map(|t| t.parse::<f64>().ok()).collect()
}

// Stroke width is read but not applied to any primitive.
fn parse_width(tokens: &[&str]) -> Outcome<()> {
    match tokens {
        [_, w] if w.parse::<f64>().is_ok() => Ok(()),
        _ => Err("Width error"),
    }
}

fn parse_color(tokens: &[&str]) -> Outcome<PenColor> {
    const ERR: &str = "Color error";
    let &[_, r, g, b] = tokens else {
        return Err(ERR);
    };
    let channel = |t: &str| t.parse::<i32>().map_err(|_| ERR);
    Ok(PenColor::new(channel(r)?, channel(g)?, channel(b)?))
}

fn parse_polyline(tokens: &[&str], pen: PenState, out: &mut Vec<Primitive>) -> Outcome<()> {
    const ERR: &str = "Line error";
    let count = tokens
        .get(1)
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or(ERR)?;
    if count.checked_mul(2).and_then(|n| n.checked_add(2)) != Some(tokens.len()) {
        return Err(ERR);
    }
    let coords = numbers(&tokens[2..]).ok_or(ERR)?;
    let points: Vec<(f64, f64)> = coords.chunks_exact(2).map(|c| (c[0], c[1])).collect();

    out.extend(points.windows(2).map(|pair| Primitive::Line {
        from: pair[0],
        to: pair[1],
        pen: pen.color,
    }));
    Ok(())
}

fn corners(tokens: &[&str], err: &'static str) -> Outcome<(f64, f64, f64, f64)> {
    if tokens.len() != 5 {
        return Err(err);
    }
    match numbers(&tokens[1..]).as_deref() {
        Some(&[x0, y0, x1, y1]) => Ok((x0, y0, x1, y1)),
        _ => Err(err),
    }
}

fn parse_rect(tokens: &[&str], pen: PenState) -> Outcome<Primitive> {
    let (x0, y0, x1, y1) = corners(tokens, "Rect error")?;
    Ok(Primitive::Rect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        pen: pen.color,
    })
}

fn parse_view_box(tokens: &[&str]) -> Outcome<DocRect> {
    let (x0, y0, x1, y1) = corners(tokens, "ViewBox error")?;
    Ok(DocRect::new(x0, y0, x1 - x0, y1 - y0))
}

fn parse_point(tokens: &[&str], pen: PenState) -> Outcome<Primitive> {
    const ERR: &str = "Point error";
    if tokens.len() != 3 {
        return Err(ERR);
    }
    match numbers(&tokens[1..]).as_deref() {
        Some(&[x, y]) => Ok(Primitive::Point {
            x,
            y,
            pen: pen.color,
        }),
        _ => Err(ERR),
    }
}
