use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, pos2};

use super::highlight::NodeShape;

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(7, 12, 20));
}

fn regular_polygon(center: Pos2, radius: f32, sides: usize, rotation: f32) -> Vec<Pos2> {
    (0..sides)
        .map(|i| {
            let angle = rotation + (i as f32 / sides as f32) * TAU;
            pos2(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            )
        })
        .collect()
}

/// Outline of a non-circular shape with nominal radius `r`. Circles return
/// `None` and are drawn with the painter's circle primitives.
pub(super) fn shape_outline(shape: NodeShape, center: Pos2, r: f32) -> Option<Vec<Pos2>> {
    let points = match shape {
        NodeShape::Circle => return None,
        NodeShape::Square => vec![
            pos2(center.x - r, center.y - r),
            pos2(center.x + r, center.y - r),
            pos2(center.x + r, center.y + r),
            pos2(center.x - r, center.y + r),
        ],
        NodeShape::Triangle => regular_polygon(center, r * 1.25, 3, -FRAC_PI_2),
        NodeShape::Diamond => vec![
            pos2(center.x, center.y - r * 1.25),
            pos2(center.x + r * 1.1, center.y),
            pos2(center.x, center.y + r * 1.25),
            pos2(center.x - r * 1.1, center.y),
        ],
        NodeShape::Hexagon => regular_polygon(center, r * 1.2, 6, FRAC_PI_6),
        NodeShape::Pentagon => regular_polygon(center, r * 1.25, 5, -FRAC_PI_2),
    };
    Some(points)
}

pub(super) fn fill_shape(painter: &Painter, shape: NodeShape, center: Pos2, r: f32, fill: Color32) {
    match shape_outline(shape, center, r) {
        Some(points) => {
            painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
        }
        None => {
            painter.circle_filled(center, r, fill);
        }
    }
}

pub(super) fn stroke_shape(painter: &Painter, shape: NodeShape, center: Pos2, r: f32, stroke: Stroke) {
    match shape_outline(shape, center, r) {
        Some(points) => {
            painter.add(Shape::closed_line(points, stroke));
        }
        None => {
            painter.circle_stroke(center, r, stroke);
        }
    }
}

/// Soft halo approximated by a few widening, fading strokes.
pub(super) fn stroke_shape_glow(
    painter: &Painter,
    shape: NodeShape,
    center: Pos2,
    r: f32,
    color: Color32,
    blur: f32,
) {
    const LAYERS: usize = 3;
    for layer in 1..=LAYERS {
        let t = layer as f32 / LAYERS as f32;
        let stroke = Stroke::new(blur * t, with_alpha(color, 0.38 * (1.0 - t) * 0.5));
        stroke_shape(painter, shape, center, r, stroke);
    }
}

pub(super) fn line_glow(painter: &Painter, start: Pos2, end: Pos2, color: Color32, blur: f32) {
    const LAYERS: usize = 3;
    for layer in 1..=LAYERS {
        let t = layer as f32 / LAYERS as f32;
        let stroke = Stroke::new(blur * t, with_alpha(color, 0.35 * (1.0 - t) * 0.5));
        painter.line_segment([start, end], stroke);
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}
