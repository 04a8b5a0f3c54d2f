use eframe::egui::{
    Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind,
};

use crate::app::hooks::ActivationState;
use crate::util::midpoint;
use crate::workspace::{NodeState, RopeChain};

const ROPE_MIN_SPAN: f32 = 2.0;
const CURVE_STEPS: usize = 6;

#[derive(Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub dark: bool,
    pub background: Color32,
    pub grid: Color32,
    pub panel_fill: Color32,
    pub panel_stroke: Color32,
    pub rope: Color32,
    pub node_fill: Color32,
    pub node_stroke: Color32,
    pub hub_fill: Color32,
    pub text: Color32,
}

pub const MIDNIGHT: Palette = Palette {
    name: "midnight",
    dark: true,
    background: Color32::from_rgb(19, 23, 29),
    grid: Color32::from_rgba_premultiplied(60, 70, 80, 70),
    panel_fill: Color32::from_rgb(27, 32, 40),
    panel_stroke: Color32::from_rgb(52, 62, 74),
    rope: Color32::from_rgb(122, 134, 150),
    node_fill: Color32::from_rgb(38, 46, 58),
    node_stroke: Color32::from_rgb(76, 90, 108),
    hub_fill: Color32::from_rgb(46, 58, 74),
    text: Color32::from_gray(235),
};

pub const PAPER: Palette = Palette {
    name: "paper",
    dark: false,
    background: Color32::from_rgb(244, 241, 234),
    grid: Color32::from_rgba_premultiplied(190, 186, 176, 90),
    panel_fill: Color32::from_rgb(252, 250, 246),
    panel_stroke: Color32::from_rgb(206, 200, 188),
    rope: Color32::from_rgb(142, 134, 120),
    node_fill: Color32::from_rgb(236, 231, 220),
    node_stroke: Color32::from_rgb(170, 162, 146),
    hub_fill: Color32::from_rgb(226, 219, 204),
    text: Color32::from_gray(40),
};

impl Palette {
    pub fn by_name(name: &str) -> Palette {
        if name == PAPER.name { PAPER } else { MIDNIGHT }
    }
}

/// Quadratic pieces through each particle to the midpoint of the next
/// pair, flattened for the painter.
pub fn rope_polyline(rope: &RopeChain) -> Vec<Pos2> {
    let points: Vec<Pos2> = rope.particles.iter().map(|p| p.pos).collect();
    if points.len() < 3 {
        return points;
    }

    let mut path = Vec::with_capacity((points.len() - 2) * CURVE_STEPS + 2);
    path.push(points[0]);
    let mut cursor = points[0];
    for index in 1..points.len() - 1 {
        let control = points[index];
        let target = midpoint(points[index], points[index + 1]);
        for step in 1..=CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            let point = Pos2::new(
                u * u * cursor.x + 2.0 * u * t * control.x + t * t * target.x,
                u * u * cursor.y + 2.0 * u * t * control.y + t * t * target.y,
            );
            path.push(point);
        }
        cursor = target;
    }
    if let Some(&last) = points.last() {
        path.push(last);
    }
    path
}

pub fn draw_rope(painter: &Painter, rope: &RopeChain, palette: &Palette) {
    let first = rope.particles.first().map(|p| p.pos);
    let last = rope.particles.last().map(|p| p.pos);
    if let (Some(first), Some(last)) = (first, last)
        && first.distance(last) < ROPE_MIN_SPAN
    {
        // Collapsed child.
        return;
    }

    let path = rope_polyline(rope);
    for window in path.windows(2) {
        painter.line_segment([window[0], window[1]], Stroke::new(2.0, palette.rope));
    }
}

pub fn draw_node(
    painter: &Painter,
    node: &NodeState,
    activation: &ActivationState,
    palette: &Palette,
    hovered: bool,
) {
    if node.collapsed {
        return;
    }

    let rect = node.rect();
    let active = activation.highlights(node.id());

    if node.is_hub() {
        let radius = node.size.x * 0.5;
        painter.circle_filled(rect.center(), radius, palette.hub_fill);
        let stroke_color = active
            .map(|activation| activation.category.ring_color())
            .unwrap_or(if hovered {
                palette.text
            } else {
                palette.node_stroke
            });
        painter.circle_stroke(rect.center(), radius, Stroke::new(2.0, stroke_color));
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            node.spec.label,
            FontId::proportional(13.0),
            palette.text,
        );
        if let Some(glyph) = active.and_then(|activation| activation.glyph.as_deref()) {
            painter.text(
                rect.center_top() + eframe::egui::vec2(0.0, -10.0),
                Align2::CENTER_BOTTOM,
                glyph,
                FontId::proportional(18.0),
                palette.text,
            );
        }
    } else {
        painter.rect_filled(rect, CornerRadius::same(10), palette.node_fill);
        let stroke_color = active
            .map(|activation| activation.category.ring_color())
            .unwrap_or(if hovered {
                palette.text
            } else {
                palette.node_stroke
            });
        painter.rect_stroke(
            rect,
            CornerRadius::same(10),
            Stroke::new(1.5, stroke_color),
            StrokeKind::Outside,
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            node.spec.label,
            FontId::proportional(12.0),
            palette.text,
        );
    }
}

pub fn draw_panel(painter: &Painter, panel: Rect, palette: &Palette) {
    painter.rect_filled(panel, CornerRadius::same(14), palette.panel_fill);
    painter.rect_stroke(
        panel,
        CornerRadius::same(14),
        Stroke::new(1.0, palette.panel_stroke),
        StrokeKind::Inside,
    );
}

pub fn draw_background(painter: &Painter, rect: Rect, palette: &Palette, time: f64) {
    painter.rect_filled(rect, 0.0, palette.background);

    let step = 56.0;
    let drift = ((time * 6.0) % step as f64) as f32;

    let mut x = rect.left() + (drift.rem_euclid(step));
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, palette.grid),
        );
        x += step;
    }

    let mut y = rect.top() + (drift.rem_euclid(step));
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, palette.grid),
        );
        y += step;
    }
}

pub fn draw_flat_background(painter: &Painter, rect: Rect, palette: &Palette) {
    painter.rect_filled(rect, 0.0, palette.background);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{RopeAnchors, SEGMENTS};
    use eframe::egui::pos2;

    #[test]
    fn polyline_starts_and_ends_on_the_anchors() {
        let anchors = RopeAnchors {
            start: pos2(0.0, 0.0),
            end: pos2(240.0, 0.0),
        };
        let rope = RopeChain::new("k".to_owned(), anchors);
        let path = rope_polyline(&rope);
        assert_eq!(path.first(), Some(&anchors.start));
        assert_eq!(path.last(), Some(&anchors.end));
        assert!(path.len() > SEGMENTS);
    }
}
