use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

pub const VIEWPORT_MARGIN: f32 = 8.0;
pub const VIEWPORT_TOP_MARGIN: f32 = 80.0;

// The top strip stays free for the fixed controls.
pub fn clamp_into_viewport(viewport: Rect, size: Vec2, candidate: Pos2) -> Pos2 {
    let min_x = viewport.left() + VIEWPORT_MARGIN;
    let max_x = (viewport.right() - VIEWPORT_MARGIN - size.x).max(min_x);
    let min_y = viewport.top() + VIEWPORT_TOP_MARGIN;
    let max_y = (viewport.bottom() - VIEWPORT_MARGIN - size.y).max(min_y);

    pos2(candidate.x.clamp(min_x, max_x), candidate.y.clamp(min_y, max_y))
}

pub fn sanitize_velocity(velocity: Vec2) -> Vec2 {
    if velocity.x.is_finite() && velocity.y.is_finite() {
        velocity
    } else {
        Vec2::ZERO
    }
}

pub fn clamp_magnitude(v: Vec2, limit: f32) -> Vec2 {
    let length_sq = v.length_sq();
    if length_sq > limit * limit && length_sq > 0.0 {
        v * (limit / length_sq.sqrt())
    } else {
        v
    }
}

pub fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    pos2((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

pub fn lerp_pos(a: Pos2, b: Pos2, t: f32) -> Pos2 {
    a + (b - a) * t
}

// Degrees, screen-space: y grows down.
pub fn angle_dir(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    vec2(radians.cos(), radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_top_strip() {
        let viewport = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
        let clamped = clamp_into_viewport(viewport, vec2(120.0, 40.0), pos2(-50.0, 10.0));
        assert_eq!(clamped, pos2(8.0, 80.0));
    }

    #[test]
    fn clamp_magnitude_preserves_short_vectors() {
        let v = vec2(30.0, 40.0);
        assert_eq!(clamp_magnitude(v, 100.0), v);
        let clamped = clamp_magnitude(vec2(2000.0, 0.0), 1200.0);
        assert!((clamped.x - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_velocity_is_zeroed() {
        assert_eq!(sanitize_velocity(vec2(f32::NAN, 1.0)), Vec2::ZERO);
        assert_eq!(sanitize_velocity(vec2(3.0, f32::INFINITY)), Vec2::ZERO);
        assert_eq!(sanitize_velocity(vec2(3.0, 4.0)), vec2(3.0, 4.0));
    }
}
