use eframe::egui::{Pos2, Vec2};

use crate::util::{clamp_magnitude, lerp_pos, sanitize_velocity};

use super::{RopeAnchors, Workspace};

pub const SEGMENTS: usize = 12;
pub const RELEASE_VELOCITY_CEILING: f32 = 1200.0;

const DAMPING: f32 = 0.988;
const RELAX_ITERATIONS: usize = 3;
const SLACK: f32 = 1.02;
const IMPULSE_SCALE: f32 = 0.01;
const IMPULSE_REST_DECAY: f32 = 0.995;
const IMPULSE_REST_FLOOR: f32 = 0.9;
const SESSION_DECAY_FLOOR: f32 = 0.75;
const MIN_DISTANCE: f32 = 1e-4;
// Spans below this (collapsed children) put the chain to sleep.
const DORMANT_SPAN: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub pos: Pos2,
    pub vel: Vec2,
}

#[derive(Clone, Debug)]
pub struct RopeChain {
    pub key: String,
    pub particles: Vec<Particle>,
    pub rest_length: f32,
    decay_floor: f32,
    dormant: bool,
}

impl RopeChain {
    pub fn new(key: String, anchors: RopeAnchors) -> Self {
        let particles = (0..=SEGMENTS)
            .map(|index| Particle {
                pos: lerp_pos(anchors.start, anchors.end, index as f32 / SEGMENTS as f32),
                vel: Vec2::ZERO,
            })
            .collect();
        let rest_length = anchors.span() / SEGMENTS as f32 * SLACK;
        Self {
            key,
            particles,
            rest_length,
            decay_floor: rest_length * SESSION_DECAY_FLOOR,
            dormant: anchors.span() < DORMANT_SPAN,
        }
    }

    fn reseed(&mut self, anchors: RopeAnchors) {
        for (index, particle) in self.particles.iter_mut().enumerate() {
            particle.pos = lerp_pos(anchors.start, anchors.end, index as f32 / SEGMENTS as f32);
            particle.vel = Vec2::ZERO;
        }
        self.rest_length = anchors.span() / SEGMENTS as f32 * SLACK;
        self.decay_floor = self.rest_length * SESSION_DECAY_FLOOR;
        self.dormant = false;
    }

    pub fn pin(&mut self, anchors: RopeAnchors) {
        if let Some(first) = self.particles.first_mut() {
            first.pos = anchors.start;
            first.vel = Vec2::ZERO;
        }
        if let Some(last) = self.particles.last_mut() {
            last.pos = anchors.end;
            last.vel = Vec2::ZERO;
        }
    }

    pub fn step(&mut self, anchors: RopeAnchors) {
        if anchors.span() < DORMANT_SPAN {
            self.pin(anchors);
            self.dormant = true;
            return;
        }
        if self.dormant {
            self.reseed(anchors);
        }

        self.pin(anchors);

        let last = self.particles.len() - 1;
        for particle in &mut self.particles[1..last] {
            particle.vel *= DAMPING;
            particle.pos += particle.vel;
        }

        for _ in 0..RELAX_ITERATIONS {
            for index in 0..last {
                let delta = self.particles[index + 1].pos - self.particles[index].pos;
                let distance = delta.length().max(MIN_DISTANCE);
                let correction = delta * ((distance - self.rest_length) / distance);

                let left_pinned = index == 0;
                let right_pinned = index + 1 == last;
                if left_pinned && right_pinned {
                    continue;
                } else if left_pinned {
                    self.particles[index + 1].pos -= correction;
                } else if right_pinned {
                    self.particles[index].pos += correction;
                } else {
                    self.particles[index].pos += correction * 0.5;
                    self.particles[index + 1].pos -= correction * 0.5;
                }
            }
        }

        // min(previous, live target): slack survives, stretch does not.
        let target = anchors.span() / SEGMENTS as f32 * SLACK;
        self.rest_length = self.rest_length.min(target).max(MIN_DISTANCE);
    }

    pub fn inject_release_velocity(&mut self, velocity: Vec2, anchors: RopeAnchors) {
        if self.dormant {
            return;
        }
        let velocity = clamp_magnitude(sanitize_velocity(velocity), RELEASE_VELOCITY_CEILING);
        let impulse = velocity * IMPULSE_SCALE;

        let last = self.particles.len() - 1;
        for (index, particle) in self.particles[1..last].iter_mut().enumerate() {
            let strength = (index + 1) as f32 / SEGMENTS as f32;
            particle.vel += impulse * strength;
        }

        let geometric_min = anchors.span() / SEGMENTS as f32;
        let floor = (geometric_min * IMPULSE_REST_FLOOR).max(self.decay_floor);
        let decayed = self.rest_length * IMPULSE_REST_DECAY;
        self.rest_length = decayed.max(floor.min(self.rest_length));
    }
}

impl Workspace {
    pub fn ensure_rope(&mut self, key: &str) {
        if self.rope(key).is_some() {
            return;
        }
        let Ok(anchors) = self.resolve_anchors(key) else {
            return;
        };
        self.ropes_map_mut()
            .insert(key.to_owned(), RopeChain::new(key.to_owned(), anchors));
    }

    pub fn step_ropes(&mut self) {
        let ids: Vec<&'static str> = self.nodes().iter().map(|node| node.id()).collect();
        for id in ids {
            self.ensure_rope(id);
            let Ok(anchors) = self.resolve_anchors(id) else {
                continue;
            };
            if let Some(rope) = self.ropes_map_mut().get_mut(id) {
                rope.step(anchors);
            }
        }
    }

    pub fn refresh_anchors(&mut self) {
        let keys: Vec<String> = self.ropes().map(|rope| rope.key.clone()).collect();
        for key in keys {
            let Ok(anchors) = self.resolve_anchors(&key) else {
                continue;
            };
            if let Some(rope) = self.ropes_map_mut().get_mut(&key) {
                rope.pin(anchors);
            }
        }
    }

    pub fn flick_rope(&mut self, key: &str, velocity: Vec2) {
        self.ensure_rope(key);
        let Ok(anchors) = self.resolve_anchors(key) else {
            return;
        };
        if let Some(rope) = self.ropes_map_mut().get_mut(key) {
            rope.inject_release_velocity(velocity, anchors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn anchors(span: f32) -> RopeAnchors {
        RopeAnchors {
            start: pos2(100.0, 100.0),
            end: pos2(100.0 + span, 100.0),
        }
    }

    #[test]
    fn chain_has_constant_particle_count() {
        let mut rope = RopeChain::new("k".to_owned(), anchors(240.0));
        assert_eq!(rope.particles.len(), SEGMENTS + 1);
        for _ in 0..50 {
            rope.step(anchors(240.0));
        }
        assert_eq!(rope.particles.len(), SEGMENTS + 1);
    }

    #[test]
    fn ends_are_pinned_after_every_step() {
        let mut rope = RopeChain::new("k".to_owned(), anchors(240.0));
        let moved = anchors(400.0);
        rope.step(moved);
        assert_eq!(rope.particles[0].pos, moved.start);
        assert_eq!(rope.particles[SEGMENTS].pos, moved.end);
    }

    #[test]
    fn rest_length_tracks_min_of_previous_and_target() {
        let mut rope = RopeChain::new("k".to_owned(), anchors(240.0));
        let initial = rope.rest_length;

        // Longer span: rest length must not grow.
        rope.step(anchors(600.0));
        assert!(rope.rest_length <= initial);

        // Shorter span: rest length shrinks to the new target.
        rope.step(anchors(120.0));
        let expected = 120.0 / SEGMENTS as f32 * SLACK;
        assert!((rope.rest_length - expected).abs() < 1e-3);
    }

    #[test]
    fn chain_reseeds_slack_when_a_collapsed_span_opens() {
        let mut rope = RopeChain::new("k".to_owned(), anchors(0.0));
        for _ in 0..5 {
            rope.step(anchors(0.0));
        }

        let opened = anchors(160.0);
        for _ in 0..120 {
            rope.step(opened);
        }

        let expected = 160.0 / SEGMENTS as f32 * SLACK;
        assert!(
            (rope.rest_length - expected).abs() < 1e-3,
            "rest length {} after opening a 160px span",
            rope.rest_length
        );
        assert_eq!(rope.particles[0].pos, opened.start);
        assert_eq!(rope.particles[SEGMENTS].pos, opened.end);
    }

    #[test]
    fn collapsing_and_reopening_restores_slack() {
        let mut rope = RopeChain::new("k".to_owned(), anchors(240.0));
        for _ in 0..10 {
            rope.step(anchors(0.0));
        }
        for _ in 0..10 {
            rope.step(anchors(240.0));
        }
        let expected = 240.0 / SEGMENTS as f32 * SLACK;
        assert!((rope.rest_length - expected).abs() < 1e-3);
    }

    #[test]
    fn release_impulse_is_clamped_before_distribution() {
        let a = anchors(240.0);
        let mut rope = RopeChain::new("k".to_owned(), a);
        rope.inject_release_velocity(Vec2::new(2000.0, 0.0), a);

        // Strongest interior particle carries 0.01 * 1200 * (11/12).
        let expected =
            RELEASE_VELOCITY_CEILING * IMPULSE_SCALE * (SEGMENTS - 1) as f32 / SEGMENTS as f32;
        let max_speed = rope.particles[1..SEGMENTS]
            .iter()
            .map(|p| p.vel.length())
            .fold(0.0_f32, f32::max);
        assert!((max_speed - expected).abs() < 1e-3);
    }

    #[test]
    fn repeated_flicks_bottom_out_at_the_session_floor() {
        let a = anchors(240.0);
        let mut rope = RopeChain::new("k".to_owned(), a);
        let initial = rope.rest_length;
        for _ in 0..10_000 {
            rope.inject_release_velocity(Vec2::new(800.0, 0.0), a);
        }
        assert!(rope.rest_length >= initial * SESSION_DECAY_FLOOR - 1e-3);
    }

    #[test]
    fn non_finite_release_velocity_is_ignored() {
        let a = anchors(240.0);
        let mut rope = RopeChain::new("k".to_owned(), a);
        rope.inject_release_velocity(Vec2::new(f32::NAN, f32::NAN), a);
        for particle in &rope.particles {
            assert!(particle.vel.x.is_finite() && particle.vel.y.is_finite());
            assert_eq!(particle.vel, Vec2::ZERO);
        }
    }
}
