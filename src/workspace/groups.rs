use eframe::egui::Pos2;

use crate::registry::Side;
use crate::util::{angle_dir, clamp_into_viewport};

use super::Workspace;

const FAN_ARC_DEGREES: f32 = 120.0;
const FAN_RADIUS_EVEN: f32 = 160.0;
const FAN_RADIUS_ODD: f32 = 176.0;
const RADIAL_RADIUS: f32 = 130.0;

#[derive(Clone, Debug)]
pub struct Group {
    pub key: String,
    pub open: bool,
    pub children: Vec<&'static str>,
}

impl Group {
    pub fn new(key: String, children: Vec<&'static str>) -> Self {
        Self {
            key,
            open: false,
            children,
        }
    }
}

impl Workspace {
    pub fn toggle_group(&mut self, key: &str) {
        let group = self.group_mut(key);
        if group.children.is_empty() {
            return;
        }
        group.open = !group.open;
        let opening = group.open;
        let children = group.children.clone();

        let hub_center = self.node(key).map(|hub| hub.center());

        if opening {
            let targets = hub_center.map(|center| {
                self.open_layout_targets(key, center, children.len())
            });
            for (index, child) in children.iter().enumerate() {
                let viewport = self.viewport;
                let Some(node) = self.node_mut(child) else {
                    continue;
                };
                node.collapsed = false;
                // No hub position yet: leave the child where it is.
                if let Some(targets) = &targets
                    && let Some(&target) = targets.get(index)
                {
                    let size = node.size;
                    let top_left = target - size * 0.5;
                    node.pos = clamp_into_viewport(viewport, size, top_left);
                }
            }
        } else {
            for child in &children {
                let Some(node) = self.node_mut(child) else {
                    continue;
                };
                node.collapsed = true;
                if let Some(center) = hub_center {
                    node.set_center(center);
                }
            }
        }

        self.refresh_anchors();
    }

    pub fn set_group_open(&mut self, key: &str, open: bool) {
        if self.group(key).is_some_and(|group| group.open != open) {
            self.toggle_group(key);
        }
    }

    fn open_layout_targets(&self, hub: &str, center: Pos2, count: usize) -> Vec<Pos2> {
        if self.flower_mode {
            radial_targets(center, count)
        } else {
            let side = self
                .node(hub)
                .map(|node| node.side)
                .unwrap_or(Side::Right);
            fan_targets(center, side, count)
        }
    }
}

/// Half-arc fan facing away from the panel.
pub fn fan_targets(center: Pos2, side: Side, count: usize) -> Vec<Pos2> {
    let base = match side {
        Side::Right => -FAN_ARC_DEGREES * 0.5,
        Side::Left => 180.0 - FAN_ARC_DEGREES * 0.5,
    };
    let step = if count > 1 {
        FAN_ARC_DEGREES / (count - 1) as f32
    } else {
        0.0
    };

    (0..count)
        .map(|index| {
            let radius = if index % 2 == 0 {
                FAN_RADIUS_EVEN
            } else {
                FAN_RADIUS_ODD
            };
            center + angle_dir(base + step * index as f32) * radius
        })
        .collect()
}

/// Full-circle "flower" layout from the top.
pub fn radial_targets(center: Pos2, count: usize) -> Vec<Pos2> {
    let step = 360.0 / count.max(1) as f32;
    (0..count)
        .map(|index| center + angle_dir(-90.0 + step * index as f32) * RADIAL_RADIUS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn fan_of_one_sits_on_the_base_angle() {
        let targets = fan_targets(pos2(400.0, 300.0), Side::Right, 1);
        assert_eq!(targets.len(), 1);
        let delta = targets[0] - pos2(400.0, 300.0);
        assert!((delta.length() - FAN_RADIUS_EVEN).abs() < 1e-3);
        assert!(delta.x > 0.0, "right-side fan must open rightward");
    }

    #[test]
    fn radial_spacing_is_uniform() {
        let center = pos2(500.0, 400.0);
        let targets = radial_targets(center, 6);
        for window in targets.windows(2) {
            let a = (window[0] - center).angle();
            let b = (window[1] - center).angle();
            let mut diff = (b - a).to_degrees();
            if diff < 0.0 {
                diff += 360.0;
            }
            assert!((diff - 60.0).abs() < 1e-3);
        }
    }
}
