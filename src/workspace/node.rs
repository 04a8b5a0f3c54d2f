use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::registry::{NodeKind, NodeSpec, Side};

pub const HUB_SIZE: Vec2 = vec2(72.0, 72.0);
pub const PILL_SIZE: Vec2 = vec2(128.0, 36.0);

#[derive(Clone, Debug)]
pub struct NodeState {
    pub spec: &'static NodeSpec,
    // Top-left corner in screen space.
    pub pos: Pos2,
    pub size: Vec2,
    pub side: Side,
    pub collapsed: bool,
    // Panel-edge fraction captured at init; free nodes only.
    pub panel_ratio: Option<f32>,
}

impl NodeState {
    pub fn new(spec: &'static NodeSpec) -> Self {
        let size = match spec.kind {
            NodeKind::Hub { .. } => HUB_SIZE,
            _ => PILL_SIZE,
        };
        Self {
            spec,
            pos: Pos2::ZERO,
            size,
            side: spec.side,
            collapsed: matches!(spec.kind, NodeKind::Child { .. }),
            panel_ratio: None,
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec.id
    }

    pub fn is_hub(&self) -> bool {
        matches!(self.spec.kind, NodeKind::Hub { .. })
    }

    pub fn hub_key(&self) -> Option<&'static str> {
        match self.spec.kind {
            NodeKind::Child { hub } => Some(hub),
            _ => None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    pub fn center(&self) -> Pos2 {
        self.pos + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Pos2) {
        self.pos = center - self.size * 0.5;
    }
}
