use eframe::egui::{Pos2, Vec2};

use crate::registry::Side;
use crate::util::{clamp_into_viewport, clamp_magnitude, sanitize_velocity};
use crate::workspace::{RELEASE_VELOCITY_CEILING, Workspace};

const DRAG_THRESHOLD: f32 = 4.0;
const PANEL_GAP: f32 = 12.0;

#[derive(Clone, Debug)]
struct ActiveDrag {
    key: String,
    group_drag: bool,
    origin_pointer: Pos2,
    origin_pos: Pos2,
    moved: bool,
    velocity: Vec2,
    last_pointer: Pos2,
    last_time: f64,
}

#[derive(Default)]
pub struct InteractionState {
    drag: Option<ActiveDrag>,
    suppress_click: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickAction {
    ToggleGroup(String),
    Prompt(&'static str),
    Ignored,
}

impl InteractionState {
    pub fn begin_drag(
        &mut self,
        workspace: &Workspace,
        key: &str,
        pointer: Pos2,
        now: f64,
        secondary: bool,
    ) {
        let Some(node) = workspace.node(key) else {
            return;
        };
        let group_drag = secondary && node.is_hub();
        self.drag = Some(ActiveDrag {
            key: key.to_owned(),
            group_drag,
            origin_pointer: pointer,
            origin_pos: node.pos,
            moved: false,
            velocity: Vec2::ZERO,
            last_pointer: pointer,
            last_time: now,
        });
    }

    pub fn drag_to(&mut self, workspace: &mut Workspace, pointer: Pos2, now: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let delta = pointer - drag.origin_pointer;
        if delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD {
            drag.moved = true;
        }

        let elapsed = (now - drag.last_time) as f32;
        if elapsed > 0.0 {
            drag.velocity = sanitize_velocity((pointer - drag.last_pointer) / elapsed);
        }
        drag.last_pointer = pointer;
        drag.last_time = now;

        let key = drag.key.clone();
        let group_drag = drag.group_drag;
        let candidate = drag.origin_pos + delta;

        let Some(previous) = workspace.node(&key).map(|node| node.pos) else {
            return;
        };
        let applied = constrain_node(workspace, &key, candidate);
        if let Some(node) = workspace.node_mut(&key) {
            node.pos = applied;
        }

        if group_drag
            && let Some(group) = workspace.group(&key).filter(|group| group.open)
        {
            let hub_delta = applied - previous;
            let children = group.children.clone();
            for child in children {
                let Some(current) = workspace.node(child).map(|node| node.pos) else {
                    continue;
                };
                let is_collapsed = workspace.node(child).is_some_and(|node| node.collapsed);
                if is_collapsed {
                    continue;
                }
                let target = constrain_node(workspace, child, current + hub_delta);
                if let Some(node) = workspace.node_mut(child) {
                    node.pos = target;
                }
            }
        }

        workspace.refresh_anchors();
    }

    /// Returns whether the gesture was a genuine drag, in which case the
    /// trailing click is suppressed.
    pub fn end_drag(&mut self, workspace: &mut Workspace) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };

        let velocity = clamp_magnitude(drag.velocity, RELEASE_VELOCITY_CEILING);
        workspace.flick_rope(&drag.key, velocity);

        if drag.moved {
            self.suppress_click = Some(drag.key);
            true
        } else {
            false
        }
    }

    pub fn click(&mut self, workspace: &Workspace, key: &str) -> ClickAction {
        if self.suppress_click.as_deref() == Some(key) {
            return ClickAction::Ignored;
        }
        let Some(node) = workspace.node(key) else {
            return ClickAction::Ignored;
        };
        if node.is_hub() {
            ClickAction::ToggleGroup(key.to_owned())
        } else if let Some(prompt) = node.spec.quick_prompt {
            ClickAction::Prompt(prompt)
        } else {
            ClickAction::Ignored
        }
    }

    pub fn tick(&mut self) {
        // Suppression lives exactly until the tick after release so the
        // trailing click still sees it.
        if self.drag.is_none() {
            self.suppress_click = None;
        }
    }
}

fn constrain_node(workspace: &Workspace, key: &str, candidate: Pos2) -> Pos2 {
    let Some(node) = workspace.node(key) else {
        return candidate;
    };
    let mut position = clamp_into_viewport(workspace.viewport, node.size, candidate);
    if let Some(panel) = workspace.panel {
        match node.side {
            Side::Left => {
                let limit = panel.left() - PANEL_GAP - node.size.x;
                position.x = position.x.min(limit);
            }
            Side::Right => {
                let limit = panel.right() + PANEL_GAP;
                position.x = position.x.max(limit);
            }
        }
    }
    position
}
