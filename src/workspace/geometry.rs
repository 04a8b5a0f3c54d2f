use eframe::egui::{Pos2, pos2};

use crate::registry::{NodeKind, Side};

use super::Workspace;

const PANEL_EDGE_INSET: f32 = 24.0;

/// Connector endpoints: `start` at the panel or hub, `end` at the node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopeAnchors {
    pub start: Pos2,
    pub end: Pos2,
}

impl RopeAnchors {
    pub fn span(&self) -> f32 {
        self.start.distance(self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorError {
    NotLaidOut,
    UnknownKey,
}

impl Workspace {
    /// Pure over the live node/panel geometry; safe to call every frame.
    pub fn resolve_anchors(&self, key: &str) -> Result<RopeAnchors, AnchorError> {
        let node = self.node(key).ok_or(AnchorError::UnknownKey)?;

        match node.spec.kind {
            NodeKind::Hub { fraction } => {
                let panel = self.panel.ok_or(AnchorError::NotLaidOut)?;
                let x = match node.side {
                    Side::Left => panel.left(),
                    Side::Right => panel.right(),
                };
                let y = (panel.top() + panel.height() * fraction).clamp(
                    panel.top() + PANEL_EDGE_INSET,
                    (panel.bottom() - PANEL_EDGE_INSET).max(panel.top() + PANEL_EDGE_INSET),
                );
                Ok(RopeAnchors {
                    start: pos2(x, y),
                    end: node.center(),
                })
            }
            NodeKind::Child { hub } => {
                let hub_center = self
                    .node(hub)
                    .map(|hub_node| hub_node.center())
                    .ok_or(AnchorError::NotLaidOut)?;
                let end = if node.collapsed {
                    // Zero-length while collapsed.
                    hub_center
                } else {
                    node.center()
                };
                Ok(RopeAnchors {
                    start: hub_center,
                    end,
                })
            }
            NodeKind::Free => {
                let panel = self.panel.ok_or(AnchorError::NotLaidOut)?;
                let ratio = node.panel_ratio.ok_or(AnchorError::NotLaidOut)?;
                let x = match node.side {
                    Side::Left => panel.left(),
                    Side::Right => panel.right(),
                };
                Ok(RopeAnchors {
                    start: pos2(x, panel.top() + panel.height() * ratio),
                    end: node.center(),
                })
            }
        }
    }
}
