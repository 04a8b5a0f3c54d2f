use std::collections::HashMap;

use eframe::egui::pos2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::registry::Side;

use super::Workspace;

// A missing field leaves the current runtime state alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub collapsed: Option<bool>,
    #[serde(default)]
    pub side: Option<Side>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub groups: HashMap<String, bool>,
    #[serde(default)]
    pub flower: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatrixMeta {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Workspace {
    pub fn collect(&self) -> LayoutSnapshot {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| NodeEntry {
                id: node.id().to_owned(),
                left: Some(node.pos.x),
                top: Some(node.pos.y),
                collapsed: Some(node.collapsed),
                side: Some(node.side),
            })
            .collect();
        let groups = self
            .groups()
            .map(|group| (group.key.clone(), group.open))
            .collect();
        LayoutSnapshot {
            nodes,
            groups,
            flower: self.flower_mode,
        }
    }

    pub fn collect_matrix(&self) -> MatrixMeta {
        MatrixMeta {
            enabled: self.background_animation,
        }
    }

    /// Groups first, then saved placements, which are authoritative
    /// over the angular auto-layout.
    pub fn apply_snapshot(&mut self, snapshot: &LayoutSnapshot) {
        self.flower_mode = snapshot.flower;

        let group_states: Vec<(String, bool)> = snapshot
            .groups
            .iter()
            .map(|(key, open)| (key.clone(), *open))
            .collect();
        for (key, open) in group_states {
            self.set_group_open(&key, open);
        }

        for entry in &snapshot.nodes {
            let Some(node) = self.node_mut(&entry.id) else {
                debug!("snapshot references unknown node {:?}, skipping", entry.id);
                continue;
            };
            if let Some(side) = entry.side {
                node.side = side;
            }
            if let Some(collapsed) = entry.collapsed {
                node.collapsed = collapsed;
            }
            let current = node.pos;
            node.pos = pos2(
                entry.left.unwrap_or(current.x),
                entry.top.unwrap_or(current.y),
            );
        }

        self.refresh_anchors();
    }

    pub fn apply_matrix(&mut self, meta: &MatrixMeta) {
        self.background_animation = meta.enabled;
    }
}
