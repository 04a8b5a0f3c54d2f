use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, pos2};

use crate::registry::{self, NodeKind, Side};
use crate::util::clamp_into_viewport;

mod geometry;
mod groups;
mod node;
mod rope;
mod snapshot;

pub use geometry::{AnchorError, RopeAnchors};
pub use groups::{Group, fan_targets, radial_targets};
pub use node::{HUB_SIZE, NodeState, PILL_SIZE};
pub use rope::{Particle, RELEASE_VELOCITY_CEILING, RopeChain, SEGMENTS};
pub use snapshot::{LayoutSnapshot, MatrixMeta, NodeEntry};

/// Context object owning every keyed collection of the workspace.
pub struct Workspace {
    nodes: Vec<NodeState>,
    index_by_id: HashMap<&'static str, usize>,
    groups: HashMap<String, Group>,
    ropes: HashMap<String, RopeChain>,
    pub viewport: Rect,
    // None until the first layout pass.
    pub panel: Option<Rect>,
    pub flower_mode: bool,
    pub background_animation: bool,
    pub theme: String,
    initialized: bool,
}

impl Workspace {
    pub fn new(viewport: Rect) -> Self {
        let mut nodes = Vec::with_capacity(registry::NODE_SPECS.len());
        let mut index_by_id = HashMap::new();
        for spec in registry::NODE_SPECS {
            index_by_id.insert(spec.id, nodes.len());
            nodes.push(NodeState::new(spec));
        }

        let mut groups = HashMap::new();
        for hub in registry::hub_ids() {
            groups.insert(
                hub.to_owned(),
                Group::new(hub.to_owned(), registry::children_of(hub)),
            );
        }

        Self {
            nodes,
            index_by_id,
            groups,
            ropes: HashMap::new(),
            viewport,
            panel: None,
            flower_mode: false,
            background_animation: true,
            theme: "midnight".to_owned(),
            initialized: false,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeState> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeState> {
        self.index_by_id
            .get(id)
            .map(|&index| &mut self.nodes[index])
    }

    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [NodeState] {
        &mut self.nodes
    }

    pub fn group(&self, key: &str) -> Option<&Group> {
        self.groups.get(key)
    }

    /// A group referenced before registration is created empty.
    pub fn group_mut(&mut self, key: &str) -> &mut Group {
        self.groups
            .entry(key.to_owned())
            .or_insert_with(|| Group::new(key.to_owned(), Vec::new()))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn rope(&self, key: &str) -> Option<&RopeChain> {
        self.ropes.get(key)
    }

    pub fn ropes(&self) -> impl Iterator<Item = &RopeChain> {
        self.ropes.values()
    }

    pub(crate) fn ropes_map_mut(&mut self) -> &mut HashMap<String, RopeChain> {
        &mut self.ropes
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seeds runtime positions from the registry defaults; idempotent
    /// after the first call.
    pub fn init_defaults(&mut self, viewport: Rect, panel: Rect) {
        self.viewport = viewport;
        self.panel = Some(panel);
        if self.initialized {
            return;
        }

        for node in &mut self.nodes {
            let spec = node.spec;
            let x = match spec.side {
                Side::Left => viewport.left() + spec.edge_offset,
                Side::Right => viewport.right() - spec.edge_offset - node.size.x,
            };
            node.pos = clamp_into_viewport(viewport, node.size, pos2(x, spec.default_top));

            if matches!(spec.kind, NodeKind::Free) {
                let ratio = ((node.center().y - panel.top()) / panel.height().max(1.0))
                    .clamp(0.0, 1.0);
                node.panel_ratio = Some(ratio);
            }
        }

        // Children start collapsed onto their hub.
        let moves: Vec<(&'static str, Pos2)> = self
            .nodes
            .iter()
            .filter_map(|node| {
                node.hub_key()
                    .and_then(|hub| self.node(hub).map(|h| (node.id(), h.center())))
            })
            .collect();
        for (id, hub_center) in moves {
            if let Some(node) = self.node_mut(id) {
                node.set_center(hub_center);
            }
        }

        self.initialized = true;
    }

    pub fn constrain_all_nodes(&mut self) {
        let viewport = self.viewport;
        for node in &mut self.nodes {
            node.pos = clamp_into_viewport(viewport, node.size, node.pos);
        }
    }
}
