use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Hub { fraction: f32 },
    Child { hub: &'static str },
    Free,
}

#[derive(Clone, Copy, Debug)]
pub struct NodeSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub side: Side,
    pub default_top: f32,
    pub edge_offset: f32,
    pub quick_prompt: Option<&'static str>,
    pub kind: NodeKind,
}

// Hubs come first; panel fractions read in registry order.
pub const NODE_SPECS: &[NodeSpec] = &[
    NodeSpec {
        id: "hub-emotions",
        label: "Emotions",
        side: Side::Left,
        default_top: 180.0,
        edge_offset: 120.0,
        quick_prompt: None,
        kind: NodeKind::Hub { fraction: 0.40 },
    },
    NodeSpec {
        id: "hub-animals",
        label: "Animals",
        side: Side::Right,
        default_top: 180.0,
        edge_offset: 120.0,
        quick_prompt: None,
        kind: NodeKind::Hub { fraction: 0.40 },
    },
    NodeSpec {
        id: "hub-stats",
        label: "Stats",
        side: Side::Left,
        default_top: 460.0,
        edge_offset: 120.0,
        quick_prompt: None,
        kind: NodeKind::Hub { fraction: 0.60 },
    },
    NodeSpec {
        id: "hub-knowledge",
        label: "Knowledge",
        side: Side::Right,
        default_top: 460.0,
        edge_offset: 120.0,
        quick_prompt: None,
        kind: NodeKind::Hub { fraction: 0.60 },
    },
    NodeSpec {
        id: "mood-today",
        label: "Today's mood",
        side: Side::Left,
        default_top: 150.0,
        edge_offset: 220.0,
        quick_prompt: Some("How am I feeling today?"),
        kind: NodeKind::Child { hub: "hub-emotions" },
    },
    NodeSpec {
        id: "mood-vent",
        label: "Vent",
        side: Side::Left,
        default_top: 210.0,
        edge_offset: 240.0,
        quick_prompt: Some("I need to talk about something that upset me."),
        kind: NodeKind::Child { hub: "hub-emotions" },
    },
    NodeSpec {
        id: "mood-lift",
        label: "Cheer me up",
        side: Side::Left,
        default_top: 270.0,
        edge_offset: 220.0,
        quick_prompt: Some("Cheer me up, please."),
        kind: NodeKind::Child { hub: "hub-emotions" },
    },
    NodeSpec {
        id: "animal-fact",
        label: "Animal fact",
        side: Side::Right,
        default_top: 150.0,
        edge_offset: 220.0,
        quick_prompt: Some("Tell me a surprising animal fact."),
        kind: NodeKind::Child { hub: "hub-animals" },
    },
    NodeSpec {
        id: "animal-quiz",
        label: "Quiz",
        side: Side::Right,
        default_top: 210.0,
        edge_offset: 240.0,
        quick_prompt: Some("Quiz me about animals."),
        kind: NodeKind::Child { hub: "hub-animals" },
    },
    NodeSpec {
        id: "animal-pick",
        label: "Which animal?",
        side: Side::Right,
        default_top: 270.0,
        edge_offset: 220.0,
        quick_prompt: Some("Which animal fits my personality?"),
        kind: NodeKind::Child { hub: "hub-animals" },
    },
    NodeSpec {
        id: "stats-week",
        label: "This week",
        side: Side::Left,
        default_top: 430.0,
        edge_offset: 220.0,
        quick_prompt: Some("Show my mood statistics for this week."),
        kind: NodeKind::Child { hub: "hub-stats" },
    },
    NodeSpec {
        id: "stats-month",
        label: "This month",
        side: Side::Left,
        default_top: 490.0,
        edge_offset: 240.0,
        quick_prompt: Some("Show my mood statistics for this month."),
        kind: NodeKind::Child { hub: "hub-stats" },
    },
    NodeSpec {
        id: "stats-top",
        label: "Top moods",
        side: Side::Left,
        default_top: 550.0,
        edge_offset: 220.0,
        quick_prompt: Some("What are my most frequent moods?"),
        kind: NodeKind::Child { hub: "hub-stats" },
    },
    NodeSpec {
        id: "know-ask",
        label: "Ask anything",
        side: Side::Right,
        default_top: 430.0,
        edge_offset: 220.0,
        quick_prompt: Some("I have a question."),
        kind: NodeKind::Child { hub: "hub-knowledge" },
    },
    NodeSpec {
        id: "know-explain",
        label: "Explain",
        side: Side::Right,
        default_top: 490.0,
        edge_offset: 240.0,
        quick_prompt: Some("Explain a topic to me in simple terms."),
        kind: NodeKind::Child { hub: "hub-knowledge" },
    },
    NodeSpec {
        id: "know-recap",
        label: "Recap",
        side: Side::Right,
        default_top: 550.0,
        edge_offset: 220.0,
        quick_prompt: Some("Summarize our conversation so far."),
        kind: NodeKind::Child { hub: "hub-knowledge" },
    },
    NodeSpec {
        id: "help",
        label: "Help",
        side: Side::Left,
        default_top: 640.0,
        edge_offset: 120.0,
        quick_prompt: Some("What can you do?"),
        kind: NodeKind::Free,
    },
    NodeSpec {
        id: "greet",
        label: "Say hi",
        side: Side::Right,
        default_top: 640.0,
        edge_offset: 120.0,
        quick_prompt: Some("Hello!"),
        kind: NodeKind::Free,
    },
];

pub fn find_spec(id: &str) -> Option<&'static NodeSpec> {
    NODE_SPECS.iter().find(|spec| spec.id == id)
}

pub fn hub_ids() -> impl Iterator<Item = &'static str> {
    NODE_SPECS.iter().filter_map(|spec| match spec.kind {
        NodeKind::Hub { .. } => Some(spec.id),
        _ => None,
    })
}

pub fn children_of(hub: &str) -> Vec<&'static str> {
    NODE_SPECS
        .iter()
        .filter_map(|spec| match spec.kind {
            NodeKind::Child { hub: parent } if parent == hub => Some(spec.id),
            _ => None,
        })
        .collect()
}
