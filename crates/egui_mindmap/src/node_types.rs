use egui::Pos2;

use crate::model::{Node, NodeProperties};

pub const TOPIC: &str = "topic";
pub const SUBTOPIC: &str = "subtopic";
pub const QUESTION: &str = "question";
pub const IDEA: &str = "idea";
pub const NOTE: &str = "note";
pub const DECISION: &str = "decision";
pub const IMAGE: &str = "imageNode";

/// Icon used for type keys that are not in the registry.
pub const FALLBACK_ICON: &str = "📄";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolboxGroup {
    Topics,
    Subtopics,
    /// Created by other means (e.g. image nodes), never offered in the toolbox.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTypeInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub group: ToolboxGroup,
    /// Name given to nodes created from the toolbox.
    pub default_name: &'static str,
}

pub const REGISTRY: [NodeTypeInfo; 7] = [
    NodeTypeInfo {
        key: TOPIC,
        name: "Topic",
        icon: "📝",
        description: "A primary topic for your mind map",
        group: ToolboxGroup::Topics,
        default_name: "Main Topic",
    },
    NodeTypeInfo {
        key: SUBTOPIC,
        name: "Subtopic",
        icon: "📌",
        description: "A secondary topic connected to a main topic",
        group: ToolboxGroup::Subtopics,
        default_name: "Subtopic",
    },
    NodeTypeInfo {
        key: QUESTION,
        name: "Key Question",
        icon: "❓",
        description: "A question to explore in your mind map",
        group: ToolboxGroup::Subtopics,
        default_name: "Key Question",
    },
    NodeTypeInfo {
        key: IDEA,
        name: "Idea",
        icon: "💡",
        description: "A creative idea or concept",
        group: ToolboxGroup::Subtopics,
        default_name: "Idea",
    },
    NodeTypeInfo {
        key: NOTE,
        name: "Note",
        icon: "📄",
        description: "Additional information or context",
        group: ToolboxGroup::Subtopics,
        default_name: "Note",
    },
    NodeTypeInfo {
        key: DECISION,
        name: "Decision",
        icon: "🔄",
        description: "A decision point with multiple possible paths",
        group: ToolboxGroup::Subtopics,
        default_name: "Decision",
    },
    NodeTypeInfo {
        key: IMAGE,
        name: "Image",
        icon: "🖼",
        description: "A picture placed on the canvas",
        group: ToolboxGroup::Hidden,
        default_name: "Image",
    },
];

pub fn lookup(key: &str) -> Option<&'static NodeTypeInfo> {
    REGISTRY.iter().find(|t| t.key == key)
}

pub fn icon(key: &str) -> &'static str {
    lookup(key).map_or(FALLBACK_ICON, |t| t.icon)
}

/// Types offered in the given toolbox group, in registry order.
pub fn in_group(group: ToolboxGroup) -> impl Iterator<Item = &'static NodeTypeInfo> {
    REGISTRY.iter().filter(move |t| t.group == group)
}

/// New node of type `key` with a fresh id and the type's default name, top left at `pos`.
pub fn create_node(key: &str, pos: Pos2) -> Node {
    let name = lookup(key).map_or("New Node", |t| t.default_name);
    Node::new(crate::ids::node_id(), key, name, pos.x, pos.y)
}

/// New image node showing the picture in `data_url`, top left at `pos`.
pub fn create_image_node(data_url: impl Into<String>, pos: Pos2) -> Node {
    create_node(IMAGE, pos).with_properties(NodeProperties {
        image_data: Some(data_url.into()),
        ..Default::default()
    })
}
