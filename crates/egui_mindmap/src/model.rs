use std::collections::BTreeMap;

use egui::Pos2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description the default root node starts with. Markdown export treats it as empty.
pub const PLACEHOLDER_DESCRIPTION: &str = "Click to edit";

/// Id of the node every new map starts with.
pub const ROOT_ID: &str = "root";

/// Per-node properties.
///
/// The two well-known keys are typed; anything else a file carries is kept in `extra`
/// so it survives an import/export cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Data URL of the picture shown by image nodes.
    #[serde(default, rename = "imageData", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeProperties {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    /// Key into the node type registry, see [`crate::node_types`].
    #[serde(rename = "type")]
    pub node_type: String,

    pub name: String,

    #[serde(default)]
    pub properties: NodeProperties,

    /// Logical canvas coordinates of the top left corner.
    pub x: f32,
    pub y: f32,

    /// Ids of subordinate nodes. Only Markdown export walks them.
    #[serde(default)]
    pub children: Vec<String>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        name: impl Into<String>,
        x: f32,
        y: f32,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            name: name.into(),
            properties: NodeProperties::default(),
            x,
            y,
            children: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: NodeProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn location(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn is_image(&self) -> bool {
        self.node_type == crate::node_types::IMAGE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}

/// The whole document: nodes in paint order, connections and free-form map properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    #[serde(default)]
    pub properties: Map<String, Value>,

    pub nodes: Vec<Node>,

    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Default for MindMap {
    /// A map holding only the root topic.
    fn default() -> Self {
        Self {
            properties: Map::new(),
            nodes: vec![Node::new(ROOT_ID, crate::node_types::TOPIC, "Main Topic", 400., 100.)
                .with_properties(NodeProperties::with_description(
                    PLACEHOLDER_DESCRIPTION,
                ))],
            connections: Vec::new(),
        }
    }
}

impl MindMap {
    pub fn empty() -> Self {
        Self {
            properties: Map::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn has_connection(&self, from: &str, to: &str) -> bool {
        self.connections.iter().any(|c| c.from == from && c.to == to)
    }

    /// Connections leaving `node_id`, in insertion order.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.from == node_id)
    }

    /// Connections arriving at `node_id`, in insertion order.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.to == node_id)
    }

    /// First id that appears on more than one node.
    pub fn duplicate_node_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        self.nodes
            .iter()
            .find(|n| !seen.insert(n.id.as_str()))
            .map(|n| n.id.as_str())
    }
}

/// Rich-text (HTML) note per node id. Stored apart from the map.
pub type NoteData = BTreeMap<String, String>;
