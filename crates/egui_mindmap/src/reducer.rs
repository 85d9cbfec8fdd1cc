use crate::model::{Connection, MindMap, Node, NodeProperties};

/// Partial node used by [`Action::UpdateNode`]. Every `Some` field replaces the node's field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub node_type: Option<String>,
    pub name: Option<String>,
    pub properties: Option<NodeProperties>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub children: Option<Vec<String>>,
}

impl NodeUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn node_type(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            ..Default::default()
        }
    }

    pub fn children(children: Vec<String>) -> Self {
        Self {
            children: Some(children),
            ..Default::default()
        }
    }

    fn apply(self, node: &mut Node) {
        if let Some(v) = self.node_type {
            node.node_type = v;
        }
        if let Some(v) = self.name {
            node.name = v;
        }
        if let Some(v) = self.properties {
            node.properties = v;
        }
        if let Some(v) = self.x {
            node.x = v;
        }
        if let Some(v) = self.y {
            node.y = v;
        }
        if let Some(v) = self.children {
            node.children = v;
        }
    }
}

/// State transitions of a [`MindMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replaces the whole map.
    SetMindMap(MindMap),
    AddNode(Node),
    UpdateNode { node_id: String, updates: NodeUpdate },
    /// Removes the node, its connections and any `children` reference to it.
    DeleteNode { node_id: String },
    /// Ignored for self loops and for pairs that are already connected.
    AddConnection { from: String, to: String },
    RemoveConnection { connection_id: String },
    MoveNode { node_id: String, x: f32, y: f32 },
}

impl Action {
    pub fn move_node(node_id: impl Into<String>, x: f32, y: f32) -> Self {
        Self::MoveNode {
            node_id: node_id.into(),
            x,
            y,
        }
    }

    pub fn add_connection(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::AddConnection {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn delete_node(node_id: impl Into<String>) -> Self {
        Self::DeleteNode {
            node_id: node_id.into(),
        }
    }

    pub fn update_node(node_id: impl Into<String>, updates: NodeUpdate) -> Self {
        Self::UpdateNode {
            node_id: node_id.into(),
            updates,
        }
    }

    pub fn remove_connection(connection_id: impl Into<String>) -> Self {
        Self::RemoveConnection {
            connection_id: connection_id.into(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetMindMap(_) => "SET_MIND_MAP",
            Self::AddNode(_) => "ADD_NODE",
            Self::UpdateNode { .. } => "UPDATE_NODE",
            Self::DeleteNode { .. } => "DELETE_NODE",
            Self::AddConnection { .. } => "ADD_CONNECTION",
            Self::RemoveConnection { .. } => "REMOVE_CONNECTION",
            Self::MoveNode { .. } => "MOVE_NODE",
        }
    }
}

/// Applies `action` to `state` and returns the next state.
///
/// Actions that reference missing nodes or connections leave the state as it was.
pub fn reduce(mut state: MindMap, action: Action) -> MindMap {
    match action {
        Action::SetMindMap(map) => map,
        Action::AddNode(node) => {
            state.nodes.push(node);
            state
        }
        Action::UpdateNode { node_id, updates } => {
            if let Some(node) = state.nodes.iter_mut().find(|n| n.id == node_id) {
                updates.apply(node);
            }
            state
        }
        Action::DeleteNode { node_id } => {
            state.nodes.retain(|n| n.id != node_id);
            state.connections.retain(|c| !c.touches(&node_id));
            for n in &mut state.nodes {
                n.children.retain(|child| *child != node_id);
            }
            state
        }
        Action::AddConnection { from, to } => {
            if from == to || state.has_connection(&from, &to) {
                return state;
            }
            state.connections.push(Connection {
                id: crate::ids::connection_id(),
                from,
                to,
            });
            state
        }
        Action::RemoveConnection { connection_id } => {
            state.connections.retain(|c| c.id != connection_id);
            state
        }
        Action::MoveNode { node_id, x, y } => {
            if let Some(node) = state.nodes.iter_mut().find(|n| n.id == node_id) {
                node.x = x;
                node.y = y;
            }
            state
        }
    }
}

/// Applies a batch of actions in order.
pub fn reduce_all(state: MindMap, actions: impl IntoIterator<Item = Action>) -> MindMap {
    actions.into_iter().fold(state, reduce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ROOT_ID;

    fn map_with(ids: &[&str]) -> MindMap {
        let mut map = MindMap::empty();
        for (i, id) in ids.iter().enumerate() {
            map.nodes.push(Node::new(*id, "idea", *id, i as f32 * 10., 0.));
        }
        map
    }

    #[test]
    fn add_node_appends() {
        let map = reduce(
            MindMap::default(),
            Action::AddNode(Node::new("n1", "idea", "Idea", 5., 6.)),
        );
        assert_eq!(map.nodes.len(), 2);
        assert_eq!(map.nodes[1].id, "n1");
    }

    #[test]
    fn delete_node_removes_incident_connections() {
        let mut map = map_with(&["a", "b", "c"]);
        map = reduce_all(
            map,
            [
                Action::add_connection("a", "b"),
                Action::add_connection("b", "c"),
                Action::add_connection("c", "a"),
                Action::add_connection("a", "c"),
            ],
        );
        assert_eq!(map.connections.len(), 4);

        let map = reduce(map, Action::delete_node("a"));
        assert!(!map.contains_node("a"));
        assert_eq!(map.connections.len(), 1);
        assert!(map.connections.iter().all(|c| !c.touches("a")));
        assert_eq!(
            (map.connections[0].from.as_str(), map.connections[0].to.as_str()),
            ("b", "c")
        );
    }

    #[test]
    fn delete_node_drops_child_references() {
        let mut map = map_with(&["a", "b"]);
        map.nodes[0].children = vec!["b".into()];
        let map = reduce(map, Action::delete_node("b"));
        assert!(map.nodes[0].children.is_empty());
    }

    #[test]
    fn add_connection_rejects_self_loops() {
        let map = reduce(map_with(&["a"]), Action::add_connection("a", "a"));
        assert!(map.connections.is_empty());
    }

    #[test]
    fn add_connection_is_idempotent() {
        let map = reduce_all(
            map_with(&["a", "b"]),
            [
                Action::add_connection("a", "b"),
                Action::add_connection("a", "b"),
            ],
        );
        assert_eq!(map.connections.len(), 1);
        assert!(map.connections[0].id.starts_with("conn-"));

        // the reverse direction is a different edge
        let map = reduce(map, Action::add_connection("b", "a"));
        assert_eq!(map.connections.len(), 2);
    }

    #[test]
    fn remove_connection_by_id() {
        let map = reduce(map_with(&["a", "b"]), Action::add_connection("a", "b"));
        let id = map.connections[0].id.clone();
        let map = reduce(map, Action::remove_connection("missing"));
        assert_eq!(map.connections.len(), 1);
        let map = reduce(map, Action::remove_connection(id));
        assert!(map.connections.is_empty());
    }

    #[test]
    fn update_node_merges_only_given_fields() {
        let map = reduce(
            MindMap::default(),
            Action::update_node(ROOT_ID, NodeUpdate::name("Renamed")),
        );
        let root = map.node(ROOT_ID).unwrap();
        assert_eq!(root.name, "Renamed");
        assert_eq!(root.node_type, "topic");
        assert_eq!(root.properties.description.as_deref(), Some("Click to edit"));
        assert_eq!((root.x, root.y), (400., 100.));
    }

    #[test]
    fn update_node_replaces_properties_wholesale() {
        let updates = NodeUpdate {
            properties: Some(NodeProperties::default()),
            ..Default::default()
        };
        let map = reduce(MindMap::default(), Action::update_node(ROOT_ID, updates));
        assert_eq!(map.node(ROOT_ID).unwrap().properties, NodeProperties::default());
    }

    #[test]
    fn move_node_sets_position() {
        let map = reduce(MindMap::default(), Action::move_node(ROOT_ID, -3.5, 12.));
        let root = map.node(ROOT_ID).unwrap();
        assert_eq!((root.x, root.y), (-3.5, 12.));
    }

    #[test]
    fn actions_on_missing_nodes_are_noops() {
        let before = MindMap::default();
        let after = reduce_all(
            before.clone(),
            [
                Action::move_node("ghost", 1., 1.),
                Action::update_node("ghost", NodeUpdate::name("x")),
                Action::delete_node("ghost"),
            ],
        );
        assert_eq!(before, after);
    }

    #[test]
    fn set_mind_map_replaces_state() {
        let replacement = map_with(&["x", "y"]);
        let map = reduce(MindMap::default(), Action::SetMindMap(replacement.clone()));
        assert_eq!(map, replacement);
    }
}
