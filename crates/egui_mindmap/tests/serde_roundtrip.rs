use egui_mindmap::export::{export_json, generate_markdown, import_json};
use egui_mindmap::storage::{self, MemoryStore};
use egui_mindmap::{reduce, reduce_all, Action, MindMap, Node, NodeProperties, NodeUpdate};
use serde_json::{json, Value};

fn sample() -> MindMap {
    reduce_all(
        MindMap::default(),
        [
            Action::AddNode(Node::new("idea", "idea", "An idea", 700., 100.)),
            Action::AddNode(
                Node::new("img", "imageNode", "Picture", 400., 300.).with_properties(
                    NodeProperties {
                        image_data: Some("data:image/png;base64,AAAA".into()),
                        ..Default::default()
                    },
                ),
            ),
            Action::add_connection("root", "idea"),
            Action::add_connection("idea", "img"),
            Action::update_node("root", NodeUpdate::children(vec!["idea".into()])),
        ],
    )
}

#[test]
fn test_export_import_roundtrip() {
    let map = sample();
    let json = export_json(&map).expect("export");
    let back = import_json(&json).expect("import");

    assert_eq!(back.nodes, map.nodes);
    assert_eq!(back.connections, map.connections);
    assert_eq!(back, map);
}

#[test]
fn test_wire_format_field_names() {
    let value: Value = serde_json::from_str(&export_json(&sample()).unwrap()).unwrap();
    let img = &value["nodes"][2];
    assert_eq!(img["type"], "imageNode");
    assert_eq!(img["properties"]["imageData"], "data:image/png;base64,AAAA");
    assert_eq!(value["nodes"][0]["children"], json!(["idea"]));
    assert_eq!(value["connections"][0]["from"], "root");
    assert!(value["properties"].is_object());
}

#[test]
fn test_unknown_properties_survive() {
    let text = json!({
        "properties": {"title": "Plans"},
        "nodes": [{
            "id": "a", "type": "idea", "name": "A",
            "properties": {"color": "#ff0000", "description": "red"},
            "x": 1.5, "y": -2
        }]
    })
    .to_string();
    let map = import_json(&text).unwrap();
    assert_eq!(map.properties["title"], "Plans");
    assert_eq!(map.nodes[0].properties.description.as_deref(), Some("red"));
    assert_eq!(map.nodes[0].properties.extra["color"], "#ff0000");

    let again: Value = serde_json::from_str(&export_json(&map).unwrap()).unwrap();
    assert_eq!(again["nodes"][0]["properties"]["color"], "#ff0000");
}

#[test]
fn test_set_mind_map_without_connections() {
    let text = r#"{"nodes": [{"id": "x", "type": "note", "name": "X", "x": 0, "y": 0}]}"#;
    let imported = import_json(text).unwrap();
    let state = reduce(sample(), Action::SetMindMap(imported));

    assert_eq!(state.nodes.len(), 1);
    assert!(state.connections.is_empty());
    assert!(state.nodes[0].children.is_empty());
}

#[test]
fn test_saved_map_reloads_and_exports() {
    let mut store = MemoryStore::new();
    let map = sample();
    storage::save_map(&mut store, storage::DEFAULT_MAP_ID, &map).unwrap();
    let loaded = storage::load_map(&store, storage::DEFAULT_MAP_ID)
        .unwrap()
        .expect("saved map");
    assert_eq!(loaded, map);

    let md = generate_markdown(&loaded);
    assert!(md.starts_with("# Mind Map\n\n# Main Topic\n\n## An idea\n\n"));
    assert!(md.contains("# Picture\n\n"));
    assert!(!md.contains("Click to edit"));
}
