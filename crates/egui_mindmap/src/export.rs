//! JSON and Markdown export, JSON import.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::error::ImportError;
use crate::ids::epoch_millis;
use crate::model::{MindMap, Node, PLACEHOLDER_DESCRIPTION, ROOT_ID};

const MAX_HEADING_LEVEL: usize = 6;

pub fn json_file_name() -> String {
    format!("mind-map-{}.json", epoch_millis())
}

pub fn markdown_file_name() -> String {
    format!("mind-map-{}.md", epoch_millis())
}

/// Pretty printed map, the format [`import_json`] reads back.
pub fn export_json(map: &MindMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(map)
}

/// Parses a map file.
///
/// Files with repeated node ids are refused. Self loops and repeated connections are
/// dropped with a warning so the loaded map satisfies the reducer's invariants.
pub fn import_json(text: &str) -> Result<MindMap, ImportError> {
    let mut map: MindMap = serde_json::from_str(text)?;
    if let Some(id) = map.duplicate_node_id() {
        return Err(ImportError::DuplicateNodeId(id.to_owned()));
    }

    let before = map.connections.len();
    let mut seen = HashSet::new();
    map.connections
        .retain(|c| c.from != c.to && seen.insert((c.from.clone(), c.to.clone())));
    if map.connections.len() != before {
        log::warn!(
            "import dropped {} invalid connection(s)",
            before - map.connections.len()
        );
    }

    log::info!(
        "imported map: {} nodes, {} connections",
        map.nodes.len(),
        map.connections.len()
    );
    Ok(map)
}

/// Outline of the map following `children` links.
///
/// Roots are nodes nobody lists as a child, plus the node with id `root`. Heading level
/// equals depth (capped at 6). Children are written once per entry in `children`; a child
/// already on the current path is skipped.
pub fn generate_markdown(map: &MindMap) -> String {
    let by_id: HashMap<&str, &Node> = map.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut hierarchy: DiGraphMap<&str, ()> = DiGraphMap::new();
    for n in &map.nodes {
        hierarchy.add_node(n.id.as_str());
    }
    for n in &map.nodes {
        for child in &n.children {
            if by_id.contains_key(child.as_str()) {
                hierarchy.add_edge(n.id.as_str(), child.as_str(), ());
            }
        }
    }

    let mut out = String::from("# Mind Map\n\n");
    let mut path = Vec::new();
    for n in &map.nodes {
        let is_child = hierarchy
            .neighbors_directed(n.id.as_str(), Direction::Incoming)
            .next()
            .is_some();
        if !is_child || n.id == ROOT_ID {
            write_node(&mut out, n, &by_id, 1, &mut path);
        }
    }
    out
}

fn write_node<'a>(
    out: &mut String,
    node: &'a Node,
    by_id: &HashMap<&'a str, &'a Node>,
    depth: usize,
    path: &mut Vec<&'a str>,
) {
    let _ = write!(
        out,
        "{} {}\n\n",
        "#".repeat(depth.min(MAX_HEADING_LEVEL)),
        node.name
    );
    if let Some(description) = node.properties.description.as_deref() {
        if !description.is_empty() && description != PLACEHOLDER_DESCRIPTION {
            let _ = write!(out, "{description}\n\n");
        }
    }

    path.push(node.id.as_str());
    for child_id in &node.children {
        if path.contains(&child_id.as_str()) {
            continue;
        }
        if let Some(child) = by_id.get(child_id.as_str()) {
            write_node(out, child, by_id, depth + 1, path);
        }
    }
    path.pop();
}
