//! Rendering edge synthesis.
//!
//! One edge per accepted parent -> child link, one per active spouse link, and
//! one per recorded sibling pair that nothing else already explains (same row,
//! no shared parent, not in one line of descent). Edges are deduplicated by
//! kind and sorted member-id pair, and carry deterministic UUID v5 ids.

use std::collections::HashSet;

use uuid::Uuid;

use super::builder::{FamilyGraph, NodeIdx};
use super::types::{EdgeKind, LayoutEdge};
use crate::config::LayoutConfig;

/// Namespace for edge ids, fixed so that ids are stable across calls and builds
const EDGE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b8e_4d3a_5e97_a1b0_c4d2_e8f3_9a71);

pub fn edge_id(kind: EdgeKind, source_id: &str, target_id: &str) -> String {
    let name = format!("{}:{}:{}", kind.as_str(), source_id, target_id);
    Uuid::new_v5(&EDGE_NAMESPACE, name.as_bytes()).to_string()
}

pub fn synthesize(graph: &FamilyGraph<'_>, config: &LayoutConfig) -> Vec<LayoutEdge> {
    let mut emitter = EdgeEmitter {
        graph,
        seen: HashSet::new(),
        edges: Vec::new(),
    };

    for &(parent, child) in &graph.parent_links {
        emitter.emit(EdgeKind::ParentChild, parent, child);
    }
    for &(a, b) in &graph.spouse_links {
        emitter.emit(EdgeKind::Spouse, a, b);
    }
    if config.emit_sibling_edges {
        for &(a, b) in &graph.sibling_pairs {
            if needs_sibling_edge(graph, a, b) {
                emitter.emit(EdgeKind::Sibling, a, b);
            }
        }
    }

    tracing::debug!("Synthesized {} rendering edges", emitter.edges.len());
    emitter.edges
}

/// A sibling edge is drawn only when the tree itself does not show the relation.
fn needs_sibling_edge(graph: &FamilyGraph<'_>, a: NodeIdx, b: NodeIdx) -> bool {
    graph.nodes[a].level == graph.nodes[b].level
        && !graph.share_parent(a, b)
        && !graph.is_ancestor(a, b)
        && !graph.is_ancestor(b, a)
}

struct EdgeEmitter<'g, 'a> {
    graph: &'g FamilyGraph<'a>,
    seen: HashSet<(EdgeKind, &'a str, &'a str)>,
    edges: Vec<LayoutEdge>,
}

impl<'a> EdgeEmitter<'_, 'a> {
    fn emit(&mut self, kind: EdgeKind, source: NodeIdx, target: NodeIdx) {
        let source_id = self.graph.id(source);
        let target_id = self.graph.id(target);
        let key = if source_id <= target_id {
            (kind, source_id, target_id)
        } else {
            (kind, target_id, source_id)
        };
        if !self.seen.insert(key) {
            return;
        }
        self.edges.push(LayoutEdge {
            id: edge_id(kind, source_id, target_id),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            kind,
        });
    }
}
