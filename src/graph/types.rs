//! Graph types for family tree layout output
//!
//! These types are the contract with the rendering collaborator: positioned
//! nodes, typed edges, and the warnings collected while building them. They
//! serialize to camelCase JSON.

use family_types::Member;
use serde::{Deserialize, Serialize};

use crate::error::LayoutWarning;

/// Kind of rendering edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "parent-child")]
    ParentChild,
    #[serde(rename = "spouse")]
    Spouse,
    #[serde(rename = "sibling")]
    Sibling,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::ParentChild => "parent-child",
            EdgeKind::Spouse => "spouse",
            EdgeKind::Sibling => "sibling",
        }
    }

    /// Parent-child edges point from parent to child; the others have no direction
    pub fn is_directed(&self) -> bool {
        matches!(self, EdgeKind::ParentChild)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Member id
    pub id: String,
    /// Generation row, 0 = top
    pub level: u32,
    /// Horizontal centre of the card
    pub x: f64,
    /// Top of the card (`level * row_height`)
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<String>,
    pub member_payload: Member,
}

/// A rendering edge between two positioned members
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

/// Extent of all member cards
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Layout statistics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub node_count: usize,
    pub parent_child_edges: usize,
    pub spouse_edges: usize,
    pub sibling_edges: usize,
    /// Number of distinct generation rows
    pub generations: u32,
    /// Number of independently laid out family components
    pub components: usize,
    /// Parent edges rejected because they would close a cycle
    pub rejected_edges: usize,
}

/// Result of one layout call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// One node per distinct member, in member-list order
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub warnings: Vec<LayoutWarning>,
    pub bounds: LayoutBounds,
    pub stats: LayoutStats,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &LayoutEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn cycle_rejections(&self) -> impl Iterator<Item = &LayoutWarning> {
        self.warnings.iter().filter(|w| w.is_cycle_rejection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(EdgeKind::ParentChild).unwrap(),
            "parent-child"
        );
        assert_eq!(serde_json::to_value(EdgeKind::Sibling).unwrap(), "sibling");
        assert!(EdgeKind::ParentChild.is_directed());
        assert!(!EdgeKind::Spouse.is_directed());
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = LayoutNode {
            id: "a".into(),
            level: 1,
            x: 80.0,
            y: 140.0,
            spouse_id: None,
            parent_ids: vec!["p".into()],
            child_ids: Vec::new(),
            member_payload: Member::new("a", "Ann", "Lee"),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["parentIds"][0], "p");
        assert_eq!(json["memberPayload"]["firstName"], "Ann");
        assert!(json.get("spouseId").is_none());
        assert!(json.get("childIds").is_none());
    }

    #[test]
    fn test_bounds_extent() {
        let bounds = LayoutBounds {
            min_x: -10.0,
            max_x: 150.0,
            min_y: 0.0,
            max_y: 60.0,
        };
        assert_eq!(bounds.width(), 160.0);
        assert_eq!(bounds.height(), 60.0);
    }
}
