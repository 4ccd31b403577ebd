//! Family tree layout engine
//!
//! Turns members and raw relationship records into positioned nodes and
//! rendering edges. Every call builds a fresh node arena and drops it before
//! returning, so the engine holds no state between calls and concurrent calls
//! cannot interfere.
//!
//! ## Pipeline
//!
//! 1. Arena: one node per distinct member id ([`FamilyGraph::from_members`])
//! 2. Normalize records into canonical parent -> child edges ([`normalize`])
//! 3. Link edges, rejecting cycles and conflicting spouse claims
//! 4. Assign generation levels ([`assign_levels`])
//! 5. Assign horizontal positions ([`assign_positions`])
//! 6. Synthesize rendering edges ([`synthesize`])

use family_types::{Member, Relationship};

use super::builder::FamilyGraph;
use super::edges::synthesize;
use super::levels::{assign_levels, generation_count};
use super::normalize::normalize;
use super::position::assign_positions;
use super::types::{EdgeKind, LayoutBounds, LayoutEdge, LayoutNode, LayoutResult, LayoutStats};
use crate::config::LayoutConfig;

#[derive(Debug, Clone, Default)]
pub struct FamilyLayoutEngine {
    config: LayoutConfig,
}

impl FamilyLayoutEngine {
    /// Create a new layout engine with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute the layout. Never fails: malformed records are skipped and
    /// reported in [`LayoutResult::warnings`]. No members means an empty result.
    pub fn layout(&self, members: &[Member], relationships: &[Relationship]) -> LayoutResult {
        if members.is_empty() {
            tracing::debug!(
                "Empty member list, skipping layout of {} relationship records",
                relationships.len()
            );
            return LayoutResult::default();
        }

        let mut warnings = Vec::new();
        let mut graph = FamilyGraph::from_members(members, &mut warnings);

        let normalized = normalize(relationships, |id| graph.contains(id));
        warnings.extend(normalized.warnings);
        graph.link_parents(&normalized.parent_edges, &mut warnings);
        graph.link_spouses(&normalized.spouse_pairs, &mut warnings);
        graph.record_siblings(&normalized.sibling_pairs);

        let components = assign_levels(&mut graph);
        assign_positions(&mut graph, &components, &self.config);
        let edges = synthesize(&graph, &self.config);

        let nodes = self.collect_nodes(&graph);
        let stats = LayoutStats {
            node_count: nodes.len(),
            parent_child_edges: count_kind(&edges, EdgeKind::ParentChild),
            spouse_edges: count_kind(&edges, EdgeKind::Spouse),
            sibling_edges: count_kind(&edges, EdgeKind::Sibling),
            generations: generation_count(&graph),
            components: components.len(),
            rejected_edges: graph.rejected_edges,
        };

        tracing::info!(
            "Family layout complete: {} members, {} edges, {} generations, {} warnings",
            stats.node_count,
            edges.len(),
            stats.generations,
            warnings.len()
        );

        LayoutResult {
            bounds: self.bounds(&nodes),
            nodes,
            edges,
            warnings,
            stats,
        }
    }

    fn collect_nodes(&self, graph: &FamilyGraph<'_>) -> Vec<LayoutNode> {
        let ids = |list: &[usize]| -> Vec<String> {
            list.iter().map(|&i| graph.id(i).to_string()).collect()
        };
        graph
            .nodes
            .iter()
            .map(|node| {
                let level = node.level_or_zero();
                LayoutNode {
                    id: node.id().to_string(),
                    level,
                    x: node.x,
                    y: self.config.row_y(level),
                    spouse_id: node.spouse.map(|s| graph.id(s).to_string()),
                    parent_ids: ids(&node.parents),
                    child_ids: ids(&node.children),
                    member_payload: node.member.clone(),
                }
            })
            .collect()
    }

    fn bounds(&self, nodes: &[LayoutNode]) -> LayoutBounds {
        let half = self.config.node_width / 2.0;
        nodes
            .iter()
            .map(|n| LayoutBounds {
                min_x: n.x - half,
                max_x: n.x + half,
                min_y: n.y,
                max_y: n.y + self.config.node_height,
            })
            .reduce(|a, b| LayoutBounds {
                min_x: a.min_x.min(b.min_x),
                max_x: a.max_x.max(b.max_x),
                min_y: a.min_y.min(b.min_y),
                max_y: a.max_y.max(b.max_y),
            })
            .unwrap_or_default()
    }
}

fn count_kind(edges: &[LayoutEdge], kind: EdgeKind) -> usize {
    edges.iter().filter(|e| e.kind == kind).count()
}

/// Lay out with the default configuration.
pub fn compute_layout(members: &[Member], relationships: &[Relationship]) -> LayoutResult {
    FamilyLayoutEngine::new().layout(members, relationships)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> Member {
        Member::new(id, id.to_uppercase(), "Test")
    }

    #[test]
    fn test_empty_input_is_empty_layout() {
        let result = compute_layout(&[], &[Relationship::parent_of("a", "b")]);
        assert!(result.is_empty());
        assert!(result.edges.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats, LayoutStats::default());
    }

    #[test]
    fn test_simple_layout() {
        let members = vec![member("a"), member("b"), member("c")];
        let rels = vec![
            Relationship::parent_of("a", "b"),
            Relationship::parent_of("a", "c"),
        ];
        let result = compute_layout(&members, &rels);

        let a = result.node("a").unwrap();
        let b = result.node("b").unwrap();
        let c = result.node("c").unwrap();
        assert_eq!((a.level, b.level, c.level), (0, 1, 1));
        assert_eq!(a.x, (b.x + c.x) / 2.0);
        assert_ne!(b.x, c.x);
        assert_eq!(b.y, 140.0);
        assert_eq!(a.child_ids, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(b.parent_ids, vec!["a".to_string()]);
        assert_eq!(result.stats.parent_child_edges, 2);
        assert_eq!(result.stats.generations, 2);
    }

    #[test]
    fn test_bounds_cover_all_cards() {
        let members = vec![member("a"), member("b")];
        let rels = vec![Relationship::spouses("a", "b")];
        let result = compute_layout(&members, &rels);

        assert_eq!(
            result.bounds,
            LayoutBounds {
                min_x: 0.0,
                max_x: 340.0,
                min_y: 0.0,
                max_y: 60.0,
            }
        );
    }

    #[test]
    fn test_custom_config_changes_spacing() {
        let config = LayoutConfig {
            node_width: 100.0,
            spouse_gap: 120.0,
            row_height: 50.0,
            ..LayoutConfig::default()
        };
        let engine = FamilyLayoutEngine::with_config(config);
        let members = vec![member("a"), member("b"), member("c")];
        let rels = vec![
            Relationship::spouses("a", "b"),
            Relationship::parent_of("a", "c"),
        ];
        let result = engine.layout(&members, &rels);

        let a = result.node("a").unwrap();
        let b = result.node("b").unwrap();
        assert_eq!(b.x - a.x, 120.0);
        assert_eq!(result.node("c").unwrap().y, 50.0);
    }

    #[test]
    fn test_sibling_edges_can_be_disabled() {
        let config = LayoutConfig {
            emit_sibling_edges: false,
            ..LayoutConfig::default()
        };
        let members = vec![member("a"), member("b")];
        let rels = vec![Relationship::siblings("a", "b")];

        let with = compute_layout(&members, &rels);
        let without = FamilyLayoutEngine::with_config(config).layout(&members, &rels);
        assert_eq!(with.stats.sibling_edges, 1);
        assert_eq!(without.stats.sibling_edges, 0);
        assert_eq!(with.nodes, without.nodes);
    }
}
