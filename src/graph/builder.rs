//! Node arena for one layout call.
//!
//! Members become `NodeRecord`s addressed by their index in member-list order.
//! Parent, child and spouse relations are index lists, never references into
//! other records, so a member that is at once a child, a parent and a spouse
//! is just three lists.

use std::collections::HashMap;

use family_types::Member;

use super::normalize::{CanonicalEdge, MemberPair};
use crate::error::{record, LayoutWarning};

/// Index of a node in [`FamilyGraph::nodes`]
pub type NodeIdx = usize;

#[derive(Debug, Clone)]
pub struct NodeRecord<'a> {
    pub member: &'a Member,
    /// Parents in link order
    pub parents: Vec<NodeIdx>,
    /// Children in link order
    pub children: Vec<NodeIdx>,
    pub spouse: Option<NodeIdx>,
    /// Generation row, set by the level assignor
    pub level: Option<u32>,
    /// Horizontal centre, set by the positioner
    pub x: f64,
}

impl<'a> NodeRecord<'a> {
    fn new(member: &'a Member) -> Self {
        Self {
            member,
            parents: Vec::new(),
            children: Vec::new(),
            spouse: None,
            level: None,
            x: 0.0,
        }
    }

    pub fn id(&self) -> &'a str {
        &self.member.id
    }

    /// Level, or 0 before assignment
    pub fn level_or_zero(&self) -> u32 {
        self.level.unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct FamilyGraph<'a> {
    pub nodes: Vec<NodeRecord<'a>>,
    index: HashMap<&'a str, NodeIdx>,
    /// Accepted parent -> child links in insertion order
    pub parent_links: Vec<(NodeIdx, NodeIdx)>,
    /// Accepted spouse links, lower creation index first
    pub spouse_links: Vec<(NodeIdx, NodeIdx)>,
    /// Sibling records; never used for levels
    pub sibling_pairs: Vec<(NodeIdx, NodeIdx)>,
    pub rejected_edges: usize,
}

impl<'a> FamilyGraph<'a> {
    /// One node per distinct member id, including members without relationships.
    pub fn from_members(members: &'a [Member], warnings: &mut Vec<LayoutWarning>) -> Self {
        let mut graph = Self::default();
        for member in members {
            if graph.index.contains_key(member.id.as_str()) {
                record(
                    warnings,
                    LayoutWarning::DuplicateMember {
                        member_id: member.id.clone(),
                    },
                );
                continue;
            }
            graph.index.insert(member.id.as_str(), graph.nodes.len());
            graph.nodes.push(NodeRecord::new(member));
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn idx(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    pub fn id(&self, idx: NodeIdx) -> &'a str {
        self.nodes[idx].id()
    }

    /// Whether `candidate` is a transitive ancestor of `node` (or `node` itself).
    ///
    /// Iterative walk up the parent links with a visited set, so each node is
    /// expanded at most once even if the links are already malformed.
    pub fn is_ancestor(&self, candidate: NodeIdx, node: NodeIdx) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current == candidate {
                return true;
            }
            if visited[current] {
                continue;
            }
            visited[current] = true;
            stack.extend(
                self.nodes[current]
                    .parents
                    .iter()
                    .copied()
                    .filter(|&p| !visited[p]),
            );
        }
        false
    }

    /// Link canonical edges, rejecting any that would close a cycle.
    pub fn link_parents(&mut self, edges: &[CanonicalEdge<'_>], warnings: &mut Vec<LayoutWarning>) {
        for edge in edges {
            let (Some(parent), Some(child)) = (self.idx(edge.parent_id), self.idx(edge.child_id))
            else {
                continue;
            };

            if self.is_ancestor(child, parent) {
                self.rejected_edges += 1;
                record(
                    warnings,
                    LayoutWarning::CycleRejected {
                        parent_id: edge.parent_id.to_string(),
                        child_id: edge.child_id.to_string(),
                    },
                );
                continue;
            }

            self.nodes[parent].children.push(child);
            self.nodes[child].parents.push(parent);
            self.parent_links.push((parent, child));
        }
    }

    /// Link spouse pairs; the first active pairing of a member wins.
    pub fn link_spouses(&mut self, pairs: &[MemberPair<'_>], warnings: &mut Vec<LayoutWarning>) {
        for pair in pairs {
            let (Some(a), Some(b)) = (self.idx(pair.first), self.idx(pair.second)) else {
                continue;
            };
            let (a, b) = if a < b { (a, b) } else { (b, a) };

            let taken = [(a, b), (b, a)]
                .into_iter()
                .find_map(|(member, other)| self.nodes[member].spouse.map(|s| (member, s, other)));
            if let Some((member, existing, other)) = taken {
                record(
                    warnings,
                    LayoutWarning::DuplicateSpouse {
                        member_id: self.id(member).to_string(),
                        existing_spouse_id: self.id(existing).to_string(),
                        rejected_spouse_id: self.id(other).to_string(),
                    },
                );
                continue;
            }

            let lineage = if self.is_ancestor(a, b) {
                Some((a, b))
            } else if self.is_ancestor(b, a) {
                Some((b, a))
            } else {
                None
            };
            if let Some((ancestor, descendant)) = lineage {
                record(
                    warnings,
                    LayoutWarning::SpouseInLineage {
                        ancestor_id: self.id(ancestor).to_string(),
                        descendant_id: self.id(descendant).to_string(),
                    },
                );
                continue;
            }

            self.nodes[a].spouse = Some(b);
            self.nodes[b].spouse = Some(a);
            self.spouse_links.push((a, b));
        }
    }

    pub fn record_siblings(&mut self, pairs: &[MemberPair<'_>]) {
        for pair in pairs {
            if let (Some(a), Some(b)) = (self.idx(pair.first), self.idx(pair.second)) {
                self.sibling_pairs.push(if a < b { (a, b) } else { (b, a) });
            }
        }
    }

    /// Whether the two nodes have at least one parent in common
    pub fn share_parent(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.nodes[a]
            .parents
            .iter()
            .any(|p| self.nodes[b].parents.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::normalize::normalize;
    use family_types::Relationship;

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| Member::new(*id, *id, "Test")).collect()
    }

    fn build<'a>(
        members: &'a [Member],
        rels: &'a [Relationship],
    ) -> (FamilyGraph<'a>, Vec<LayoutWarning>) {
        let mut warnings = Vec::new();
        let mut graph = FamilyGraph::from_members(members, &mut warnings);
        let normalized = normalize(rels, |id| graph.contains(id));
        warnings.extend(normalized.warnings);
        graph.link_parents(&normalized.parent_edges, &mut warnings);
        graph.link_spouses(&normalized.spouse_pairs, &mut warnings);
        graph.record_siblings(&normalized.sibling_pairs);
        (graph, warnings)
    }

    #[test]
    fn test_isolated_members_get_nodes() {
        let ms = members(&["a", "b"]);
        let (graph, warnings) = build(&ms, &[]);
        assert_eq!(graph.len(), 2);
        assert!(graph.nodes.iter().all(|n| n.parents.is_empty()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_duplicate_member_keeps_first() {
        let mut ms = members(&["a", "b"]);
        ms.push(Member::new("a", "Other", "Person"));
        let (graph, warnings) = build(&ms, &[]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes[0].member.first_name, "a");
        assert_eq!(
            warnings,
            vec![LayoutWarning::DuplicateMember {
                member_id: "a".into()
            }]
        );
    }

    #[test]
    fn test_two_node_cycle_is_rejected() {
        let ms = members(&["a", "b"]);
        let rels = vec![
            Relationship::parent_of("a", "b"),
            Relationship::parent_of("b", "a"),
        ];
        let (graph, warnings) = build(&ms, &rels);

        assert_eq!(graph.nodes[0].children, vec![1]);
        assert!(graph.nodes[0].parents.is_empty());
        assert_eq!(graph.rejected_edges, 1);
        assert_eq!(
            warnings,
            vec![LayoutWarning::CycleRejected {
                parent_id: "b".into(),
                child_id: "a".into()
            }]
        );
    }

    #[test]
    fn test_long_cycle_is_rejected_at_closing_edge() {
        let ms = members(&["a", "b", "c", "d"]);
        let rels = vec![
            Relationship::parent_of("a", "b"),
            Relationship::parent_of("b", "c"),
            Relationship::child_of("d", "c"),
            Relationship::parent_of("d", "a"),
        ];
        let (graph, warnings) = build(&ms, &rels);

        assert_eq!(graph.parent_links.len(), 3);
        assert!(graph.is_ancestor(0, 3));
        assert!(!graph.is_ancestor(3, 0));
        assert!(warnings[0].is_cycle_rejection());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let ms = members(&["a", "b", "c", "d"]);
        let rels = vec![
            Relationship::parent_of("a", "b"),
            Relationship::parent_of("a", "c"),
            Relationship::parent_of("b", "d"),
            Relationship::parent_of("c", "d"),
        ];
        let (graph, warnings) = build(&ms, &rels);
        assert!(warnings.is_empty());
        assert_eq!(graph.nodes[3].parents, vec![1, 2]);
    }

    #[test]
    fn test_second_spouse_claim_is_dropped() {
        let ms = members(&["a", "b", "c"]);
        let rels = vec![Relationship::spouses("a", "b"), Relationship::spouses("c", "a")];
        let (graph, warnings) = build(&ms, &rels);

        assert_eq!(graph.nodes[0].spouse, Some(1));
        assert_eq!(graph.nodes[1].spouse, Some(0));
        assert_eq!(graph.nodes[2].spouse, None);
        assert_eq!(
            warnings,
            vec![LayoutWarning::DuplicateSpouse {
                member_id: "a".into(),
                existing_spouse_id: "b".into(),
                rejected_spouse_id: "c".into(),
            }]
        );
    }

    #[test]
    fn test_spouse_in_own_lineage_is_dropped() {
        let ms = members(&["a", "b", "c"]);
        let rels = vec![
            Relationship::parent_of("a", "b"),
            Relationship::parent_of("b", "c"),
            Relationship::spouses("c", "a"),
        ];
        let (graph, warnings) = build(&ms, &rels);
        assert_eq!(graph.nodes[0].spouse, None);
        assert!(matches!(
            &warnings[0],
            LayoutWarning::SpouseInLineage { ancestor_id, descendant_id }
                if ancestor_id == "a" && descendant_id == "c"
        ));
    }

    #[test]
    fn test_share_parent() {
        let ms = members(&["p", "a", "b", "c"]);
        let rels = vec![
            Relationship::parent_of("p", "a"),
            Relationship::parent_of("p", "b"),
            Relationship::siblings("a", "c"),
        ];
        let (graph, _) = build(&ms, &rels);
        assert!(graph.share_parent(1, 2));
        assert!(!graph.share_parent(1, 3));
        assert_eq!(graph.sibling_pairs, vec![(1, 3)]);
    }
}
