//! Generation levels.
//!
//! ## Algorithm
//!
//! 1. Split the graph into connected components over parent, child, spouse
//!    and sibling links. Each component is levelled and later positioned on
//!    its own.
//! 2. Roots are members without parents whose spouse (if any) has no parents
//!    either. A parentless member married into the family takes the level of
//!    its spouse instead of starting a new row 0.
//! 3. Frontier-synchronous BFS from all roots of the component. Each frontier
//!    is processed in member creation order and a node keeps the first level
//!    it receives, so a member reachable through several parents gets
//!    `min(parent level) + 1`, ties going to the earliest-created parent.
//! 4. As soon as a level is fixed it is copied to the spouse, which joins the
//!    same frontier.
//! 5. Anything still unlevelled (possible only when every candidate root is
//!    married into another line) seeds a new traversal from the earliest such
//!    member.

use super::builder::{FamilyGraph, NodeIdx};

/// Members of one connected component, in creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub members: Vec<NodeIdx>,
}

/// Assign levels to every node and return the components in the order of
/// their earliest member.
pub fn assign_levels(graph: &mut FamilyGraph<'_>) -> Vec<Component> {
    let components = find_components(graph);
    for component in &components {
        level_component(graph, component);
    }

    tracing::debug!(
        "Assigned levels: {} components, {} generations",
        components.len(),
        generation_count(graph)
    );
    components
}

/// Number of distinct rows (max level + 1), 0 for an empty graph
pub fn generation_count(graph: &FamilyGraph<'_>) -> u32 {
    graph
        .nodes
        .iter()
        .filter_map(|n| n.level)
        .max()
        .map_or(0, |max| max + 1)
}

fn find_components(graph: &FamilyGraph<'_>) -> Vec<Component> {
    let n = graph.len();
    let mut neighbours: Vec<Vec<NodeIdx>> = vec![Vec::new(); n];
    for &(parent, child) in &graph.parent_links {
        neighbours[parent].push(child);
        neighbours[child].push(parent);
    }
    for &(a, b) in graph.spouse_links.iter().chain(&graph.sibling_pairs) {
        neighbours[a].push(b);
        neighbours[b].push(a);
    }

    let mut seen = vec![false; n];
    let mut components = Vec::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut members = vec![start];
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &next in &neighbours[current] {
                if !seen[next] {
                    seen[next] = true;
                    members.push(next);
                    stack.push(next);
                }
            }
        }
        members.sort_unstable();
        components.push(Component { members });
    }
    components
}

fn level_component(graph: &mut FamilyGraph<'_>, component: &Component) {
    let has_parents = |graph: &FamilyGraph<'_>, idx: NodeIdx| !graph.nodes[idx].parents.is_empty();

    let mut roots: Vec<NodeIdx> = component
        .members
        .iter()
        .copied()
        .filter(|&idx| {
            !has_parents(graph, idx)
                && graph.nodes[idx]
                    .spouse
                    .map_or(true, |s| !has_parents(graph, s))
        })
        .collect();
    if roots.is_empty() {
        roots.push(component.members[0]);
    }

    traverse(graph, roots);

    // Only reachable when every parentless member is married into another line.
    loop {
        let seed = component
            .members
            .iter()
            .copied()
            .filter(|&idx| graph.nodes[idx].level.is_none())
            .min_by_key(|&idx| (has_parents(graph, idx), idx));
        let Some(seed) = seed else {
            break;
        };
        tracing::debug!(
            "No root reaches member '{}', using it as a synthetic root",
            graph.id(seed)
        );
        traverse(graph, vec![seed]);
    }
}

fn traverse(graph: &mut FamilyGraph<'_>, roots: Vec<NodeIdx>) {
    let mut level = 0u32;
    let mut frontier: Vec<NodeIdx> = roots
        .into_iter()
        .filter(|&idx| graph.nodes[idx].level.is_none())
        .collect();
    for &idx in &frontier {
        graph.nodes[idx].level = Some(level);
    }

    while !frontier.is_empty() {
        let mut i = 0;
        while i < frontier.len() {
            if let Some(spouse) = graph.nodes[frontier[i]].spouse {
                if graph.nodes[spouse].level.is_none() {
                    graph.nodes[spouse].level = Some(level);
                    frontier.push(spouse);
                }
            }
            i += 1;
        }
        frontier.sort_unstable();

        let mut next = Vec::new();
        for &idx in &frontier {
            for ci in 0..graph.nodes[idx].children.len() {
                let child = graph.nodes[idx].children[ci];
                if graph.nodes[child].level.is_none() {
                    graph.nodes[child].level = Some(level + 1);
                    next.push(child);
                }
            }
        }
        frontier = next;
        level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::normalize::normalize;
    use family_types::{Member, Relationship};

    fn levels(ids: &[&str], rels: &[Relationship]) -> (Vec<u32>, usize) {
        let members: Vec<Member> = ids.iter().map(|id| Member::new(*id, *id, "")).collect();
        let mut warnings = Vec::new();
        let mut graph = FamilyGraph::from_members(&members, &mut warnings);
        let normalized = normalize(rels, |id| graph.contains(id));
        graph.link_parents(&normalized.parent_edges, &mut warnings);
        graph.link_spouses(&normalized.spouse_pairs, &mut warnings);
        graph.record_siblings(&normalized.sibling_pairs);
        let components = assign_levels(&mut graph);
        let levels = graph.nodes.iter().map(|n| n.level.unwrap()).collect();
        (levels, components.len())
    }

    #[test]
    fn test_chain() {
        let (lv, comps) = levels(
            &["a", "b", "c"],
            &[
                Relationship::parent_of("a", "b"),
                Relationship::child_of("c", "b"),
            ],
        );
        assert_eq!(lv, vec![0, 1, 2]);
        assert_eq!(comps, 1);
    }

    #[test]
    fn test_spouses_share_level() {
        let (lv, _) = levels(&["a", "b"], &[Relationship::spouses("a", "b")]);
        assert_eq!(lv, vec![0, 0]);
    }

    #[test]
    fn test_married_in_member_takes_spouse_level() {
        // gp -> p, p married to in_law (no parents), child below both
        let (lv, _) = levels(
            &["in_law", "gp", "p", "kid"],
            &[
                Relationship::parent_of("gp", "p"),
                Relationship::spouses("in_law", "p"),
                Relationship::parent_of("p", "kid"),
                Relationship::parent_of("in_law", "kid"),
            ],
        );
        assert_eq!(lv, vec![1, 0, 1, 2]);
    }

    #[test]
    fn test_converging_lines_take_shallowest_parent() {
        // r1 -> a -> b -> x and r2 -> x: x is reached first from r2
        let (lv, _) = levels(
            &["r1", "a", "b", "r2", "x"],
            &[
                Relationship::parent_of("r1", "a"),
                Relationship::parent_of("a", "b"),
                Relationship::parent_of("b", "x"),
                Relationship::parent_of("r2", "x"),
            ],
        );
        assert_eq!(lv, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_level_independent_of_record_order() {
        let rels = vec![
            Relationship::parent_of("r1", "a"),
            Relationship::parent_of("a", "x"),
            Relationship::parent_of("r2", "b"),
            Relationship::parent_of("b", "x"),
        ];
        let mut reversed = rels.clone();
        reversed.reverse();
        let ids = ["r1", "a", "r2", "b", "x"];
        assert_eq!(levels(&ids, &rels).0, levels(&ids, &reversed).0);
    }

    #[test]
    fn test_disconnected_components() {
        let (lv, comps) = levels(
            &["a", "c", "d", "e"],
            &[
                Relationship::parent_of("c", "d"),
                Relationship::siblings("a", "e"),
            ],
        );
        assert_eq!(lv, vec![0, 0, 1, 0]);
        assert_eq!(comps, 2);
    }

    #[test]
    fn test_every_root_married_in_falls_back_to_synthetic_root() {
        // x married to y (y has parent z), z married to w (w has parent x).
        let (lv, comps) = levels(
            &["x", "y", "z", "w"],
            &[
                Relationship::parent_of("z", "y"),
                Relationship::parent_of("x", "w"),
                Relationship::spouses("x", "y"),
                Relationship::spouses("z", "w"),
            ],
        );
        assert_eq!(comps, 1);
        // x seeds at 0 and pulls in y; z follows its spouse w one row down.
        assert_eq!(lv[0], 0);
        assert_eq!(lv[0], lv[1]);
        assert_eq!(lv[2], lv[3]);
        assert_eq!(lv[3], 1);
    }

    #[test]
    fn test_empty_graph() {
        let (lv, comps) = levels(&[], &[]);
        assert!(lv.is_empty());
        assert_eq!(comps, 0);
    }
}
