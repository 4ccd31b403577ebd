//! Horizontal positioning.
//!
//! ## Algorithm
//!
//! Members are grouped into *units*: a single member, or a couple placed side
//! by side (earlier-created partner on the left, centres `spouse_gap` apart).
//! Each unit claims as layout children the units of its members' children one
//! row below that no other unit has claimed yet, which turns every component
//! into a forest of units.
//!
//! The forest is placed depth-first, post-order, with one `next_free` contour
//! value per row:
//!
//! - a childless unit takes the next free slot on its row;
//! - a unit with children is centred over the span of its children's centres;
//!   if that would overlap what is already on its row, the whole subtree is
//!   shifted right. Anything placed since the subtree started belongs to it,
//!   so the shift never collides with earlier work.
//!
//! Components are placed independently and then offset so that their
//! bounding boxes are `component_gap` apart.

use super::builder::{FamilyGraph, NodeIdx};
use super::levels::Component;
use crate::config::LayoutConfig;

#[derive(Debug)]
struct Unit {
    /// One member, or a couple left to right
    members: Vec<NodeIdx>,
    level: u32,
    /// Claimed child units, in creation order
    children: Vec<usize>,
    /// (child unit, slot) of every member that is a child of this unit
    anchors: Vec<(usize, usize)>,
    /// Left edge of the unit's outer card
    left: f64,
}

struct Placer<'c> {
    config: &'c LayoutConfig,
    units: Vec<Unit>,
    next_free: Vec<f64>,
}

/// Set `x` on every node. Components are laid out left to right in order.
pub fn assign_positions(
    graph: &mut FamilyGraph<'_>,
    components: &[Component],
    config: &LayoutConfig,
) {
    let mut cursor = 0.0;
    for component in components {
        let (min_left, max_right) = position_component(graph, component, config);
        let offset = cursor - min_left;
        for &idx in &component.members {
            graph.nodes[idx].x += offset;
        }
        cursor = max_right + offset + config.component_gap;
    }
}

/// Lay out one component from x = 0 and return its horizontal card extent.
fn position_component(
    graph: &mut FamilyGraph<'_>,
    component: &Component,
    config: &LayoutConfig,
) -> (f64, f64) {
    let units = build_units(graph, component);
    let rows = units.iter().map(|u| u.level as usize + 1).max().unwrap_or(0);
    let mut placer = Placer {
        config,
        units,
        next_free: vec![0.0; rows],
    };

    let roots = root_order(graph, &placer.units);
    for root in roots {
        placer.place(root);
    }

    let mut min_left = f64::INFINITY;
    let mut max_right = f64::NEG_INFINITY;
    let half = config.node_width / 2.0;
    for unit in &placer.units {
        let mut centre = unit.left + half;
        for &idx in &unit.members {
            graph.nodes[idx].x = centre;
            min_left = min_left.min(centre - half);
            max_right = max_right.max(centre + half);
            centre += config.spouse_gap;
        }
    }
    (min_left, max_right)
}

/// Group members into units and link each unit to the child units it owns.
fn build_units(graph: &FamilyGraph<'_>, component: &Component) -> Vec<Unit> {
    let mut unit_of: Vec<Option<usize>> = vec![None; graph.len()];
    let mut units: Vec<Unit> = Vec::new();

    for &idx in &component.members {
        if unit_of[idx].is_some() {
            continue;
        }
        let node = &graph.nodes[idx];
        let mut members = vec![idx];
        if let Some(spouse) = node.spouse {
            if unit_of[spouse].is_none() && graph.nodes[spouse].level == node.level {
                members.push(spouse);
            }
        }
        for &m in &members {
            unit_of[m] = Some(units.len());
        }
        units.push(Unit {
            members,
            level: node.level_or_zero(),
            children: Vec::new(),
            anchors: Vec::new(),
            left: 0.0,
        });
    }

    // Claim top-down so that a unit is always claimed from the row above it.
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by_key(|&u| (units[u].level, units[u].members[0]));
    let mut claimed = vec![false; units.len()];
    for u in order {
        let level = units[u].level;
        let mut owned = Vec::new();
        let mut anchors = Vec::new();
        for &m in &units[u].members {
            for &child in &graph.nodes[m].children {
                if graph.nodes[child].level != Some(level + 1) {
                    continue;
                }
                let Some(cu) = unit_of[child] else {
                    continue;
                };
                if !claimed[cu] {
                    claimed[cu] = true;
                    owned.push(cu);
                }
                if owned.contains(&cu) {
                    let slot = units[cu]
                        .members
                        .iter()
                        .position(|&x| x == child)
                        .unwrap_or(0);
                    if !anchors.contains(&(cu, slot)) {
                        anchors.push((cu, slot));
                    }
                }
            }
        }
        // Unit indices follow member creation order.
        owned.sort_unstable();
        units[u].children = owned;
        units[u].anchors = anchors;
    }

    units
}

/// Unclaimed units in creation order, each immediately followed by unclaimed
/// units holding a recorded sibling of one of its members.
fn root_order(graph: &FamilyGraph<'_>, units: &[Unit]) -> Vec<usize> {
    let mut is_root = vec![true; units.len()];
    for unit in units {
        for &c in &unit.children {
            is_root[c] = false;
        }
    }
    let unit_of_member = |idx: NodeIdx| units.iter().position(|u| u.members.contains(&idx));

    let mut order = Vec::new();
    let mut placed = vec![false; units.len()];
    for start in 0..units.len() {
        if !is_root[start] || placed[start] {
            continue;
        }
        placed[start] = true;
        order.push(start);

        let mut i = order.len() - 1;
        while i < order.len() {
            let current = order[i];
            let mut grouped: Vec<usize> = graph
                .sibling_pairs
                .iter()
                .filter_map(|&(a, b)| {
                    if units[current].members.contains(&a) {
                        Some(b)
                    } else if units[current].members.contains(&b) {
                        Some(a)
                    } else {
                        None
                    }
                })
                .filter_map(unit_of_member)
                .filter(|&u| is_root[u] && !placed[u])
                .collect();
            grouped.sort_unstable();
            grouped.dedup();
            for u in grouped {
                placed[u] = true;
                order.push(u);
            }
            i += 1;
        }
    }
    order
}

impl Placer<'_> {
    fn width(&self, unit: usize) -> f64 {
        if self.units[unit].members.len() > 1 {
            self.config.couple_width()
        } else {
            self.config.single_width()
        }
    }

    fn place(&mut self, unit: usize) {
        let children = self.units[unit].children.clone();
        for &child in &children {
            self.place(child);
        }

        let row = self.units[unit].level as usize;
        let width = self.width(unit);
        let free = self.next_free[row];

        let left = match self.children_span(unit) {
            None => free,
            Some((lo, hi)) => {
                let desired = (lo + hi) / 2.0 - width / 2.0;
                if desired < free {
                    let delta = free - desired;
                    for &child in &children {
                        self.shift(child, delta);
                    }
                    free
                } else {
                    desired
                }
            }
        };

        self.units[unit].left = left;
        self.next_free[row] = left + width + self.config.node_margin;
    }

    /// Leftmost and rightmost centre of the members that are children of this
    /// unit's members. Partners who married into a child unit do not count.
    fn children_span(&self, unit: usize) -> Option<(f64, f64)> {
        let half = self.config.node_width / 2.0;
        self.units[unit]
            .anchors
            .iter()
            .map(|&(child, slot)| {
                self.units[child].left + half + slot as f64 * self.config.spouse_gap
            })
            .fold(None, |span, centre| match span {
                None => Some((centre, centre)),
                Some((lo, hi)) => Some((f64::min(lo, centre), f64::max(hi, centre))),
            })
    }

    fn shift(&mut self, unit: usize, delta: f64) {
        let mut stack = vec![unit];
        while let Some(current) = stack.pop() {
            self.units[current].left += delta;
            let row = self.units[current].level as usize;
            let right = self.units[current].left + self.width(current) + self.config.node_margin;
            if right > self.next_free[row] {
                self.next_free[row] = right;
            }
            stack.extend(self.units[current].children.iter().copied());
        }
    }
}
