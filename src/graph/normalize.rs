//! Relationship normalization.
//!
//! Relationship records arrive in two encodings for the same fact ("A is
//! parent of B" and "B is child of A"). Everything after this module sees only
//! canonical parent -> child edges and unordered spouse/sibling pairs.

use std::collections::HashSet;

use family_types::{Relationship, RelationshipKind};

use crate::error::{record, LayoutWarning};

/// A directed parent -> child edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalEdge<'a> {
    pub parent_id: &'a str,
    pub child_id: &'a str,
}

/// An unordered pair of members, stored with the ids in sorted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberPair<'a> {
    pub first: &'a str,
    pub second: &'a str,
}

impl<'a> MemberPair<'a> {
    pub fn new(a: &'a str, b: &'a str) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// Sorted-id concatenation, the identity of the pair
    pub fn key(&self) -> String {
        format!("{}:{}", self.first, self.second)
    }
}

/// Output of [`normalize`]: canonical edges in first-seen order
#[derive(Debug, Default)]
pub struct NormalizedRelationships<'a> {
    pub parent_edges: Vec<CanonicalEdge<'a>>,
    pub spouse_pairs: Vec<MemberPair<'a>>,
    pub sibling_pairs: Vec<MemberPair<'a>>,
    pub warnings: Vec<LayoutWarning>,
}

/// Canonicalize raw records.
///
/// `is_member` answers whether an id is in the member set. Records with an
/// unknown type, a self reference, or an unknown member id are dropped with a
/// warning. Repeated records for the same fact collapse silently.
pub fn normalize<'a>(
    relationships: &'a [Relationship],
    is_member: impl Fn(&str) -> bool,
) -> NormalizedRelationships<'a> {
    let mut out = NormalizedRelationships::default();
    let mut seen_edges: HashSet<CanonicalEdge<'a>> = HashSet::new();
    let mut seen_spouses: HashSet<MemberPair<'a>> = HashSet::new();
    let mut seen_siblings: HashSet<MemberPair<'a>> = HashSet::new();
    let mut duplicates = 0usize;

    for rel in relationships {
        let kind = match rel.kind() {
            Ok(kind) => kind,
            Err(_) => {
                record(
                    &mut out.warnings,
                    LayoutWarning::UnrecognizedType {
                        member1_id: rel.member1_id.clone(),
                        member2_id: rel.member2_id.clone(),
                        relationship_type: rel.relationship_type.clone(),
                    },
                );
                continue;
            }
        };

        if rel.is_self_referential() {
            record(
                &mut out.warnings,
                LayoutWarning::SelfRelationship {
                    member_id: rel.member1_id.clone(),
                    relationship_type: kind.to_string(),
                },
            );
            continue;
        }

        let missing = [&rel.member1_id, &rel.member2_id]
            .into_iter()
            .find(|id| !is_member(id));
        if let Some(missing_id) = missing {
            record(
                &mut out.warnings,
                LayoutWarning::DanglingMember {
                    member1_id: rel.member1_id.clone(),
                    member2_id: rel.member2_id.clone(),
                    relationship_type: kind.to_string(),
                    missing_id: missing_id.clone(),
                },
            );
            continue;
        }

        let a = rel.member1_id.as_str();
        let b = rel.member2_id.as_str();
        match kind {
            RelationshipKind::Parent | RelationshipKind::Child => {
                let edge = if kind == RelationshipKind::Parent {
                    CanonicalEdge {
                        parent_id: a,
                        child_id: b,
                    }
                } else {
                    CanonicalEdge {
                        parent_id: b,
                        child_id: a,
                    }
                };
                if seen_edges.insert(edge) {
                    out.parent_edges.push(edge);
                } else {
                    duplicates += 1;
                }
            }
            RelationshipKind::Spouse => {
                let pair = MemberPair::new(a, b);
                if seen_spouses.insert(pair) {
                    out.spouse_pairs.push(pair);
                } else {
                    duplicates += 1;
                }
            }
            RelationshipKind::Sibling => {
                let pair = MemberPair::new(a, b);
                if seen_siblings.insert(pair) {
                    out.sibling_pairs.push(pair);
                } else {
                    duplicates += 1;
                }
            }
        }
    }

    tracing::debug!(
        "Normalized {} records: {} parent edges, {} spouse pairs, {} sibling pairs, {} duplicates, {} dropped",
        relationships.len(),
        out.parent_edges.len(),
        out.spouse_pairs.len(),
        out.sibling_pairs.len(),
        duplicates,
        out.warnings.len()
    );

    out
}
