//! Warning and error model.
//!
//! Malformed relationship data never fails a layout call. Every problem is a
//! `LayoutWarning` value carried in the result next to the best-effort layout
//! of the valid subset. Only the edges of the crate that touch the outside
//! world (configuration files, the data source) return `Err`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LayoutWarning
// ---------------------------------------------------------------------------

/// Broad class of a warning, for callers that only want to count or badge them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningClass {
    /// The record itself is inconsistent with the member set or with other records.
    DataIntegrity,
    /// The record would make a member its own ancestor.
    Cycle,
}

/// A relationship record (or member) that was skipped during layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "warning_kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// One side of the record names a member that is not in the member list.
    #[error("{relationship_type} relationship {member1_id} -> {member2_id} names unknown member '{missing_id}'")]
    DanglingMember {
        member1_id: String,
        member2_id: String,
        relationship_type: String,
        missing_id: String,
    },

    /// Both sides of the record are the same member.
    #[error("member '{member_id}' has a {relationship_type} relationship with itself")]
    SelfRelationship {
        member_id: String,
        relationship_type: String,
    },

    /// The type string is not parent, child, spouse or sibling.
    #[error("unrecognized relationship type '{relationship_type}' between '{member1_id}' and '{member2_id}'")]
    UnrecognizedType {
        member1_id: String,
        member2_id: String,
        relationship_type: String,
    },

    /// The member list contains the same id twice; the first entry is kept.
    #[error("duplicate member id '{member_id}', keeping the first occurrence")]
    DuplicateMember { member_id: String },

    /// A member already has an active spouse; the later claim is dropped.
    #[error("spouse link '{member_id}' <-> '{rejected_spouse_id}' dropped: '{member_id}' is already linked to '{existing_spouse_id}'")]
    DuplicateSpouse {
        member_id: String,
        existing_spouse_id: String,
        rejected_spouse_id: String,
    },

    /// The two partners are in one line of descent and cannot share a generation.
    #[error("spouse link '{ancestor_id}' <-> '{descendant_id}' dropped: '{ancestor_id}' is an ancestor of '{descendant_id}'")]
    SpouseInLineage {
        ancestor_id: String,
        descendant_id: String,
    },

    /// Linking the edge would make the child an ancestor of itself.
    #[error("edge '{parent_id}' -> '{child_id}' rejected: '{child_id}' is already an ancestor of '{parent_id}'")]
    CycleRejected { parent_id: String, child_id: String },
}

impl LayoutWarning {
    pub fn class(&self) -> WarningClass {
        match self {
            LayoutWarning::CycleRejected { .. } => WarningClass::Cycle,
            _ => WarningClass::DataIntegrity,
        }
    }

    pub fn is_cycle_rejection(&self) -> bool {
        self.class() == WarningClass::Cycle
    }
}

/// Log a warning and keep it for the result.
pub(crate) fn record(warnings: &mut Vec<LayoutWarning>, warning: LayoutWarning) {
    tracing::warn!("Skipping relationship data: {}", warning);
    warnings.push(warning);
}

// ---------------------------------------------------------------------------
// Fallible boundaries
// ---------------------------------------------------------------------------

/// Failure to load or validate a [`crate::LayoutConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read layout config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid layout config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure of the data-access collaborator to supply members or relationships.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_classes() {
        let cycle = LayoutWarning::CycleRejected {
            parent_id: "b".into(),
            child_id: "a".into(),
        };
        assert_eq!(cycle.class(), WarningClass::Cycle);
        assert!(cycle.is_cycle_rejection());

        let dangling = LayoutWarning::DanglingMember {
            member1_id: "a".into(),
            member2_id: "ghost".into(),
            relationship_type: "parent".into(),
            missing_id: "ghost".into(),
        };
        assert_eq!(dangling.class(), WarningClass::DataIntegrity);
        assert!(dangling.to_string().contains("unknown member 'ghost'"));
    }

    #[test]
    fn test_warning_serializes_with_tag() {
        let warning = LayoutWarning::SelfRelationship {
            member_id: "a".into(),
            relationship_type: "spouse".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["warning_kind"], "self_relationship");
        assert_eq!(json["member_id"], "a");
    }
}
