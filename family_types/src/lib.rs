//! Family Types - Level 1 Foundation Types
//!
//! Pure data structures exchanged with the data-access collaborator: the
//! members of a family and the pairwise relationship records between them.
//!
//! ## Architecture Level: LEVEL 1 (Foundation)
//!
//! The layout engine depends on this crate; this crate depends on nothing else
//! in the workspace.
//!
//! ## Rules
//!
//! 1. **NO LAYOUT LOGIC** - Only data structures, constructors and accessors
//! 2. **SERIALIZABLE** - Everything round-trips through serde with the
//!    camelCase field names the data store uses
//! 3. **RAW RECORDS** - `Relationship::relationship_type` stays a string so a
//!    record with an unknown type can still be read and reported downstream

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// MEMBERS
// ============================================================================

/// A person recorded in the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique member id assigned by the data store
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Reference to the uploaded profile picture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl Member {
    /// Create a member with only identity and names set
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            gender: None,
            picture_url: None,
        }
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_picture_url(mut self, url: impl Into<String>) -> Self {
        self.picture_url = Some(url.into());
        self
    }

    /// "First Last", trimmed when either part is empty
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Birth year, if a birth date was recorded
    pub fn birth_year(&self) -> Option<i32> {
        self.birth_date.map(|d| d.year())
    }
}

/// Recorded gender of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

// ============================================================================
// RELATIONSHIPS
// ============================================================================

/// A raw relationship record as stored by the data-access layer.
///
/// Direction depends on the type: `"parent"` means member1 is the parent of
/// member2, `"child"` means member1 is the child of member2. `"spouse"` and
/// `"sibling"` are symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub member1_id: String,
    pub member2_id: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
}

impl Relationship {
    pub fn new(
        member1_id: impl Into<String>,
        member2_id: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            member1_id: member1_id.into(),
            member2_id: member2_id.into(),
            relationship_type: kind.as_str().to_string(),
        }
    }

    /// `parent` is the parent of `child`
    pub fn parent_of(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::new(parent, child, RelationshipKind::Parent)
    }

    /// `child` is the child of `parent`
    pub fn child_of(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(child, parent, RelationshipKind::Child)
    }

    pub fn spouses(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, RelationshipKind::Spouse)
    }

    pub fn siblings(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, RelationshipKind::Sibling)
    }

    /// Parse the raw type string
    pub fn kind(&self) -> Result<RelationshipKind, RelationshipKindError> {
        self.relationship_type.parse()
    }

    pub fn is_self_referential(&self) -> bool {
        self.member1_id == self.member2_id
    }
}

/// Recognised relationship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Parent,
    Child,
    Spouse,
    Sibling,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Parent => "parent",
            RelationshipKind::Child => "child",
            RelationshipKind::Spouse => "spouse",
            RelationshipKind::Sibling => "sibling",
        }
    }

    /// Spouse and sibling records carry no direction
    pub fn is_symmetric(&self) -> bool {
        matches!(self, RelationshipKind::Spouse | RelationshipKind::Sibling)
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a record's type string is not one of the known kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized relationship type: '{0}'")]
pub struct RelationshipKindError(pub String);

impl FromStr for RelationshipKind {
    type Err = RelationshipKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent" => Ok(RelationshipKind::Parent),
            "child" => Ok(RelationshipKind::Child),
            "spouse" => Ok(RelationshipKind::Spouse),
            "sibling" => Ok(RelationshipKind::Sibling),
            _ => Err(RelationshipKindError(s.to_string())),
        }
    }
}
