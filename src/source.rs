//! Data-access seam.
//!
//! The engine itself is synchronous and never touches storage. A
//! [`FamilySource`] supplies members and relationship records; retrieval
//! failures stay on this side as [`SourceError`] and never reach the layout.

use async_trait::async_trait;
use family_types::{Member, Relationship};

use crate::error::SourceError;
use crate::filter::MemberFilter;
use crate::graph::{FamilyLayoutEngine, LayoutResult};

/// Provider of the raw family data for one layout
#[async_trait]
pub trait FamilySource: Send + Sync {
    async fn fetch_members(&self) -> Result<Vec<Member>, SourceError>;

    async fn fetch_relationships(&self) -> Result<Vec<Relationship>, SourceError>;
}

/// Source backed by vectors held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFamilySource {
    members: Vec<Member>,
    relationships: Vec<Relationship>,
}

impl InMemoryFamilySource {
    pub fn new(members: Vec<Member>, relationships: Vec<Relationship>) -> Self {
        Self {
            members,
            relationships,
        }
    }

    /// Decode from the JSON arrays the data store returns.
    pub fn from_json(members_json: &str, relationships_json: &str) -> Result<Self, SourceError> {
        let members = serde_json::from_str(members_json).map_err(|source| SourceError::Decode {
            what: "members",
            source,
        })?;
        let relationships =
            serde_json::from_str(relationships_json).map_err(|source| SourceError::Decode {
                what: "relationships",
                source,
            })?;
        Ok(Self::new(members, relationships))
    }
}

#[async_trait]
impl FamilySource for InMemoryFamilySource {
    async fn fetch_members(&self) -> Result<Vec<Member>, SourceError> {
        Ok(self.members.clone())
    }

    async fn fetch_relationships(&self) -> Result<Vec<Relationship>, SourceError> {
        Ok(self.relationships.clone())
    }
}

/// Fetch both collections concurrently, optionally filter, then lay out.
pub async fn layout_from_source(
    source: &dyn FamilySource,
    engine: &FamilyLayoutEngine,
    filter: Option<&MemberFilter>,
) -> Result<LayoutResult, SourceError> {
    let (members, relationships) =
        tokio::try_join!(source.fetch_members(), source.fetch_relationships())?;

    tracing::debug!(
        "Fetched {} members and {} relationship records",
        members.len(),
        relationships.len()
    );

    let result = match filter {
        Some(filter) if !filter.is_empty() => {
            let filtered = filter.apply(&members, &relationships);
            engine.layout(&filtered.members, &filtered.relationships)
        }
        _ => engine.layout(&members, &relationships),
    };
    Ok(result)
}
