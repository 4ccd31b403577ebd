//! Member filtering ahead of layout.
//!
//! A filter narrows the member list and then drops every relationship record
//! that touches a removed member, so hiding members on purpose does not show
//! up as dangling-member warnings in the layout.

use std::collections::HashSet;

use family_types::{Member, Relationship};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilter {
    /// Whitespace-separated terms; each must appear in the first or last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Explicit allow-list of member ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<HashSet<String>>,
    /// Inclusive birth-year range; members without a birth date never match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<(i32, i32)>,
}

/// Members retained by a filter and the relationships among them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredFamily {
    pub members: Vec<Member>,
    pub relationships: Vec<Relationship>,
}

impl MemberFilter {
    /// Filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_member_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn born_between(mut self, from_year: i32, to_year: i32) -> Self {
        self.birth_years = Some((from_year.min(to_year), from_year.max(to_year)));
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.member_ids.is_none()
            && self.birth_years.is_none()
    }

    pub fn matches(&self, member: &Member) -> bool {
        if let Some(ids) = &self.member_ids {
            if !ids.contains(&member.id) {
                return false;
            }
        }

        if let Some((from, to)) = self.birth_years {
            match member.birth_year() {
                Some(year) if (from..=to).contains(&year) => {}
                _ => return false,
            }
        }

        if let Some(query) = &self.query {
            let first = member.first_name.to_lowercase();
            let last = member.last_name.to_lowercase();
            let all_terms_match = query
                .split_whitespace()
                .map(str::to_lowercase)
                .all(|term| first.contains(&term) || last.contains(&term));
            if !all_terms_match {
                return false;
            }
        }

        true
    }

    /// Keep matching members and the relationships whose endpoints both survive.
    pub fn apply(&self, members: &[Member], relationships: &[Relationship]) -> FilteredFamily {
        let members: Vec<Member> = members.iter().filter(|m| self.matches(m)).cloned().collect();
        let kept: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
        let relationships: Vec<Relationship> = relationships
            .iter()
            .filter(|r| kept.contains(r.member1_id.as_str()) && kept.contains(r.member2_id.as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            "Member filter kept {} members and {} relationship records",
            members.len(),
            relationships.len()
        );

        FilteredFamily {
            members,
            relationships,
        }
    }
}
