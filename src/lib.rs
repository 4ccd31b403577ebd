//! family-layout: relationship graph to family tree layout
//!
//! Takes family members and pairwise relationship records (parent, child,
//! spouse, sibling) and produces a layered layout: every member gets a
//! generation level and an (x, y) position, and the relationships come back as
//! typed rendering edges.
//!
//! ```
//! use family_layout::{compute_layout, Member, Relationship};
//!
//! let members = vec![Member::new("a", "Ada", "Lovelace"), Member::new("b", "Byron", "King")];
//! let rels = vec![Relationship::parent_of("a", "b")];
//! let result = compute_layout(&members, &rels);
//! assert_eq!(result.node("b").unwrap().level, 1);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: the layout pipeline and its output types
//! - [`config`]: spacing constants, loadable from YAML
//! - [`filter`]: member search applied before layout
//! - [`source`]: async member/relationship providers
//! - [`error`]: layout warnings and fallible-operation errors
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod source;
pub mod telemetry;

pub use family_types::{Gender, Member, Relationship, RelationshipKind, RelationshipKindError};

pub use config::LayoutConfig;
pub use error::{ConfigError, LayoutWarning, SourceError, WarningClass};
pub use filter::{FilteredFamily, MemberFilter};
pub use graph::{
    compute_layout, edge_id, EdgeKind, FamilyLayoutEngine, LayoutBounds, LayoutEdge, LayoutNode,
    LayoutResult, LayoutStats,
};
pub use source::{layout_from_source, FamilySource, InMemoryFamilySource};
