//! Family graph layout
//!
//! This module turns a flat list of members and relationship records into a
//! positioned, renderable tree that can be serialized to JSON and consumed by
//! visualization clients.

pub mod builder;
pub mod edges;
pub mod layout;
pub mod levels;
pub mod normalize;
pub mod position;
pub mod types;

pub use edges::edge_id;
pub use layout::{compute_layout, FamilyLayoutEngine};
pub use types::*;
