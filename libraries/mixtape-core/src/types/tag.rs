//! Tag types

use serde::{Deserialize, Serialize};

pub type TagId = i64;

/// A tag that can be attached to songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: String,
}

/// Data for creating a new tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTag {
    pub name: String,
}
