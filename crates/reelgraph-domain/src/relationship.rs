//! Relationship module - undirected weighted links between entities

use crate::entity::canonical_name;
use serde::{Deserialize, Serialize};

/// Lowest relationship strength
pub const MIN_STRENGTH: u8 = 1;

/// Highest relationship strength
pub const MAX_STRENGTH: u8 = 10;

/// A relationship record as extracted from generated output
///
/// Relationships are undirected and keyed by the unordered pair
/// `(source, target)`. A record without a target never becomes a graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Name of the source entity
    pub source: String,

    /// Name of the target entity, absent when the service emitted `null`
    pub target: Option<String>,

    /// How the two entities are related
    pub description: Option<String>,

    /// Strength in `MIN_STRENGTH..=MAX_STRENGTH`
    pub strength: Option<u8>,
}

impl Relationship {
    /// Create a relationship between two named entities
    pub fn new(source: &str, target: &str, description: impl Into<String>, strength: u8) -> Self {
        Self {
            source: canonical_name(source),
            target: Some(canonical_name(target)),
            description: Some(description.into()),
            strength: Some(clamp_strength(i64::from(strength))),
        }
    }

    /// Whether this relationship connects an entity to itself
    pub fn is_self_loop(&self) -> bool {
        self.target.as_deref() == Some(self.source.as_str())
    }
}

/// Clamp an arbitrary integer into the valid strength range
pub fn clamp_strength(value: i64) -> u8 {
    value.clamp(i64::from(MIN_STRENGTH), i64::from(MAX_STRENGTH)) as u8
}
