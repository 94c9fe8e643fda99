//! Extraction module - the typed result of one extraction call

use crate::entity::Entity;
use crate::relationship::Relationship;
use serde::{Deserialize, Serialize};

/// Entities and relationships parsed from one segment's generated output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted entities, in output order
    pub entities: Vec<Entity>,

    /// Extracted relationships, in output order
    pub relationships: Vec<Relationship>,
}

impl Extraction {
    /// Create an extraction from its parts
    pub fn new(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        Self {
            entities,
            relationships,
        }
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }
}
