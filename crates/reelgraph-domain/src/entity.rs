//! Entity module - named nodes of the knowledge graph

use serde::{Deserialize, Serialize};

/// Canonicalise an entity name: lowercase, whitespace runs joined by `_`
///
/// # Examples
///
/// ```
/// use reelgraph_domain::canonical_name;
///
/// assert_eq!(canonical_name("  Gradient   Descent "), "gradient_descent");
/// assert_eq!(canonical_name("neural_network"), "neural_network");
/// ```
pub fn canonical_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// An entity extracted from the source text
///
/// Identity is `name`. When the same name is extracted more than once, the
/// later record's `entity_type` and `description` replace the earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical key (lowercase, underscored)
    pub name: String,

    /// Entity type label, ideally drawn from the discovered vocabulary
    #[serde(rename = "type")]
    pub entity_type: Option<String>,

    /// Free-text description of the entity
    pub description: Option<String>,
}

impl Entity {
    /// Create a new entity, canonicalising its name
    pub fn new(
        name: &str,
        entity_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: canonical_name(name),
            entity_type: Some(entity_type.into()),
            description: Some(description.into()),
        }
    }
}
