//! Domain and entity type discovery
//!
//! Discovery runs before extraction: one call labels the domain, one call
//! proposes an initial type vocabulary, then a fixed number of sequential
//! rounds ask for types the vocabulary is still missing. Each round sees the
//! vocabulary produced by the previous one, so rounds never overlap.

use crate::call::invoke;
use crate::error::ExtractorError;
use crate::parser::decode_labels;
use crate::prompt::{
    continuation_variables, domain_variables, entity_type_variables, DOMAIN_PROMPT,
    ENTITY_TYPES_CONTINUATION_PROMPT, ENTITY_TYPES_PROMPT,
};
use reelgraph_domain::{EntityTypeSet, Segment};
use reelgraph_llm::GenerationClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// JSON key holding the label array in vocabulary responses
pub const ENTITY_TYPES_KEY: &str = "entity_types";

/// Discovers the domain and entity type vocabulary of a transcript
pub struct Discoverer<G: ?Sized> {
    client: Arc<G>,
    timeout: Duration,
}

impl<G> Discoverer<G>
where
    G: GenerationClient + ?Sized,
{
    /// Create a discoverer whose calls are bounded by `timeout`
    pub fn new(client: Arc<G>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Label the subject area of the segments
    ///
    /// Any generated text is accepted; surrounding whitespace is trimmed.
    pub async fn discover_domain(&self, segments: &[Segment]) -> Result<String, ExtractorError> {
        let raw = invoke(
            self.client.as_ref(),
            DOMAIN_PROMPT,
            &domain_variables(segments),
            self.timeout,
        )
        .await?;

        let domain = raw.trim().to_string();
        info!("Discovered domain: {}", domain);
        Ok(domain)
    }

    /// Ask for the initial entity type vocabulary
    ///
    /// Fails with [`ExtractorError::Parse`] unless the output is a JSON object
    /// holding an `entity_types` string array.
    pub async fn discover_entity_types(
        &self,
        segments: &[Segment],
        domain: &str,
    ) -> Result<EntityTypeSet, ExtractorError> {
        let raw = invoke(
            self.client.as_ref(),
            ENTITY_TYPES_PROMPT,
            &entity_type_variables(segments, domain)?,
            self.timeout,
        )
        .await?;

        let types = EntityTypeSet::from_labels(decode_labels(&raw, ENTITY_TYPES_KEY)?);
        info!("Discovered {} initial entity types", types.len());
        Ok(types)
    }

    /// One novelty-seeking round: ask for types missing from `types`
    ///
    /// Returns the round's labels as generated; nothing is filtered against
    /// the existing vocabulary.
    pub async fn expand_entity_types(
        &self,
        segments: &[Segment],
        domain: &str,
        types: &EntityTypeSet,
    ) -> Result<Vec<String>, ExtractorError> {
        let raw = invoke(
            self.client.as_ref(),
            ENTITY_TYPES_CONTINUATION_PROMPT,
            &continuation_variables(segments, domain, types)?,
            self.timeout,
        )
        .await?;

        Ok(decode_labels(&raw, ENTITY_TYPES_KEY)?)
    }

    /// Run `rounds` expansion rounds in sequence, appending each round's
    /// labels to the vocabulary
    pub async fn expand_vocabulary(
        &self,
        segments: &[Segment],
        domain: &str,
        mut types: EntityTypeSet,
        rounds: usize,
    ) -> Result<EntityTypeSet, ExtractorError> {
        for round in 1..=rounds {
            let proposed = self.expand_entity_types(segments, domain, &types).await?;
            let appended = types.extend_round(proposed);
            debug!(round, appended, total = types.len(), "Expanded entity types");
        }

        info!(
            "Entity type vocabulary has {} labels ({} repeated) after {} rounds",
            types.len(),
            types.duplicate_count(),
            rounds
        );
        Ok(types)
    }
}
