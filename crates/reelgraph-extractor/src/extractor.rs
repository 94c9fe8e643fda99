//! Core Extractor implementation

use crate::builder::{build_graph, GraphBuilder};
use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::discovery::Discoverer;
use crate::error::ExtractorError;
use crate::types::ProcessedTranscript;
use reelgraph_domain::traits::Chunker;
use reelgraph_domain::Segment;
use reelgraph_llm::GenerationClient;
use std::sync::Arc;
use tracing::{info, warn};

/// The Extractor turns a transcript into a knowledge graph
pub struct Extractor<G: ?Sized> {
    client: Arc<G>,
    config: ExtractorConfig,
    chunker: TextChunker,
}

impl<G> Extractor<G>
where
    G: GenerationClient,
{
    /// Create a new Extractor
    pub fn new(client: G, config: ExtractorConfig) -> Self {
        Self::from_shared(Arc::new(client), config)
    }
}

impl<G> Extractor<G>
where
    G: GenerationClient + ?Sized,
{
    /// Create an Extractor over a client shared with other components
    pub fn from_shared(client: Arc<G>, config: ExtractorConfig) -> Self {
        let chunker = TextChunker::new(config.chunk_strategy);
        Self {
            client,
            config,
            chunker,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Split a transcript into segments and keep the first `segment_cap`
    ///
    /// Returns the kept segments and the number produced before the cap.
    pub fn segment(&self, text: &str) -> (Vec<Segment>, usize) {
        let mut segments = self.chunker.split(text, self.config.max_segment_size);
        let total = segments.len();
        if total > self.config.segment_cap {
            warn!(
                "Transcript produced {} segments, keeping the first {}",
                total, self.config.segment_cap
            );
            segments.truncate(self.config.segment_cap);
        }
        (segments, total)
    }

    /// Run the whole pipeline: segment, discover, extract, parse, merge
    ///
    /// Any failed generation call, template error, or malformed vocabulary
    /// response aborts processing. Malformed per-segment extraction output
    /// only degrades the graph.
    pub async fn process(&self, text: &str) -> Result<ProcessedTranscript, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        if text.trim().is_empty() {
            return Err(ExtractorError::EmptyInput);
        }

        info!("Processing transcript of {} chars", text.chars().count());

        let (segments, total_segments) = self.segment(text);
        info!("Using {} of {} segments", segments.len(), total_segments);

        let timeout = self.config.generation_timeout();
        let discoverer = Discoverer::new(Arc::clone(&self.client), timeout);

        let domain = discoverer.discover_domain(&segments).await?;
        let initial = discoverer.discover_entity_types(&segments, &domain).await?;
        let entity_types = discoverer
            .expand_vocabulary(&segments, &domain, initial, self.config.expansion_rounds)
            .await?;

        let vocabulary: Vec<&str> = if self.config.dedupe_entity_types {
            entity_types.distinct()
        } else {
            entity_types.labels().iter().map(String::as_str).collect()
        };

        let builder = GraphBuilder::new(Arc::clone(&self.client), timeout);
        let outputs = builder
            .extract_entities_and_relationships(&segments, &vocabulary)
            .await?;
        let (extractions, recovered) = builder.parse_all(&outputs);
        if recovered > 0 {
            warn!(
                "{} of {} segment outputs needed structural recovery",
                recovered,
                outputs.len()
            );
        }

        let graph = build_graph(&extractions);

        Ok(ProcessedTranscript {
            segments,
            total_segments,
            domain,
            entity_types,
            recovered,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkStrategy;
    use reelgraph_llm::{Generator, MockProvider};

    fn create_test_extractor(config: ExtractorConfig) -> Extractor<Generator<MockProvider>> {
        Extractor::new(Generator::new(MockProvider::new("{}")), config)
    }

    #[test]
    fn test_segment_cap() {
        let config = ExtractorConfig {
            max_segment_size: 7,
            segment_cap: 2,
            chunk_strategy: ChunkStrategy::BySentence,
            ..ExtractorConfig::default()
        };
        let extractor = create_test_extractor(config);

        let (segments, total) = extractor.segment("One. Two. Three. Four.");
        assert_eq!(total, 4);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "Two.");
    }

    #[tokio::test]
    async fn test_empty_transcript_is_rejected() {
        let extractor = create_test_extractor(ExtractorConfig::default());
        assert!(matches!(
            extractor.process("   \n").await,
            Err(ExtractorError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig {
            segment_cap: 0,
            ..ExtractorConfig::default()
        };
        let extractor = create_test_extractor(config);
        assert!(matches!(
            extractor.process("text").await,
            Err(ExtractorError::Config(_))
        ));
    }
}
