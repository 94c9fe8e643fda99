//! Per-segment extraction and graph assembly

use crate::call::invoke;
use crate::error::ExtractorError;
use crate::parser::{parse, ParseOutcome};
use crate::prompt::{extraction_variables, EXTRACTION_PROMPT};
use crate::types::SegmentOutput;
use futures::stream::{FuturesUnordered, StreamExt};
use reelgraph_domain::{Extraction, KnowledgeGraph, MergeStats, Segment};
use reelgraph_llm::GenerationClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builds a knowledge graph from segments and an entity type vocabulary
pub struct GraphBuilder<G: ?Sized> {
    client: Arc<G>,
    timeout: Duration,
}

impl<G> GraphBuilder<G>
where
    G: GenerationClient + ?Sized,
{
    /// Create a builder whose calls are bounded by `timeout`
    pub fn new(client: Arc<G>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Issue one extraction call per segment, all at once
    ///
    /// Outputs are returned in completion order. The first failed call
    /// aborts the whole batch and the remaining calls are dropped.
    pub async fn extract_entities_and_relationships(
        &self,
        segments: &[Segment],
        entity_types: &[&str],
    ) -> Result<Vec<SegmentOutput>, ExtractorError> {
        let mut pending: FuturesUnordered<_> = segments
            .iter()
            .map(|segment| async move {
                let variables = extraction_variables(segment, entity_types);
                let raw = invoke(
                    self.client.as_ref(),
                    EXTRACTION_PROMPT,
                    &variables,
                    self.timeout,
                )
                .await?;
                Ok::<_, ExtractorError>(SegmentOutput {
                    segment_index: segment.index,
                    raw,
                })
            })
            .collect();

        let mut outputs = Vec::with_capacity(segments.len());
        while let Some(output) = pending.next().await {
            let output = output?;
            debug!(
                segment = output.segment_index,
                chars = output.raw.len(),
                "Segment extraction finished"
            );
            outputs.push(output);
        }

        info!("Extracted {} segments", outputs.len());
        Ok(outputs)
    }

    /// Parse every output, returning the extractions in the same order and
    /// how many of them needed structural recovery
    pub fn parse_all(&self, outputs: &[SegmentOutput]) -> (Vec<Extraction>, usize) {
        let mut recovered = 0;
        let extractions = outputs
            .iter()
            .map(|output| {
                let outcome = parse(&output.raw);
                if let ParseOutcome::Recovered { cause, .. } = &outcome {
                    debug!(segment = output.segment_index, %cause, "Segment output recovered");
                    recovered += 1;
                }
                outcome.into_extraction()
            })
            .collect();
        (extractions, recovered)
    }
}

/// Merge extractions in order into a fresh graph
pub fn build_graph(extractions: &[Extraction]) -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();
    let mut totals = MergeStats::default();

    for extraction in extractions {
        let stats = graph.absorb(extraction);
        totals.entities += stats.entities;
        totals.relationships += stats.relationships;
        totals.dropped += stats.dropped;
        totals.self_loops += stats.self_loops;
    }

    if totals.self_loops > 0 {
        debug!("{} relationship record(s) were self-loops", totals.self_loops);
    }

    info!(
        "Built graph with {} nodes and {} edges ({} entity records, {} relationship records, {} dropped without target)",
        graph.node_count(),
        graph.edge_count(),
        totals.entities,
        totals.relationships,
        totals.dropped
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgraph_domain::{Entity, Relationship};
    use reelgraph_llm::{Generator, MockProvider};

    fn builder(provider: &MockProvider) -> GraphBuilder<Generator<MockProvider>> {
        GraphBuilder::new(
            Arc::new(Generator::new(provider.clone())),
            Duration::from_secs(30),
        )
    }

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(0, "alpha segment"),
            Segment::new(1, "beta segment"),
            Segment::new(2, "gamma segment"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_outputs_arrive_in_completion_order() {
        let provider = MockProvider::default();
        provider.when_contains_delayed("alpha segment", "a", Duration::from_secs(3));
        provider.when_contains_delayed("beta segment", "b", Duration::from_secs(1));
        provider.when_contains_delayed("gamma segment", "c", Duration::from_secs(2));

        let outputs = builder(&provider)
            .extract_entities_and_relationships(&segments(), &["concept"])
            .await
            .unwrap();

        let order: Vec<_> = outputs.iter().map(|o| o.segment_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(outputs[0].raw, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_run_concurrently() {
        let provider = MockProvider::default();
        provider.when_contains_delayed("segment", "{}", Duration::from_secs(10));

        let start = tokio::time::Instant::now();
        builder(&provider)
            .extract_entities_and_relationships(&segments(), &["concept"])
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(20));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_call_aborts_batch() {
        let provider = MockProvider::new("{}");
        provider.when_contains_fail("beta segment");

        let result = builder(&provider)
            .extract_entities_and_relationships(&segments(), &["concept"])
            .await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_prompt_carries_vocabulary() {
        let provider = MockProvider::new("{}");
        builder(&provider)
            .extract_entities_and_relationships(&segments()[..1], &["concept", "technique"])
            .await
            .unwrap();

        assert!(provider.prompts()[0].contains("[concept, technique]"));
    }

    #[test]
    fn test_parse_all_counts_recoveries() {
        let provider = MockProvider::default();
        let outputs = vec![
            SegmentOutput {
                segment_index: 0,
                raw: r#"{"entities": [{"name": "x"}]}"#.to_string(),
            },
            SegmentOutput {
                segment_index: 1,
                raw: "no structure at all".to_string(),
            },
        ];

        let (extractions, recovered) = builder(&provider).parse_all(&outputs);
        assert_eq!(extractions.len(), 2);
        assert_eq!(recovered, 1);
        assert!(extractions[1].is_empty());
    }

    #[test]
    fn test_build_graph_last_write_wins_and_drops_null_targets() {
        let first = Extraction::new(
            vec![Entity::new("neural_network", "concept", "first")],
            vec![Relationship::new("neural_network", "layer", "has", 5)],
        );
        let second = Extraction::new(
            vec![Entity::new("neural_network", "model", "second")],
            vec![Relationship {
                source: "layer".to_string(),
                target: None,
                description: Some("dangling".to_string()),
                strength: Some(3),
            }],
        );

        let graph = build_graph(&[first, second]);
        let node = graph.node("neural_network").unwrap();
        assert_eq!(node.entity_type.as_deref(), Some("model"));
        assert_eq!(node.description.as_deref(), Some("second"));
        assert_eq!(graph.edge_count(), 1);
        // Implicit endpoint from the relationship
        assert!(graph.contains("layer"));
    }

    #[test]
    fn test_build_graph_of_nothing_is_empty() {
        assert!(build_graph(&[]).is_empty());
    }
}
