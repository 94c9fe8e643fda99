//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{ExtractorConfig, ExtractorError, Extractor, ParseError, ChunkStrategy};
    use reelgraph_llm::{Generator, MockProvider};
    use std::sync::Arc;
    use std::time::Duration;

    const DOMAIN_NEEDLE: &str = "You label the subject area";
    const TYPES_NEEDLE: &str = "You design entity type vocabularies";
    const EXPAND_NEEDLE: &str = "You extend entity type vocabularies";

    const TRANSCRIPT: &str = "Welcome to machine learning basics. Today we study neural networks.\n\n\
        Neural networks learn with gradient descent. The loss function guides the updates.\n\n\
        Backpropagation computes the gradients. Neural networks are really function approximators.";

    const SEGMENT_ONE: &str = r#"{
        "entities": [
            {"name": "machine_learning", "type": "concept", "description": "field of study"},
            {"name": "neural_network", "type": "concept", "description": "layered model"}
        ],
        "relationships": [
            {"source": "machine_learning", "target": "neural_network", "description": "studies", "strength": 6}
        ]
    }"#;

    const SEGMENT_TWO: &str = r#"{
        "entities": [
            {"name": "gradient_descent", "type": "technique", "description": "iterative optimizer"},
            {"name": "loss_function", "type": "concept", "description": "training objective"}
        ],
        "relationships": [
            {"source": "gradient_descent", "target": "loss_function", "description": "minimizes", "strength": 9},
            {"source": "neural_network", "target": "gradient_descent", "description": "trained by", "strength": 8},
            {"source": "loss_function", "target": null, "description": "guides updates", "strength": 4}
        ]
    }"#;

    // Key/value lines instead of JSON, with a dangling null target
    const SEGMENT_THREE: &str = r#"Sure, here are the results:
"entities": [
    {
        name: backpropagation
        type: technique
        description: computes gradients
    },
    {
        name: neural_network
        type: function_approximator
        description: approximates functions
    }
]
"relationships": [
    {
        source: backpropagation
        target: gradient_descent
        description: supplies gradients to
        strength: 7
    },
    {
        source: backpropagation
        target: null
        description: unfinished
    }
]"#;

    fn scripted_provider() -> MockProvider {
        let provider = MockProvider::new("{}");
        provider.when_contains(DOMAIN_NEEDLE, "machine learning education");
        provider.when_contains(TYPES_NEEDLE, r#"{"entity_types": ["concept","technique"]}"#);
        provider.when_contains(EXPAND_NEEDLE, r#"{"entity_types": ["model"]}"#);
        provider
    }

    fn paragraph_config() -> ExtractorConfig {
        ExtractorConfig {
            max_segment_size: 100,
            chunk_strategy: ChunkStrategy::ByParagraph,
            ..ExtractorConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_processing_flow() {
        let provider = scripted_provider();
        // The malformed segment finishes last so its attributes win
        provider.when_contains_delayed("Welcome to machine learning", SEGMENT_ONE, Duration::from_secs(1));
        provider.when_contains_delayed("gradient descent. The loss", SEGMENT_TWO, Duration::from_secs(2));
        provider.when_contains_delayed("Backpropagation computes", SEGMENT_THREE, Duration::from_secs(3));

        let extractor = Extractor::new(Generator::new(provider.clone()), paragraph_config());
        let processed = extractor.process(TRANSCRIPT).await.unwrap();

        assert_eq!(processed.segments.len(), 3);
        assert!(!processed.was_truncated());
        assert_eq!(processed.domain, "machine learning education");
        assert_eq!(processed.recovered, 1);

        let graph = &processed.graph;
        let mut names: Vec<_> = graph.nodes().map(|(name, _)| name).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "backpropagation",
                "gradient_descent",
                "loss_function",
                "machine_learning",
                "neural_network"
            ]
        );

        // Last write wins for the entity seen in two segments
        let network = graph.node("neural_network").unwrap();
        assert_eq!(network.entity_type.as_deref(), Some("function_approximator"));
        assert_eq!(network.description.as_deref(), Some("approximates functions"));

        // Null targets never become edges
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.edges().all(|e| !e.target.is_empty()));
        assert_eq!(
            graph.edge("gradient_descent", "backpropagation").unwrap().strength,
            Some(7)
        );

        // 1 domain + 1 initial types + 7 rounds + 3 segments
        assert_eq!(provider.call_count(), 12);
    }

    #[tokio::test]
    async fn test_vocabulary_grows_through_every_round() {
        let provider = scripted_provider();
        let extractor = Extractor::new(Generator::new(provider.clone()), paragraph_config());

        let processed = extractor.process(TRANSCRIPT).await.unwrap();

        assert_eq!(provider.prompts_containing(EXPAND_NEEDLE).len(), 7);
        assert_eq!(processed.entity_types.len(), 2 + 7);
        assert_eq!(processed.entity_types.distinct(), vec!["concept", "technique", "model"]);

        // Extraction sees the raw vocabulary by default
        let extraction_prompt = &provider.prompts_containing("Identify ALL entities")[0];
        assert!(extraction_prompt.contains("[concept, technique, model, model, model"));
    }

    #[tokio::test]
    async fn test_deduplicated_vocabulary_option() {
        let provider = scripted_provider();
        let config = ExtractorConfig {
            dedupe_entity_types: true,
            ..paragraph_config()
        };
        let extractor = Extractor::new(Generator::new(provider.clone()), config);

        extractor.process(TRANSCRIPT).await.unwrap();

        let extraction_prompt = &provider.prompts_containing("Identify ALL entities")[0];
        assert!(extraction_prompt.contains("[concept, technique, model]"));
    }

    #[tokio::test]
    async fn test_malformed_vocabulary_aborts_processing() {
        let provider = MockProvider::new("{}");
        provider.when_contains(DOMAIN_NEEDLE, "machine learning education");
        provider.when_contains(TYPES_NEEDLE, "concept, technique");

        let extractor = Extractor::new(Generator::new(provider.clone()), paragraph_config());
        let result = extractor.process(TRANSCRIPT).await;

        assert!(matches!(
            result,
            Err(ExtractorError::Parse(ParseError::InvalidJson(_)))
        ));
        // Nothing after the failed step runs
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_segment_call_aborts_processing() {
        let provider = scripted_provider();
        provider.when_contains_fail("Backpropagation computes");

        let extractor = Extractor::new(Generator::new(provider), paragraph_config());
        assert!(matches!(
            extractor.process(TRANSCRIPT).await,
            Err(ExtractorError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_unrecoverable_segment_output_degrades_graph() {
        let provider = scripted_provider();
        provider.when_contains("Welcome to machine learning", SEGMENT_ONE);
        provider.when_contains("gradient descent. The loss", "I am unable to help with that.");
        provider.when_contains("Backpropagation computes", "");

        let extractor = Extractor::new(Generator::new(provider), paragraph_config());
        let processed = extractor.process(TRANSCRIPT).await.unwrap();

        assert_eq!(processed.recovered, 2);
        assert_eq!(processed.graph.node_count(), 2);
        assert_eq!(processed.graph.edge_count(), 1);
    }

    #[tokio::test]
    async fn test_segment_cap_limits_extraction_calls() {
        let provider = scripted_provider();
        let config = ExtractorConfig {
            segment_cap: 2,
            expansion_rounds: 0,
            ..paragraph_config()
        };
        let extractor = Extractor::new(Generator::new(provider.clone()), config);

        let processed = extractor.process(TRANSCRIPT).await.unwrap();

        assert!(processed.was_truncated());
        assert_eq!(processed.total_segments, 3);
        assert_eq!(provider.prompts_containing("Identify ALL entities").len(), 2);
        assert!(!provider.prompts_containing(DOMAIN_NEEDLE)[0].contains("Backpropagation"));
    }

    #[tokio::test]
    async fn test_missing_variable_is_a_template_error() {
        let provider = MockProvider::default();
        let client = Generator::new(provider);
        let result = crate::call::invoke(
            &client,
            crate::prompt::DOMAIN_PROMPT,
            &reelgraph_llm::Variables::new(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(ExtractorError::Template(_))));
    }

    #[tokio::test]
    async fn test_shared_client_across_extractors() {
        let provider = scripted_provider();
        let client = Arc::new(Generator::new(provider.clone()));
        let config = ExtractorConfig {
            expansion_rounds: 1,
            ..paragraph_config()
        };

        let first = Extractor::from_shared(Arc::clone(&client), config.clone());
        let second = Extractor::from_shared(client, config);
        first.process(TRANSCRIPT).await.unwrap();
        second.process(TRANSCRIPT).await.unwrap();

        assert_eq!(provider.prompts_containing(DOMAIN_NEEDLE).len(), 2);
    }
}
