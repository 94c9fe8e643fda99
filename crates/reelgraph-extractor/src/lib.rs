//! Reelgraph Extractor
//!
//! Converts a long transcript into a knowledge graph through a text
//! generation service.
//!
//! # Overview
//!
//! The Extractor is the ingestion pathway: it segments the transcript, asks
//! the service what the transcript is about and which kinds of entities it
//! contains, then extracts entities and relationships from every segment
//! concurrently and merges them into one graph.
//!
//! # Architecture
//!
//! ```text
//! Text → Chunker → Segments
//!      → Discoverer (domain, entity types, expansion rounds)
//!      → GraphBuilder (concurrent per-segment extraction)
//!      → parser (strict JSON, then structural recovery)
//!      → KnowledgeGraph
//! ```
//!
//! # Key Features
//!
//! - **Coverage-seeking vocabulary**: sequential rounds ask only for missing entity types
//! - **Concurrent extraction**: one call per segment, consumed in completion order
//! - **Resilient parsing**: malformed segment output degrades the graph instead of aborting
//! - **Deterministic merge**: last-write-wins keyed by entity name and endpoint pair
//!
//! # Example Usage
//!
//! ```
//! use reelgraph_extractor::{Extractor, ExtractorConfig};
//! use reelgraph_llm::{Generator, MockProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("{}");
//! provider.when_contains("subject area", "machine learning education");
//! provider.when_contains("entity type vocabularies", r#"{"entity_types": ["concept"]}"#);
//! provider.when_contains(
//!     "knowledge graphs from video transcript excerpts",
//!     r#"{"entities": [{"name": "gradient_descent", "type": "concept", "description": "optimizer"}]}"#,
//! );
//!
//! let extractor = Extractor::new(Generator::new(provider), ExtractorConfig::default());
//! let processed = extractor
//!     .process("Today we learn how gradient descent works.")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(processed.domain, "machine learning education");
//! assert!(processed.graph.contains("gradient_descent"));
//! # });
//! ```

#![warn(missing_docs)]

mod builder;
mod call;
mod chunking;
mod config;
mod discovery;
mod error;
mod extractor;
pub mod parser;
pub mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{build_graph, GraphBuilder};
pub use chunking::TextChunker;
pub use config::{ChunkStrategy, ExtractorConfig, DEFAULT_EXPANSION_ROUNDS, DEFAULT_SEGMENT_CAP};
pub use discovery::{Discoverer, ENTITY_TYPES_KEY};
pub use error::{ExtractorError, ParseError};
pub use extractor::Extractor;
pub use parser::{parse, ParseOutcome};
pub use types::{ProcessedTranscript, SegmentOutput};
