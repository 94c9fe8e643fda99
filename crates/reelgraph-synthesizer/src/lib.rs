//! Reelgraph Synthesizer
//!
//! Turns a built knowledge graph back into prose: a whole-video summary, and
//! answers to free-form questions grounded in the graph.
//!
//! # Query flow
//!
//! ```text
//! query → select_relevant_entities (nodes + degree map, strict JSON)
//!       → QueryContext::gather (immediate neighborhoods only)
//!       → answer prompt → plain text
//! ```
//!
//! Entity selection has no structural fallback: output that is not the
//! required JSON object fails with a parse error. Selected names that are
//! not in the graph are skipped.
//!
//! # Example
//!
//! ```
//! use reelgraph_domain::{Entity, Extraction, KnowledgeGraph};
//! use reelgraph_llm::{Generator, MockProvider};
//! use reelgraph_synthesizer::Synthesizer;
//!
//! # tokio_test::block_on(async {
//! let mut graph = KnowledgeGraph::new();
//! graph.absorb(&Extraction::new(
//!     vec![Entity::new("gradient_descent", "technique", "iterative optimizer")],
//!     vec![],
//! ));
//!
//! let provider = MockProvider::new("Gradient descent is an iterative optimizer.");
//! provider.when_contains("relevant_entities", r#"{"relevant_entities": ["gradient_descent"]}"#);
//!
//! let synthesizer = Synthesizer::new(Generator::new(provider));
//! let answer = synthesizer
//!     .answer(&graph, "What is gradient descent?")
//!     .await
//!     .unwrap();
//! assert_eq!(answer, "Gradient descent is an iterative optimizer.");
//! # });
//! ```

#![warn(missing_docs)]

mod context;
mod error;
mod prompt;
mod synthesizer;

pub use context::{summary_items, ContextEntity, ContextRelationship, QueryContext};
pub use error::SynthesizerError;
pub use synthesizer::{Answer, Synthesizer, DEFAULT_TIMEOUT, RELEVANT_ENTITIES_KEY};
