//! Reelgraph Domain Layer
//!
//! This crate holds the data model for transcript knowledge graphs and the
//! trait interfaces that the infrastructure crates implement. It performs no
//! I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Segment**: A bounded-size block of source text, produced once by a chunker
//! - **Entity**: A named node, keyed by its canonical (lowercase, underscored) name
//! - **Relationship**: An undirected, weighted link between two entity names
//! - **Entity type vocabulary**: The category labels that constrain extraction
//! - **Knowledge graph**: The merged node/edge set, built once per corpus
//!
//! ## Merge semantics
//!
//! Graph assembly is last-write-wins keyed by identity: entity name for nodes,
//! the unordered endpoint pair for edges. Merging the same extraction twice is
//! a no-op, and the order in which extractions arrive only decides which
//! duplicate's attributes survive, never which nodes or edges exist.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod extraction;
pub mod graph;
pub mod relationship;
pub mod segment;
pub mod traits;
pub mod vocabulary;

// Re-exports for convenience
pub use entity::{canonical_name, Entity};
pub use extraction::Extraction;
pub use graph::{Edge, EdgeKey, KnowledgeGraph, MergeStats, Node};
pub use relationship::{clamp_strength, Relationship, MAX_STRENGTH, MIN_STRENGTH};
pub use segment::Segment;
pub use vocabulary::{normalize_label, EntityTypeSet};
