//! Result types for transcript processing

use reelgraph_domain::{EntityTypeSet, KnowledgeGraph, Segment};
use serde::Serialize;

/// Raw generated text for one segment, tagged with the segment it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutput {
    /// Index of the source segment
    pub segment_index: usize,

    /// Unparsed generated output
    pub raw: String,
}

/// Everything produced by one run of the processing pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTranscript {
    /// Segments that were sent for discovery and extraction
    pub segments: Vec<Segment>,

    /// Number of segments the transcript produced before the cap
    pub total_segments: usize,

    /// Discovered domain label
    pub domain: String,

    /// Entity type vocabulary after all expansion rounds
    pub entity_types: EntityTypeSet,

    /// How many segment outputs needed structural recovery
    pub recovered: usize,

    /// The assembled graph
    pub graph: KnowledgeGraph,
}

impl ProcessedTranscript {
    /// Whether segments were dropped by the segment cap
    pub fn was_truncated(&self) -> bool {
        self.total_segments > self.segments.len()
    }
}
