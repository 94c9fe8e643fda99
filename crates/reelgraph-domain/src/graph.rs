//! Knowledge graph module - merged entity/relationship structure
//!
//! The graph is undirected and holds at most one edge per unordered endpoint
//! pair. Edges may name endpoints that were never extracted as entities;
//! such endpoints become attribute-less nodes rather than being rejected.

use crate::entity::Entity;
use crate::extraction::Extraction;
use crate::relationship::Relationship;
use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

/// Attributes stored on a graph node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Entity type label
    #[serde(rename = "type")]
    pub entity_type: Option<String>,

    /// Entity description
    pub description: Option<String>,
}

/// Identity of an undirected edge: its endpoints in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(String, String);

impl EdgeKey {
    /// Build the key for the pair `(a, b)`; `(b, a)` yields the same key
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// An edge and its attributes
///
/// `source` and `target` record the orientation of the most recent write;
/// identity is the unordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source entity name as last extracted
    pub source: String,

    /// Target entity name as last extracted
    pub target: String,

    /// Relationship description
    pub description: Option<String>,

    /// Relationship strength (1..=10)
    pub strength: Option<u8>,
}

impl Edge {
    /// The endpoint opposite `name`, if `name` is one of this edge's endpoints
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.source == name {
            Some(&self.target)
        } else if self.target == name {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Counts from merging one extraction into a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Entity records written
    pub entities: usize,

    /// Relationship records written as edges
    pub relationships: usize,

    /// Relationship records dropped for lacking a target
    pub dropped: usize,

    /// Written relationship records whose source and target are the same entity
    pub self_loops: usize,
}

/// Undirected knowledge graph with last-write-wins merge semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeGraph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<EdgeKey, Edge>,
    adjacency: IndexMap<String, IndexSet<String>>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity node, replacing the attributes of any node with the same name
    pub fn upsert_entity(&mut self, entity: &Entity) {
        self.nodes.insert(
            entity.name.clone(),
            Node {
                entity_type: entity.entity_type.clone(),
                description: entity.description.clone(),
            },
        );
        self.adjacency.entry(entity.name.clone()).or_default();
    }

    /// Add an edge between `source` and `target`, replacing the attributes of
    /// any edge on the same unordered pair
    ///
    /// Endpoints not yet in the graph are added without attributes.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        description: Option<String>,
        strength: Option<u8>,
    ) {
        for endpoint in [source, target] {
            self.nodes.entry(endpoint.to_string()).or_default();
        }
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
        self.adjacency
            .entry(target.to_string())
            .or_default()
            .insert(source.to_string());

        self.edges.insert(
            EdgeKey::new(source, target),
            Edge {
                source: source.to_string(),
                target: target.to_string(),
                description,
                strength,
            },
        );
    }

    /// Add a relationship record as an edge
    ///
    /// Returns `false` without touching the graph when the record has no target.
    pub fn upsert_relationship(&mut self, relationship: &Relationship) -> bool {
        match relationship.target.as_deref() {
            Some(target) => {
                self.connect(
                    &relationship.source,
                    target,
                    relationship.description.clone(),
                    relationship.strength,
                );
                true
            }
            None => false,
        }
    }

    /// Merge one extraction: every entity first, then every relationship
    pub fn absorb(&mut self, extraction: &Extraction) -> MergeStats {
        let mut stats = MergeStats::default();

        for entity in &extraction.entities {
            self.upsert_entity(entity);
            stats.entities += 1;
        }

        for relationship in &extraction.relationships {
            if self.upsert_relationship(relationship) {
                stats.relationships += 1;
                if relationship.is_self_loop() {
                    stats.self_loops += 1;
                }
            } else {
                stats.dropped += 1;
            }
        }

        stats
    }

    /// Look up a node's attributes
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Whether a node with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// The edge on the unordered pair `(a, b)`, if any
    pub fn edge(&self, a: &str, b: &str) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Immediate neighbors of a node; empty for unknown names
    pub fn neighbors<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.adjacency
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Edges touching a node, in neighbor order
    pub fn incident_edges<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.neighbors(name)
            .filter_map(move |neighbor| self.edge(name, neighbor))
    }

    /// Number of distinct neighbors of a node
    pub fn degree(&self, name: &str) -> usize {
        self.adjacency.get(name).map_or(0, IndexSet::len)
    }

    /// Degree of every node, in node order
    pub fn degrees(&self) -> IndexMap<&str, usize> {
        self.nodes
            .keys()
            .map(|name| (name.as_str(), self.degree(name)))
            .collect()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Serialize for KnowledgeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct NodeEntry<'a> {
            name: &'a str,
            #[serde(flatten)]
            node: &'a Node,
        }

        #[derive(Serialize)]
        struct GraphDocument<'a> {
            nodes: Vec<NodeEntry<'a>>,
            edges: Vec<&'a Edge>,
        }

        GraphDocument {
            nodes: self
                .nodes()
                .map(|(name, node)| NodeEntry { name, node })
                .collect(),
            edges: self.edges().collect(),
        }
        .serialize(serializer)
    }
}
