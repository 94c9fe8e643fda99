//! Query-time views of the graph

use reelgraph_domain::KnowledgeGraph;
use serde::Serialize;
use serde_json::{json, Map, Value};

const NO_DESCRIPTION: &str = "no description";

/// A relevant entity with its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntity {
    /// Entity name
    pub name: String,
    /// Node description, if any
    pub description: Option<String>,
}

/// One edge leaving a relevant entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRelationship {
    /// The relevant entity
    pub entity: String,
    /// Its neighbor across the edge
    pub neighbor: String,
    /// Edge description
    pub description: Option<String>,
    /// Edge strength
    pub strength: Option<u8>,
}

/// The slice of the graph handed to the answer prompt
///
/// Holds the selected entities that exist in the graph and every edge of
/// their immediate neighborhoods. Derived per query and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryContext {
    /// Selected entities present in the graph, in selection order
    pub entities: Vec<ContextEntity>,
    /// Neighborhood edges, grouped by selected entity
    pub relationships: Vec<ContextRelationship>,
}

impl QueryContext {
    /// Gather the neighborhoods of `selected`
    ///
    /// Names absent from the graph are skipped.
    pub fn gather(graph: &KnowledgeGraph, selected: &[String]) -> Self {
        let mut context = QueryContext::default();

        for name in selected {
            let Some(node) = graph.node(name) else {
                continue;
            };
            context.entities.push(ContextEntity {
                name: name.clone(),
                description: node.description.clone(),
            });

            for edge in graph.incident_edges(name) {
                let Some(neighbor) = edge.other(name) else {
                    continue;
                };
                context.relationships.push(ContextRelationship {
                    entity: name.clone(),
                    neighbor: neighbor.to_string(),
                    description: edge.description.clone(),
                    strength: edge.strength,
                });
            }
        }

        context
    }

    /// Whether no selected entity was found in the graph
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// `[{"name": ..., "description": ...}]` for the answer prompt
    pub fn entity_list(&self) -> Value {
        self.entities
            .iter()
            .map(|e| json!({"name": e.name, "description": e.description}))
            .collect()
    }

    /// `[{"entity": ..., "neighbor": ..., "relationship": ..., "strength": ...}]`
    pub fn relationship_list(&self) -> Value {
        self.relationships
            .iter()
            .map(|r| {
                json!({
                    "entity": r.entity,
                    "neighbor": r.neighbor,
                    "relationship": r.description,
                    "strength": r.strength,
                })
            })
            .collect()
    }
}

/// Every node with its attributes, for entity selection
pub fn node_list(graph: &KnowledgeGraph) -> Value {
    graph
        .nodes()
        .map(|(name, node)| {
            json!({
                "name": name,
                "type": node.entity_type,
                "description": node.description,
            })
        })
        .collect()
}

/// Map of node name to neighbor count, for entity selection
pub fn degree_map(graph: &KnowledgeGraph) -> Value {
    let degrees: Map<String, Value> = graph
        .degrees()
        .into_iter()
        .map(|(name, degree)| (name.to_string(), Value::from(degree)))
        .collect();
    Value::Object(degrees)
}

/// One text item per edge: both endpoints with descriptions, then the
/// relationship
pub fn summary_items(graph: &KnowledgeGraph) -> Vec<String> {
    let describe = |name: &str| {
        graph
            .node(name)
            .and_then(|node| node.description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
            .to_string()
    };

    graph
        .edges()
        .map(|edge| {
            format!(
                "Source: {} ({})\nTarget: {} ({})\nRelationship: {}",
                edge.source,
                describe(&edge.source),
                edge.target,
                describe(&edge.target),
                edge.description.as_deref().unwrap_or(NO_DESCRIPTION)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgraph_domain::{Entity, Extraction, Relationship};

    fn graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.absorb(&Extraction::new(
            vec![
                Entity::new("neural_network", "concept", "layered model"),
                Entity::new("gradient_descent", "technique", "optimizer"),
                Entity::new("loss_function", "concept", "objective"),
            ],
            vec![
                Relationship::new("neural_network", "gradient_descent", "trained by", 8),
                Relationship::new("gradient_descent", "loss_function", "minimizes", 9),
                Relationship::new("dropout", "neural_network", "regularizes", 5),
            ],
        ));
        graph
    }

    #[test]
    fn test_gather_uses_opposite_endpoint_for_either_orientation() {
        let mut graph = KnowledgeGraph::new();
        graph.absorb(&Extraction::new(
            vec![],
            vec![
                Relationship::new("recursion", "recursion", "calls itself", 4),
                Relationship::new("stack", "recursion", "grows with", 6),
            ],
        ));

        let context = QueryContext::gather(&graph, &["recursion".to_string()]);
        let neighbors: Vec<_> = context.relationships.iter().map(|r| r.neighbor.as_str()).collect();
        assert_eq!(neighbors, vec!["recursion", "stack"]);
    }

    #[test]
    fn test_gather_skips_unknown_names() {
        let graph = graph();
        let selected = vec!["transformer".to_string(), "gradient_descent".to_string()];
        let context = QueryContext::gather(&graph, &selected);

        assert_eq!(context.entities.len(), 1);
        assert_eq!(context.entities[0].name, "gradient_descent");

        let neighbors: Vec<_> = context.relationships.iter().map(|r| r.neighbor.as_str()).collect();
        assert_eq!(neighbors, vec!["neural_network", "loss_function"]);
        assert!(context.relationships.iter().all(|r| r.entity == "gradient_descent"));
    }

    #[test]
    fn test_gather_includes_implicit_node_without_description() {
        let graph = graph();
        let context = QueryContext::gather(&graph, &["dropout".to_string()]);

        assert_eq!(context.entities[0].description, None);
        assert_eq!(context.relationships[0].description.as_deref(), Some("regularizes"));
    }

    #[test]
    fn test_gather_nothing_found() {
        let context = QueryContext::gather(&graph(), &["missing".to_string()]);
        assert!(context.is_empty());
        assert!(context.relationships.is_empty());
        assert_eq!(context.entity_list(), json!([]));
    }

    #[test]
    fn test_degree_map() {
        let degrees = degree_map(&graph());
        assert_eq!(degrees["neural_network"], json!(2));
        assert_eq!(degrees["loss_function"], json!(1));
        assert_eq!(degrees["dropout"], json!(1));
    }

    #[test]
    fn test_node_list_carries_attributes() {
        let nodes = node_list(&graph());
        assert_eq!(nodes.as_array().unwrap().len(), 4);
        assert_eq!(
            nodes[0],
            json!({"name": "neural_network", "type": "concept", "description": "layered model"})
        );
    }

    #[test]
    fn test_summary_items_one_per_edge() {
        let items = summary_items(&graph());
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[1],
            "Source: gradient_descent (optimizer)\nTarget: loss_function (objective)\nRelationship: minimizes"
        );
        assert!(items[2].contains("Source: dropout (no description)"));
    }

    #[test]
    fn test_summary_items_of_empty_graph() {
        assert!(summary_items(&KnowledgeGraph::new()).is_empty());
    }
}
