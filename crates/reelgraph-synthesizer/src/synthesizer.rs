//! Summaries and graph-grounded answers

use crate::context::{degree_map, node_list, summary_items, QueryContext};
use crate::error::SynthesizerError;
use crate::prompt::{QUERY_ENTITIES_PROMPT, QUERY_PROMPT, SUMMARIZE_PROMPT};
use indexmap::IndexSet;
use reelgraph_domain::{canonical_name, KnowledgeGraph};
use reelgraph_extractor::parser::decode_labels;
use reelgraph_llm::template::variables;
use reelgraph_llm::{GenerationClient, Variables};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Default time budget for one generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// JSON key holding the selected names
pub const RELEVANT_ENTITIES_KEY: &str = "relevant_entities";

/// An answer and the graph slice it was grounded on
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated answer text
    pub text: String,
    /// Entity names the service selected, canonicalised
    pub selected: Vec<String>,
    /// Neighborhoods of the selected names found in the graph
    pub context: QueryContext,
}

/// Summarizes graphs and answers questions against them
///
/// The graph is only ever read here.
pub struct Synthesizer<G: ?Sized> {
    client: Arc<G>,
    timeout: Duration,
}

impl<G> Synthesizer<G>
where
    G: GenerationClient,
{
    /// Create a Synthesizer with the default timeout
    pub fn new(client: G) -> Self {
        Self::from_shared(Arc::new(client), DEFAULT_TIMEOUT)
    }
}

impl<G> Synthesizer<G>
where
    G: GenerationClient + ?Sized,
{
    /// Create a Synthesizer over a client shared with other components
    pub fn from_shared(client: Arc<G>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn call(&self, template: &str, vars: &Variables) -> Result<String, SynthesizerError> {
        let response = timeout(self.timeout, self.client.generate(template, vars))
            .await
            .map_err(|_| SynthesizerError::Timeout(self.timeout))??;
        Ok(response)
    }

    /// Summarize the graph from one item per edge
    ///
    /// An empty graph still makes the call, with an empty item list.
    pub async fn summarize(&self, graph: &KnowledgeGraph) -> Result<String, SynthesizerError> {
        let items = summary_items(graph);
        info!("Summarizing graph from {} relationship items", items.len());

        let vars = variables([("entity_relationships", json!(items.join("\n\n")))]);
        let summary = self.call(SUMMARIZE_PROMPT, &vars).await?;
        Ok(summary.trim().to_string())
    }

    /// Ask which entities matter for `query`
    ///
    /// The output must be a JSON object with a `relevant_entities` string
    /// array; there is no structural fallback at this step. Names are
    /// canonicalised and repeated names dropped. Names are not checked
    /// against the graph.
    pub async fn select_relevant_entities(
        &self,
        graph: &KnowledgeGraph,
        query: &str,
    ) -> Result<Vec<String>, SynthesizerError> {
        let vars = variables([
            ("query", json!(query)),
            ("entity_list", node_list(graph)),
            ("relationship_count", degree_map(graph)),
        ]);
        let raw = self.call(QUERY_ENTITIES_PROMPT, &vars).await?;

        let selected: IndexSet<String> = decode_labels(&raw, RELEVANT_ENTITIES_KEY)?
            .iter()
            .map(|name| canonical_name(name))
            .filter(|name| !name.is_empty())
            .collect();
        debug!(?selected, "Selected relevant entities");
        Ok(selected.into_iter().collect())
    }

    /// Answer `query` from the neighborhoods of the selected entities
    pub async fn respond(
        &self,
        graph: &KnowledgeGraph,
        query: &str,
    ) -> Result<Answer, SynthesizerError> {
        let selected = self.select_relevant_entities(graph, query).await?;
        let context = QueryContext::gather(graph, &selected);
        info!(
            "Answering from {} of {} selected entities and {} relationships",
            context.entities.len(),
            selected.len(),
            context.relationships.len()
        );

        let vars = variables([
            ("query", json!(query)),
            ("entity_list", context.entity_list()),
            ("relationship_list", context.relationship_list()),
        ]);
        let text = self.call(QUERY_PROMPT, &vars).await?;

        Ok(Answer {
            text: text.trim().to_string(),
            selected,
            context,
        })
    }

    /// Answer `query`, returning only the text
    pub async fn answer(
        &self,
        graph: &KnowledgeGraph,
        query: &str,
    ) -> Result<String, SynthesizerError> {
        Ok(self.respond(graph, query).await?.text)
    }
}
