//! Prompt templates for summaries and answers

/// Asks for a prose summary of the graph's relationship items
pub const SUMMARIZE_PROMPT: &str = r#"You write summaries of videos from their knowledge graphs.

The graph below was extracted from a video transcript. Each item names two
connected entities with their descriptions and the relationship between them:

{entity_relationships}

Write a detailed summary that captures the content, structure and key
messages of the video. Identify the speakers and main themes, and organize the
summary in sections or paragraphs where that helps.

Base the summary only on the items above. Do not add outside information or
speculation."#;

/// Asks which graph entities matter for a question
pub const QUERY_ENTITIES_PROMPT: &str = r#"You pick the knowledge graph entities that matter for a question.

Question: "{query}"
Entities with their attributes: {entity_list}
Number of relationships per entity: {relationship_count}

Choose the entity names most relevant to the question. Well-connected
entities are often central to the video.

Respond with a single-line JSON object and nothing else, no markdown:
{{"relevant_entities": ["entity_name"]}}"#;

/// Asks for an answer grounded in the selected neighborhood
pub const QUERY_PROMPT: &str = r#"You answer questions about a video using its knowledge graph.

Question: "{query}"
Relevant entities and their descriptions: {entity_list}
Relationships around those entities: {relationship_list}

Answer the question concisely and informatively from the entities and
relationships above. When the graph records who said something, refer to that
speaker. Return only the answer text."#;
