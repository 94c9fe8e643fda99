//! Prompt templates for domain, vocabulary and graph extraction
//!
//! Templates use `{name}` placeholders and `{{`/`}}` for literal braces.
//! Each template opens with a distinct first line so that logs (and scripted
//! test providers) can tell the calls apart.

use reelgraph_domain::{EntityTypeSet, Segment};
use reelgraph_llm::template::{variables, PromptTemplate, Variables};
use reelgraph_llm::TemplateError;
use serde_json::json;

/// Task statement shared by the vocabulary prompts
pub const TASK_TEMPLATE: &str =
    "Identify the entities and relations present in the video transcript, specifically within the {domain} domain.";

/// Asks for a short descriptive domain label
pub const DOMAIN_PROMPT: &str = r#"You label the subject area of video transcripts.

Transcript:
{input_text}

============

Assign a short, descriptive domain that summarizes what this video is about.
Return ONLY the domain name as plain text, with no other words."#;

/// Asks for the initial entity type vocabulary
pub const ENTITY_TYPES_PROMPT: &str = r#"You design entity type vocabularies for knowledge graphs.

Task: {task}
Domain: {domain}
Transcript:
{input_text}

Guidelines:
1. Prefer types specific to the domain and task over generic ones.
2. Prefer precise types ("neural_network" rather than "ai_model" when it fits).
3. Cover key concepts, techniques, outcomes, speakers, tools and domain terminology.
4. Types are concise, lowercase, with underscores between words.
5. Never use catch-all types such as "other" or "unknown".

Respond with a single-line JSON object and nothing else, no markdown:
{{"entity_types": ["type_one", "type_two"]}}"#;

/// Asks only for entity types missing from the current vocabulary
pub const ENTITY_TYPES_CONTINUATION_PROMPT: &str = r#"You extend entity type vocabularies for knowledge graphs.

Task: {task}
Domain: {domain}
Transcript:
{input_text}

Previously identified entity types: {entity_types}

Find ONLY NEW entity types that the previous list missed. Look for types that
add granularity to existing categories, cover unexplored parts of the content,
or bridge existing types. Follow the same conventions: specific, lowercase,
underscores between words, no catch-all types.

Do not repeat any type from {entity_types}.

Respond with a single-line JSON object and nothing else, no markdown:
{{"entity_types": ["new_type_one", "new_type_two"]}}"#;

/// Asks for every entity and relationship in one segment
pub const EXTRACTION_PROMPT: &str = r#"You extract knowledge graphs from video transcript excerpts.

Excerpt:
######################
{input_text}
######################

Identify ALL entities in the excerpt and ALL relationships among them.

Rules:
1. Entity names are lowercase with underscores for spaces.
2. Entity types MUST be one of: [{entity_types}]. Use "other" if unsure.
3. Relationship strength is an integer from 1 to 10.
4. Every relationship's source and target must name an entity from your list.
5. Include uncertain relationships and say so in the description.

Respond with ONLY a JSON object of this shape, no prose, no markdown:
{{
  "entities": [
    {{"name": "entity_name", "type": "entity_type", "description": "what the excerpt says about it"}}
  ],
  "relationships": [
    {{"source": "source_entity", "target": "target_entity", "description": "how they relate", "strength": 7}}
  ]
}}"#;

/// Render the task statement for a domain
pub fn task_for(domain: &str) -> Result<String, TemplateError> {
    PromptTemplate::new(TASK_TEMPLATE).render(&variables([("domain", json!(domain))]))
}

/// Variables for [`DOMAIN_PROMPT`]: segments joined by newlines
pub fn domain_variables(segments: &[Segment]) -> Variables {
    variables([("input_text", json!(Segment::join(segments, "\n")))])
}

/// Variables for [`ENTITY_TYPES_PROMPT`]: segments joined by spaces
pub fn entity_type_variables(segments: &[Segment], domain: &str) -> Result<Variables, TemplateError> {
    Ok(variables([
        ("task", json!(task_for(domain)?)),
        ("domain", json!(domain)),
        ("input_text", json!(Segment::join(segments, " "))),
    ]))
}

/// Variables for [`ENTITY_TYPES_CONTINUATION_PROMPT`]
pub fn continuation_variables(
    segments: &[Segment],
    domain: &str,
    types: &EntityTypeSet,
) -> Result<Variables, TemplateError> {
    let mut vars = entity_type_variables(segments, domain)?;
    vars.insert("entity_types".to_string(), json!(types.labels()));
    Ok(vars)
}

/// Variables for [`EXTRACTION_PROMPT`]
pub fn extraction_variables(segment: &Segment, types: &[&str]) -> Variables {
    variables([
        ("input_text", json!(segment.text)),
        ("entity_types", json!(types.join(", "))),
    ])
}
