//! Parse generated output into entities and relationships
//!
//! Parsing runs in two stages. [`parse_strict`] decodes the output as a JSON
//! object and fails with a [`ParseError`]. [`recover`] scans the raw text for
//! the `"entities": [...]` and `"relationships": [...]` array spans and reads
//! each object body as `key: value` lines; it never fails. [`parse`] chains the
//! two and reports which stage produced the result.

use crate::error::ParseError;
use reelgraph_domain::{canonical_name, clamp_strength, Entity, Extraction, Relationship};
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

const ENTITIES_KEY: &str = "entities";
const RELATIONSHIPS_KEY: &str = "relationships";

const NAME_KEYS: &[&str] = &["name", "entity_name"];
const TYPE_KEYS: &[&str] = &["type", "entity_type"];
const ENTITY_DESCRIPTION_KEYS: &[&str] = &["description", "entity_description"];
const SOURCE_KEYS: &[&str] = &["source", "source_entity"];
const TARGET_KEYS: &[&str] = &["target", "target_entity"];
const RELATIONSHIP_DESCRIPTION_KEYS: &[&str] =
    &["description", "relationship", "relationship_description"];
const STRENGTH_KEYS: &[&str] = &["strength", "relationship_strength"];

/// Result of parsing one generated output
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Output decoded as strict JSON
    Strict(Extraction),

    /// Strict decoding failed; the extraction came from structural recovery
    Recovered {
        /// Whatever the recovery pass could read, possibly empty
        extraction: Extraction,
        /// Why strict decoding failed
        cause: ParseError,
    },
}

impl ParseOutcome {
    /// Borrow the parsed extraction
    pub fn extraction(&self) -> &Extraction {
        match self {
            ParseOutcome::Strict(extraction) => extraction,
            ParseOutcome::Recovered { extraction, .. } => extraction,
        }
    }

    /// Take the parsed extraction
    pub fn into_extraction(self) -> Extraction {
        match self {
            ParseOutcome::Strict(extraction) => extraction,
            ParseOutcome::Recovered { extraction, .. } => extraction,
        }
    }

    /// Whether the structural recovery pass was needed
    pub fn is_recovered(&self) -> bool {
        matches!(self, ParseOutcome::Recovered { .. })
    }
}

/// Parse generated output, falling back to structural recovery
pub fn parse(raw: &str) -> ParseOutcome {
    match parse_strict(raw) {
        Ok(extraction) => ParseOutcome::Strict(extraction),
        Err(cause) => {
            warn!("Strict decoding failed ({}), recovering structurally", cause);
            let extraction = recover(raw);
            debug!(
                entities = extraction.entities.len(),
                relationships = extraction.relationships.len(),
                "Recovered extraction"
            );
            ParseOutcome::Recovered { extraction, cause }
        }
    }
}

/// Decode generated output as a strict JSON extraction document
///
/// Missing `entities` or `relationships` keys read as empty lists, but at
/// least one of them must be present. Array elements that are not objects,
/// or lack a name (entities) or source (relationships), are skipped.
pub fn parse_strict(raw: &str) -> Result<Extraction, ParseError> {
    let object = decode_json_object(raw)?;

    if !object.contains_key(ENTITIES_KEY) && !object.contains_key(RELATIONSHIPS_KEY) {
        return Err(ParseError::UnexpectedShape(format!(
            "expected \"{}\" or \"{}\" keys",
            ENTITIES_KEY, RELATIONSHIPS_KEY
        )));
    }

    let entities = records(&object, ENTITIES_KEY)?
        .filter_map(entity_from_record)
        .collect();
    let relationships = records(&object, RELATIONSHIPS_KEY)?
        .filter_map(relationship_from_record)
        .collect();

    Ok(Extraction::new(entities, relationships))
}

/// Read the label array stored under `key` in a strict JSON object
///
/// Used for the steps that have no structural fallback, so every deviation
/// from `{"<key>": ["label", ...]}` is an error.
pub fn decode_labels(raw: &str, key: &str) -> Result<Vec<String>, ParseError> {
    let object = decode_json_object(raw)?;

    let values = match object.get(key) {
        Some(Value::Array(values)) => values,
        Some(other) => {
            return Err(ParseError::UnexpectedShape(format!(
                "\"{}\" is {}, expected an array",
                key,
                kind(other)
            )))
        }
        None => {
            return Err(ParseError::UnexpectedShape(format!(
                "missing \"{}\" key",
                key
            )))
        }
    };

    values
        .iter()
        .map(|value| match value {
            Value::String(label) => Ok(label.trim().to_string()),
            other => Err(ParseError::UnexpectedShape(format!(
                "\"{}\" contains {}, expected strings",
                key,
                kind(other)
            ))),
        })
        .filter(|label| !matches!(label, Ok(l) if l.is_empty()))
        .collect()
}

/// Decode generated output into a JSON object
///
/// Markdown code fences are stripped. When the whole text is not JSON, the
/// span from the first `{` to the last `}` is tried, which tolerates prose
/// around the object.
pub fn decode_json_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let text = strip_code_fence(raw);

    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => outer_object(text)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| ParseError::InvalidJson(e.to_string()))?,
    };

    match value {
        Value::Object(object) => Ok(object),
        other => Err(ParseError::UnexpectedShape(format!(
            "expected a JSON object, found {}",
            kind(&other)
        ))),
    }
}

/// Structural recovery: read whatever records the raw text holds
///
/// Never fails. When an array span is absent its list is empty.
pub fn recover(raw: &str) -> Extraction {
    let entities = array_span(raw, ENTITIES_KEY)
        .map(|span| {
            object_bodies(span)
                .into_iter()
                .filter_map(|body| entity_from_record(&loose_record(body)))
                .collect()
        })
        .unwrap_or_default();

    let relationships = array_span(raw, RELATIONSHIPS_KEY)
        .map(|span| {
            object_bodies(span)
                .into_iter()
                .filter_map(|body| relationship_from_record(&loose_record(body)))
                .collect()
        })
        .unwrap_or_default();

    Extraction::new(entities, relationships)
}

fn records<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> Result<impl Iterator<Item = &'a Map<String, Value>>, ParseError> {
    let values: &[Value] = match object.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(values)) => values,
        Some(other) => {
            return Err(ParseError::UnexpectedShape(format!(
                "\"{}\" is {}, expected an array",
                key,
                kind(other)
            )))
        }
    };

    let key = key.to_string();
    Ok(values.iter().enumerate().filter_map(move |(idx, value)| {
        let record = value.as_object();
        if record.is_none() {
            warn!("Skipping {} record {}: not an object", key, idx);
        }
        record
    }))
}

fn entity_from_record(record: &Map<String, Value>) -> Option<Entity> {
    let name = canonical_name(&text_field(record, NAME_KEYS)?);
    if name.is_empty() {
        return None;
    }

    Some(Entity {
        name,
        entity_type: text_field(record, TYPE_KEYS),
        description: text_field(record, ENTITY_DESCRIPTION_KEYS),
    })
}

fn relationship_from_record(record: &Map<String, Value>) -> Option<Relationship> {
    let source = canonical_name(&text_field(record, SOURCE_KEYS)?);
    if source.is_empty() {
        return None;
    }

    let target = text_field(record, TARGET_KEYS)
        .map(|t| canonical_name(&t))
        .filter(|t| !t.is_empty());

    Some(Relationship {
        source,
        target,
        description: text_field(record, RELATIONSHIP_DESCRIPTION_KEYS),
        strength: strength_field(record),
    })
}

/// First present, non-null, non-blank value among `keys`, as text
fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| match record.get(*key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .find(|s| !s.is_empty())
}

fn strength_field(record: &Map<String, Value>) -> Option<u8> {
    STRENGTH_KEYS.iter().find_map(|key| {
        let strength = match record.get(*key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }?;
        Some(clamp_strength(strength))
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Drop a surrounding markdown code fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (```json)
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Tracks whether the scanner is inside a double-quoted string
///
/// String state resets at a newline, so one stray quote cannot swallow
/// the rest of the document.
#[derive(Default)]
struct Quotes {
    in_string: bool,
    escaped: bool,
}

impl Quotes {
    /// Feed one character; returns `true` when it is structural
    fn structural(&mut self, c: char) -> bool {
        if c == '\n' {
            self.in_string = false;
            self.escaped = false;
            return true;
        }
        if self.in_string {
            match c {
                _ if self.escaped => self.escaped = false,
                '\\' => self.escaped = true,
                '"' => self.in_string = false,
                _ => {}
            }
            return false;
        }
        if c == '"' {
            self.in_string = true;
            return false;
        }
        true
    }
}

/// Contents between the brackets of `"key": [ ... ]`
///
/// An unterminated array runs to the end of the text.
fn array_span<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("\"{}\"", key);

    let mut from = 0;
    while let Some(found) = text[from..].find(&needle) {
        let after_key = from + found + needle.len();
        from = after_key;

        let rest = &text[after_key..];
        let Some(rest) = rest.trim_start().strip_prefix(':') else {
            continue;
        };
        let Some(rest) = rest.trim_start().strip_prefix('[') else {
            continue;
        };
        let open = text.len() - rest.len();

        let mut depth = 1usize;
        let mut quotes = Quotes::default();
        for (offset, c) in rest.char_indices() {
            if !quotes.structural(c) {
                continue;
            }
            match c {
                '[' | '{' => depth += 1,
                ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&text[open..open + offset]);
                    }
                }
                _ => {}
            }
        }
        return Some(&text[open..]);
    }
    None
}

/// Inner bodies of the top-level `{ ... }` objects in an array span
fn object_bodies(span: &str) -> Vec<&str> {
    let mut bodies = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut quotes = Quotes::default();

    for (offset, c) in span.char_indices() {
        if !quotes.structural(c) {
            continue;
        }
        match c {
            '{' => {
                if depth == 0 {
                    start = offset + 1;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    bodies.push(&span[start..offset]);
                }
            }
            _ => {}
        }
    }

    // Truncated final object
    if depth > 0 {
        bodies.push(&span[start..]);
    }

    bodies
}

/// Read an object body as a record
///
/// Well-formed bodies decode as JSON. Anything else is read one line at a
/// time, split at the first colon.
fn loose_record(body: &str) -> Map<String, Value> {
    if let Ok(Value::Object(record)) = serde_json::from_str(&format!("{{{}}}", body)) {
        return record;
    }

    body.lines()
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(key, value)| {
            let key = key.trim().trim_matches('"').trim();
            (!key.is_empty()).then(|| (key.to_string(), clean_value(value)))
        })
        .collect()
}

fn clean_value(raw: &str) -> Value {
    let value = raw.trim().trim_end_matches(',').trim();
    if value == "null" {
        return Value::Null;
    }

    let value = value.trim_matches('"');
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<i64>() {
            return Value::Number(Number::from(n));
        }
    }
    Value::String(value.to_string())
}
