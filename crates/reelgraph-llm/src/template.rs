//! Prompt templates with named placeholders
//!
//! Placeholders are written `{name}`. Literal braces are escaped by doubling
//! them (`{{` and `}}`). String variables are inserted verbatim; lists and
//! mappings are inserted as compact JSON.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Named variables substituted into a template
pub type Variables = BTreeMap<String, Value>;

/// Build a [`Variables`] map from `(name, value)` pairs
///
/// # Examples
///
/// ```
/// use reelgraph_llm::template::variables;
/// use serde_json::json;
///
/// let vars = variables([("query", json!("who spoke?")), ("entities", json!(["a", "b"]))]);
/// assert_eq!(vars.len(), 2);
/// ```
pub fn variables<I, K>(pairs: I) -> Variables
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Errors raised while rendering a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder has no matching variable
    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    /// The template itself is malformed
    #[error("Malformed template at byte {position}: {reason}")]
    Malformed {
        /// Byte offset of the problem
        position: usize,
        /// What is wrong
        reason: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

/// A prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate<'a> {
    source: &'a str,
}

impl<'a> PromptTemplate<'a> {
    /// Wrap template source text
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Names of every placeholder, in order of appearance
    pub fn placeholders(&self) -> Result<Vec<&'a str>, TemplateError> {
        Ok(self
            .pieces()?
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Placeholder(name) => Some(name),
                _ => None,
            })
            .collect())
    }

    /// Substitute every placeholder with its variable
    ///
    /// Variables that the template never mentions are ignored.
    pub fn render(&self, vars: &Variables) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for piece in self.pieces()? {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Brace(c) => out.push(c),
                Piece::Placeholder(name) => {
                    let value = vars
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                    match value {
                        Value::String(s) => out.push_str(s),
                        other => out.push_str(&other.to_string()),
                    }
                }
            }
        }
        Ok(out)
    }

    fn pieces(&self) -> Result<Vec<Piece<'a>>, TemplateError> {
        let src = self.source;
        let bytes = src.as_bytes();
        let mut pieces = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                    pieces.push(Piece::Literal(&src[literal_start..i]));
                    pieces.push(Piece::Brace(bytes[i] as char));
                    i += 2;
                    literal_start = i;
                }
                b'{' => {
                    let close = src[i + 1..].find('}').map(|off| i + 1 + off).ok_or_else(|| {
                        TemplateError::Malformed {
                            position: i,
                            reason: "unclosed placeholder".to_string(),
                        }
                    })?;
                    let name = &src[i + 1..close];
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(TemplateError::Malformed {
                            position: i,
                            reason: format!("invalid placeholder name '{}'", name),
                        });
                    }
                    pieces.push(Piece::Literal(&src[literal_start..i]));
                    pieces.push(Piece::Placeholder(name));
                    i = close + 1;
                    literal_start = i;
                }
                b'}' => {
                    return Err(TemplateError::Malformed {
                        position: i,
                        reason: "single '}' outside a placeholder".to_string(),
                    });
                }
                _ => i += 1,
            }
        }
        pieces.push(Piece::Literal(&src[literal_start..]));

        Ok(pieces.into_iter().filter(|p| *p != Piece::Literal("")).collect())
    }
}
