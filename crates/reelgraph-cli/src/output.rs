//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::session::Exchange;
use colored::*;
use reelgraph_domain::KnowledgeGraph;
use reelgraph_extractor::ProcessedTranscript;
use reelgraph_synthesizer::Answer;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const MISSING: &str = "-";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Report for a processed transcript and its summary.
    pub fn processed(&self, processed: &ProcessedTranscript, summary: &str) -> Result<String> {
        if self.format == OutputFormat::Json {
            let report = json!({
                "domain": processed.domain,
                "segments": processed.segments.len(),
                "total_segments": processed.total_segments,
                "entity_types": processed.entity_types,
                "recovered": processed.recovered,
                "nodes": processed.graph.node_count(),
                "edges": processed.graph.edge_count(),
                "summary": summary,
            });
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let types = &processed.entity_types;
        let mut lines = vec![
            self.success(&format!("Domain: {}", processed.domain)),
            format!(
                "Segments: {} of {}",
                processed.segments.len(),
                processed.total_segments
            ),
            format!(
                "Entity types: {} ({} distinct)",
                types.len(),
                types.distinct().len()
            ),
            format!(
                "Graph: {} nodes, {} edges",
                processed.graph.node_count(),
                processed.graph.edge_count()
            ),
        ];
        if processed.was_truncated() {
            lines.push(self.warning("Transcript was truncated to the segment cap"));
        }
        if processed.recovered > 0 {
            lines.push(self.warning(&format!(
                "{} segment output(s) needed recovery",
                processed.recovered
            )));
        }
        lines.push(String::new());
        lines.push(self.colorize("Summary", "cyan"));
        lines.push(summary.to_string());

        Ok(lines.join("\n"))
    }

    /// Node and edge tables, or the graph as JSON.
    pub fn graph(&self, graph: &KnowledgeGraph) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(graph)?);
        }
        if graph.is_empty() {
            return Ok(self.colorize("Graph is empty.", "yellow"));
        }

        Ok(format!("{}\n\n{}", self.node_table(graph), self.edge_table(graph)))
    }

    /// Entity table only.
    pub fn entities(&self, graph: &KnowledgeGraph) -> Result<String> {
        if self.format == OutputFormat::Json {
            let nodes: serde_json::Map<String, serde_json::Value> = graph
                .nodes()
                .map(|(name, node)| serde_json::to_value(node).map(|v| (name.to_string(), v)))
                .collect::<serde_json::Result<_>>()?;
            return Ok(serde_json::to_string_pretty(&nodes)?);
        }
        if graph.node_count() == 0 {
            return Ok(self.colorize("No entities found.", "yellow"));
        }

        Ok(self.node_table(graph))
    }

    /// An answer, with the entities it was grounded on.
    pub fn answer(&self, question: &str, answer: &Answer) -> Result<String> {
        if self.format == OutputFormat::Json {
            let report = json!({
                "question": question,
                "answer": answer.text,
                "selected": answer.selected,
                "context": answer.context,
            });
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let mut out = answer.text.clone();
        if !answer.selected.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.info(&format!("Based on: {}", answer.selected.join(", "))));
        }
        Ok(out)
    }

    /// Questions asked so far.
    pub fn history(&self, history: &[Exchange]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(history)?);
        }
        if history.is_empty() {
            return Ok(self.colorize("No questions asked yet.", "yellow"));
        }

        let blocks: Vec<String> = history
            .iter()
            .enumerate()
            .map(|(i, exchange)| {
                format!(
                    "{} {}\n{}",
                    self.colorize(&format!("[{}]", i + 1), "magenta"),
                    exchange.question,
                    exchange.answer
                )
            })
            .collect();
        Ok(blocks.join("\n\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn node_table(&self, graph: &KnowledgeGraph) -> String {
        let degrees = graph.degrees();
        let mut builder = Builder::default();
        builder.push_record(["Entity", "Type", "Degree", "Description"]);

        for (name, node) in graph.nodes() {
            let degree = degrees.get(name).copied().unwrap_or(0).to_string();
            builder.push_record([
                name,
                node.entity_type.as_deref().unwrap_or(MISSING),
                degree.as_str(),
                node.description.as_deref().unwrap_or(MISSING),
            ]);
        }

        styled(builder)
    }

    fn edge_table(&self, graph: &KnowledgeGraph) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Source", "Target", "Strength", "Relationship"]);

        for edge in graph.edges() {
            let strength = edge
                .strength
                .map(|s| s.to_string())
                .unwrap_or_else(|| MISSING.to_string());
            builder.push_record([
                edge.source.as_str(),
                edge.target.as_str(),
                strength.as_str(),
                edge.description.as_deref().unwrap_or(MISSING),
            ]);
        }

        styled(builder)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgraph_domain::{Entity, Extraction, Relationship};
    use reelgraph_synthesizer::QueryContext;

    fn sample_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.absorb(&Extraction::new(
            vec![Entity::new("gradient_descent", "technique", "iterative optimizer")],
            vec![Relationship::new(
                "gradient_descent",
                "loss_function",
                "minimizes",
                9,
            )],
        ));
        graph
    }

    fn sample_answer() -> Answer {
        Answer {
            text: "It minimizes the loss.".to_string(),
            selected: vec!["gradient_descent".to_string()],
            context: QueryContext::default(),
        }
    }

    #[test]
    fn test_graph_tables() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.graph(&sample_graph()).unwrap();
        assert!(output.contains("Entity"));
        assert!(output.contains("Strength"));
        assert!(output.contains("gradient_descent"));
        // loss_function was never extracted as an entity
        assert!(output.contains("loss_function"));
    }

    #[test]
    fn test_graph_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.graph(&sample_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value.is_object());
        assert!(output.contains("minimizes"));
    }

    #[test]
    fn test_empty_graph() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.graph(&KnowledgeGraph::new()).unwrap();
        assert_eq!(output, "Graph is empty.");
    }

    #[test]
    fn test_entities_json_is_keyed_by_name() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.entities(&sample_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["gradient_descent"]["type"], "technique");
    }

    #[test]
    fn test_answer_text_lists_selection() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.answer("What?", &sample_answer()).unwrap();
        assert_eq!(output, "It minimizes the loss.\n\nℹ Based on: gradient_descent");
    }

    #[test]
    fn test_answer_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.answer("What?", &sample_answer()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["question"], "What?");
        assert_eq!(value["selected"][0], "gradient_descent");
    }

    #[test]
    fn test_history() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.history(&[]).unwrap(), "No questions asked yet.");

        let history = vec![Exchange {
            question: "Why?".to_string(),
            answer: "Because.".to_string(),
        }];
        assert_eq!(formatter.history(&history).unwrap(), "[1] Why?\nBecause.");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
