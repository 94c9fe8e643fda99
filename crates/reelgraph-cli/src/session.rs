//! A processing session: one transcript's graph, summary and questions.

use crate::error::{CliError, Result};
use crate::provider::SharedClient;
use reelgraph_domain::KnowledgeGraph;
use reelgraph_extractor::{Extractor, ExtractorConfig, ProcessedTranscript};
use reelgraph_llm::GenerationClient;
use reelgraph_synthesizer::{Answer, Synthesizer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// One question and its answer.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    /// The question as asked
    pub question: String,
    /// The generated answer
    pub answer: String,
}

/// Session state
///
/// The graph and summary are replaced together whenever a transcript is
/// processed; a failed run leaves the previous state untouched.
pub struct Session {
    id: Uuid,
    extractor: Extractor<dyn GenerationClient>,
    synthesizer: Synthesizer<dyn GenerationClient>,
    source: Option<String>,
    processed: Option<ProcessedTranscript>,
    summary: Option<String>,
    history: Vec<Exchange>,
}

impl Session {
    /// Create an empty session over a shared client.
    pub fn new(client: SharedClient, config: ExtractorConfig) -> Self {
        let timeout = config.generation_timeout();
        Self {
            id: Uuid::now_v7(),
            extractor: Extractor::from_shared(Arc::clone(&client), config),
            synthesizer: Synthesizer::from_shared(client, timeout),
            source: None,
            processed: None,
            summary: None,
            history: Vec::new(),
        }
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the processed transcript, if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Result of the last successful run
    pub fn processed(&self) -> Option<&ProcessedTranscript> {
        self.processed.as_ref()
    }

    /// The current graph
    pub fn graph(&self) -> Option<&KnowledgeGraph> {
        self.processed.as_ref().map(|p| &p.graph)
    }

    /// The current summary
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Questions asked about the current transcript
    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Build the graph and summary for a transcript, replacing the current ones.
    pub async fn process(&mut self, source: &str, text: &str) -> Result<&ProcessedTranscript> {
        let span = info_span!("session", id = %self.id, source);
        let (processed, summary) = async {
            let processed = self.extractor.process(text).await?;
            let summary = self
                .synthesizer
                .summarize(&processed.graph)
                .await
                .map_err(CliError::Summary)?;
            info!("Transcript processed");
            Ok::<_, CliError>((processed, summary))
        }
        .instrument(span)
        .await?;

        self.source = Some(source.to_string());
        self.summary = Some(summary);
        self.history.clear();
        Ok(self.processed.insert(processed))
    }

    /// Answer a question against the current graph.
    pub async fn ask(&mut self, question: &str) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CliError::InvalidInput("Question is empty".to_string()));
        }
        let graph = self.graph().ok_or(CliError::NoTranscript)?;

        let span = info_span!("session", id = %self.id);
        let answer = self
            .synthesizer
            .respond(graph, question)
            .instrument(span)
            .await?;

        self.history.push(Exchange {
            question: question.to_string(),
            answer: answer.text.clone(),
        });
        Ok(answer)
    }
}
