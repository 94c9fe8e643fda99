//! Entity type vocabulary discovered for a corpus

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Normalise a type label: trimmed, lowercase, words joined by `_`
pub fn normalize_label(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// The ordered entity type vocabulary
///
/// The vocabulary only ever grows. Labels appended by later discovery rounds
/// are kept as returned, so a label may appear more than once when the
/// service repeats itself; [`EntityTypeSet::distinct`] gives the
/// deduplicated view for consumers that need a canonical set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypeSet {
    labels: Vec<String>,
}

impl EntityTypeSet {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vocabulary from an initial list of labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend_round(labels);
        set
    }

    /// Append one discovery round's labels, returning how many were appended
    ///
    /// Labels are normalised and empty labels are skipped, but labels already
    /// present are appended again.
    pub fn extend_round<I, S>(&mut self, labels: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.labels.len();
        self.labels.extend(
            labels
                .into_iter()
                .map(|label| normalize_label(label.as_ref()))
                .filter(|label| !label.is_empty()),
        );
        self.labels.len() - before
    }

    /// All labels in discovery order, duplicates included
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Labels in first-seen order with duplicates removed
    pub fn distinct(&self) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of labels that repeat an earlier label
    pub fn duplicate_count(&self) -> usize {
        self.labels.len() - self.distinct().len()
    }

    /// Whether a label is present
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Number of labels, duplicates included
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Neural Network"), "neural_network");
        assert_eq!(normalize_label(" data-set "), "data_set");
        assert_eq!(normalize_label("concept"), "concept");
    }

    #[test]
    fn test_extend_round_keeps_duplicates() {
        let mut types = EntityTypeSet::from_labels(["concept", "technique"]);
        let added = types.extend_round(["technique", "dataset"]);

        assert_eq!(added, 2);
        assert_eq!(types.len(), 4);
        assert_eq!(types.labels(), &["concept", "technique", "technique", "dataset"]);
        assert_eq!(types.distinct(), vec!["concept", "technique", "dataset"]);
        assert_eq!(types.duplicate_count(), 1);
    }

    #[test]
    fn test_extend_round_skips_empty_labels() {
        let mut types = EntityTypeSet::new();
        assert_eq!(types.extend_round(["", "  ", "metric"]), 1);
        assert!(types.contains("metric"));
    }
}
