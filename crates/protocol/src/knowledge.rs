use serde::{Deserialize, Serialize};

pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A knowledge document offered by the document store, with its precomputed
/// embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbCandidate {
    pub id: String,
    pub doc_type: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    /// Dimensionality recorded by the store at ingestion time
    #[serde(default)]
    pub declared_dimensions: Option<usize>,
}

impl KbCandidate {
    #[must_use]
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc_type: doc_type.into(),
            content: content.into(),
            metadata: Metadata::new(),
            embedding: None,
            declared_dimensions: None,
        }
    }

    /// Builder: attach an embedding and declare its dimensionality
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.declared_dimensions = Some(embedding.len());
        self.embedding = Some(embedding);
        self
    }

    /// Builder: set a metadata field
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A ranked retrieval hit. Fields are read-only once the match is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbMatch {
    id: String,
    doc_type: String,
    score: f32,
    content: String,
    metadata: Metadata,
    dimensions: usize,
}

impl KbMatch {
    #[must_use]
    pub fn from_candidate(candidate: &KbCandidate, score: f32) -> Self {
        Self {
            id: candidate.id.clone(),
            doc_type: candidate.doc_type.clone(),
            score,
            content: candidate.content.clone(),
            metadata: candidate.metadata.clone(),
            dimensions: candidate.declared_dimensions.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    #[must_use]
    pub const fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_copies_candidate_fields() {
        let candidate = KbCandidate::new("doc-1", "faq", "Refunds take 5 days")
            .with_metadata("source", serde_json::json!("handbook"))
            .with_embedding(vec![0.1, 0.2, 0.3]);
        let hit = KbMatch::from_candidate(&candidate, 0.75);
        assert_eq!(hit.id(), "doc-1");
        assert_eq!(hit.doc_type(), "faq");
        assert_eq!(hit.dimensions(), 3);
        assert_eq!(hit.metadata()["source"], "handbook");
        assert!((hit.score() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn undeclared_dimensions_report_zero() {
        let candidate = KbCandidate::new("doc-2", "faq", "no vector yet");
        let hit = KbMatch::from_candidate(&candidate, 0.1);
        assert_eq!(hit.dimensions(), 0);
    }
}
