use async_trait::async_trait;
use promptline_protocol::KbCandidate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Listing filter: doc types (empty = all) plus offset/limit paging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub doc_types: Vec<String>,
    pub offset: usize,
    pub limit: usize,
}

impl DocumentFilter {
    #[must_use]
    pub fn matches(&self, candidate: &KbCandidate) -> bool {
        self.doc_types.is_empty() || self.doc_types.iter().any(|t| t == &candidate.doc_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub items: Vec<KbCandidate>,
    /// Offset of the next page, `None` on the last one
    pub next_offset: Option<usize>,
    pub total: usize,
}

/// Backing document store collaborator
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, filter: &DocumentFilter) -> anyhow::Result<DocumentPage>;

    /// Insert or replace by id
    async fn persist(&self, candidate: KbCandidate) -> anyhow::Result<()>;
}

/// Vec-backed store for tests and the CLI
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: RwLock<Vec<KbCandidate>>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_documents(docs: Vec<KbCandidate>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, filter: &DocumentFilter) -> anyhow::Result<DocumentPage> {
        let docs = self.docs.read().await;
        let matching: Vec<&KbCandidate> = docs.iter().filter(|d| filter.matches(d)).collect();
        let total = matching.len();
        let limit = if filter.limit == 0 { total } else { filter.limit };

        let items: Vec<KbCandidate> = matching
            .into_iter()
            .skip(filter.offset)
            .take(limit)
            .cloned()
            .collect();
        let end = filter.offset + items.len();
        let next_offset = (end < total && !items.is_empty()).then_some(end);
        Ok(DocumentPage {
            items,
            next_offset,
            total,
        })
    }

    async fn persist(&self, candidate: KbCandidate) -> anyhow::Result<()> {
        if candidate.id.trim().is_empty() {
            anyhow::bail!("document id must not be blank");
        }
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| d.id == candidate.id) {
            Some(existing) => *existing = candidate,
            None => docs.push(candidate),
        }
        Ok(())
    }
}
