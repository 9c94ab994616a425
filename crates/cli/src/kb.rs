use anyhow::{Context as AnyhowContext, Result};
use promptline_protocol::KbCandidate;
use promptline_retrieval::{DocumentStore, KnowledgeRetriever};
use std::fs;
use std::path::Path;

/// Read a JSON array of knowledge documents.
///
/// Each entry needs `id`, `doc_type` and `content`; `metadata` and a
/// precomputed `embedding` are optional.
pub fn read_seed(path: &Path) -> Result<Vec<KbCandidate>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read knowledge file {}", path.display()))?;
    let docs: Vec<KbCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid knowledge file {}", path.display()))?;
    Ok(docs)
}

/// Store the seed. Documents without a vector are embedded through the
/// retriever; precomputed vectors are kept as given.
pub async fn seed(
    retriever: &KnowledgeRetriever,
    store: &dyn DocumentStore,
    path: &Path,
) -> Result<usize> {
    let docs = read_seed(path)?;
    let total = docs.len();
    for mut doc in docs {
        let id = doc.id.clone();
        let stored: Result<()> = match doc.embedding.take() {
            Some(embedding) => store.persist(doc.with_embedding(embedding)).await,
            None => retriever.ingest(doc).await.map_err(Into::into),
        };
        stored.with_context(|| format!("Failed to ingest document {id}"))?;
    }
    log::info!("Seeded {total} knowledge documents from {}", path.display());
    Ok(total)
}
