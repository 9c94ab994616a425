use async_trait::async_trait;
use pretty_assertions::assert_eq;
use promptline_protocol::KbCandidate;
use promptline_retrieval::{
    DocumentStore, Embedder, InMemoryDocumentStore, KnowledgeRetriever, RetrievalConfig,
    RetrievalError, StubEmbedder,
};
use std::sync::Arc;

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("provider unavailable")
    }

    fn dimension(&self) -> usize {
        8
    }
}

async fn seeded(config: RetrievalConfig) -> (KnowledgeRetriever, Arc<InMemoryDocumentStore>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let retriever = KnowledgeRetriever::new(Arc::new(StubEmbedder::new(256)), store.clone(), config);
    let docs = [
        ("reset", "faq", "how to reset your account password"),
        ("refund", "faq", "refund policy for annual plans"),
        ("deploy", "manual", "deploy the service with docker compose"),
        ("billing", "manual", "update billing address and payment card"),
    ];
    for (id, doc_type, content) in docs {
        retriever
            .ingest(KbCandidate::new(id, doc_type, content))
            .await
            .expect("ingest");
    }
    (retriever, store)
}

#[tokio::test]
async fn retrieves_most_similar_document_first() {
    let (retriever, _) = seeded(RetrievalConfig::default()).await;
    let matches = retriever.retrieve("reset password", 3).await.expect("retrieve");
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].id(), "reset");
    assert_eq!(matches[0].dimensions(), 256);
    assert!(matches.windows(2).all(|w| w[0].score() >= w[1].score()));
}

#[tokio::test]
async fn blank_query_is_a_caller_error() {
    let (retriever, _) = seeded(RetrievalConfig::default()).await;
    let err = retriever.retrieve("   ", 3).await.unwrap_err();
    assert!(matches!(err, RetrievalError::EmptyQuery));
}

#[tokio::test]
async fn embedding_failure_propagates() {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let retriever =
        KnowledgeRetriever::new(Arc::new(FailingEmbedder), store, RetrievalConfig::default());
    let err = retriever.retrieve("anything", 3).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Embedding(msg) if msg.contains("unavailable")));
}

#[tokio::test]
async fn doc_type_filter_and_small_pages() {
    let config = RetrievalConfig {
        doc_types: vec!["manual".to_string()],
        page_size: 1,
        ..Default::default()
    };
    let (retriever, store) = seeded(config).await;
    assert_eq!(store.len().await, 4);

    let matches = retriever.retrieve("payment card billing", 0).await.expect("retrieve");
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.doc_type() == "manual"));
    assert_eq!(matches[0].id(), "billing");
}

#[tokio::test]
async fn ingest_replaces_existing_document() {
    let (retriever, store) = seeded(RetrievalConfig::default()).await;
    retriever
        .ingest(KbCandidate::new("refund", "faq", "refunds take five business days"))
        .await
        .expect("ingest");
    assert_eq!(store.len().await, 4);
    let matches = retriever.retrieve("business days", 1).await.expect("retrieve");
    assert_eq!(matches[0].id(), "refund");
}
