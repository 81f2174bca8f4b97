//! Re-ingestion while questions are in flight.

use super::*;
use catalog_knowledge::rag::numbered_items;
use tokio::sync::{Notify, Semaphore};

const MORE_PRODUCTS: &str = "\
Name,Description,Price,Stock
Zeppelin,Inflatable zeppelin kit,999,2
Wireless Charger,Fast wireless charger pad,35,80
";

/// Mock embedder that parks any batch mentioning "Zeppelin" until released.
#[derive(Debug)]
struct GatedEmbedder {
    inner: MockProvider,
    gate: Semaphore,
    parked: Notify,
}

impl GatedEmbedder {
    fn new() -> Self {
        Self {
            inner: MockProvider::new(128),
            gate: Semaphore::new(0),
            parked: Notify::new(),
        }
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GatedEmbedder {
    fn provider_name(&self) -> &str {
        "gated"
    }
    fn model_name(&self) -> &str {
        "gated-mock"
    }
    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.iter().any(|t| t.contains("Zeppelin")) {
            self.parked.notify_one();
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| AppError::Embedding(e.to_string()))?;
        }
        self.inner.embed_batch(texts).await
    }
}

#[tokio::test]
async fn test_questions_see_previous_catalog_until_swap() {
    let embedder = Arc::new(GatedEmbedder::new());
    let llm = ScriptedLlm::new("- Wireless Dock\n- Bluetooth Speaker\n- Wireless Mouse")
        .routing(&[
            "Action: answer_product_question\nAction Input: What kinds of wireless products are available?",
            ECHO_OBSERVATION,
        ])
        .build();

    let service: Arc<CatalogService> = Arc::new(service_with(llm, embedder.clone(), 15));
    service.ingest(&product_rows()).await.unwrap();

    let rows = parse_csv(MORE_PRODUCTS.as_bytes()).unwrap();
    let writer = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.ingest(&rows).await })
    };

    // The new catalog is half built
    embedder.parked.notified().await;

    let status = service.status();
    assert_eq!(status.generation, 1);
    assert_eq!(status.documents, 5);

    let outcome = service
        .answer("What kinds of wireless products are available?")
        .await
        .unwrap();
    assert_eq!(numbered_items(&outcome.answer).len(), 3);

    let hits = service.search("zeppelin", 5).await.unwrap();
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|h| h.document.field("Name") != Some("Zeppelin")));

    embedder.release();
    let status = writer.await.unwrap().unwrap();
    assert_eq!(status.generation, 2);
    assert_eq!(status.documents, 2);

    let hits = service.search("zeppelin", 5).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document.field("Name"), Some("Zeppelin"));
}

#[tokio::test]
async fn test_concurrent_questions_all_answer() {
    let llm = ScriptedLlm::new("unused")
        .routing_forever(" I know this.\nFinal Answer: We sell five products.")
        .build();
    let service = Arc::new(service(llm));
    service.ingest(&product_rows()).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.answer(&format!("question {}", i)).await })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.answer, "We sell five products.");
    }
}
