#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use pdfrag::{
    EmbeddingProvider, InMemoryVectorStore, RagError, RagPipeline, Result, TextGenerator,
};
use pdfrag_server::{AppState, app_router};

pub const DIM: usize = 8;

/// Hash-based embeddings: identical texts get identical unit vectors.
#[derive(Debug, Default)]
pub struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb: Vec<f32> =
            (0..DIM).map(|i| ((hash.wrapping_add(i as u64)) as f32).sin()).collect();
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

#[derive(Debug)]
pub struct CannedGenerator {
    pub reply: Option<String>,
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.reply.clone().ok_or_else(|| RagError::GenerationError {
            provider: "canned".into(),
            message: "model crashed".into(),
        })
    }

    fn model(&self) -> &str {
        "canned-model"
    }
}

pub struct TestServer {
    pub base: String,
    pub store: Arc<InMemoryVectorStore>,
    pub pipeline: Arc<RagPipeline>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server(reply: Option<&str>) -> TestServer {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = Arc::new(
        RagPipeline::builder()
            .embedding_provider(Arc::new(HashEmbedder))
            .vector_store(store.clone())
            .generator(Arc::new(CannedGenerator { reply: reply.map(str::to_string) }))
            .build()
            .expect("pipeline"),
    );
    pipeline.ensure_collection().await.expect("collection");

    let app = app_router(AppState::new(Arc::clone(&pipeline)).with_upload_limit(1024 * 1024));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    TestServer { base: format!("http://{addr}"), store, pipeline, handle }
}

/// A one-page PDF showing `text` in a standard font.
pub fn sample_pdf(text: &str) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id =
        doc.add_object(Stream::new(dictionary! {}, content.encode().expect("encode content")));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}
