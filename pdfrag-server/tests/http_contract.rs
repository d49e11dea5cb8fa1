mod common;

use common::{sample_pdf, spawn_server};
use pdfrag::{Document, NO_RELEVANT_INFORMATION, VectorStore};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

fn upload_form(filename: &str, bytes: Vec<u8>) -> Form {
    Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()))
}

#[tokio::test]
async fn root_lists_the_endpoints() {
    let server = spawn_server(Some("unused")).await;

    let body: Value = reqwest::get(format!("{}/", server.base))
        .await
        .expect("root response")
        .json()
        .await
        .expect("root json");

    assert_eq!(body["endpoints"]["upload_pdf"], "/upload-pdf");
    assert_eq!(body["endpoints"]["query"], "/query");
    assert_eq!(body["endpoints"]["health"], "/health");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_reports_each_dependency() {
    let server = spawn_server(Some("unused")).await;

    let response = reqwest::get(format!("{}/health", server.base)).await.expect("health response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("health json");

    assert_eq!(body["api"], "ok");
    assert_eq!(body["qdrant"]["status"], "ok");
    assert_eq!(body["qdrant"]["points_count"], 0);
    assert_eq!(body["ollama"]["status"], "ok");
    assert_eq!(body["ollama"]["models"], serde_json::json!(["canned-model"]));
    assert_eq!(body["embedder"], "ok");
    assert!(body["timestamp"].as_i64().expect("timestamp") > 0);
}

#[tokio::test]
async fn blank_or_missing_question_is_a_bad_request() {
    let server = spawn_server(Some("unused")).await;
    let client = reqwest::Client::new();

    let blank = client
        .post(format!("{}/query", server.base))
        .query(&[("question", "   ")])
        .send()
        .await
        .expect("query response");
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    let body: Value = blank.json().await.expect("error json");
    assert!(body["detail"].as_str().expect("detail").contains("empty"));

    let missing =
        client.post(format!("{}/query", server.base)).send().await.expect("query response");
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_without_documents_returns_the_fallback_answer() {
    let server = spawn_server(Some("should not be used")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", server.base))
        .query(&[("question", "What is the warranty period?")])
        .send()
        .await
        .expect("query response");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("query json");
    assert_eq!(body["question"], "What is the warranty period?");
    assert_eq!(body["answer"], NO_RELEVANT_INFORMATION);
    assert_eq!(body["context"], serde_json::json!([]));
    assert_eq!(body["resultCount"], 0);
}

#[tokio::test]
async fn query_answers_from_ingested_text() {
    let server = spawn_server(Some("  Hold the button for ten seconds.\n")).await;
    let text = "To reset the router, hold the power button for ten seconds.";
    server.pipeline.ingest(&Document::new("router.pdf", text)).await.expect("ingest");

    let response = reqwest::Client::new()
        .post(format!("{}/query", server.base))
        .query(&[("question", text)])
        .send()
        .await
        .expect("query response");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("query json");
    assert_eq!(body["answer"], "Hold the button for ten seconds.");
    assert_eq!(body["context"], serde_json::json!([text]));
    assert_eq!(body["resultCount"], 1);
}

#[tokio::test]
async fn generator_failure_is_a_server_error() {
    let server = spawn_server(None).await;
    let text = "The warranty lasts two years.";
    server.pipeline.ingest(&Document::new("warranty.pdf", text)).await.expect("ingest");

    let response = reqwest::Client::new()
        .post(format!("{}/query", server.base))
        .query(&[("question", text)])
        .send()
        .await
        .expect("query response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("error json");
    assert!(body["detail"].as_str().expect("detail").contains("model crashed"));
}

#[tokio::test]
async fn non_pdf_upload_is_rejected() {
    let server = spawn_server(Some("unused")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/upload-pdf", server.base))
        .multipart(upload_form("notes.txt", b"plain text".to_vec()))
        .send()
        .await
        .expect("upload response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert!(body["detail"].as_str().expect("detail").contains("notes.txt"));
    assert_eq!(server.store.count("documentos_pdf").await.expect("count"), 0);
}

#[tokio::test]
async fn unreadable_pdf_is_rejected() {
    let server = spawn_server(Some("unused")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/upload-pdf", server.base))
        .multipart(upload_form("broken.pdf", b"not really a pdf".to_vec()))
        .send()
        .await
        .expect("upload response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pdf_without_text_is_rejected() {
    let server = spawn_server(Some("unused")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/upload-pdf", server.base))
        .multipart(upload_form("scan.pdf", sample_pdf("")))
        .send()
        .await
        .expect("upload response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert!(body["detail"].as_str().expect("detail").contains("scan.pdf"));
    assert_eq!(server.store.count("documentos_pdf").await.expect("count"), 0);
}

#[tokio::test]
async fn pdf_upload_is_chunked_and_stored() {
    let server = spawn_server(Some("unused")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/upload-pdf", server.base))
        .multipart(upload_form("manual.pdf", sample_pdf("Press reset to restart the device")))
        .send()
        .await
        .expect("upload response");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("upload json");
    assert_eq!(body["filename"], "manual.pdf");
    assert_eq!(body["chunksProcessed"], 1);
    assert!(body["message"].as_str().expect("message").contains("manual.pdf"));

    assert_eq!(server.store.count("documentos_pdf").await.expect("count"), 1);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let server = spawn_server(Some("unused")).await;

    let form = Form::new().text("comment", "no file here");
    let response = reqwest::Client::new()
        .post(format!("{}/upload-pdf", server.base))
        .multipart(form)
        .send()
        .await
        .expect("upload response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
