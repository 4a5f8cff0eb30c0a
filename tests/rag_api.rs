mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{TestApp, pdf_bytes};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_upload(file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload(app: &TestApp, file_name: &str) -> i32 {
    let response = app
        .router
        .clone()
        .oneshot(multipart_upload(file_name, &pdf_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["data"]["document_id"]
        .as_i64()
        .unwrap() as i32
}

async fn upload_ready(app: &TestApp, file_name: &str) -> i32 {
    let id = upload(app, file_name).await;
    app.drive_indexing().await;
    id
}

#[tokio::test]
async fn summarize_requires_ready_document() {
    let app = TestApp::new();
    let id = upload(&app, "paper.pdf").await;

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/summarize", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["detail"].as_str().unwrap().contains("uploaded"));
}

#[tokio::test]
async fn summarize_returns_summary_with_key_points() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/summarize", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["document_id"], id);
    assert_eq!(body["data"]["document_title"], "A Study of Retrieval");
    assert!(
        body["data"]["summary"]
            .as_str()
            .unwrap()
            .contains("attention")
    );
    let key_points = body["data"]["key_points"].as_array().unwrap();
    assert_eq!(key_points.len(), 2);
    assert_eq!(key_points[0], "The model relies on attention");
    assert_eq!(body["data"]["metadata"]["model_used"], "stub-model");
    assert!(body["data"]["metadata"]["chunks_analyzed"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn summarize_unknown_document_is_404() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(json_post("/documents/42/summarize", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn questions_parse_model_output() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;
    app.completion_provider.set_response(
        "1. What problem does the attention mechanism solve?\n\
         2. How were the translation experiments evaluated?\n\
         3. Which baselines did the model outperform?",
    );

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/questions", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    assert_eq!(
        questions[0],
        "What problem does the attention mechanism solve?"
    );
    assert_eq!(body["data"]["metadata"]["used_fallback"], false);
}

#[tokio::test]
async fn questions_fall_back_when_output_is_unparseable() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;
    app.completion_provider
        .set_response("I could not come up with anything.");

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/questions", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    assert_eq!(body["data"]["metadata"]["used_fallback"], true);
}

#[tokio::test]
async fn questions_before_indexing_is_conflict() {
    let app = TestApp::new();
    let id = upload(&app, "paper.pdf").await;

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/questions", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn chat_answers_with_sources() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;
    app.completion_provider
        .set_response("The model relies entirely on attention.");

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({ "question": "How does the model work?", "document_id": id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["question"], "How does the model work?");
    assert_eq!(
        body["data"]["answer"],
        "The model relies entirely on attention."
    );
    assert_eq!(body["data"]["metadata"]["model_used"], "stub-model");
    assert_eq!(body["data"]["metadata"]["tokens_used"], 42);
    assert!(body["data"]["metadata"]["reason"].is_null());

    let sources = body["data"]["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    for source in sources {
        assert_eq!(source["document_id"], id);
        assert!(source["similarity_score"].as_f64().unwrap() <= 1.0);
        assert!(source["content_preview"].as_str().is_some());
    }
}

#[tokio::test]
async fn chat_with_empty_question_is_rejected() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(json_post("/chat", json!({ "question": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_scoped_to_unknown_document_is_404() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({ "question": "What is this about?", "document_id": 123 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_without_context_returns_canned_answer() {
    let app = TestApp::new();
    // No documents indexed, so corpus-wide retrieval finds nothing.

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({ "question": "What does the corpus say about pelicans?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["data"]["answer"],
        "No relevant information found. Please rephrase or check the document."
    );
    assert_eq!(body["data"]["sources"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["metadata"]["reason"], "no_relevant_context");
    assert_eq!(body["data"]["metadata"]["tokens_used"], 0);
}

#[tokio::test]
async fn chat_accepts_conversation_history() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({
                "question": "And how fast does it train?",
                "document_id": id,
                "conversation_history": [
                    { "role": "user", "content": "What architecture is used?" },
                    { "role": "assistant", "content": "A transformer." }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["question"], "And how fast does it train?");
    assert!(body["data"]["metadata"]["chunks_used"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn chat_hides_upstream_error_detail() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;

    app.vector_index
        .fail_search
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({ "question": "What is attention?", "document_id": id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["detail"], "Vector store is unavailable");
    assert!(!body["detail"].as_str().unwrap().contains("stubbed outage"));
}

#[tokio::test]
async fn rag_endpoints_404_after_delete() {
    let app = TestApp::new();
    let id = upload_ready(&app, "paper.pdf").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/documents/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            &format!("/documents/{}/summarize", id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/chat",
            json!({ "question": "What is this about?", "document_id": id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_healthy_components() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["components"]["database"], "healthy");
    assert_eq!(body["data"]["components"]["pdf_processor"], "healthy");
    assert_eq!(body["data"]["components"]["rag_pipeline"], "healthy");
}

#[tokio::test]
async fn health_degrades_but_stays_200_when_grobid_is_down() {
    let app = TestApp::new();
    app.metadata_extractor
        .fail
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["components"]["pdf_processor"], "unhealthy");
    assert_eq!(body["data"]["components"]["rag_pipeline"], "healthy");
}

#[tokio::test]
async fn root_returns_service_banner() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["message"], "DocMind API");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    let endpoints = body["data"]["endpoints"].as_array().unwrap();
    assert!(
        endpoints
            .iter()
            .any(|e| e["method"] == "POST" && e["path"] == "/chat")
    );
}
