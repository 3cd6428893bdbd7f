pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::render::handlers as render;
use crate::sows::handlers as sows;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route(
            "/api/accounts",
            get(accounts::handle_list_accounts).post(accounts::handle_create_account),
        )
        .route(
            "/api/accounts/:id",
            get(accounts::handle_get_account)
                .put(accounts::handle_update_account)
                .delete(accounts::handle_delete_account),
        )
        // Templates
        .route(
            "/api/templates",
            get(templates::handle_list_templates).post(templates::handle_upload_template),
        )
        .route(
            "/api/templates/:id",
            get(templates::handle_get_template).delete(templates::handle_delete_template),
        )
        // SOWs
        .route("/api/sows", get(sows::handle_list_sows))
        .route("/api/sows/generate", post(sows::handle_generate_sow))
        .route(
            "/api/sows/account/:account_id",
            get(sows::handle_list_sows_by_account),
        )
        .route(
            "/api/sows/:id",
            get(sows::handle_get_sow).delete(sows::handle_delete_sow),
        )
        .route("/api/sows/:id/preview", get(render::handle_preview))
        // Export
        .route("/api/export/:id/:format", get(render::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::completion::{Completion, CompletionClient, CompletionError};
    use crate::config::Config;
    use crate::db::test_pool;

    struct FixedClient;

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, _input: &str) -> Result<Completion, CompletionError> {
            Ok(Completion {
                status: Some("completed".to_string()),
                text: Some("## Scope\nHello SOW".to_string()),
            })
        }
    }

    async fn app(upload_dir: &std::path::Path) -> Router {
        build_router(AppState {
            db: test_pool().await,
            completion: Arc::new(FixedClient),
            config: Config::for_tests(upload_dir.to_path_buf()),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn create_acme(app: &Router) -> i64 {
        let (status, _, body) = send(
            app,
            post_json("/api/accounts", json!({"name": "Acme", "company": "Acme Co"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice::<Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap()
    }

    async fn generate(app: &Router, account_id: i64) -> i64 {
        let (status, _, body) = send(
            app,
            post_json(
                "/api/sows/generate",
                json!({
                    "account_id": account_id.to_string(),
                    "template_id": "",
                    "project_notes": "Build a widget",
                    "deliverables": "1. Widget\n2. Docs"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice::<Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let (status, _, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["service"], "sowgen");
    }

    #[tokio::test]
    async fn test_blank_account_name_is_rejected_with_error_body() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let (status, _, body) = send(&app, post_json("/api/accounts", json!({"name": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_then_export_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let account_id = create_acme(&app).await;
        let sow_id = generate(&app, account_id).await;

        let (status, headers, body) = send(&app, get(&format!("/api/export/{sow_id}/txt"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"SOW-Acme-"));
        assert!(disposition.ends_with(".txt\""));

        let text = String::from_utf8(body).unwrap();
        let rule = "=".repeat(50);
        assert!(text.starts_with(&format!("STATEMENT OF WORK\n{rule}\n")));
        assert!(text.contains("Account: Acme\nCompany: Acme Co\n"));
        assert!(text.ends_with(&format!("{rule}\n\n## Scope\nHello SOW")));
    }

    #[tokio::test]
    async fn test_export_docx_is_a_zip_package() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let account_id = create_acme(&app).await;
        let sow_id = generate(&app, account_id).await;

        let (status, headers, body) = send(&app, get(&format!("/api/export/{sow_id}/docx"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_format_and_missing_sow() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let account_id = create_acme(&app).await;
        let sow_id = generate(&app, account_id).await;

        let (status, _, _) = send(&app, get(&format!("/api/export/{sow_id}/html"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, get("/api/export/9999/pdf")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_is_html() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let account_id = create_acme(&app).await;
        let sow_id = generate(&app, account_id).await;

        let (status, headers, body) = send(&app, get(&format!("/api/sows/{sow_id}/preview"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(">Scope</h2>"));
        assert!(html.contains("<p>Hello SOW</p>"));
    }

    #[tokio::test]
    async fn test_deleting_account_cascades_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        let account_id = create_acme(&app).await;
        let sow_id = generate(&app, account_id).await;

        let (status, _, body) = send(
            &app,
            Request::delete(format!("/api/accounts/{account_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Account deleted successfully");

        let (status, _, _) = send(&app, get(&format!("/api/sows/{sow_id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn multipart(file_name: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             House style\r\n\
             --XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {contents}\r\n\
             --XBOUNDARY--\r\n"
        );
        Request::post("/api/templates")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_text_template_stores_file_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        let (status, _, body) = send(&app, multipart("style.TXT", "Open with a summary.")).await;
        assert_eq!(status, StatusCode::CREATED);
        let template: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(template["name"], "House style");
        assert_eq!(template["file_type"], ".txt");
        assert_eq!(template["content"], "Open with a summary.");

        let stored = template["file_path"].as_str().unwrap();
        assert!(std::path::Path::new(stored).exists());

        let id = template["id"].as_i64().unwrap();
        let (status, _, _) = send(
            &app,
            Request::delete(format!("/api/templates/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!std::path::Path::new(stored).exists());
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        let (status, _, _) = send(&app, multipart("payload.exe", "MZ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
