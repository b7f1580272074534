pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::generation::handlers::generate_script;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/scripts", post(generate_script))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::generation::backend::{DecodingConfig, ScriptBackend};
    use crate::metrics::TracingMetrics;
    use crate::profiles::ProfileSet;
    use async_trait::async_trait;

    struct FailingBackend;

    #[async_trait]
    impl ScriptBackend for FailingBackend {
        async fn generate(&self, _: &str, _: &DecodingConfig) -> Result<String, AppError> {
            Err(AppError::Generation("backend down".to_string()))
        }
    }

    fn test_router() -> Router {
        build_router(AppState {
            backend: Arc::new(FailingBackend),
            profiles: Arc::new(ProfileSet::load(None).unwrap()),
            metrics: Arc::new(TracingMetrics),
            config: Config {
                generator_url: "http://localhost:8081".to_string(),
                generator_timeout_secs: 1,
                profiles_path: None,
                port: 8080,
                rust_log: "info".to_string(),
            },
        })
    }

    fn resume_docx() -> Vec<u8> {
        let xml = r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Emily Johnson</w:t></w:r></w:p><w:p><w:r><w:t>emily@example.com | (555) 123-4567</w:t></w:r></w:p></w:body></w:document>"#;
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut archive = zip::ZipWriter::new(&mut buf);
            archive
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            archive.write_all(xml.as_bytes()).unwrap();
            archive.finish().unwrap();
        }
        buf.into_inner()
    }

    fn multipart_request(file: &[u8], template_type: &str) -> Request<Body> {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"resume.docx\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(
            format!(
                "\r\n--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"template_type\"\r\n\r\n{template_type}\r\n--{boundary}--\r\n"
            )
            .as_bytes(),
        );
        Request::post("/api/v1/scripts")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "scriptcast");
    }

    #[tokio::test]
    async fn test_script_request_succeeds_even_when_backend_is_down() {
        let response = test_router()
            .oneshot(multipart_request(&resume_docx(), "ats"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["template_type"], "ats");
        assert_eq!(body["outcome"], "fallback");
        let script = body["script"].as_str().unwrap();
        assert!(script.contains("Emily Johnson"));
        assert!(script.contains("1. Introduction"));
        assert!(script.contains("6. Contact"));
    }

    #[tokio::test]
    async fn test_unknown_template_type_is_rejected() {
        let response = test_router()
            .oneshot(multipart_request(&resume_docx(), "executive"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_TEMPLATE");
    }

    #[tokio::test]
    async fn test_non_docx_upload_is_unprocessable() {
        let response = test_router()
            .oneshot(multipart_request(b"plain text, not a document", "ats"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_a_validation_error() {
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; \
             name=\"template_type\"\r\n\r\nats\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/v1/scripts")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
