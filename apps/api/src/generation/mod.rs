//! The resume-to-script pipeline.
//!
//! One request flows load → extract sections → parse → classify industry →
//! build prompt → generate → validate. Generation failures and timeouts are
//! absorbed here: they route the request to the deterministic fallback script
//! instead of an error response.

pub mod backend;
pub mod handlers;
pub mod prompts;
pub mod validator;

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::backend::DecodingConfig;
use crate::generation::validator::GeneratedScript;
use crate::metrics::{RequestMetrics, RequestOutcome};
use crate::parsers::TemplateType;
use crate::state::AppState;
use crate::{loader, parsers, sections};

/// Runs the full pipeline for one uploaded document and records per-request
/// metrics regardless of how it ends.
pub async fn process_resume(
    state: &AppState,
    bytes: &[u8],
    template_type: TemplateType,
) -> Result<GeneratedScript, AppError> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let result = run_pipeline(state, bytes, template_type).await;

    let outcome = match &result {
        Ok(script) => RequestOutcome::from(script.outcome),
        Err(_) => RequestOutcome::Error,
    };
    state.metrics.record(&RequestMetrics {
        request_id,
        template_type: template_type.as_str(),
        duration: started.elapsed(),
        outcome,
    });

    result
}

async fn run_pipeline(
    state: &AppState,
    bytes: &[u8],
    template_type: TemplateType,
) -> Result<GeneratedScript, AppError> {
    let paragraphs = loader::load(bytes)?;
    let section_map = sections::extract(&paragraphs);
    let record = parsers::parser_for(template_type).parse(&paragraphs, &section_map)?;

    let profile = state.profiles.classify(&record);
    tracing::debug!(industry = %profile.id, role = %record.current_role, "classified resume");

    let prompt = prompts::build_prompt(&record, profile);
    let config = DecodingConfig::default();
    let timeout = Duration::from_secs(state.config.generator_timeout_secs);

    let raw = match tokio::time::timeout(timeout, state.backend.generate(&prompt, &config)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            tracing::warn!("generation failed, using fallback script: {e}");
            None
        }
        Err(_) => {
            tracing::warn!(
                "generation timed out after {}s, using fallback script",
                state.config.generator_timeout_secs
            );
            None
        }
    };

    Ok(validator::finalize(raw.as_deref(), &record, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generation::backend::ScriptBackend;
    use crate::generation::validator::ValidationOutcome;
    use crate::metrics::MetricsSink;
    use crate::profiles::ProfileSet;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubBackend {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl ScriptBackend for StubBackend {
        async fn generate(&self, _: &str, _: &DecodingConfig) -> Result<String, AppError> {
            self.reply
                .clone()
                .map_err(AppError::Generation)
        }
    }

    struct HangingBackend;

    #[async_trait]
    impl ScriptBackend for HangingBackend {
        async fn generate(&self, _: &str, _: &DecodingConfig) -> Result<String, AppError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        outcomes: Mutex<Vec<RequestOutcome>>,
    }

    impl MetricsSink for RecordingSink {
        fn record(&self, metrics: &RequestMetrics) {
            self.outcomes.lock().unwrap().push(metrics.outcome);
        }
    }

    fn state(backend: Arc<dyn ScriptBackend>, sink: Arc<RecordingSink>) -> AppState {
        AppState {
            backend,
            profiles: Arc::new(ProfileSet::load(None).unwrap()),
            metrics: sink,
            config: Config {
                generator_url: "http://localhost:8081".to_string(),
                generator_timeout_secs: 1,
                profiles_path: None,
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }

    fn docx_with(paragraphs: &[&str]) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

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

    fn minimal_resume() -> Vec<u8> {
        docx_with(&["Emily Johnson", "emily@example.com | (555) 123-4567"])
    }

    fn valid_script() -> String {
        "1. Introduction\nHi, I'm Emily Johnson, glad you're watching this.\n\
         2. Experience\nYears of people work behind me.\n\
         3. Skills\nHiring and onboarding.\n\
         4. Achievement\nBuilt a team from scratch.\n\
         5. Goals\nKeep growing great teams.\n\
         6. Contact\nemily@example.com"
            .to_string()
    }

    #[tokio::test]
    async fn test_pipeline_returns_validated_script() {
        let sink = Arc::new(RecordingSink::default());
        let state = state(
            Arc::new(StubBackend {
                reply: Ok(valid_script()),
            }),
            sink.clone(),
        );
        let script = process_resume(&state, &minimal_resume(), TemplateType::Ats)
            .await
            .unwrap();
        assert_eq!(script.outcome, ValidationOutcome::Validated);
        assert_eq!(
            *sink.outcomes.lock().unwrap(),
            vec![RequestOutcome::Validated]
        );
    }

    #[tokio::test]
    async fn test_backend_error_routes_to_fallback() {
        let sink = Arc::new(RecordingSink::default());
        let state = state(
            Arc::new(StubBackend {
                reply: Err("model server down".to_string()),
            }),
            sink.clone(),
        );
        let script = process_resume(&state, &minimal_resume(), TemplateType::Ats)
            .await
            .unwrap();
        assert_eq!(script.outcome, ValidationOutcome::Fallback);
        assert_eq!(
            *sink.outcomes.lock().unwrap(),
            vec![RequestOutcome::Fallback]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_timeout_routes_to_fallback() {
        let sink = Arc::new(RecordingSink::default());
        let state = state(Arc::new(HangingBackend), sink.clone());
        let script = process_resume(&state, &minimal_resume(), TemplateType::Ats)
            .await
            .unwrap();
        assert_eq!(script.outcome, ValidationOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_an_error() {
        let sink = Arc::new(RecordingSink::default());
        let state = state(
            Arc::new(StubBackend {
                reply: Ok(valid_script()),
            }),
            sink.clone(),
        );
        let err = process_resume(&state, b"not a docx", TemplateType::Ats)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert_eq!(*sink.outcomes.lock().unwrap(), vec![RequestOutcome::Error]);
    }
}
