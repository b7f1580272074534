//! Script generation backend client.
//!
//! The model server is an HTTP text-generation endpoint; `ScriptBackend` is
//! the seam that lets the pipeline (and tests) swap it for a stub. Backend
//! failures surface as `AppError::Generation`, which the pipeline converts
//! into the deterministic fallback script rather than a caller-facing error.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Decoding parameters sent with every generation request.
#[derive(Debug, Clone, Serialize)]
pub struct DecodingConfig {
    pub max_new_tokens: u32,
    pub min_new_tokens: u32,
    pub num_return_sequences: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        DecodingConfig {
            max_new_tokens: 800,
            min_new_tokens: 300,
            num_return_sequences: 1,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.2,
        }
    }
}

#[async_trait]
pub trait ScriptBackend: Send + Sync {
    /// Generates raw script text for a prompt. The returned text is
    /// unvalidated; the validator decides what to do with it.
    async fn generate(&self, prompt: &str, config: &DecodingConfig) -> Result<String, AppError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: &'a DecodingConfig,
}

/// Generation servers answer with either a bare object or a one-element
/// array, depending on `num_return_sequences` handling.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(Generated),
    Batch(Vec<Generated>),
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

/// HTTP client for the text-generation service.
pub struct HttpScriptBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScriptBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build generation HTTP client")?;
        Ok(HttpScriptBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ScriptBackend for HttpScriptBackend {
    async fn generate(&self, prompt: &str, config: &DecodingConfig) -> Result<String, AppError> {
        let url = format!("{}/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                inputs: prompt,
                parameters: config,
            })
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("generation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "generation backend returned {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("unreadable generation response: {e}")))?;

        let text = match parsed {
            GenerateResponse::Single(g) => g.generated_text,
            GenerateResponse::Batch(mut batch) => {
                if batch.is_empty() {
                    return Err(AppError::Generation(
                        "generation backend returned an empty batch".to_string(),
                    ));
                }
                batch.swap_remove(0).generated_text
            }
        };
        Ok(text)
    }
}
