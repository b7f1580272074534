//! HTTP handlers for script generation.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::validator::ValidationOutcome;
use crate::parsers::TemplateType;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScriptResponse {
    pub script: String,
    pub template_type: &'static str,
    pub outcome: ValidationOutcome,
}

/// POST /api/v1/scripts
///
/// Multipart form with two fields: `file` (the .docx upload) and
/// `template_type` ("ats" or "industry").
pub async fn generate_script(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScriptResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    let mut template_type: Option<TemplateType> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable file upload: {e}")))?;
                file = Some(bytes);
            }
            "template_type" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("unreadable template_type field: {e}"))
                })?;
                template_type = Some(TemplateType::parse(&text)?);
            }
            // Unknown fields are ignored, not rejected.
            _ => {}
        }
    }

    let file =
        file.ok_or_else(|| AppError::Validation("missing required field 'file'".to_string()))?;
    let template_type = template_type.ok_or_else(|| {
        AppError::Validation("missing required field 'template_type'".to_string())
    })?;

    let script = super::process_resume(&state, &file, template_type).await?;

    Ok(Json(ScriptResponse {
        script: script.text,
        template_type: template_type.as_str(),
        outcome: script.outcome,
    }))
}
