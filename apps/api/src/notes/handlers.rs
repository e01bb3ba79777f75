//! Axum route handlers for the Note Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::CONNECTIVITY_CHECK_PROMPT;
use crate::llm_client::GenerationResult;
use crate::models::note::{NoteKind, Prompt};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for note generation. `content` / `noteType` are accepted
/// as aliases for older clients.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNoteRequest {
    #[serde(default, alias = "content")]
    pub raw_text: Option<String>,
    #[serde(default, alias = "noteType")]
    pub note_kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNoteResponse {
    pub success: bool,
    pub content: String,
    pub note_kind: NoteKind,
}

/// Mirrors `GenerationResult` on the wire: `content` on success, `error` on failure.
#[derive(Debug, Serialize)]
pub struct TestGenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<GenerationResult> for TestGenerationResponse {
    fn from(result: GenerationResult) -> Self {
        match result {
            GenerationResult::Succeeded { content } => Self {
                success: true,
                content: Some(content),
                error: None,
            },
            GenerationResult::Failed { message } => Self {
                success: false,
                content: None,
                error: Some(message),
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-note
///
/// Validates the note kind and text, builds the template prompt and sends it
/// to the generator. Unsupported kinds never reach the generator.
pub async fn handle_generate_note(
    State(state): State<AppState>,
    payload: Result<Json<GenerateNoteRequest>, JsonRejection>,
) -> Result<Json<GenerateNoteResponse>, AppError> {
    let Json(request) = payload?;

    let raw_kind = request
        .note_kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Validation("noteKind is required".to_string()))?;
    let kind = state.prompts.resolve_kind(raw_kind).inspect_err(|_| {
        warn!("Rejected note request with unsupported kind '{raw_kind}'");
    })?;

    let raw_text = request
        .raw_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("rawText cannot be empty".to_string()))?;

    let prepared = state.prompts.prepare(raw_text, kind)?;

    let span = info_span!(
        "generate_note",
        request_id = %Uuid::new_v4(),
        note_kind = %prepared.kind,
        subject = %prepared.subject,
    );

    async move {
        info!("Generating {} note", prepared.kind);
        match state.generator.generate(&prepared.prompt).await {
            GenerationResult::Succeeded { content } => {
                info!("Generated note ({} chars)", content.len());
                Ok(Json(GenerateNoteResponse {
                    success: true,
                    content,
                    note_kind: prepared.kind,
                }))
            }
            GenerationResult::Failed { message } => Err(AppError::Generation(message)),
        }
    }
    .instrument(span)
    .await
}

/// POST /api/test-generation (also served at /api/test-claude)
///
/// Connectivity smoke test: sends a fixed prompt through the same generator.
/// Always answers 200; a failed call is reported as `{success: false, error}`.
pub async fn handle_test_generation(
    State(state): State<AppState>,
) -> Json<TestGenerationResponse> {
    let prompt = Prompt::new(CONNECTIVITY_CHECK_PROMPT);
    Json(state.generator.generate(&prompt).await.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_spec_field_names() {
        let request: GenerateNoteRequest = serde_json::from_value(serde_json::json!({
            "rawText": "Create a book note for Dune",
            "noteKind": "book"
        }))
        .unwrap();
        assert_eq!(request.raw_text.as_deref(), Some("Create a book note for Dune"));
        assert_eq!(request.note_kind.as_deref(), Some("book"));
    }

    #[test]
    fn test_request_accepts_legacy_field_names() {
        let request: GenerateNoteRequest = serde_json::from_value(serde_json::json!({
            "content": "Create a book note for Dune",
            "noteType": "book"
        }))
        .unwrap();
        assert_eq!(request.raw_text.as_deref(), Some("Create a book note for Dune"));
        assert_eq!(request.note_kind.as_deref(), Some("book"));
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = GenerateNoteResponse {
            success: true,
            content: "# Dune".to_string(),
            note_kind: NoteKind::Book,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": true, "content": "# Dune", "noteKind": "book"})
        );
    }

    #[test]
    fn test_connectivity_failure_serializes_error_only() {
        let response = TestGenerationResponse::from(GenerationResult::Failed {
            message: "The generation service timed out".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"success": false, "error": "The generation service timed out"})
        );
    }
}
