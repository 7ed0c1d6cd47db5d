//! Receipt document downloads.
//!
//! Rendering is CPU-bound, so it runs on the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use optic_core::{Receipt, ReceiptDraft};
use optic_print::RenderOptions;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/receipts/generate-pdf", post(generate_pdf))
        .route("/api/receipts/{id}/pdf", get(receipt_pdf))
}

/// `POST /api/receipts/generate-pdf`: prints the form without storing it.
pub async fn generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ReceiptDraft>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(draft) = payload?;
    pdf_response(draft.finalize(), state.render.clone()).await
}

/// `GET /api/receipts/{id}/pdf`: prints a stored receipt.
pub async fn receipt_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let receipt = state
        .db
        .receipts()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Receipt", &id))?;

    pdf_response(receipt, state.render.clone()).await
}

async fn pdf_response(receipt: Receipt, options: Arc<RenderOptions>) -> ApiResult<Response> {
    let filename = optic_print::suggested_filename(&receipt);
    let receipt_id = receipt.id.clone().unwrap_or_default();

    let bytes = tokio::task::spawn_blocking(move || optic_print::render_receipt(&receipt, &options))
        .await
        .map_err(|e| ApiError::internal(format!("Render task failed: {}", e)))??;

    info!(receipt_id = %receipt_id, filename = %filename, bytes = bytes.len(), "Receipt document generated");

    Ok((
        [
            (header::CONTENT_TYPE, optic_print::CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
