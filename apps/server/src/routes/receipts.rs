//! Receipt endpoints.
//!
//! Request bodies are [`ReceiptDraft`]s: the form state as the browser
//! holds it, read leniently. Every figure in a response comes from the
//! calculator, whatever totals the browser sent.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use optic_core::{LineItem, Receipt, ReceiptDraft, Totals};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/receipts", get(list_receipts).post(create_receipt))
        .route("/api/receipts/quote", post(quote_receipt))
        .route(
            "/api/receipts/{id}",
            get(get_receipt).delete(delete_receipt),
        )
}

/// Live calculator output for the receipt form.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    /// Line items after sanitizing, with the assurance tax line if any.
    pub products: Vec<LineItem>,
    pub totals: Totals,
}

/// `GET /api/receipts`: newest first.
pub async fn list_receipts(State(state): State<AppState>) -> ApiResult<Json<Vec<Receipt>>> {
    let receipts = state.db.receipts().list().await?;
    debug!(count = receipts.len(), "Listed receipts");
    Ok(Json(receipts))
}

/// `POST /api/receipts`: finalizes the draft and stores it.
pub async fn create_receipt(
    State(state): State<AppState>,
    payload: Result<Json<ReceiptDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let Json(draft) = payload?;

    let receipt = state.db.receipts().insert(&draft.finalize()).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `POST /api/receipts/quote`: totals for the form; nothing is stored.
pub async fn quote_receipt(
    payload: Result<Json<ReceiptDraft>, JsonRejection>,
) -> ApiResult<Json<QuoteResponse>> {
    let Json(draft) = payload?;

    let receipt = draft.finalize();
    let totals = receipt.totals();
    Ok(Json(QuoteResponse {
        products: receipt.products,
        totals,
    }))
}

/// `GET /api/receipts/{id}`
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Receipt>> {
    state
        .db
        .receipts()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Receipt", &id))
}

/// `DELETE /api/receipts/{id}`
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.receipts().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
