use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::sow::SowDetail;
use crate::sows::generator::{generate_sow, GenerateRequest};
use crate::sows::store;
use crate::state::AppState;

/// GET /api/sows
pub async fn handle_list_sows(
    State(state): State<AppState>,
) -> Result<Json<Vec<SowDetail>>, AppError> {
    Ok(Json(store::list_sows(&state.db).await?))
}

/// GET /api/sows/:id
pub async fn handle_get_sow(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SowDetail>, AppError> {
    store::get_sow(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("SOW {id} not found")))
}

/// GET /api/sows/account/:account_id
///
/// An unknown account simply has no SOWs.
pub async fn handle_list_sows_by_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<SowDetail>>, AppError> {
    Ok(Json(
        store::list_sows_by_account(&state.db, account_id).await?,
    ))
}

/// POST /api/sows/generate
pub async fn handle_generate_sow(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<SowDetail>), AppError> {
    let sow = generate_sow(&state.db, state.completion.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(sow)))
}

/// DELETE /api/sows/:id
pub async fn handle_delete_sow(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !store::delete_sow(&state.db, id).await? {
        return Err(AppError::NotFound(format!("SOW {id} not found")));
    }
    Ok(Json(json!({ "message": "SOW deleted successfully" })))
}
