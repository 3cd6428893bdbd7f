use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::accounts::store;
use crate::errors::AppError;
use crate::models::account::{AccountInput, AccountRow};
use crate::state::AppState;

fn validated(input: AccountInput) -> Result<AccountInput, AppError> {
    let input = input.normalized();
    if input.name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    Ok(input)
}

/// GET /api/accounts
pub async fn handle_list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountRow>>, AppError> {
    Ok(Json(store::list_accounts(&state.db).await?))
}

/// GET /api/accounts/:id
pub async fn handle_get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountRow>, AppError> {
    store::get_account(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Account {id} not found")))
}

/// POST /api/accounts
pub async fn handle_create_account(
    State(state): State<AppState>,
    Json(input): Json<AccountInput>,
) -> Result<(StatusCode, Json<AccountRow>), AppError> {
    let input = validated(input)?;
    let account = store::create_account(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/accounts/:id
pub async fn handle_update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AccountInput>,
) -> Result<Json<AccountRow>, AppError> {
    let input = validated(input)?;
    store::update_account(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Account {id} not found")))
}

/// DELETE /api/accounts/:id
///
/// Removes the account together with every SOW generated for it.
pub async fn handle_delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !store::delete_account(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Account {id} not found")));
    }
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
