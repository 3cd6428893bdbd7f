use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::state::AppState;
use crate::templates::extract::extract_content;
use crate::templates::store::{self, NewTemplate};
use crate::templates::upload::{remove_file, store_file, validate_file_name};

/// The parts of a template upload form.
struct UploadForm {
    file_name: String,
    bytes: Bytes,
    name: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
                // Reject before buffering the body.
                validate_file_name(&file_name)?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                file = Some((file_name, bytes));
            }
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                name = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    Ok(UploadForm {
        file_name,
        bytes,
        name,
    })
}

/// GET /api/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateRow>>, AppError> {
    Ok(Json(store::list_templates(&state.db).await?))
}

/// GET /api/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateRow>, AppError> {
    store::get_template(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

/// POST /api/templates (multipart: `file`, optional `name`)
///
/// The file is written to disk before the row is inserted; a failure in between
/// leaves an orphaned file behind.
pub async fn handle_upload_template(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    let form = read_upload_form(multipart).await?;
    let kind = validate_file_name(&form.file_name)?;

    let path = store_file(&state.config.upload_dir, &form.file_name, &form.bytes).await?;
    let content = extract_content(kind, form.bytes, state.config.template_extract_all).await;

    let file_path = path.to_string_lossy();
    let name = form.name.as_deref().unwrap_or(&form.file_name);
    let template = store::create_template(
        &state.db,
        NewTemplate {
            name,
            file_path: &file_path,
            file_type: kind,
            content: content.as_deref(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// DELETE /api/templates/:id
///
/// SOWs generated from this template keep existing with their template reference cleared.
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let removed = store::delete_template(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;

    remove_file(FsPath::new(&removed.file_path)).await;

    Ok(Json(json!({ "message": "Template deleted successfully" })))
}
