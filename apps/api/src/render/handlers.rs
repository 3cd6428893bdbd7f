use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::Html,
};
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::models::sow::SowDetail;
use crate::render::{export_file_name, html, renderer_for, Capability, FontSource, SowHeader};
use crate::sows::store;
use crate::state::AppState;

async fn load_sow(state: &AppState, id: i64) -> Result<SowDetail, AppError> {
    store::get_sow(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SOW {id} not found")))
}

/// GET /api/export/:id/:format
///
/// `format` is one of `pdf`, `docx`, `txt`. The SOW is looked up before any
/// rendering starts, so an unknown id never pays for font loading.
pub async fn handle_export(
    State(state): State<AppState>,
    Path((id, format)): Path<(i64, String)>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let capability = Capability::from_format(&format).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported export format '{format}'; expected pdf, docx or txt"
        ))
    })?;

    let sow = load_sow(&state, id).await?;
    let header = SowHeader::from_sow(&sow);
    let fonts = FontSource {
        dir: state.config.font_dir.clone(),
        family: state.config.font_family.clone(),
    };

    let content = sow.content;
    let bytes = tokio::task::spawn_blocking(move || {
        renderer_for(capability, &fonts).render(&header, &content)
    })
    .await
    .map_err(|e| AppError::Render(format!("render task failed: {e}")))??;

    let file_name = export_file_name(&sow.account_name, Utc::now(), capability);
    info!("Exported SOW {id} as {} ({} bytes)", capability.extension(), bytes.len());

    Ok((attachment_headers(capability, &file_name)?, bytes))
}

/// GET /api/sows/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let sow = load_sow(&state, id).await?;
    Ok(Html(html::render_fragment(&sow.content)))
}

fn attachment_headers(capability: Capability, file_name: &str) -> Result<HeaderMap, AppError> {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file_name.replace(['"', '\\'], "_")
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(capability.content_type()),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_bytes(disposition.as_bytes())
            .map_err(|e| AppError::Render(format!("invalid Content-Disposition: {e}")))?,
    );
    Ok(headers)
}
