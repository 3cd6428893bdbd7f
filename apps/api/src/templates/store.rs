//! Persistence for uploaded templates.

use sqlx::SqlitePool;
use tracing::info;

use crate::models::template::{TemplateKind, TemplateRow};

/// Values persisted for a freshly uploaded template.
#[derive(Debug, Clone)]
pub struct NewTemplate<'a> {
    pub name: &'a str,
    pub file_path: &'a str,
    pub file_type: TemplateKind,
    pub content: Option<&'a str>,
}

pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<TemplateRow>, sqlx::Error> {
    sqlx::query_as::<_, TemplateRow>(
        "SELECT * FROM templates ORDER BY uploaded_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_template(pool: &SqlitePool, id: i64) -> Result<Option<TemplateRow>, sqlx::Error> {
    sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_template(
    pool: &SqlitePool,
    template: NewTemplate<'_>,
) -> Result<TemplateRow, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO templates (name, file_path, file_type, content) VALUES (?, ?, ?, ?)",
    )
    .bind(template.name)
    .bind(template.file_path)
    .bind(template.file_type)
    .bind(template.content)
    .execute(pool)
    .await?
    .last_insert_rowid();

    info!(
        "Created template {id} ({}, content extracted: {})",
        template.file_type,
        template.content.is_some()
    );

    sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Deletes the template row and returns it, so the caller can clean up the stored file.
/// SOWs that referenced it keep existing with `template_id` set to NULL.
pub async fn delete_template(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<TemplateRow>, sqlx::Error> {
    let Some(existing) = get_template(pool, id).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM templates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    info!("Deleted template {id}");
    Ok(Some(existing))
}
