//! Persistence for generated SOWs. Every read returns the joined `SowDetail`.

use sqlx::SqlitePool;
use tracing::info;

use crate::models::sow::{NewSow, SowDetail};

const SELECT_DETAIL: &str = r#"
    SELECT s.id, s.account_id, s.template_id, s.project_notes, s.deliverables,
           s.content, s.created_at,
           a.name AS account_name, a.company AS account_company, a.email AS account_email,
           t.name AS template_name
    FROM sows s
    JOIN accounts a ON a.id = s.account_id
    LEFT JOIN templates t ON t.id = s.template_id
"#;

const NEWEST_FIRST: &str = "ORDER BY s.created_at DESC, s.id DESC";

pub async fn list_sows(pool: &SqlitePool) -> Result<Vec<SowDetail>, sqlx::Error> {
    sqlx::query_as::<_, SowDetail>(&format!("{SELECT_DETAIL} {NEWEST_FIRST}"))
        .fetch_all(pool)
        .await
}

pub async fn list_sows_by_account(
    pool: &SqlitePool,
    account_id: i64,
) -> Result<Vec<SowDetail>, sqlx::Error> {
    sqlx::query_as::<_, SowDetail>(&format!(
        "{SELECT_DETAIL} WHERE s.account_id = ? {NEWEST_FIRST}"
    ))
    .bind(account_id)
    .fetch_all(pool)
    .await
}

pub async fn get_sow(pool: &SqlitePool, id: i64) -> Result<Option<SowDetail>, sqlx::Error> {
    sqlx::query_as::<_, SowDetail>(&format!("{SELECT_DETAIL} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Inserts the SOW and returns its id. The account must exist; a dangling
/// `account_id` is rejected by the foreign key.
pub async fn create_sow(pool: &SqlitePool, sow: NewSow<'_>) -> Result<i64, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO sows (account_id, template_id, project_notes, deliverables, content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(sow.account_id)
    .bind(sow.template_id)
    .bind(sow.project_notes)
    .bind(sow.deliverables)
    .bind(sow.content)
    .execute(pool)
    .await?
    .last_insert_rowid();

    info!("Created SOW {id} for account {}", sow.account_id);
    Ok(id)
}

/// Returns false when no SOW had this id.
pub async fn delete_sow(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM sows WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected > 0 {
        info!("Deleted SOW {id}");
    }
    Ok(affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::store::{create_account, delete_account};
    use crate::db::test_pool;
    use crate::models::account::AccountInput;
    use crate::models::template::TemplateKind;
    use crate::templates::store::{create_template, delete_template, NewTemplate};

    async fn account(pool: &SqlitePool, name: &str) -> i64 {
        create_account(
            pool,
            &AccountInput {
                name: name.to_string(),
                company: Some(format!("{name} Co")),
                email: Some(format!("ops@{}.test", name.to_lowercase())),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn sow(pool: &SqlitePool, account_id: i64, template_id: Option<i64>) -> i64 {
        create_sow(
            pool,
            NewSow {
                account_id,
                template_id,
                project_notes: "Build a widget",
                deliverables: "1. Widget",
                content: "Hello SOW",
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_sow_joins_display_fields() {
        let pool = test_pool().await;
        let account_id = account(&pool, "Acme").await;
        let id = sow(&pool, account_id, None).await;

        let detail = get_sow(&pool, id).await.unwrap().unwrap();
        assert_eq!(detail.account_name, "Acme");
        assert_eq!(detail.account_company.as_deref(), Some("Acme Co"));
        assert_eq!(detail.account_email.as_deref(), Some("ops@acme.test"));
        assert_eq!(detail.template_name, None);
        assert_eq!(detail.content, "Hello SOW");
    }

    #[tokio::test]
    async fn test_get_missing_sow_is_none() {
        let pool = test_pool().await;
        assert!(get_sow(&pool, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_account_filters_and_orders_newest_first() {
        let pool = test_pool().await;
        let acme = account(&pool, "Acme").await;
        let globex = account(&pool, "Globex").await;
        let first = sow(&pool, acme, None).await;
        sow(&pool, globex, None).await;
        let second = sow(&pool, acme, None).await;

        let ids: Vec<i64> = list_sows_by_account(&pool, acme)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(list_sows(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_sow_for_missing_account_fails() {
        let pool = test_pool().await;
        let result = create_sow(
            &pool,
            NewSow {
                account_id: 999,
                template_id: None,
                project_notes: "n",
                deliverables: "d",
                content: "c",
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deleting_account_removes_all_of_its_sows() {
        let pool = test_pool().await;
        let acme = account(&pool, "Acme").await;
        let globex = account(&pool, "Globex").await;
        for _ in 0..3 {
            sow(&pool, acme, None).await;
        }
        let kept = sow(&pool, globex, None).await;

        assert!(delete_account(&pool, acme).await.unwrap());

        let remaining: Vec<i64> = list_sows(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(remaining, vec![kept]);
    }

    #[tokio::test]
    async fn test_deleting_template_clears_reference_but_keeps_sow() {
        let pool = test_pool().await;
        let acme = account(&pool, "Acme").await;
        let template = create_template(
            &pool,
            NewTemplate {
                name: "Standard",
                file_path: "uploads/standard.txt",
                file_type: TemplateKind::PlainText,
                content: Some("Use our layout"),
            },
        )
        .await
        .unwrap();
        let id = sow(&pool, acme, Some(template.id)).await;
        assert_eq!(
            get_sow(&pool, id).await.unwrap().unwrap().template_name.as_deref(),
            Some("Standard")
        );

        delete_template(&pool, template.id).await.unwrap().unwrap();

        let detail = get_sow(&pool, id).await.unwrap().unwrap();
        assert_eq!(detail.template_id, None);
        assert_eq!(detail.template_name, None);
        assert_eq!(detail.content, "Hello SOW");
    }

    #[tokio::test]
    async fn test_delete_sow_reports_whether_it_existed() {
        let pool = test_pool().await;
        let acme = account(&pool, "Acme").await;
        let id = sow(&pool, acme, None).await;

        assert!(delete_sow(&pool, id).await.unwrap());
        assert!(!delete_sow(&pool, id).await.unwrap());
    }
}
