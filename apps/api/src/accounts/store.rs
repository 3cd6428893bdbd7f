//! Persistence for client accounts.

use sqlx::SqlitePool;
use tracing::info;

use crate::models::account::{AccountInput, AccountRow};

pub async fn list_accounts(pool: &SqlitePool) -> Result<Vec<AccountRow>, sqlx::Error> {
    sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_account(pool: &SqlitePool, id: i64) -> Result<Option<AccountRow>, sqlx::Error> {
    sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Inserts a new account and returns the stored row.
/// Callers are expected to pass a normalized input with a non-blank name.
pub async fn create_account(
    pool: &SqlitePool,
    input: &AccountInput,
) -> Result<AccountRow, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO accounts (name, company, email, phone, address)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.company)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .execute(pool)
    .await?
    .last_insert_rowid();

    info!("Created account {id}");

    sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Replaces every editable field. Returns `None` when the account does not exist.
pub async fn update_account(
    pool: &SqlitePool,
    id: i64,
    input: &AccountInput,
) -> Result<Option<AccountRow>, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        UPDATE accounts
        SET name = ?, company = ?, email = ?, phone = ?, address = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.company)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Ok(None);
    }

    info!("Updated account {id}");
    get_account(pool, id).await
}

/// Deletes the account and, through the foreign key, all of its SOWs.
/// Returns false when nothing was deleted.
pub async fn delete_account(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected > 0 {
        info!("Deleted account {id}");
    }
    Ok(affected > 0)
}
