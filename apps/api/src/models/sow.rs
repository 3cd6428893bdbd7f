use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A generated Statement of Work joined with its account and template display fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SowDetail {
    pub id: i64,
    pub account_id: i64,
    pub template_id: Option<i64>,
    pub project_notes: String,
    pub deliverables: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub account_name: String,
    pub account_company: Option<String>,
    pub account_email: Option<String>,
    pub template_name: Option<String>,
}

/// Values persisted for a freshly generated SOW.
#[derive(Debug, Clone)]
pub struct NewSow<'a> {
    pub account_id: i64,
    pub template_id: Option<i64>,
    pub project_notes: &'a str,
    pub deliverables: &'a str,
    pub content: &'a str,
}
