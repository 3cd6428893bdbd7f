//! SOW generation: validate input → resolve account and template → build prompt →
//! one completion call → persist → return the stored SOW.
//!
//! Nothing is written unless the completion call succeeds.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::accounts::store::get_account;
use crate::completion::CompletionClient;
use crate::errors::AppError;
use crate::models::sow::{NewSow, SowDetail};
use crate::sows::prompts::{build_prompt, NO_RESPONSE_TEXT};
use crate::sows::store::{create_sow, get_sow};
use crate::templates::store::get_template;

/// Request body for `POST /api/sows/generate`.
///
/// Ids may arrive as numbers or numeric strings; an empty string counts as absent,
/// which is what a browser form sends for "no template".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub account_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub project_notes: Option<String>,
    #[serde(default)]
    pub deliverables: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(RawId::Text(raw)) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id '{raw}'"))),
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Generates and stores a SOW.
///
/// Errors: `Validation` for missing fields (no completion call is made),
/// `NotFound` for an unknown account, `Upstream` when the completion call fails.
/// An unknown or empty template is ignored and stored as absent.
pub async fn generate_sow(
    pool: &SqlitePool,
    client: &dyn CompletionClient,
    req: GenerateRequest,
) -> Result<SowDetail, AppError> {
    let account_id = req
        .account_id
        .ok_or_else(|| AppError::Validation("account_id is required".to_string()))?;
    let project_notes = required(&req.project_notes, "project_notes")?;
    let deliverables = required(&req.deliverables, "deliverables")?;

    let account = get_account(pool, account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {account_id} not found")))?;

    let template = match req.template_id {
        Some(template_id) => {
            let found = get_template(pool, template_id).await?;
            if found.is_none() {
                warn!("Template {template_id} not found; generating without it");
            }
            found
        }
        None => None,
    };
    let template_content = template
        .as_ref()
        .and_then(|t| t.content.as_deref())
        .filter(|c| !c.trim().is_empty());

    let prompt = build_prompt(&account, project_notes, deliverables, template_content);
    info!(
        "Generating SOW for account {account_id} (template: {:?}, prompt: {} chars)",
        template.as_ref().map(|t| t.id),
        prompt.len()
    );

    let completion = client.complete(&prompt).await?;
    let content = match completion.text {
        Some(text) => text,
        None => {
            warn!(
                "Completion for account {account_id} had no text (status: {:?}); storing placeholder",
                completion.status
            );
            NO_RESPONSE_TEXT.to_string()
        }
    };

    let id = create_sow(
        pool,
        NewSow {
            account_id,
            template_id: template.as_ref().map(|t| t.id),
            project_notes,
            deliverables,
            content: &content,
        },
    )
    .await?;

    get_sow(pool, id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("SOW {id} vanished after insert")))
}
