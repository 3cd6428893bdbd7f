// Prompt text for SOW generation. Placeholders are filled by `build_prompt`.

use crate::models::account::AccountRow;

/// Shown for any account field the user left empty.
pub const MISSING_FIELD: &str = "N/A";

/// Stored as the SOW body when the completion payload carries no text.
pub const NO_RESPONSE_TEXT: &str = "No response text available.";

/// The sections every generated SOW must contain, in order.
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Project Scope",
    "Deliverables",
    "Timeline",
    "Terms and Conditions",
    "Acceptance Criteria",
];

/// Replace `{name}`, `{company}`, `{email}`, `{phone}`, `{address}`,
/// `{project_notes}`, `{deliverables}`, `{sections}` and `{template_section}`.
pub const SOW_PROMPT_TEMPLATE: &str = r#"Generate a professional Statement of Work (SOW) document for the following client and project.

CLIENT INFORMATION:
- Name: {name}
- Company: {company}
- Email: {email}
- Phone: {phone}
- Address: {address}

PROJECT NOTES:
{project_notes}

DELIVERABLES:
{deliverables}
{template_section}
The SOW must include the following sections:
{sections}

Format section titles as markdown headers (## for sections, ### for subsections).
Use markdown tables with a header row where tabular data helps (for example the timeline).
Write in a clear, professional tone suitable for a client-facing contract."#;

/// Precedes the template excerpt. Replace `{template_content}`.
pub const TEMPLATE_PREFACE: &str = r#"
Use the following template as a reference for structure, tone, and formatting:

--- TEMPLATE START ---
{template_content}
--- TEMPLATE END ---
"#;

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_FIELD)
}

/// Fills the generation prompt. `template_content` is included verbatim when present.
pub fn build_prompt(
    account: &AccountRow,
    project_notes: &str,
    deliverables: &str,
    template_content: Option<&str>,
) -> String {
    let sections = REQUIRED_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {section}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let template_section = template_content
        .map(|content| TEMPLATE_PREFACE.replace("{template_content}", content))
        .unwrap_or_default();

    // Template text goes in last so braces inside it are never treated as placeholders.
    SOW_PROMPT_TEMPLATE
        .replace("{name}", &account.name)
        .replace("{company}", or_missing(account.company.as_deref()))
        .replace("{email}", or_missing(account.email.as_deref()))
        .replace("{phone}", or_missing(account.phone.as_deref()))
        .replace("{address}", or_missing(account.address.as_deref()))
        .replace("{sections}", &sections)
        .replace("{project_notes}", project_notes)
        .replace("{deliverables}", deliverables)
        .replace("{template_section}", &template_section)
}
