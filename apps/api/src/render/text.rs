//! Plain-text export: a fixed client-information preamble followed by the body
//! exactly as generated. No block classification is applied.

use crate::render::{Capability, RenderError, Renderer, SowHeader};

const RULE_WIDTH: usize = 50;

pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn capability(&self) -> Capability {
        Capability::PlainText
    }

    fn render(&self, header: &SowHeader, body: &str) -> Result<Vec<u8>, RenderError> {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::with_capacity(body.len() + 256);

        out.push_str("STATEMENT OF WORK\n");
        out.push_str(&rule);
        out.push_str("\n\nCLIENT INFORMATION\n");
        out.push_str(&format!("Account: {}\n", header.account_name));
        if let Some(company) = &header.company {
            out.push_str(&format!("Company: {company}\n"));
        }
        out.push_str(&format!("Date: {}\n\n", header.date_label()));
        out.push_str(&rule);
        out.push_str("\n\n");
        out.push_str(body);

        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(company: Option<&str>) -> SowHeader {
        SowHeader {
            account_name: "Acme".to_string(),
            company: company.map(str::to_string),
            contact: Some("ops@acme.test".to_string()),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 11, 20)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_preamble_then_verbatim_body() {
        let body = "## Scope\n| A | B |\n|---|---|\nplain";
        let bytes = PlainTextRenderer.render(&header(Some("Acme Co")), body).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let rule = "=".repeat(50);

        let expected = format!(
            "STATEMENT OF WORK\n{rule}\n\nCLIENT INFORMATION\nAccount: Acme\nCompany: Acme Co\nDate: 11/20/2024\n\n{rule}\n\n{body}"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_company_line_omitted_when_absent() {
        let bytes = PlainTextRenderer.render(&header(None), "x").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("Company:"));
        assert!(text.contains("Account: Acme\nDate: 11/20/2024"));
    }
}
