use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Fields accepted when creating or replacing an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountInput {
    #[serde(default)]
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl AccountInput {
    /// Trims every field and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        AccountInput {
            name: self.name.trim().to_string(),
            company: clean(self.company),
            email: clean(self.email),
            phone: clean(self.phone),
            address: clean(self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_optionals() {
        let input = AccountInput {
            name: "  Acme ".to_string(),
            company: Some("   ".to_string()),
            email: Some(" ops@acme.test ".to_string()),
            phone: None,
            address: Some(String::new()),
        }
        .normalized();

        assert_eq!(input.name, "Acme");
        assert_eq!(input.company, None);
        assert_eq!(input.email.as_deref(), Some("ops@acme.test"));
        assert_eq!(input.address, None);
    }
}
