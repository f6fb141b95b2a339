use crate::api::PageRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Login,
    Logout,
    CreateUser,
    ResetPassword,
    UpdateStatus,
    UnlockAccount,
    Other(String),
}

impl ActivityType {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::CreateUser => "Create user",
            Self::ResetPassword => "Reset password",
            Self::UpdateStatus => "Update status",
            Self::UnlockAccount => "Unlock account",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ActivityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "login" => Self::Login,
            "logout" => Self::Logout,
            "create_user" => Self::CreateUser,
            "reset_password" => Self::ResetPassword,
            "update_status" => Self::UpdateStatus,
            "unlock_account" => Self::UnlockAccount,
            _ => Self::Other(value),
        }
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        let value = match kind {
            ActivityType::Login => "login",
            ActivityType::Logout => "logout",
            ActivityType::CreateUser => "create_user",
            ActivityType::ResetPassword => "reset_password",
            ActivityType::UpdateStatus => "update_status",
            ActivityType::UnlockAccount => "unlock_account",
            ActivityType::Other(value) => return value,
        };
        value.to_string()
    }
}

/// One immutable activity log record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Username when the API joined it in, otherwise the numeric user id.
    #[must_use]
    pub fn actor(&self) -> String {
        if self.username.trim().is_empty() {
            format!("#{}", self.user_id)
        } else {
            self.username.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub page: PageRequest,
    pub user_id: Option<u64>,
}

impl LogQuery {
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.page.query();
        if let Some(user_id) = self.user_id {
            query.push(("user_id", user_id.to_string()));
        }
        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_decodes_offset_timestamps() {
        let entry: ActivityLogEntry = serde_json::from_value(json!({
            "id": 1,
            "user_id": 9,
            "activity_type": "update_status",
            "description": "User ID 4 deactivated",
            "ip_address": "10.0.0.1",
            "user_agent": "curl/8",
            "created_at": "2024-05-01T17:30:00+07:00"
        }))
        .unwrap();

        assert_eq!(entry.activity_type, ActivityType::UpdateStatus);
        assert_eq!(entry.created_at.to_rfc3339(), "2024-05-01T10:30:00+00:00");
        assert_eq!(entry.actor(), "#9");
    }

    #[test]
    fn unknown_activity_type_is_kept() {
        let kind: ActivityType = serde_json::from_value(json!("export_report")).unwrap();
        assert_eq!(kind.label(), "export_report");
        assert_eq!(String::from(ActivityType::UnlockAccount), "unlock_account");
    }

    #[test]
    fn log_query_adds_user_filter() {
        let query = LogQuery {
            page: PageRequest::default(),
            user_id: Some(4),
        };
        assert_eq!(
            query.query(),
            vec![
                ("page", "1".to_string()),
                ("page_size", "10".to_string()),
                ("user_id", "4".to_string()),
            ]
        );
        assert_eq!(LogQuery::default().query().len(), 2);
    }
}
