use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    SuperAdmin,
    /// Role names this client does not know yet, kept verbatim.
    Other(String),
}

impl Role {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::SuperAdmin => "Super Admin",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "superadmin" => Self::SuperAdmin,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "admin".to_string(),
            Role::SuperAdmin => "superadmin".to_string(),
            Role::Other(value) => value,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub role: Role,
    // The list endpoint omits the flag; accounts are active unless disabled.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl AdminAccount {
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.active { "Active" } else { "Disabled" }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub user_id: u64,
    pub active: bool,
}

/// Carries a new password; intentionally not `Debug`.
#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub user_id: u64,
    pub password: &'a str,
}

/// New admin account; carries a password, so intentionally not `Debug`.
#[derive(Serialize)]
pub struct CreateAdminRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnlockAccountRequest {
    pub user_id: u64,
}
