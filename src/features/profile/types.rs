//! Types for the current-operator profile.

use crate::features::admins::Role;
use serde::Deserialize;

/// Read-only snapshot of the signed-in operator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "ProfileResponse")]
pub struct Profile {
    pub id: Option<u64>,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    id: Option<u64>,
    username: String,
    email: String,
    role: Role,
    profile: Option<ProfileDetails>,
}

#[derive(Deserialize)]
struct ProfileDetails {
    full_name: Option<String>,
}

impl From<ProfileResponse> for Profile {
    fn from(response: ProfileResponse) -> Self {
        let full_name = response
            .profile
            .and_then(|details| details.full_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            id: response.id,
            username: response.username,
            email: response.email,
            role: response.role,
            full_name,
        }
    }
}
