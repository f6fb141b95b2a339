//! Login payloads. Both directions carry secrets and are not `Debug`.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

impl LoginResponse {
    /// The token, unless the server sent none or a blank one.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}
