//! Client wrappers for the auth endpoints.

use crate::{
    api::ApiClient,
    errors::ApiError,
    features::auth::types::{LoginRequest, LoginResponse},
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Exchanges credentials for a token. Sent without an `Authorization` header.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn login(client: &ApiClient, request: &LoginRequest<'_>) -> Result<LoginResponse, ApiError> {
    client.post_json_anonymous(LOGIN_PATH, request).await
}

/// Asks the API to revoke the current token.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.post_empty(LOGOUT_PATH).await
}
