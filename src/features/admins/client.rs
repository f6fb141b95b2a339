//! Client helpers for admin account endpoints.

use crate::{
    api::{ApiClient, Listing, PageRequest},
    errors::{ApiError, FieldErrors},
    features::{
        admins::types::{
            AdminAccount, CreateAdminRequest, ResetPasswordRequest, UnlockAccountRequest,
            UpdateStatusRequest,
        },
        auth::{validate_email, validate_password},
    },
};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

pub const USERS_PATH: &str = "/api/admin/users";
pub const ADMINS_PATH: &str = "/api/admin/users/admins";
pub const UPDATE_STATUS_PATH: &str = "/api/admin/users/update-status";
pub const RESET_PASSWORD_PATH: &str = "/api/admin/users/reset-password";
pub const UNLOCK_ACCOUNT_PATH: &str = "/api/admin/users/unlock-account";

/// Fetches one page of admin accounts.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn list_admins(
    client: &ApiClient,
    page: PageRequest,
) -> Result<Listing<AdminAccount>, ApiError> {
    client.get_listing(ADMINS_PATH, &page.query()).await
}

/// Creates an account with the `admin` role; the server ignores any other role.
///
/// # Errors
/// Returns `ApiError::Validation` without sending anything when a field is
/// malformed, otherwise propagates any [`ApiError`] from the request.
pub async fn create_admin(
    client: &ApiClient,
    email: &str,
    username: &str,
    password: &SecretString,
) -> Result<AdminAccount, ApiError> {
    let email = email.trim();
    let username = username.trim();

    let mut errors = FieldErrors::default();
    validate_email(email, &mut errors);
    if username.is_empty() {
        errors.push("username", "Username is required.");
    }
    validate_password(password.expose_secret(), &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let request = CreateAdminRequest {
        email,
        username,
        password: password.expose_secret(),
    };
    let account: AdminAccount = client.post_json(USERS_PATH, &request).await?;
    info!(user_id = account.id, "admin account created");
    Ok(account)
}

/// Sets an account's active flag. No response body is expected.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn update_status(client: &ApiClient, user_id: u64, active: bool) -> Result<(), ApiError> {
    client
        .post_json_empty(UPDATE_STATUS_PATH, &UpdateStatusRequest { user_id, active })
        .await?;
    info!(user_id, active, "admin status updated");
    Ok(())
}

/// Replaces an account's password after checking the local length rule.
///
/// # Errors
/// Returns `ApiError::Validation` without sending anything if the password is
/// too short, otherwise propagates any [`ApiError`] from the request.
pub async fn reset_password(
    client: &ApiClient,
    user_id: u64,
    password: &SecretString,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    validate_password(password.expose_secret(), &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let request = ResetPasswordRequest {
        user_id,
        password: password.expose_secret(),
    };
    client.post_json_empty(RESET_PASSWORD_PATH, &request).await?;
    info!(user_id, "admin password reset");
    Ok(())
}

/// Clears the lockout left by repeated failed logins.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn unlock_account(client: &ApiClient, user_id: u64) -> Result<(), ApiError> {
    client
        .post_json_empty(UNLOCK_ACCOUNT_PATH, &UnlockAccountRequest { user_id })
        .await?;
    info!(user_id, "admin account unlocked");
    Ok(())
}
