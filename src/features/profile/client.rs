//! Client helper for the current-operator endpoint.

use crate::{api::ApiClient, errors::ApiError, features::profile::types::Profile};

pub const PROFILE_PATH: &str = "/api/profile";

/// Fetch the signed-in operator's profile.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn fetch_profile(client: &ApiClient) -> Result<Profile, ApiError> {
    client.get_json(PROFILE_PATH, &[]).await
}
