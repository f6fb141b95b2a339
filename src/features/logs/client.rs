use crate::{
    api::{ApiClient, Listing},
    errors::ApiError,
    features::logs::types::{ActivityLogEntry, LogQuery},
};

pub const LOGS_PATH: &str = "/api/admin/logs";

/// Fetches one page of the activity log, newest first.
///
/// # Errors
/// Propagates any [`ApiError`] from the request.
pub async fn list_logs(
    client: &ApiClient,
    query: &LogQuery,
) -> Result<Listing<ActivityLogEntry>, ApiError> {
    client.get_listing(LOGS_PATH, &query.query()).await
}
