use crate::{
    api::{ApiClient, Listing},
    errors::ApiError,
    features::logs::{ActivityLogEntry, LogQuery, client},
    views::{ResourceView, Table, ViewState, page_footer},
};
use chrono::{DateTime, FixedOffset, Offset, Utc};

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format(TIMESTAMP_FORMAT).to_string()
}

/// Activity log table. Timestamps are shown in `offset`, UTC by default.
#[derive(Debug)]
pub struct LogsView {
    state: ViewState<Listing<ActivityLogEntry>>,
    offset: FixedOffset,
}

impl Default for LogsView {
    fn default() -> Self {
        Self {
            state: ViewState::Loading,
            offset: Utc.fix(),
        }
    }
}

impl LogsView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub async fn fetch(
        client: ApiClient,
        query: LogQuery,
    ) -> Result<Listing<ActivityLogEntry>, ApiError> {
        client::list_logs(&client, &query).await
    }

    #[must_use]
    pub fn entries(&self) -> &[ActivityLogEntry] {
        self.state
            .loaded()
            .map(|listing| listing.items.as_slice())
            .unwrap_or_default()
    }
}

impl ResourceView for LogsView {
    type Data = Listing<ActivityLogEntry>;

    const ERROR_FALLBACK: &'static str = "Could not load activity logs.";

    fn state(&self) -> &ViewState<Self::Data> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Self::Data> {
        &mut self.state
    }

    fn render_loaded(&self, listing: &Listing<ActivityLogEntry>) -> String {
        let mut table = Table::new(["ID", "User", "Activity", "Description", "IP address", "Time"]);
        for entry in &listing.items {
            table.push_row([
                entry.id.to_string(),
                entry.actor(),
                entry.activity_type.label().to_string(),
                entry.description.clone(),
                entry.ip_address.clone(),
                format_timestamp(&entry.created_at, &self.offset),
            ]);
        }

        let mut out = table.to_string();
        if let Some(footer) = page_footer(listing.pagination.as_ref()) {
            out.push_str(&footer);
            out.push('\n');
        }
        out
    }
}
