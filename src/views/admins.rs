use crate::{
    api::{ApiClient, Listing, PageRequest},
    errors::{ApiError, FieldErrors},
    features::admins::{AdminAccount, client},
    views::{ResourceView, Table, ViewState, page_footer},
};
use tracing::warn;

pub const TOGGLE_FALLBACK: &str = "Could not update account status.";

/// Admin accounts table with the status toggle.
#[derive(Debug, Default)]
pub struct AdminsView {
    state: ViewState<Listing<AdminAccount>>,
    notice: Option<String>,
}

impl AdminsView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch(client: ApiClient, page: PageRequest) -> Result<Listing<AdminAccount>, ApiError> {
        client::list_admins(&client, page).await
    }

    #[must_use]
    pub fn accounts(&self) -> &[AdminAccount] {
        self.state
            .loaded()
            .map(|listing| listing.items.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn account(&self, user_id: u64) -> Option<&AdminAccount> {
        self.accounts().iter().find(|account| account.id == user_id)
    }

    /// Feedback from the last mutation, success or failure.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Flips an account's active flag on the server, then locally.
    ///
    /// The local row only changes when the server confirms; on failure the
    /// notice carries the error and the row keeps its previous value.
    /// Returns the new `active` value.
    ///
    /// # Errors
    /// `Validation` if the account is not in the loaded page, otherwise any
    /// [`ApiError`] from the update call.
    pub async fn toggle_status(&mut self, api: &ApiClient, user_id: u64) -> Result<bool, ApiError> {
        let Some(current) = self.account(user_id).map(|account| account.active) else {
            let mut errors = FieldErrors::default();
            errors.push("user_id", format!("Account {user_id} is not on this page."));
            return Err(ApiError::Validation(errors));
        };
        let target = !current;

        if let Err(err) = client::update_status(api, user_id, target).await {
            warn!(user_id, "status update failed: {err}");
            self.notice = Some(err.message_or(TOGGLE_FALLBACK));
            return Err(err);
        }

        if let Some(account) = self
            .state
            .loaded_mut()
            .and_then(|listing| listing.items.iter_mut().find(|account| account.id == user_id))
        {
            account.active = target;
        }
        self.notice = Some(format!(
            "Account {user_id} is now {}.",
            if target { "active" } else { "disabled" }
        ));
        Ok(target)
    }
}

impl ResourceView for AdminsView {
    type Data = Listing<AdminAccount>;

    const ERROR_FALLBACK: &'static str = "Could not load admin accounts.";

    fn state(&self) -> &ViewState<Self::Data> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Self::Data> {
        &mut self.state
    }

    fn reload(&mut self) {
        self.state = ViewState::Loading;
        self.notice = None;
    }

    fn render_loaded(&self, listing: &Listing<AdminAccount>) -> String {
        let mut table = Table::new(["ID", "Email", "Username", "Role", "Status"]);
        for account in &listing.items {
            table.push_row([
                account.id.to_string(),
                account.email.clone(),
                account.username.clone(),
                account.role.label().to_string(),
                account.status_label().to_string(),
            ]);
        }

        let mut out = table.to_string();
        if let Some(footer) = page_footer(listing.pagination.as_ref()) {
            out.push_str(&footer);
            out.push('\n');
        }
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        config::ApiConfig,
        features::admins::Role,
        session::{MemoryCredentialStore, SessionContext},
        views::table::EMPTY_PLACEHOLDER,
    };
    use anyhow::Result;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(uri: &str) -> ApiClient {
        ApiClient::new(
            ApiConfig::new(uri).unwrap(),
            SessionContext::new(Arc::new(MemoryCredentialStore::with_token("t"))),
        )
        .unwrap()
    }

    fn loaded_view(active: bool) -> AdminsView {
        let mut view = AdminsView::new();
        view.apply(Ok(Listing {
            items: vec![AdminAccount {
                id: 4,
                email: "ops@tastygo.vn".to_string(),
                username: "ops".to_string(),
                role: Role::Admin,
                active,
            }],
            pagination: None,
        }));
        view
    }

    #[test]
    fn empty_listing_renders_placeholder_row() {
        let mut view = AdminsView::new();
        view.apply(Ok(Listing {
            items: Vec::new(),
            pagination: None,
        }));
        let rendered = view.render();
        assert_eq!(rendered.lines().count(), 3);
        assert_eq!(rendered.lines().nth(2).map(str::trim), Some(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn failed_fetch_shows_server_message() {
        let mut view = AdminsView::new();
        view.apply(Err(ApiError::Server {
            status: 403,
            message: Some("only superadmin can view admin list".to_string()),
        }));
        assert_eq!(view.render(), "Error: only superadmin can view admin list");
        assert!(view.accounts().is_empty());
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_state() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let mut view = loaded_view(true);

        assert!(!view.toggle_status(&api, 4).await?);
        assert_eq!(view.account(4).map(|a| a.active), Some(false));
        assert!(view.render().contains("Disabled"));

        assert!(view.toggle_status(&api, 4).await?);
        assert_eq!(view.account(4).map(|a| a.active), Some(true));
        assert_eq!(view.notice(), Some("Account 4 is now active."));
        Ok(())
    }

    #[tokio::test]
    async fn failed_toggle_leaves_row_untouched() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .and(body_json(json!({"user_id": 4, "active": true})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "cannot change status of superadmin"
            })))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let mut view = loaded_view(false);

        let err = view.toggle_status(&api, 4).await.err().unwrap();
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(view.account(4).map(|a| a.active), Some(false));
        assert_eq!(view.notice(), Some("cannot change status of superadmin"));
        Ok(())
    }

    #[tokio::test]
    async fn toggle_unknown_account_sends_nothing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let mut view = loaded_view(true);
        let result = view.toggle_status(&api, 99).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        Ok(())
    }
}
