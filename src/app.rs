//! Composition root: session, client, guard and views wired together.
//!
//! Every navigation is resolved by the route guard before a view is mounted.
//! When a protected call comes back `Unauthorized` the view keeps the error for
//! display and the session is torn down, so the next protected navigation
//! lands on the login page.

use crate::{
    api::{ApiClient, PageRequest},
    config::ApiConfig,
    errors::ApiError,
    features::{
        admins::{AdminAccount, client as admins},
        auth::{LoginFlow, LoginForm, logout},
        logs::LogQuery,
    },
    guard::{Navigation, Route, resolve},
    session::{CredentialStore, SessionContext},
    views::{AdminsView, DashboardView, LogsView, ResourceView, mount},
};
use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// What the operator ends up looking at after a navigation.
#[derive(Debug)]
pub enum Screen {
    Login,
    Dashboard(DashboardView),
    Admins(AdminsView),
    Logs(LogsView),
}

impl Screen {
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::Dashboard(_) => Route::Dashboard,
            Self::Admins(_) => Route::Admins,
            Self::Logs(_) => Route::Logs,
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Login => "Please log in.".to_string(),
            Self::Dashboard(view) => view.render(),
            Self::Admins(view) => view.render(),
            Self::Logs(view) => view.render(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    client: ApiClient,
    login: LoginFlow,
    // Unmounts the current view when another navigation starts.
    active: Mutex<Option<CancellationToken>>,
}

impl App {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            login: LoginFlow::new(),
            active: Mutex::new(None),
        }
    }

    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn with_store(config: ApiConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let client = ApiClient::new(config, SessionContext::new(store))?;
        Ok(Self::new(client))
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }

    /// # Errors
    /// See [`LoginFlow::submit`]. The caller stays on the login page on error.
    pub async fn login(&self, email: &str, password: SecretString) -> Result<Route, ApiError> {
        let form = LoginForm::new(email, password);
        self.login.submit(&self.client, &form).await
    }

    /// # Errors
    /// Returns `ApiError::Storage` if the local token cannot be removed.
    pub async fn logout(&self) -> Result<Route, ApiError> {
        self.unmount_active();
        logout(&self.client).await
    }

    /// Navigates with default paging. `None` means a newer navigation took over
    /// before the fetch settled.
    pub async fn navigate(&self, route: Route) -> Option<Screen> {
        match route {
            Route::Login => Some(Screen::Login),
            Route::Dashboard => self.open_dashboard().await,
            Route::Admins => self.open_admins(PageRequest::default()).await,
            Route::Logs => self.open_logs(LogQuery::default(), Utc.fix()).await,
        }
    }

    pub async fn open_dashboard(&self) -> Option<Screen> {
        let client = self.client.clone();
        self.open(
            Route::Dashboard,
            DashboardView::new(),
            DashboardView::fetch(client),
        )
        .await
        .map(|view| view.map_or(Screen::Login, Screen::Dashboard))
    }

    pub async fn open_admins(&self, page: PageRequest) -> Option<Screen> {
        let client = self.client.clone();
        self.open(Route::Admins, AdminsView::new(), AdminsView::fetch(client, page))
            .await
            .map(|view| view.map_or(Screen::Login, Screen::Admins))
    }

    /// Opens the activity log with timestamps shown at `offset` from UTC.
    pub async fn open_logs(&self, query: LogQuery, offset: FixedOffset) -> Option<Screen> {
        let client = self.client.clone();
        let view = LogsView::new().with_offset(offset);
        self.open(Route::Logs, view, LogsView::fetch(client, query))
            .await
            .map(|view| view.map_or(Screen::Login, Screen::Logs))
    }

    /// Toggles an account from a loaded admins screen.
    ///
    /// # Errors
    /// See [`AdminsView::toggle_status`]; a rejected or missing session also
    /// ends the session here.
    pub async fn toggle_status(&self, view: &mut AdminsView, user_id: u64) -> Result<bool, ApiError> {
        let result = view.toggle_status(&self.client, user_id).await;
        if let Err(err) = &result {
            self.on_error(err);
        }
        result
    }

    /// Sets an account's active flag to the given value, whatever it was before.
    ///
    /// # Errors
    /// Returns `MissingCredential` without a session, otherwise see
    /// [`admins::update_status`].
    pub async fn set_status(&self, user_id: u64, active: bool) -> Result<(), ApiError> {
        self.protected(Route::Admins, admins::update_status(&self.client, user_id, active))
            .await
    }

    /// # Errors
    /// Returns `MissingCredential` without a session, otherwise see
    /// [`admins::create_admin`].
    pub async fn create_admin(
        &self,
        email: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<AdminAccount, ApiError> {
        self.protected(
            Route::Admins,
            admins::create_admin(&self.client, email, username, password),
        )
        .await
    }

    /// # Errors
    /// Returns `MissingCredential` without a session, otherwise see
    /// [`admins::reset_password`].
    pub async fn reset_password(&self, user_id: u64, password: &SecretString) -> Result<(), ApiError> {
        self.protected(Route::Admins, admins::reset_password(&self.client, user_id, password))
            .await
    }

    /// # Errors
    /// Returns `MissingCredential` without a session, otherwise see
    /// [`admins::unlock_account`].
    pub async fn unlock_account(&self, user_id: u64) -> Result<(), ApiError> {
        self.protected(Route::Admins, admins::unlock_account(&self.client, user_id))
            .await
    }

    async fn protected<T>(
        &self,
        route: Route,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        if let Navigation::Redirect(_) = resolve(route, self.session()) {
            return Err(ApiError::MissingCredential);
        }
        let result = call.await;
        if let Err(err) = &result {
            self.on_error(err);
        }
        result
    }

    /// Guard, mount, settle. `Some(None)` is a redirect to login.
    #[instrument(skip_all, fields(route = %route))]
    async fn open<V, F>(&self, route: Route, mut view: V, fetch: F) -> Option<Option<V>>
    where
        V: ResourceView,
        F: Future<Output = Result<V::Data, ApiError>> + Send + 'static,
    {
        if let Navigation::Redirect(target) = resolve(route, self.session()) {
            info!(%target, "redirecting");
            return Some(None);
        }

        let mounted = mount(fetch);
        self.replace_active(mounted.cancellation_token());

        let result = mounted.settle().await?;
        if let Err(err) = &result {
            if err.is_missing_credential() {
                return Some(None);
            }
            self.on_error(err);
        }

        view.apply(result);
        Some(Some(view))
    }

    fn replace_active(&self, token: CancellationToken) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.replace(token) {
            previous.cancel();
        }
    }

    fn unmount_active(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.take() {
            previous.cancel();
        }
    }

    fn on_error(&self, err: &ApiError) {
        if !err.is_unauthorized() {
            return;
        }
        warn!("session rejected by the API, signing out: {err}");
        if let Err(clear_err) = self.session().teardown() {
            warn!("failed to clear rejected session: {clear_err}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{session::MemoryCredentialStore, views::ViewState};
    use anyhow::Result;
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn app(uri: &str, store: MemoryCredentialStore) -> App {
        App::with_store(ApiConfig::new(uri).unwrap(), Arc::new(store)).unwrap()
    }

    #[tokio::test]
    async fn protected_routes_redirect_without_fetching() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(0)
            .mount(&server)
            .await;

        let app = app(&server.uri(), MemoryCredentialStore::new());
        for route in [Route::Dashboard, Route::Admins, Route::Logs] {
            let screen = app.navigate(route).await.unwrap();
            assert_eq!(screen.route(), Route::Login);
        }
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_shows_error_then_signs_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/logs"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "token expired"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = app(&server.uri(), MemoryCredentialStore::with_token("stale"));

        let Some(Screen::Logs(view)) = app.navigate(Route::Logs).await else {
            panic!("expected the logs screen");
        };
        assert_eq!(view.render(), "Error: token expired");
        assert!(!app.session().is_authenticated());

        let screen = app.navigate(Route::Logs).await.unwrap();
        assert_eq!(screen.route(), Route::Login);
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_keep_the_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/users/admins"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = app(&server.uri(), MemoryCredentialStore::with_token("live"));
        let Some(Screen::Admins(view)) = app.navigate(Route::Admins).await else {
            panic!("expected the admins screen");
        };
        assert!(matches!(view.state(), ViewState::Error(_)));
        assert_eq!(view.render(), "Error: Could not load admin accounts.");
        assert!(app.session().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn newer_navigation_discards_stale_fetch() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/users/admins"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": "root@tastygo.vn",
                "username": "root",
                "role": "superadmin"
            })))
            .mount(&server)
            .await;

        let app = app(&server.uri(), MemoryCredentialStore::with_token("live"));

        let (stale, current) = tokio::join!(app.navigate(Route::Admins), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.navigate(Route::Dashboard).await
        });

        assert!(stale.is_none());
        let Some(Screen::Dashboard(view)) = current else {
            panic!("expected the dashboard screen");
        };
        assert!(view.render().starts_with("Welcome, root"));
        Ok(())
    }

    #[tokio::test]
    async fn set_status_survives_fresh_sessions() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .and(body_json(json!({"user_id": 4, "active": false})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/users/update-status"))
            .and(body_json(json!({"user_id": 4, "active": true})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        app(&server.uri(), MemoryCredentialStore::with_token("live"))
            .set_status(4, false)
            .await?;
        app(&server.uri(), MemoryCredentialStore::with_token("live"))
            .set_status(4, true)
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn logs_render_in_requested_offset() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": 1,
                    "user_id": 2,
                    "username": "root",
                    "activity_type": "login",
                    "description": "User logged in",
                    "ip_address": "10.0.0.1",
                    "created_at": "2024-05-01T10:30:05Z"
                }]
            })))
            .mount(&server)
            .await;

        let app = app(&server.uri(), MemoryCredentialStore::with_token("live"));
        let ict = FixedOffset::east_opt(7 * 3600).unwrap();
        let Some(Screen::Logs(view)) = app.open_logs(LogQuery::default(), ict).await else {
            panic!("expected the logs screen");
        };
        assert!(view.render().contains("01/05/2024 17:30:05"));
        Ok(())
    }

    #[tokio::test]
    async fn create_admin_requires_session() {
        let app = app("http://127.0.0.1:9", MemoryCredentialStore::new());
        let result = app
            .create_admin("new@tastygo.vn", "newbie", &SecretString::from("s3cret!"))
            .await;
        assert_eq!(result.err(), Some(ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn unlock_requires_session() {
        let app = app("http://127.0.0.1:9", MemoryCredentialStore::new());
        assert_eq!(
            app.unlock_account(4).await.err(),
            Some(ApiError::MissingCredential)
        );
    }
}
