use crate::{
    api::ApiClient,
    errors::ApiError,
    features::profile::{Profile, client::fetch_profile},
    views::{ResourceView, ViewState},
};
use std::fmt::Write as _;

/// Landing page: who is signed in.
#[derive(Debug, Default)]
pub struct DashboardView {
    state: ViewState<Profile>,
}

impl DashboardView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fetch issued on mount.
    pub async fn fetch(client: ApiClient) -> Result<Profile, ApiError> {
        fetch_profile(&client).await
    }
}

impl ResourceView for DashboardView {
    type Data = Profile;

    const ERROR_FALLBACK: &'static str = "Could not load profile.";

    fn state(&self) -> &ViewState<Profile> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<Profile> {
        &mut self.state
    }

    fn render_loaded(&self, profile: &Profile) -> String {
        let mut out = String::new();
        let name = profile.full_name.as_deref().unwrap_or(&profile.username);
        let _ = writeln!(out, "Welcome, {name}");
        let _ = writeln!(out, "Username:  {}", profile.username);
        let _ = writeln!(out, "Email:     {}", profile.email);
        let _ = writeln!(out, "Role:      {}", profile.role.label());
        if let Some(full_name) = &profile.full_name {
            let _ = writeln!(out, "Full name: {full_name}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::admins::Role;

    fn profile(full_name: Option<&str>) -> Profile {
        Profile {
            id: Some(1),
            username: "root".to_string(),
            email: "root@tastygo.vn".to_string(),
            role: Role::SuperAdmin,
            full_name: full_name.map(ToString::to_string),
        }
    }

    #[test]
    fn renders_loading_then_profile() {
        let mut view = DashboardView::new();
        assert_eq!(view.render(), "Loading...");

        view.apply(Ok(profile(Some("Tran Thi B"))));
        let rendered = view.render();
        assert!(rendered.starts_with("Welcome, Tran Thi B\n"));
        assert!(rendered.contains("Email:     root@tastygo.vn"));
        assert!(rendered.contains("Full name: Tran Thi B"));
    }

    #[test]
    fn greeting_falls_back_to_username() {
        let mut view = DashboardView::new();
        view.apply(Ok(profile(None)));
        let rendered = view.render();
        assert!(rendered.starts_with("Welcome, root\n"));
        assert!(!rendered.contains("Full name"));
    }

    #[test]
    fn error_uses_fallback_without_server_message() {
        let mut view = DashboardView::new();
        view.apply(Err(ApiError::Network("refused".to_string())));
        assert_eq!(view.render(), "Error: Could not load profile.");
        assert_eq!(view.state().loaded(), None);
    }
}
