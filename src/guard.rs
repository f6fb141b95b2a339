//! Route guard for the protected dashboard pages.
//!
//! The guard only looks at whether a token is stored; it never validates the
//! token with the server. An expired token is discovered by the first API call
//! that returns 401. Resolution happens before a view is mounted, so no
//! protected fetch is issued while the session is unauthenticated.

use crate::session::SessionContext;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Admins,
    Logs,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Admins => "/dashboard/admins",
            Self::Logs => "/dashboard/logs",
        }
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login)
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        [Self::Login, Self::Dashboard, Self::Admins, Self::Logs]
            .into_iter()
            .find(|route| route.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Outcome of resolving a route against the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    #[must_use]
    pub const fn route(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}

/// One guard per protected view entry. Starts in `Checking`.
#[derive(Debug, Default)]
pub struct RouteGuard {
    state: GuardState,
}

impl RouteGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Moves `Checking` to a terminal state. Terminal states are sticky: a guard
    /// is never re-checked, a fresh navigation gets a fresh guard.
    pub fn check(&mut self, session: &SessionContext) -> GuardState {
        if self.state == GuardState::Checking {
            self.state = if session.is_authenticated() {
                GuardState::Authenticated
            } else {
                GuardState::Unauthenticated
            };
        }
        self.state
    }
}

/// Decides whether `route` can render for this session.
#[must_use]
pub fn resolve(route: Route, session: &SessionContext) -> Navigation {
    if !route.is_protected() {
        return Navigation::Render(route);
    }

    match RouteGuard::new().check(session) {
        GuardState::Authenticated => Navigation::Render(route),
        GuardState::Checking | GuardState::Unauthenticated => {
            debug!(route = %route, "no session token, redirecting to login");
            Navigation::Redirect(Route::Login)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;
    use std::sync::Arc;

    fn session(token: Option<&str>) -> SessionContext {
        let store = token.map_or_else(MemoryCredentialStore::new, MemoryCredentialStore::with_token);
        SessionContext::new(Arc::new(store))
    }

    #[test]
    fn guard_starts_checking() {
        assert_eq!(RouteGuard::new().state(), GuardState::Checking);
    }

    #[test]
    fn guard_transitions_on_token_presence() {
        let mut guard = RouteGuard::new();
        assert_eq!(guard.check(&session(None)), GuardState::Unauthenticated);

        let mut guard_ok = RouteGuard::new();
        assert_eq!(guard_ok.check(&session(Some("t"))), GuardState::Authenticated);
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut guard = RouteGuard::new();
        let ctx = session(Some("t"));
        guard.check(&ctx);
        ctx.teardown().ok();
        assert_eq!(guard.check(&ctx), GuardState::Authenticated);
    }

    #[test]
    fn protected_routes_redirect_without_token() {
        let ctx = session(None);
        for route in [Route::Dashboard, Route::Admins, Route::Logs] {
            assert_eq!(resolve(route, &ctx), Navigation::Redirect(Route::Login));
        }
        assert_eq!(resolve(Route::Login, &ctx), Navigation::Render(Route::Login));
    }

    #[test]
    fn protected_routes_render_with_token() {
        let ctx = session(Some("t"));
        assert_eq!(resolve(Route::Admins, &ctx), Navigation::Render(Route::Admins));
    }

    #[test]
    fn paths_round_trip() {
        assert_eq!(Route::from_path("/dashboard/logs/"), Some(Route::Logs));
        assert_eq!(Route::from_path("/settings"), None);
        assert_eq!(Route::Admins.to_string(), "/dashboard/admins");
    }
}
