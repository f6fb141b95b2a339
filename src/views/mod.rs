//! Resource views: one fetch per mount, three render states.
//!
//! A view starts in [`ViewState::Loading`] and moves exactly once per attempt,
//! either to `Error` or to `Loaded`. The fetch runs on its own task and is tied
//! to a cancellation token; once a view is unmounted any result that still
//! arrives is dropped instead of being applied.

pub mod admins;
pub mod dashboard;
pub mod logs;
pub mod table;

pub use admins::AdminsView;
pub use dashboard::DashboardView;
pub use logs::LogsView;
pub use table::Table;

use crate::{api::Pagination, errors::ApiError};
use std::{fmt, future::Future};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

pub const LOADING_TEXT: &str = "Loading...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Error(ApiError),
    Loaded(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> ViewState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Applies the outcome of the current attempt. Returns `false` and leaves
    /// the state alone if the attempt already settled.
    pub fn settle(&mut self, result: Result<T, ApiError>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match result {
            Ok(data) => Self::Loaded(data),
            Err(err) => Self::Error(err),
        };
        true
    }
}

/// `Page 2 of 5 (43 total)`, or nothing when the server sent no paging info.
pub(crate) fn page_footer(pagination: Option<&Pagination>) -> Option<String> {
    pagination.map(|pagination| {
        format!(
            "Page {} of {} ({} total)",
            pagination.page,
            pagination.total_pages().max(1),
            pagination.total
        )
    })
}

/// A page backed by one remote fetch.
pub trait ResourceView {
    type Data: Send + 'static;

    /// Shown when the failure carries no server message.
    const ERROR_FALLBACK: &'static str;

    fn state(&self) -> &ViewState<Self::Data>;

    fn state_mut(&mut self) -> &mut ViewState<Self::Data>;

    fn render_loaded(&self, data: &Self::Data) -> String;

    fn apply(&mut self, result: Result<Self::Data, ApiError>) -> bool {
        self.state_mut().settle(result)
    }

    /// Starts a new attempt. The previous outcome is discarded.
    fn reload(&mut self) {
        *self.state_mut() = ViewState::Loading;
    }

    fn error_message(&self) -> Option<String> {
        self.state()
            .error()
            .map(|err| err.message_or(Self::ERROR_FALLBACK))
    }

    fn render(&self) -> String {
        match self.state() {
            ViewState::Loading => LOADING_TEXT.to_string(),
            ViewState::Error(err) => format!("Error: {}", err.message_or(Self::ERROR_FALLBACK)),
            ViewState::Loaded(data) => self.render_loaded(data),
        }
    }
}

/// Handle to a fetch started by [`mount`].
///
/// Dropping the handle unmounts the view.
pub struct Mounted<T> {
    token: CancellationToken,
    guard: DropGuard,
    handle: JoinHandle<Option<Result<T, ApiError>>>,
}

impl<T> fmt::Debug for Mounted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("unmounted", &self.token.is_cancelled())
            .field("finished", &self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

/// Spawns `fetch` for a freshly mounted view.
pub fn mount<F, T>(fetch: F) -> Mounted<T>
where
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
{
    let token = CancellationToken::new();
    let task_token = token.clone();

    let handle = tokio::spawn(async move {
        tokio::select! {
            biased;
            () = task_token.cancelled() => None,
            result = fetch => Some(result),
        }
    });

    Mounted {
        guard: token.clone().drop_guard(),
        token,
        handle,
    }
}

impl<T> Mounted<T> {
    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Token that unmounts this view when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the fetch. `None` means the view was unmounted first and the
    /// result, if any, was discarded.
    pub async fn settle(self) -> Option<Result<T, ApiError>> {
        let Self {
            token,
            guard,
            handle,
        } = self;

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => None,
            Err(err) => Some(Err(ApiError::Network(format!("fetch task failed: {err}")))),
        };

        if token.is_cancelled() {
            debug!("view unmounted, discarding late result");
            return None;
        }
        guard.disarm();
        outcome
    }
}
