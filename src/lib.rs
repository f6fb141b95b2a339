//! # TastyGo Admin (operator console)
//!
//! `tastygo_admin` is the client side of the TastyGo administration API. It lets
//! an operator sign in, review and toggle admin accounts, and browse the
//! activity log. Every piece of data is owned by the remote API; this crate only
//! holds transient copies fetched per view.
//!
//! ## Session
//!
//! A single opaque bearer token is the only authentication signal consulted on
//! the client. It lives in a [`session::CredentialStore`] (a per-user file by
//! default) and is handed around through an explicit [`session::SessionContext`]
//! instead of ambient global state. Login initializes it, logout tears it down.
//!
//! ## Request flow
//!
//! Login → credential store → [`guard`] → [`views`] → [`api::ApiClient`] → API.
//!
//! Protected routes are resolved by the guard before any fetch is issued: with no
//! stored token the operator is redirected to login and no request leaves the
//! process. Token validity is discovered lazily by the first call that comes
//! back `401`; the app then surfaces the error and clears the session.
//!
//! ## Errors
//!
//! Every fallible call returns [`errors::ApiError`], whose variants mirror the
//! failure kinds a view must handle: missing credential, unauthorized,
//! validation, network/timeout and server errors.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod features;
pub mod guard;
pub mod session;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
