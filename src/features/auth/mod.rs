//! Authentication feature: the login exchange, client-side form validation and
//! logout. The login response carries the bearer token, so request and response
//! payloads must never be logged.
//!
//! Flow Overview: validate the form locally, POST the credentials without a
//! token, persist the returned token through the session context, then land on
//! the dashboard. Logout asks the API to revoke the token and always clears it
//! locally.

pub mod client;
mod login;
pub mod types;

pub use login::{LoginFlow, LoginForm, MIN_PASSWORD_LEN, logout, validate_email, validate_password};
