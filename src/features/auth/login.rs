use crate::{
    api::ApiClient,
    errors::{ApiError, FieldErrors},
    features::auth::{client, types::LoginRequest},
    guard::Route,
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument, warn};

pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

/// Credentials as typed by the operator.
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: &str, password: SecretString) -> Self {
        Self {
            email: email.trim().to_string(),
            password,
        }
    }

    /// Checks both fields and reports every problem at once.
    ///
    /// # Errors
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        validate_email(&self.email, &mut errors);
        validate_password(self.password.expose_secret(), &mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(email))
}

/// Required, and shaped like `local@domain.tld`.
pub fn validate_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.push("email", "Email is required.");
    } else if !valid_email(email) {
        errors.push("email", "Email is invalid.");
    }
}

/// Required, at least [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.push("password", "Password is required.");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        );
    }
}

/// Login submission with a single in-flight slot.
#[derive(Debug, Default)]
pub struct LoginFlow {
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LoginFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Validates, exchanges the credentials for a token and starts the session.
    /// Returns the route to land on.
    ///
    /// # Errors
    /// - `Validation` when the form is malformed; nothing is sent.
    /// - `SubmissionInFlight` while another submission is pending.
    /// - `LoginRejected` when the server answers without a token.
    /// - Any other [`ApiError`] from the exchange or from persisting the token.
    #[instrument(skip_all)]
    pub async fn submit(&self, api: &ApiClient, form: &LoginForm) -> Result<Route, ApiError> {
        form.validate().map_err(ApiError::Validation)?;

        let _guard = self.begin().ok_or(ApiError::SubmissionInFlight)?;

        let request = LoginRequest {
            email: &form.email,
            password: form.password.expose_secret(),
        };
        let token = client::login(api, &request)
            .await?
            .into_token()
            .ok_or(ApiError::LoginRejected)?;

        api.session().init(SecretString::from(token))?;
        info!("login succeeded");
        Ok(Route::Dashboard)
    }
}

/// Ends the session: revokes the token server-side when possible and always
/// clears it locally. Returns the route to land on.
///
/// # Errors
/// Returns `ApiError::Storage` only if the local token cannot be removed.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient) -> Result<Route, ApiError> {
    if api.session().is_authenticated()
        && let Err(err) = client::logout(api).await
    {
        warn!("server-side logout failed, clearing local session anyway: {err}");
    }

    api.session().teardown()?;
    Ok(Route::Login)
}
