use crate::{
    cli::{actions::show, globals::GlobalArgs},
    errors::ApiError,
    guard::Route,
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use std::fmt;
use tracing::info;

pub const LOGIN_FALLBACK: &str = "Login failed.";

pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginArgs")
            .field("globals", &self.globals)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Operator-facing text for a failed login.
#[must_use]
pub fn login_error(err: &ApiError) -> String {
    match err {
        ApiError::Validation(fields) => fields
            .fields
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        ApiError::LoginRejected | ApiError::SubmissionInFlight => err.to_string(),
        _ => err.message_or(LOGIN_FALLBACK),
    }
}

/// # Errors
/// Returns an error if validation, the login call or storing the token fails.
pub async fn login(args: LoginArgs) -> Result<()> {
    let app = args.globals.app()?;
    let route = app
        .login(&args.email, args.password)
        .await
        .map_err(|err| anyhow!(login_error(&err)))?;

    info!(credentials = %args.globals.config.credentials_path.display(), "session token stored");
    println!("Logged in as {}.", args.email);
    show(app.navigate(route).await)
}

/// # Errors
/// Returns an error only if the local token file cannot be removed.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let app = globals.app()?;
    app.logout().await?;
    println!("Logged out.");
    Ok(())
}

/// # Errors
/// Returns an error if not signed in or the profile cannot be loaded.
pub async fn profile(globals: &GlobalArgs) -> Result<()> {
    let app = globals.app()?;
    show(app.navigate(Route::Dashboard).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldErrors;

    #[test]
    fn test_login_error_lists_field_messages() {
        let mut fields = FieldErrors::default();
        fields.push("email", "Email is invalid.");
        fields.push("password", "Password is required.");
        assert_eq!(
            login_error(&ApiError::Validation(fields)),
            "Email is invalid.\nPassword is required."
        );
    }

    #[test]
    fn test_login_error_prefers_server_message() {
        let err = ApiError::Unauthorized {
            message: Some("invalid credentials".to_string()),
        };
        assert_eq!(login_error(&err), "invalid credentials");
        assert_eq!(
            login_error(&ApiError::Network("refused".to_string())),
            LOGIN_FALLBACK
        );
    }

    #[test]
    fn test_login_args_debug_hides_password() {
        let args = LoginArgs {
            globals: GlobalArgs::new(
                crate::config::ApiConfig::new("http://localhost:8080")
                    .unwrap_or_else(|err| panic!("{err}")),
            ),
            email: "ops@tastygo.vn".to_string(),
            password: SecretString::from("hunter22"),
        };
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("***"));
    }
}
